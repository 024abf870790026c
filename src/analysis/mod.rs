pub mod matcher;
pub mod aggregator;
pub mod projector;
pub mod pipeline;

pub use matcher::SkillMatcher;
pub use aggregator::{CoOccurrenceAggregator, SkillStats};
pub use projector::{GraphProjector, Thresholds};
pub use pipeline::{assemble_network, NetworkPipeline, NetworkRequest, NetworkScope};
