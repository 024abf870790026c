pub mod config;
pub mod error;
pub mod models;
pub mod taxonomy;
pub mod analysis;
pub mod storage;
pub mod sources;

pub use config::{Config, PipelineConfig};
pub use error::{Error, Result};
pub use taxonomy::SkillCatalogue;
pub use analysis::{NetworkPipeline, NetworkRequest, NetworkScope, SkillMatcher, Thresholds};
pub use sources::{IngestPipeline, PostingSource};
pub use storage::Storage;
