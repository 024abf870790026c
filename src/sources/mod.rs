pub mod provider;
pub mod rate_limiter;
pub mod http;
pub mod html;
pub mod remotive;
pub mod arbeitnow;
pub mod file;
pub mod ingest;

pub use provider::{PostingSource, SourceQuery};
pub use rate_limiter::RateLimiter;
pub use remotive::RemotiveSource;
pub use arbeitnow::ArbeitnowSource;
pub use file::JsonFileSource;
pub use ingest::{IngestPipeline, IngestReport};
