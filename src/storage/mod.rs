pub mod sqlite;

pub use sqlite::{SaveSummary, Storage};
