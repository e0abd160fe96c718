pub mod config;
pub mod dates;
pub mod error;
pub mod media;
pub mod query;
pub mod tags;
pub mod telemetry;
pub mod types;

pub use config::AppConfig;
pub use error::{CamNotesError, Result};
pub use query::{filter_and_sort, filter_by_search, sort_photos};
pub use tags::{extract_mentions, extract_tags};
pub use types::*;
