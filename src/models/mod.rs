//! Data models: configuration sources and bound records

pub mod record;
pub mod source;

// Re-export main model types
pub use record::{ConfigRecord, Pet, PERSON_FIELDS, PET_FIELDS};
pub use source::PropertySource;
