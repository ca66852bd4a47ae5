//! Catalog Adapters
//!
//! Implementations of the TargetSource port.
//!
//! - **FileTargetSource** - Reads target definitions from a JSON document
//! - **StaticTargetSource** - Serves a fixed, in-memory target map (testing)

mod file_target_source;
mod static_target_source;

pub use file_target_source::{parse_targets, FileTargetSource};
pub use static_target_source::StaticTargetSource;
