//! Inventory builder: commissioned hosts and tag groups merged with their
//! variables, ready for the output formats.

pub mod builder;
pub mod details;
pub mod snapshot;

pub use builder::{Group, Inventory, ALL};
pub use details::{HostDetails, TagDetails, HOST_FACTS_KEY, TAG_FACTS_PREFIX};
pub use snapshot::Snapshot;
