//! Variable trees: arbitrary JSON attached to hosts and tags, addressed by
//! `$`-rooted paths.

pub mod path;
pub mod tree;

pub use path::{Segment, VarPath};
pub use tree::{append, get, set, unset};

use serde_json::Value;

use crate::error::{IsidoreError, Result};

/// Parse user input as a JSON value.
pub fn parse_json(input: &str) -> Result<Value> {
    serde_json::from_str(input).map_err(|source| IsidoreError::InvalidJson {
        input: input.to_string(),
        source,
    })
}
