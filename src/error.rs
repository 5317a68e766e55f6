//! Error types for Isidore

use std::fmt;

use thiserror::Error;

/// The two kinds of named records held by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Host,
    Tag,
}

impl EntityKind {
    /// Lowercase noun used inside sentences.
    pub fn noun(&self) -> &'static str {
        match self {
            EntityKind::Host => "host",
            EntityKind::Tag => "tag",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Host => write!(f, "Host"),
            EntityKind::Tag => write!(f, "Tag"),
        }
    }
}

#[derive(Error, Debug)]
pub enum IsidoreError {
    #[error("{kind} {name} does not exist")]
    NotFound { kind: EntityKind, name: String },

    #[error("{kind} {name} already exists")]
    DuplicateName { kind: EntityKind, name: String },

    #[error("{host} already has tag {tag}")]
    AlreadyAssigned { host: String, tag: String },

    #[error("{host} does not have tag {tag}")]
    NotAssigned { host: String, tag: String },

    #[error("Cannot delete {} {name}: {}", .kind.noun(), still_referenced_reason(.kind))]
    StillReferenced { kind: EntityKind, name: String },

    #[error("Malformed variable path `{path}`: {reason}")]
    MalformedPath { path: String, reason: String },

    #[error("Variable {path} is not a list")]
    NotAList { path: String },

    #[error("The variable tree root must be a JSON object")]
    RootNotObject,

    #[error(
        "{input}\n^-- this is not valid JSON ({source})\n\n\
         Strings must be double quoted. Either nest the double quotes inside\n\
         single quotes or escape them:\n\n   \
         > host myhost var set foo '\"bar\"'\n\nor\n\n   \
         > host myhost var set foo \\\"bar\\\""
    )]
    InvalidJson {
        input: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid date `{0}`: expected YYYY-MM-DD, YYYY-MM-DD HH:MM:SS or now")]
    InvalidDate(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database schema version {found} is not supported (this build understands up to {supported})")]
    UnsupportedSchema { found: String, supported: String },

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Stored variables are not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn still_referenced_reason(kind: &EntityKind) -> &'static str {
    match kind {
        EntityKind::Host => "it still has tags assigned to it.",
        EntityKind::Tag => "it still has hosts assigned to it.",
    }
}

impl IsidoreError {
    /// True for every uniqueness violation, whether on a name or on a
    /// host/tag assignment.
    pub fn is_duplicate(&self) -> bool {
        matches!(
            self,
            IsidoreError::DuplicateName { .. } | IsidoreError::AlreadyAssigned { .. }
        )
    }

    /// True for the failures a caller is expected to report as a plain
    /// message rather than a diagnostic.
    pub fn is_user_error(&self) -> bool {
        !matches!(
            self,
            IsidoreError::Storage(_)
                | IsidoreError::Decode(_)
                | IsidoreError::Yaml(_)
                | IsidoreError::Io(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, IsidoreError>;
