//! Pest grammar parser for variable paths

use std::fmt;
use std::str::FromStr;

use pest::Parser;
use pest_derive::Parser;

use crate::error::{IsidoreError, Result};

#[derive(Parser)]
#[grammar = "../grammar/varpath.pest"]
struct VarPathParser;

/// One step into a JSON document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Object member. Digit-only keys stay keys; only `[N]` indexes a list.
    Key(String),
    /// List element.
    Index(usize),
}

/// A parsed path into a variable tree, rooted at `$`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VarPath {
    segments: Vec<Segment>,
}

impl VarPath {
    /// The document root, `$`.
    pub fn root() -> Self {
        Self::default()
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Path made of the first `len` segments.
    pub fn prefix(&self, len: usize) -> VarPath {
        VarPath {
            segments: self.segments[..len.min(self.segments.len())].to_vec(),
        }
    }

    /// Append a key segment.
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.segments.push(Segment::Key(key.into()));
        self
    }

    /// Append an index segment.
    pub fn index(mut self, index: usize) -> Self {
        self.segments.push(Segment::Index(index));
        self
    }

    /// Parse a user supplied path. Anything not starting with `$` is read as
    /// if it were prefixed with `$.`.
    pub fn parse(input: &str) -> Result<Self> {
        let pairs = VarPathParser::parse(Rule::var_path, input).map_err(|e| {
            IsidoreError::MalformedPath {
                path: input.to_string(),
                reason: e.variant.message().to_string(),
            }
        })?;

        let mut segments = Vec::new();
        for pair in pairs.flatten() {
            match pair.as_rule() {
                Rule::key => segments.push(Segment::Key(pair.as_str().to_string())),
                Rule::quoted_inner => {
                    let key = unescape(pair.as_str());
                    if key.is_empty() {
                        return Err(IsidoreError::MalformedPath {
                            path: input.to_string(),
                            reason: "empty key".to_string(),
                        });
                    }
                    segments.push(Segment::Key(key));
                }
                Rule::number => {
                    let index = pair.as_str().parse::<usize>().map_err(|e| {
                        IsidoreError::MalformedPath {
                            path: input.to_string(),
                            reason: format!("bad index {}: {}", pair.as_str(), e),
                        }
                    })?;
                    segments.push(Segment::Index(index));
                }
                _ => {}
            }
        }

        Ok(Self { segments })
    }
}

impl FromStr for VarPath {
    type Err = IsidoreError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for VarPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "$")?;
        for segment in &self.segments {
            match segment {
                Segment::Key(key) if is_plain_key(key) => write!(f, ".{}", key)?,
                Segment::Key(key) => {
                    write!(f, ".\"{}\"", key.replace('\\', "\\\\").replace('"', "\\\""))?
                }
                Segment::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}

fn is_plain_key(key: &str) -> bool {
    !key.is_empty()
        && !key
            .chars()
            .any(|c| matches!(c, '.' | '[' | ']' | '"' | '$') || c.is_whitespace())
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}
