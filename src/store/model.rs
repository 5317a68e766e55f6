//! Typed host and tag records, decoded once at the store boundary

use chrono::NaiveDateTime;
use serde::Serialize;
use serde_json::Value;

/// Label shown wherever a tag without a group is listed by group.
pub const UNGROUPED: &str = "ungrouped";

/// How dates are shown and accepted.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn format_date(date: NaiveDateTime) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// A tracked machine.
///
/// Values handed out by [`Store`](crate::store::Store) are snapshots. The
/// store's setters take `&mut Host`, persist the change and then update the
/// snapshot; nothing else changes a host.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Host {
    pub(crate) id: i64,
    pub(crate) hostname: String,
    pub(crate) commission_date: Option<NaiveDateTime>,
    pub(crate) decommission_date: Option<NaiveDateTime>,
    pub(crate) description: Option<String>,
    pub(crate) variables: Value,
}

impl Host {
    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    pub fn commission_date(&self) -> Option<NaiveDateTime> {
        self.commission_date
    }

    /// `None` while the host is commissioned.
    pub fn decommission_date(&self) -> Option<NaiveDateTime> {
        self.decommission_date
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn variables(&self) -> &Value {
        &self.variables
    }

    /// A host is commissioned exactly when it has no decommission date.
    pub fn is_commissioned(&self) -> bool {
        self.decommission_date.is_none()
    }
}

/// A named label attachable to many hosts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tag {
    pub(crate) id: i64,
    pub(crate) name: String,
    pub(crate) group: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) variables: Value,
}

impl Tag {
    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    /// The group, or `ungrouped` when there is none.
    pub fn group_label(&self) -> &str {
        self.group.as_deref().unwrap_or(UNGROUPED)
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn variables(&self) -> &Value {
        &self.variables
    }
}

/// Which hosts a listing returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HostFilter {
    #[default]
    All,
    Commissioned,
    Decommissioned,
}

/// Tag listing order.
///
/// `ByGroupThenName` puts tags without a group before every named group;
/// group and tag names then compare byte-wise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TagOrder {
    #[default]
    ByName,
    ByGroupThenName,
}

/// A tag group and the names of its tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagGroup {
    pub group: Option<String>,
    pub tags: Vec<String>,
}

impl TagGroup {
    pub fn label(&self) -> &str {
        self.group.as_deref().unwrap_or(UNGROUPED)
    }

    /// Comma separated tag names.
    pub fn joined(&self) -> String {
        self.tags.join(",")
    }
}
