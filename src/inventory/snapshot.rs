//! Everything the inventory needs, read from the store in one pass

use std::collections::HashSet;

use tracing::debug;

use crate::error::Result;
use crate::store::{Host, HostFilter, Store, Tag, TagOrder};

/// Commissioned hosts, every tag and who carries what.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    /// Commissioned hosts by hostname.
    pub hosts: Vec<Host>,
    /// All tags, group-then-name.
    pub tags: Vec<Tag>,
    /// (host id, tag id) pairs.
    pub assignments: HashSet<(i64, i64)>,
}

impl Snapshot {
    pub fn load(store: &Store) -> Result<Self> {
        let hosts = store.hosts(HostFilter::Commissioned)?;
        let tags = store.tags(TagOrder::ByGroupThenName)?;
        let assignments: HashSet<_> = store.assignments()?.into_iter().collect();
        debug!(
            hosts = hosts.len(),
            tags = tags.len(),
            assignments = assignments.len(),
            "loaded inventory snapshot"
        );
        Ok(Self {
            hosts,
            tags,
            assignments,
        })
    }

    pub fn has_tag(&self, host: &Host, tag: &Tag) -> bool {
        self.assignments.contains(&(host.id(), tag.id()))
    }

    /// Tags of `host`, group-then-name.
    pub fn tags_of<'a>(&'a self, host: &'a Host) -> impl Iterator<Item = &'a Tag> + 'a {
        self.tags.iter().filter(move |tag| self.has_tag(host, tag))
    }

    /// Commissioned hosts carrying `tag`, by hostname.
    pub fn hosts_of<'a>(&'a self, tag: &'a Tag) -> impl Iterator<Item = &'a Host> + 'a {
        self.hosts.iter().filter(move |host| self.has_tag(host, tag))
    }
}
