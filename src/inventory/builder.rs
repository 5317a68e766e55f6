//! Assemble the inventory tree from a snapshot

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::Result;
use crate::inventory::details::{HostDetails, TagDetails};
use crate::inventory::snapshot::Snapshot;
use crate::store::{Store, UNGROUPED};

/// Name of the group every host belongs to. A tag with this name feeds its
/// variables to that group instead of becoming a child of it.
pub const ALL: &str = "all";

/// A tag seen as an inventory group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Group {
    pub name: String,
    pub group: Option<String>,
    pub description: Option<String>,
    /// Commissioned hosts carrying the tag, by hostname.
    pub hosts: Vec<String>,
    pub vars: Value,
}

impl Group {
    /// Tag group, or `ungrouped`.
    pub fn label(&self) -> &str {
        self.group.as_deref().unwrap_or(UNGROUPED)
    }
}

/// Commissioned hosts and tag groups with their merged variables.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Inventory {
    /// Every commissioned host, tagged or not, by hostname.
    pub hosts: Vec<HostDetails>,
    /// Every tag in group-then-name order, `all` included.
    pub groups: Vec<Group>,
}

impl Inventory {
    pub fn build(snapshot: &Snapshot) -> Self {
        let hosts: Vec<HostDetails> = snapshot
            .hosts
            .iter()
            .map(|host| HostDetails::new(host, snapshot.tags_of(host)))
            .collect();

        let groups: Vec<Group> = snapshot
            .tags
            .iter()
            .map(|tag| {
                let members = snapshot
                    .hosts_of(tag)
                    .map(|host| host.hostname().to_string())
                    .collect();
                let details = TagDetails::new(tag, members);
                Group {
                    name: details.name,
                    group: tag.group().map(str::to_string),
                    description: tag.description().map(str::to_string),
                    hosts: details.hosts,
                    vars: details.vars,
                }
            })
            .collect();

        debug!(hosts = hosts.len(), groups = groups.len(), "built inventory");
        Self { hosts, groups }
    }

    /// Snapshot the store and build from it.
    pub fn load(store: &Store) -> Result<Self> {
        Ok(Self::build(&Snapshot::load(store)?))
    }

    pub fn host(&self, hostname: &str) -> Option<&HostDetails> {
        self.hosts.iter().find(|host| host.hostname == hostname)
    }

    pub fn group(&self, name: &str) -> Option<&Group> {
        self.groups.iter().find(|group| group.name == name)
    }

    /// Variables of the `all` tag, if there is one.
    pub fn all_vars(&self) -> Option<&Value> {
        self.group(ALL).map(|group| &group.vars)
    }

    /// Groups nested below `all`: every group but `all` itself.
    pub fn children(&self) -> impl Iterator<Item = &Group> {
        self.groups.iter().filter(|group| group.name != ALL)
    }

    pub fn hostnames(&self) -> Vec<&str> {
        self.hosts.iter().map(|host| host.hostname.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn sample() -> Store {
        let store = Store::open_in_memory().unwrap();
        let mut web1 = store.create_host("web1").unwrap();
        store
            .set_host_description(&mut web1, Some("primary web"))
            .unwrap();
        store.create_host("lonely").unwrap();
        let mut gone = store.create_host("gone").unwrap();
        let when = NaiveDate::from_ymd_opt(2020, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        store.set_decommission_date(&mut gone, Some(when)).unwrap();

        let mut prod = store.create_tag("prod").unwrap();
        store.set_tag_group(&mut prod, Some("env")).unwrap();
        store.add_host_tag(&web1, &prod).unwrap();
        store.add_host_tag(&gone, &prod).unwrap();
        store.create_tag("misc").unwrap();
        store
    }

    #[test]
    fn test_untagged_hosts_are_kept() {
        let inventory = Inventory::load(&sample()).unwrap();
        assert_eq!(inventory.hostnames(), vec!["lonely", "web1"]);
        assert!(inventory.host("gone").is_none());
    }

    #[test]
    fn test_groups_in_group_then_name_order() {
        let inventory = Inventory::load(&sample()).unwrap();
        let names: Vec<_> = inventory.groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["misc", "prod"]);
        assert_eq!(inventory.groups[0].label(), "ungrouped");
        assert!(inventory.groups[0].hosts.is_empty());

        let prod = inventory.group("prod").unwrap();
        assert_eq!(prod.hosts, vec!["web1"]);
        assert_eq!(prod.label(), "env");
        assert_eq!(
            prod.vars,
            json!({ "isidore_tag_prod": { "description": null, "group": "env" } })
        );
    }

    #[test]
    fn test_host_vars_list_tags_by_group() {
        let inventory = Inventory::load(&sample()).unwrap();
        let web1 = inventory.host("web1").unwrap();
        assert_eq!(web1.vars["isidore"]["tags"], json!({ "env": ["prod"] }));
        assert_eq!(web1.vars["isidore"]["description"], json!("primary web"));
        assert_eq!(
            inventory.host("lonely").unwrap().vars["isidore"]["tags"],
            json!({})
        );
    }

    #[test]
    fn test_all_tag() {
        let store = sample();
        let mut all = store.create_tag("all").unwrap();
        store.set_tag_description(&mut all, Some("x")).unwrap();
        store.set_var_json(&mut all, "k", "1").unwrap();

        let inventory = Inventory::load(&store).unwrap();
        assert_eq!(
            inventory.all_vars(),
            Some(&json!({
                "k": 1,
                "isidore_tag_all": { "description": "x", "group": null },
            }))
        );
        assert!(inventory.children().all(|g| g.name != ALL));
        assert_eq!(inventory.children().count(), 2);
    }
}
