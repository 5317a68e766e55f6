//! Host and tag details: an entity's own variables merged with the facts
//! Isidore keeps about it.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{json, Map, Value};
use tracing::warn;

use crate::error::Result;
use crate::store::{format_date, Host, Store, Tag, TagOrder};

/// Variable under which a host's facts are published.
pub const HOST_FACTS_KEY: &str = "isidore";

/// Prefix of the variable under which a tag's facts are published; the tag
/// name completes it.
pub const TAG_FACTS_PREFIX: &str = "isidore_tag_";

/// A host's inventory variables.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HostDetails {
    pub hostname: String,
    pub vars: Value,
}

impl HostDetails {
    /// Merge `host`'s variables with its facts. `tags` are expected in
    /// group-then-name order; that order is kept inside each group.
    pub fn new<'a>(host: &Host, tags: impl IntoIterator<Item = &'a Tag>) -> Self {
        let mut by_group: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for tag in tags {
            by_group
                .entry(tag.group_label())
                .or_default()
                .push(tag.name());
        }

        let facts = json!({
            "commissioned": host.commission_date().map(format_date),
            "decommissioned": host.decommission_date().map(format_date),
            "description": host.description(),
            "tags": by_group,
        });

        let mut vars = own_vars(host.variables(), host.hostname());
        vars.insert(HOST_FACTS_KEY.to_string(), facts);
        Self {
            hostname: host.hostname().to_string(),
            vars: Value::Object(vars),
        }
    }

    pub fn load(store: &Store, host: &Host) -> Result<Self> {
        let tags = store.host_tags(host, TagOrder::ByGroupThenName)?;
        Ok(Self::new(host, &tags))
    }

    /// `{<hostname>: {vars: {...}}}`
    pub fn to_value(&self) -> Value {
        let mut inner = Map::new();
        inner.insert("vars".to_string(), self.vars.clone());
        let mut outer = Map::new();
        outer.insert(self.hostname.clone(), Value::Object(inner));
        Value::Object(outer)
    }
}

/// A tag's inventory variables and its commissioned hosts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagDetails {
    pub name: String,
    pub hosts: Vec<String>,
    pub vars: Value,
}

impl TagDetails {
    pub fn new(tag: &Tag, hosts: Vec<String>) -> Self {
        let facts = json!({
            "description": tag.description(),
            "group": tag.group(),
        });

        let mut vars = own_vars(tag.variables(), tag.name());
        vars.insert(format!("{}{}", TAG_FACTS_PREFIX, tag.name()), facts);
        Self {
            name: tag.name().to_string(),
            hosts,
            vars: Value::Object(vars),
        }
    }

    pub fn load(store: &Store, tag: &Tag) -> Result<Self> {
        let hosts = store
            .tag_hosts(tag)?
            .into_iter()
            .map(|host| host.hostname)
            .collect();
        Ok(Self::new(tag, hosts))
    }

    /// `{<name>: {hosts: [...], vars: {...}}}`
    pub fn to_value(&self) -> Value {
        let mut outer = Map::new();
        outer.insert(
            self.name.clone(),
            json!({ "hosts": self.hosts, "vars": self.vars }),
        );
        Value::Object(outer)
    }
}

fn own_vars(vars: &Value, owner: &str) -> Map<String, Value> {
    match vars {
        Value::Object(map) => map.clone(),
        other => {
            warn!(owner, kind = ?other, "variable tree is not an object, ignoring it");
            Map::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_host_details() {
        let store = Store::open_in_memory().unwrap();
        let mut host = store.create_host("web1").unwrap();
        store
            .set_host_description(&mut host, Some("primary web"))
            .unwrap();
        let when = NaiveDate::from_ymd_opt(2023, 5, 1)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap();
        store.set_commission_date(&mut host, Some(when)).unwrap();
        store.set_var_json(&mut host, "port", "8080").unwrap();

        for (name, group) in [("prod", Some("env")), ("web", Some("role")), ("x", None)] {
            let mut tag = store.create_tag(name).unwrap();
            store.set_tag_group(&mut tag, group).unwrap();
            store.add_host_tag(&host, &tag).unwrap();
        }

        let details = HostDetails::load(&store, &host).unwrap();
        assert_eq!(
            details.vars,
            json!({
                "port": 8080,
                "isidore": {
                    "commissioned": "2023-05-01 08:30:00",
                    "decommissioned": null,
                    "description": "primary web",
                    "tags": {
                        "env": ["prod"],
                        "role": ["web"],
                        "ungrouped": ["x"],
                    },
                },
            })
        );
        assert_eq!(
            details.to_value()["web1"]["vars"]["port"],
            json!(8080)
        );
    }

    #[test]
    fn test_host_facts_override_custom_isidore_var() {
        let store = Store::open_in_memory().unwrap();
        let mut host = store.create_host("h").unwrap();
        store.set_var_json(&mut host, "isidore", "\"mine\"").unwrap();

        let details = HostDetails::load(&store, &host).unwrap();
        assert!(details.vars["isidore"].is_object());
    }

    #[test]
    fn test_tag_details() {
        let store = Store::open_in_memory().unwrap();
        let mut tag = store.create_tag("prod").unwrap();
        store.set_tag_group(&mut tag, Some("env")).unwrap();
        store.set_var_json(&mut tag, "tier", "1").unwrap();
        for name in ["web2", "web1"] {
            let host = store.create_host(name).unwrap();
            store.add_host_tag(&host, &tag).unwrap();
        }

        let details = TagDetails::load(&store, &tag).unwrap();
        assert_eq!(details.hosts, vec!["web1", "web2"]);
        assert_eq!(
            details.vars,
            json!({
                "tier": 1,
                "isidore_tag_prod": { "description": null, "group": "env" },
            })
        );
        assert_eq!(
            details.to_value(),
            json!({ "prod": { "hosts": ["web1", "web2"], "vars": details.vars } })
        );
    }
}
