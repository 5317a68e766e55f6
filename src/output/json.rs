//! Ansible JSON inventory

use serde_json::{json, Map, Value};

use crate::error::Result;
use crate::inventory::{Inventory, ALL};

/// `_meta.hostvars`, `all.hosts` and one `{hosts, vars}` entry per tag. The
/// variables of an `all` tag go to the `all` entry, which keeps every host.
pub fn inventory_value(inventory: &Inventory) -> Value {
    let mut root = Map::new();
    for group in inventory.children() {
        root.insert(
            group.name.clone(),
            json!({ "hosts": group.hosts, "vars": group.vars }),
        );
    }

    let mut all = Map::new();
    all.insert("hosts".to_string(), json!(inventory.hostnames()));
    if let Some(vars) = inventory.all_vars() {
        all.insert("vars".to_string(), vars.clone());
    }
    root.insert(ALL.to_string(), Value::Object(all));

    let hostvars: Map<String, Value> = inventory
        .hosts
        .iter()
        .map(|host| (host.hostname.clone(), host.vars.clone()))
        .collect();
    root.insert("_meta".to_string(), json!({ "hostvars": hostvars }));

    Value::Object(root)
}

pub fn format_json(inventory: &Inventory) -> Result<String> {
    Ok(serde_json::to_string_pretty(&inventory_value(inventory))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Store;
    use chrono::{NaiveDate, NaiveDateTime};

    fn retired() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2022, 6, 30)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn sample() -> Inventory {
        let store = Store::open_in_memory().unwrap();
        let web1 = store.create_host("web1").unwrap();
        store.create_host("db1").unwrap();
        let mut prod = store.create_tag("prod").unwrap();
        store.set_var_json(&mut prod, "tier", "\"gold\"").unwrap();
        store.add_host_tag(&web1, &prod).unwrap();
        let mut old = store.create_host("old").unwrap();
        store.add_host_tag(&old, &prod).unwrap();
        store
            .set_decommission_date(&mut old, Some(retired()))
            .unwrap();
        let mut all = store.create_tag("all").unwrap();
        store.set_var_json(&mut all, "ntp", "\"pool.ntp.org\"").unwrap();
        Inventory::load(&store).unwrap()
    }

    #[test]
    fn test_meta_and_all() {
        let value = inventory_value(&sample());
        assert_eq!(value["all"]["hosts"], json!(["db1", "web1"]));
        assert_eq!(value["all"]["vars"]["ntp"], json!("pool.ntp.org"));
        assert_eq!(
            value["_meta"]["hostvars"]["web1"]["isidore"]["tags"],
            json!({ "ungrouped": ["prod"] })
        );
        assert!(value["_meta"]["hostvars"]["db1"].is_object());
    }

    #[test]
    fn test_tag_entries() {
        let value = inventory_value(&sample());
        assert_eq!(value["prod"]["hosts"], json!(["web1"]));
        assert_eq!(value["prod"]["vars"]["tier"], json!("gold"));
        assert_eq!(
            value["prod"]["vars"]["isidore_tag_prod"],
            json!({ "description": null, "group": null })
        );
    }

    #[test]
    fn test_decommissioned_host_is_left_out() {
        let value = inventory_value(&sample());
        let all_hosts = value["all"]["hosts"].as_array().unwrap();
        assert!(!all_hosts.contains(&json!("old")));
        assert!(value["_meta"]["hostvars"].get("old").is_none());
        assert!(!value["prod"]["hosts"].as_array().unwrap().contains(&json!("old")));
    }

    #[test]
    fn test_format_json_parses_back() {
        let text = format_json(&sample()).unwrap();
        let parsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, inventory_value(&sample()));
    }
}
