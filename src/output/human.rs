//! Human friendly inventory listing

use serde_json::{json, Map, Value};

use crate::error::Result;
use crate::inventory::{Inventory, ALL};
use crate::output::yaml::to_yaml;

/// `all` lists each host with its variables; every other tag is a top level
/// entry with its hosts and variables.
pub fn inventory_value(inventory: &Inventory) -> Value {
    let mut root = Map::new();

    let hosts: Vec<Value> = inventory.hosts.iter().map(|host| host.to_value()).collect();
    let mut all = Map::new();
    all.insert("hosts".to_string(), Value::Array(hosts));
    if let Some(vars) = inventory.all_vars() {
        all.insert("vars".to_string(), vars.clone());
    }

    for group in inventory.children() {
        root.insert(
            group.name.clone(),
            json!({ "hosts": group.hosts, "vars": group.vars }),
        );
    }
    root.insert(ALL.to_string(), Value::Object(all));
    Value::Object(root)
}

pub fn format_human(inventory: &Inventory) -> Result<String> {
    to_yaml(&inventory_value(inventory))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Store;

    #[test]
    fn test_human_layout() {
        let store = Store::open_in_memory().unwrap();
        let host = store.create_host("web1").unwrap();
        let tag = store.create_tag("prod").unwrap();
        store.add_host_tag(&host, &tag).unwrap();
        let mut old = store.create_host("old").unwrap();
        store.add_host_tag(&old, &tag).unwrap();
        let when = chrono::NaiveDate::from_ymd_opt(2022, 6, 30)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        store.set_decommission_date(&mut old, Some(when)).unwrap();

        let inventory = Inventory::load(&store).unwrap();
        let value = inventory_value(&inventory);
        assert_eq!(value["all"]["hosts"][0]["web1"]["vars"]["isidore"]["tags"], json!({ "ungrouped": ["prod"] }));
        assert_eq!(value["prod"]["hosts"], json!(["web1"]));
        assert_eq!(value["all"]["hosts"].as_array().unwrap().len(), 1);
        assert!(value["all"].get("vars").is_none());

        let text = format_human(&inventory).unwrap();
        assert!(text.starts_with("all:\n  hosts:\n  - web1:\n"));
    }
}
