//! Ansible YAML inventory

use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::error::Result;
use crate::inventory::Inventory;

/// Block style YAML for any serializable value. `serde_yaml` writes every
/// node in full; it has no anchors or aliases to turn off.
pub fn to_yaml<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_yaml::to_string(value)?)
}

/// `{all: {hosts, children, vars}}`. Child groups map their hosts to empty
/// objects; `all.vars` holds the variables of an `all` tag.
pub fn inventory_value(inventory: &Inventory) -> Value {
    let hosts: Map<String, Value> = inventory
        .hosts
        .iter()
        .map(|host| (host.hostname.clone(), host.vars.clone()))
        .collect();

    let children: Map<String, Value> = inventory
        .children()
        .map(|group| {
            let members: Map<String, Value> = group
                .hosts
                .iter()
                .map(|host| (host.clone(), json!({})))
                .collect();
            (
                group.name.clone(),
                json!({ "hosts": members, "vars": group.vars }),
            )
        })
        .collect();

    let vars = inventory.all_vars().cloned().unwrap_or_else(|| json!({}));

    json!({
        "all": {
            "hosts": hosts,
            "children": children,
            "vars": vars,
        }
    })
}

pub fn format_yaml(inventory: &Inventory) -> Result<String> {
    to_yaml(&inventory_value(inventory))
}
