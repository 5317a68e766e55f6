//! Ansible INI inventory

use std::fmt::Write;

use crate::inventory::Inventory;

/// Every commissioned host under a `# All Host` comment, then one section per
/// tag headed by a `# <group>: <tag> (<description>)` comment. A missing
/// description prints as `None`.
pub fn format_ini(inventory: &Inventory) -> String {
    let mut out = String::from("# All Host\n");
    for host in &inventory.hosts {
        out.push_str(&host.hostname);
        out.push('\n');
    }
    out.push('\n');

    for group in &inventory.groups {
        // Writing to a String cannot fail.
        let _ = writeln!(
            out,
            "# {}: {} ({})",
            group.label(),
            group.name,
            group.description.as_deref().unwrap_or("None")
        );
        let _ = writeln!(out, "[{}]", group.name);
        for host in &group.hosts {
            out.push_str(host);
            out.push('\n');
        }
        out.push('\n');
    }
    out
}
