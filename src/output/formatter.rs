//! Inventory output formats

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;

use crate::error::{IsidoreError, Result};
use crate::inventory::Inventory;
use crate::output::human::format_human;
use crate::output::ini::format_ini;
use crate::output::json::format_json;
use crate::output::yaml::format_yaml;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum InventoryFormat {
    /// Ansible INI inventory
    #[default]
    Ini,
    /// Ansible JSON inventory
    Json,
    /// Ansible YAML inventory
    Yaml,
    /// Grouped listing meant for people
    Human,
}

impl InventoryFormat {
    pub const ALL: [InventoryFormat; 4] = [
        InventoryFormat::Human,
        InventoryFormat::Ini,
        InventoryFormat::Json,
        InventoryFormat::Yaml,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            InventoryFormat::Ini => "ini",
            InventoryFormat::Json => "json",
            InventoryFormat::Yaml => "yaml",
            InventoryFormat::Human => "human",
        }
    }
}

impl fmt::Display for InventoryFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for InventoryFormat {
    type Err = IsidoreError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|format| format.name() == s)
            .ok_or_else(|| IsidoreError::Parse(format!("Invalid format {}. Enter ? for help.", s)))
    }
}

/// Render `inventory`. Every format is a pure function of the inventory.
pub fn format_inventory(inventory: &Inventory, format: InventoryFormat) -> Result<String> {
    match format {
        InventoryFormat::Ini => Ok(format_ini(inventory)),
        InventoryFormat::Json => format_json(inventory),
        InventoryFormat::Yaml => format_yaml(inventory),
        InventoryFormat::Human => format_human(inventory),
    }
}
