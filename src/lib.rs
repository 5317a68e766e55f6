//! Isidore - a small inventory database for hosts and tags
//!
//! Isidore records which machines exist, when they were commissioned and
//! decommissioned, which tags they carry and what JSON variables hang off
//! each host and tag. The whole database can be exported as an Ansible
//! inventory in INI, JSON, YAML or a plain human-readable layout.
//!
//! # Example
//!
//! ```no_run
//! use isidore::{format_inventory, Inventory, InventoryFormat, Store};
//!
//! let store = Store::open("isidore.db").unwrap();
//! let mut web = store.create_host("web1").unwrap();
//! store.set_var_json(&mut web, "http.port", "8080").unwrap();
//!
//! let inventory = Inventory::load(&store).unwrap();
//! println!("{}", format_inventory(&inventory, InventoryFormat::Yaml).unwrap());
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod inventory;
pub mod output;
pub mod repl;
pub mod shell;
pub mod store;
pub mod vars;

pub use config::Config;
pub use error::{EntityKind, IsidoreError, Result};
pub use inventory::{HostDetails, Inventory, Snapshot, TagDetails};
pub use output::{format_inventory, InventoryFormat};
pub use shell::{run_script, run_words, Session};
pub use store::{Host, HostFilter, Store, Tag, TagOrder, VarOwner};
pub use vars::VarPath;
