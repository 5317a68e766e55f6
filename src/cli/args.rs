//! CLI argument parsing

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

use crate::output::InventoryFormat;

#[derive(Parser, Debug)]
#[command(name = "isidore")]
#[command(author, version, about = "Track hosts and tags, export Ansible inventories", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<SubCommand>,

    /// Read this configuration file instead of the standard locations
    #[arg(short, long, global = true, env = "ISIDORE_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// SQLite database file (overrides the configuration)
    #[arg(long, global = true, env = "ISIDORE_DATABASE", value_name = "PATH")]
    pub database: Option<PathBuf>,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors (wins over -v)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

impl Args {
    /// The subcommand to run; the shell when none was given.
    pub fn command(&self) -> SubCommand {
        self.command.clone().unwrap_or(SubCommand::Shell)
    }

    /// Log filter forced by `-v`/`-q`, if any.
    pub fn log_override(&self) -> Option<&'static str> {
        if self.quiet {
            return Some("error");
        }
        match self.verbose {
            0 => None,
            1 => Some("info"),
            2 => Some("debug"),
            _ => Some("trace"),
        }
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum SubCommand {
    /// Start the command shell (interactive on a terminal, else reads stdin)
    Shell,

    /// Run one shell command, e.g. `isidore exec host web1 show all`
    Exec {
        /// Words of the command
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        words: Vec<String>,
    },

    /// Print the Ansible inventory
    Inventory {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = InventoryFormat::Ini)]
        format: InventoryFormat,

        /// Dynamic inventory mode: print the whole inventory as JSON
        #[arg(long, conflicts_with_all = ["host", "format"])]
        list: bool,

        /// Dynamic inventory mode: print one host's variables as JSON
        #[arg(long, value_name = "HOSTNAME", conflicts_with = "format")]
        host: Option<String>,
    },

    /// Create the database if needed and print the versions
    Init,
}
