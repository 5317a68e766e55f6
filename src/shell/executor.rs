//! Command execution against a store

use std::collections::BTreeMap;
use std::io::Write;

use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::error::{EntityKind, IsidoreError, Result};
use crate::inventory::{HostDetails, Inventory, TagDetails};
use crate::output::{format_inventory, to_yaml};
use crate::shell::command::{
    Command, DescribeTarget, HostAction, HostField, ShowTarget, TagAction, TagField, VarAction,
};
use crate::shell::export::write_config;
use crate::store::{format_date, Host, HostFilter, Store, Tag, TagOrder, VarOwner};

/// Run `command` in its own transaction, writing what it prints to `out`.
/// A failing command leaves the database as it was.
pub fn execute(store: &Store, command: &Command, out: &mut dyn Write) -> Result<()> {
    store.command(|store| run(store, command, out))?;
    if command.is_mutation() {
        info!(?command, "command applied");
    }
    Ok(())
}

fn run(store: &Store, command: &Command, out: &mut dyn Write) -> Result<()> {
    match command {
        Command::Create { kind, name } => {
            match kind {
                EntityKind::Host => store.create_host(name).map(drop)?,
                EntityKind::Tag => store.create_tag(name).map(drop)?,
            }
            Ok(())
        }
        Command::Delete { kind, name } => {
            match kind {
                EntityKind::Host => store.delete_host(require_host(store, name)?)?,
                EntityKind::Tag => store.delete_tag(require_tag(store, name)?)?,
            }
            writeln!(out, "{} {} has been deleted.", kind, name)?;
            Ok(())
        }
        Command::Rename { kind, from, to } => match kind {
            EntityKind::Host => store.set_hostname(&mut require_host(store, from)?, to),
            EntityKind::Tag => store.set_tag_name(&mut require_tag(store, from)?, to),
        },
        Command::Echo(text) => Ok(writeln!(out, "{}", text)?),
        Command::Version => {
            writeln!(out, "Isidore version: {}", Store::library_version())?;
            writeln!(out, "Isidore database version: {}", store.database_version()?)?;
            Ok(())
        }
        Command::Show(target) => show(store, *target, out),
        Command::Describe(target) => describe(store, *target, out),
        Command::Host { hostname, action } => {
            let host = require_host(store, hostname)?;
            host_action(store, host, action, out)
        }
        Command::Tag { name, action } => {
            let tag = require_tag(store, name)?;
            tag_action(store, tag, action, out)
        }
    }
}

fn require_host(store: &Store, hostname: &str) -> Result<Host> {
    store.host(hostname)?.ok_or_else(|| IsidoreError::NotFound {
        kind: EntityKind::Host,
        name: hostname.to_string(),
    })
}

fn require_tag(store: &Store, name: &str) -> Result<Tag> {
    store.tag(name)?.ok_or_else(|| IsidoreError::NotFound {
        kind: EntityKind::Tag,
        name: name.to_string(),
    })
}

fn print_yaml<T: Serialize + ?Sized>(out: &mut dyn Write, value: &T) -> Result<()> {
    out.write_all(to_yaml(value)?.as_bytes())?;
    Ok(())
}

fn print_lines<'a>(out: &mut dyn Write, lines: impl IntoIterator<Item = &'a str>) -> Result<()> {
    for line in lines {
        writeln!(out, "{}", line)?;
    }
    Ok(())
}

/// Absent values print as `None`.
fn or_none(value: Option<&str>) -> &str {
    value.unwrap_or("None")
}

fn show(store: &Store, target: ShowTarget, out: &mut dyn Write) -> Result<()> {
    match target {
        ShowTarget::Hosts => {
            let hosts = store.hosts(HostFilter::Commissioned)?;
            print_lines(out, hosts.iter().map(Host::hostname))
        }
        ShowTarget::Graveyard => {
            let hosts = store.hosts(HostFilter::Decommissioned)?;
            print_lines(out, hosts.iter().map(Host::hostname))
        }
        ShowTarget::Tags => {
            let tags = store.tags(TagOrder::ByName)?;
            print_lines(out, tags.iter().map(Tag::name))
        }
        ShowTarget::TagGroups => {
            // No group and a group literally named `ungrouped` share a label.
            let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();
            for group in store.tag_groups()? {
                groups
                    .entry(group.label().to_string())
                    .or_default()
                    .extend(group.tags);
            }
            print_yaml(out, &groups)
        }
        ShowTarget::Config => write_config(store, out),
        ShowTarget::Inventory(format) => {
            let text = format_inventory(&Inventory::load(store)?, format)?;
            out.write_all(text.as_bytes())?;
            if !text.ends_with('\n') {
                writeln!(out)?;
            }
            Ok(())
        }
    }
}

fn describe(store: &Store, target: DescribeTarget, out: &mut dyn Write) -> Result<()> {
    match target {
        DescribeTarget::Hosts => describe_hosts(out, &store.hosts(HostFilter::Commissioned)?),
        DescribeTarget::Graveyard => {
            describe_hosts(out, &store.hosts(HostFilter::Decommissioned)?)
        }
        DescribeTarget::Tags => describe_tags(out, &store.tags(TagOrder::ByName)?),
        DescribeTarget::TagGroups => {
            let mut groups: BTreeMap<&str, Vec<BTreeMap<&str, Option<&str>>>> = BTreeMap::new();
            let tags = store.tags(TagOrder::ByName)?;
            for tag in &tags {
                groups
                    .entry(tag.group_label())
                    .or_default()
                    .push(BTreeMap::from([(tag.name(), tag.description())]));
            }
            print_yaml(out, &groups)
        }
    }
}

fn describe_hosts(out: &mut dyn Write, hosts: &[Host]) -> Result<()> {
    let described: BTreeMap<&str, Option<&str>> = hosts
        .iter()
        .map(|host| (host.hostname(), host.description()))
        .collect();
    print_yaml(out, &described)
}

fn describe_tags(out: &mut dyn Write, tags: &[Tag]) -> Result<()> {
    let described: BTreeMap<&str, Option<&str>> = tags
        .iter()
        .map(|tag| (tag.name(), tag.description()))
        .collect();
    print_yaml(out, &described)
}

/// One entry of `host <h> tag list-detail`, fields in this order.
#[derive(Serialize)]
struct TagLine<'a> {
    name: &'a str,
    group: Option<&'a str>,
    description: Option<&'a str>,
}

fn host_action(store: &Store, mut host: Host, action: &HostAction, out: &mut dyn Write) -> Result<()> {
    match action {
        HostAction::Show(field) => match field {
            HostField::All => print_yaml(out, &HostDetails::load(store, &host)?.to_value()),
            HostField::Commissioned => {
                let date = host.commission_date().map(format_date);
                Ok(writeln!(out, "{}", or_none(date.as_deref()))?)
            }
            HostField::Decommissioned => {
                let date = host.decommission_date().map(format_date);
                Ok(writeln!(out, "{}", or_none(date.as_deref()))?)
            }
            HostField::Description => Ok(writeln!(out, "{}", or_none(host.description()))?),
            HostField::Tags => {
                let tags = store.host_tags(&host, TagOrder::ByName)?;
                print_lines(out, tags.iter().map(Tag::name))
            }
        },
        HostAction::DescribeTags => describe_tags(out, &store.host_tags(&host, TagOrder::ByName)?),
        HostAction::SetCommissioned(date) => {
            store.set_commission_date(&mut host, date.map(|d| d.resolve()))
        }
        HostAction::SetDecommissioned(date) => {
            store.set_decommission_date(&mut host, date.map(|d| d.resolve()))
        }
        HostAction::SetDescription(description) => {
            store.set_host_description(&mut host, description.as_deref())
        }
        HostAction::AddTag(name) => store.add_host_tag(&host, &require_tag(store, name)?),
        HostAction::RemoveTag(name) => {
            let tag = require_tag(store, name)?;
            remove_tag(store, &host, &tag)
        }
        HostAction::ListTags { detail: false } => {
            let tags = store.host_tags(&host, TagOrder::ByName)?;
            print_lines(out, tags.iter().map(Tag::name))
        }
        HostAction::ListTags { detail: true } => {
            let tags = store.host_tags(&host, TagOrder::ByGroupThenName)?;
            let lines: Vec<TagLine<'_>> = tags
                .iter()
                .map(|tag| TagLine {
                    name: tag.name(),
                    group: tag.group(),
                    description: tag.description(),
                })
                .collect();
            print_yaml(out, &lines)
        }
        HostAction::Var(action) => var_action(store, &mut host, action, out),
    }
}

fn tag_action(store: &Store, mut tag: Tag, action: &TagAction, out: &mut dyn Write) -> Result<()> {
    match action {
        TagAction::Show(field) => match field {
            TagField::All => print_yaml(out, &TagDetails::load(store, &tag)?.to_value()),
            TagField::Description => Ok(writeln!(out, "{}", or_none(tag.description()))?),
            TagField::Group => Ok(writeln!(out, "{}", or_none(tag.group()))?),
            TagField::Hosts => {
                let hosts = store.tag_hosts(&tag)?;
                print_lines(out, hosts.iter().map(Host::hostname))
            }
        },
        TagAction::DescribeHosts => describe_hosts(out, &store.tag_hosts(&tag)?),
        TagAction::SetGroup(group) => store.set_tag_group(&mut tag, group.as_deref()),
        TagAction::SetDescription(description) => {
            store.set_tag_description(&mut tag, description.as_deref())
        }
        TagAction::AddHost(hostname) => store.add_host_tag(&require_host(store, hostname)?, &tag),
        TagAction::RemoveHost(hostname) => {
            let host = require_host(store, hostname)?;
            remove_tag(store, &host, &tag)
        }
        TagAction::ListHosts => {
            let hosts = store.tag_hosts(&tag)?;
            print_lines(out, hosts.iter().map(Host::hostname))
        }
        TagAction::Var(action) => var_action(store, &mut tag, action, out),
    }
}

fn remove_tag(store: &Store, host: &Host, tag: &Tag) -> Result<()> {
    if store.remove_host_tag(host, tag)? {
        Ok(())
    } else {
        Err(IsidoreError::NotAssigned {
            host: host.hostname().to_string(),
            tag: tag.name().to_string(),
        })
    }
}

fn var_action<E: VarOwner>(
    store: &Store,
    entity: &mut E,
    action: &VarAction,
    out: &mut dyn Write,
) -> Result<()> {
    match action {
        VarAction::Print(path) => {
            let value = store.get_var(&*entity, path)?.unwrap_or(Value::Null);
            print_yaml(out, &value)
        }
        VarAction::Set { path, json } => {
            store.set_var(entity, path, crate::vars::parse_json(json)?)
        }
        VarAction::Append { path, json } => {
            store.append_var(entity, path, crate::vars::parse_json(json)?)
        }
        VarAction::Unset(path) => store.unset_var(entity, path),
    }
}
