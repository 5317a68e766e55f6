//! Shell command tree: typed commands parsed from a list of words

use chrono::{Local, NaiveDateTime, SubsecRound};

use crate::error::{EntityKind, IsidoreError, Result};
use crate::output::InventoryFormat;
use crate::shell::help;
use crate::store::DATE_FORMAT;
use crate::vars::VarPath;

/// A complete shell command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Create { kind: EntityKind, name: String },
    Delete { kind: EntityKind, name: String },
    Rename { kind: EntityKind, from: String, to: String },
    Echo(String),
    Version,
    Show(ShowTarget),
    Describe(DescribeTarget),
    Host { hostname: String, action: HostAction },
    Tag { name: String, action: TagAction },
}

impl Command {
    /// Whether running the command can change the database.
    pub fn is_mutation(&self) -> bool {
        match self {
            Command::Create { .. } | Command::Delete { .. } | Command::Rename { .. } => true,
            Command::Echo(_) | Command::Version | Command::Show(_) | Command::Describe(_) => {
                false
            }
            Command::Host { action, .. } => !matches!(
                action,
                HostAction::Show(_)
                    | HostAction::DescribeTags
                    | HostAction::ListTags { .. }
                    | HostAction::Var(VarAction::Print(_))
            ),
            Command::Tag { action, .. } => !matches!(
                action,
                TagAction::Show(_)
                    | TagAction::DescribeHosts
                    | TagAction::ListHosts
                    | TagAction::Var(VarAction::Print(_))
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowTarget {
    Hosts,
    Graveyard,
    Tags,
    TagGroups,
    Config,
    Inventory(InventoryFormat),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescribeTarget {
    Hosts,
    Graveyard,
    Tags,
    TagGroups,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostField {
    All,
    Commissioned,
    Decommissioned,
    Description,
    Tags,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagField {
    All,
    Description,
    Group,
    Hosts,
}

/// A date argument; `None` in the surrounding `Option` clears the date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateArg {
    Now,
    At(NaiveDateTime),
}

impl DateArg {
    pub fn parse(input: &str) -> Result<Self> {
        if input == "now" {
            return Ok(DateArg::Now);
        }
        let at = NaiveDateTime::parse_from_str(input, DATE_FORMAT)
            .or_else(|_| NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S"))
            .or_else(|_| NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M:%S%.f"))
            .or_else(|_| NaiveDateTime::parse_from_str(&format!("{} 00:00:00", input), DATE_FORMAT))
            .map_err(|_| IsidoreError::InvalidDate(input.to_string()))?;
        Ok(DateArg::At(at))
    }

    /// Resolve `now` to the local time, whole seconds.
    pub fn resolve(&self) -> NaiveDateTime {
        match self {
            DateArg::Now => Local::now().naive_local().trunc_subsecs(0),
            DateArg::At(at) => *at,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum VarAction {
    Print(VarPath),
    Set { path: VarPath, json: String },
    Append { path: VarPath, json: String },
    Unset(VarPath),
}

#[derive(Debug, Clone, PartialEq)]
pub enum HostAction {
    Show(HostField),
    DescribeTags,
    SetCommissioned(Option<DateArg>),
    SetDecommissioned(Option<DateArg>),
    SetDescription(Option<String>),
    AddTag(String),
    RemoveTag(String),
    ListTags { detail: bool },
    Var(VarAction),
}

#[derive(Debug, Clone, PartialEq)]
pub enum TagAction {
    Show(TagField),
    DescribeHosts,
    SetGroup(Option<String>),
    SetDescription(Option<String>),
    AddHost(String),
    RemoveHost(String),
    ListHosts,
    Var(VarAction),
}

/// What a line of words amounts to.
#[derive(Debug, Clone, PartialEq)]
pub enum Parsed {
    Command(Command),
    /// A `?` was found; print this text.
    Help(&'static str),
    /// More words are needed. The shell opens a subprompt prefixed with the
    /// words read so far.
    Incomplete,
}

/// Parse a full command from its words.
pub fn parse(words: &[String]) -> Result<Parsed> {
    if words.is_empty() {
        return Ok(Parsed::Incomplete);
    }
    let mut cursor = Cursor { words, pos: 0 };
    match parse_root(&mut cursor) {
        Ok(command) => Ok(Parsed::Command(command)),
        Err(Stop::Help(text)) => Ok(Parsed::Help(text)),
        Err(Stop::Incomplete) => Ok(Parsed::Incomplete),
        Err(Stop::Error(e)) => Err(e),
    }
}

enum Stop {
    Help(&'static str),
    Incomplete,
    Error(IsidoreError),
}

impl From<IsidoreError> for Stop {
    fn from(e: IsidoreError) -> Self {
        Stop::Error(e)
    }
}

type Step<T> = std::result::Result<T, Stop>;

struct Cursor<'a> {
    words: &'a [String],
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Next word; `?` yields `help`, running out yields `Incomplete`.
    fn word(&mut self, help: &'static str) -> Step<&'a str> {
        match self.words.get(self.pos) {
            None => Err(Stop::Incomplete),
            Some(word) if word == "?" => Err(Stop::Help(help)),
            Some(word) => {
                self.pos += 1;
                Ok(word.as_str())
            }
        }
    }

    /// Like [`Cursor::word`] but running out is fine.
    fn optional(&mut self, help: &'static str) -> Step<Option<&'a str>> {
        if self.pos == self.words.len() {
            return Ok(None);
        }
        self.word(help).map(Some)
    }

    /// Every remaining word.
    fn rest(&mut self, help: &'static str) -> Step<Vec<&'a str>> {
        let rest = &self.words[self.pos..];
        match rest.first() {
            None => Err(Stop::Incomplete),
            Some(first) if first == "?" => Err(Stop::Help(help)),
            Some(_) => {
                self.pos = self.words.len();
                Ok(rest.iter().map(String::as_str).collect())
            }
        }
    }

    /// The command must end here.
    fn end<T>(&self, value: T) -> Step<T> {
        match self.words.get(self.pos) {
            None => Ok(value),
            Some(word) if word == "?" => Err(Stop::Help(help::NO_ARGUMENTS)),
            Some(word) => Err(invalid("argument", word)),
        }
    }
}

fn invalid(what: &str, word: &str) -> Stop {
    Stop::Error(IsidoreError::Parse(format!(
        "Invalid {} {}. Enter ? for help.",
        what, word
    )))
}

/// `none` clears an optional value.
fn none_or(word: &str) -> Option<String> {
    (word != "none").then(|| word.to_string())
}

fn parse_root(c: &mut Cursor<'_>) -> Step<Command> {
    match c.word(help::ROOT)? {
        "help" => Err(Stop::Help(help::HELP_WORD)),
        "create" => {
            let (kind, name_help) = parse_kind(c, help::CREATE, help::CREATE_HOST, help::CREATE_TAG)?;
            let name = c.word(name_help)?.to_string();
            c.end(Command::Create { kind, name })
        }
        "delete" => {
            let (kind, name_help) = parse_kind(c, help::DELETE, help::DELETE_HOST, help::DELETE_TAG)?;
            let name = c.word(name_help)?.to_string();
            c.end(Command::Delete { kind, name })
        }
        "rename" => parse_rename(c),
        "echo" => Ok(Command::Echo(c.rest(help::ECHO)?.join(" "))),
        "version" => c.end(Command::Version),
        "show" => parse_show(c),
        "describe" => parse_describe(c),
        "host" => {
            let hostname = c.word(help::HOST)?.to_string();
            let action = parse_host_action(c)?;
            Ok(Command::Host { hostname, action })
        }
        "tag" => {
            let name = c.word(help::TAG)?.to_string();
            let action = parse_tag_action(c)?;
            Ok(Command::Tag { name, action })
        }
        other => Err(invalid("command", other)),
    }
}

fn parse_kind(
    c: &mut Cursor<'_>,
    help: &'static str,
    host_help: &'static str,
    tag_help: &'static str,
) -> Step<(EntityKind, &'static str)> {
    match c.word(help)? {
        "host" => Ok((EntityKind::Host, host_help)),
        "tag" => Ok((EntityKind::Tag, tag_help)),
        other => Err(invalid("argument", other)),
    }
}

fn parse_rename(c: &mut Cursor<'_>) -> Step<Command> {
    let (kind, old_help) = parse_kind(c, help::RENAME, help::RENAME_HOST_OLD, help::RENAME_TAG_OLD)?;
    let new_help = match kind {
        EntityKind::Host => help::RENAME_HOST_NEW,
        EntityKind::Tag => help::RENAME_TAG_NEW,
    };
    let from = c.word(old_help)?.to_string();
    let to = match c.word(new_help) {
        Err(Stop::Incomplete) => {
            return Err(Stop::Error(IsidoreError::Parse(
                help::RENAME_NEEDS_BOTH.to_string(),
            )))
        }
        other => other?.to_string(),
    };
    c.end(Command::Rename { kind, from, to })
}

fn parse_show(c: &mut Cursor<'_>) -> Step<Command> {
    let target = match c.word(help::SHOW)? {
        "hosts" => ShowTarget::Hosts,
        "graveyard" => ShowTarget::Graveyard,
        "tags" => ShowTarget::Tags,
        "tag-groups" => ShowTarget::TagGroups,
        "config" => ShowTarget::Config,
        "inventory" => {
            let format = match c.optional(help::SHOW_INVENTORY)? {
                None => InventoryFormat::default(),
                Some(name) => name.parse()?,
            };
            ShowTarget::Inventory(format)
        }
        other => return Err(invalid("argument", other)),
    };
    c.end(Command::Show(target))
}

fn parse_describe(c: &mut Cursor<'_>) -> Step<Command> {
    let target = match c.word(help::DESCRIBE)? {
        "hosts" => DescribeTarget::Hosts,
        "graveyard" => DescribeTarget::Graveyard,
        "tags" => DescribeTarget::Tags,
        "tag-groups" => DescribeTarget::TagGroups,
        other => return Err(invalid("argument", other)),
    };
    c.end(Command::Describe(target))
}

fn parse_host_action(c: &mut Cursor<'_>) -> Step<HostAction> {
    let action = match c.word(help::HOST_ACTIONS)? {
        "describe" => match c.word(help::HOST_DESCRIBE)? {
            "tags" => HostAction::DescribeTags,
            other => return Err(invalid("argument", other)),
        },
        "show" => HostAction::Show(match c.word(help::HOST_SHOW)? {
            "all" => HostField::All,
            "commissioned" => HostField::Commissioned,
            "decommissioned" => HostField::Decommissioned,
            "description" => HostField::Description,
            "tags" => HostField::Tags,
            other => return Err(invalid("argument", other)),
        }),
        "set" => match c.word(help::HOST_SET)? {
            "commissioned" => HostAction::SetCommissioned(parse_date(c, help::HOST_SET_COMMISSIONED)?),
            "decommissioned" => {
                HostAction::SetDecommissioned(parse_date(c, help::HOST_SET_DECOMMISSIONED)?)
            }
            "description" => HostAction::SetDescription(none_or(c.word(help::SET_DESCRIPTION)?)),
            other => return Err(invalid("argument", other)),
        },
        "tag" => match c.word(help::HOST_TAG)? {
            "add" => HostAction::AddTag(c.word(help::HOST_TAG_ADD)?.to_string()),
            "remove" => HostAction::RemoveTag(c.word(help::HOST_TAG_REMOVE)?.to_string()),
            "list" => HostAction::ListTags { detail: false },
            "list-detail" => HostAction::ListTags { detail: true },
            other => return Err(invalid("command", other)),
        },
        "var" => HostAction::Var(parse_var_action(c)?),
        other => return Err(invalid("command", other)),
    };
    c.end(action)
}

fn parse_tag_action(c: &mut Cursor<'_>) -> Step<TagAction> {
    let action = match c.word(help::TAG_ACTIONS)? {
        "describe" => match c.word(help::TAG_DESCRIBE)? {
            "hosts" => TagAction::DescribeHosts,
            other => return Err(invalid("argument", other)),
        },
        "show" => TagAction::Show(match c.word(help::TAG_SHOW)? {
            "all" => TagField::All,
            "description" => TagField::Description,
            "group" => TagField::Group,
            "hosts" => TagField::Hosts,
            other => return Err(invalid("argument", other)),
        }),
        "set" => match c.word(help::TAG_SET)? {
            "group" => TagAction::SetGroup(none_or(c.word(help::TAG_SET_GROUP)?)),
            "description" => TagAction::SetDescription(none_or(c.word(help::SET_DESCRIPTION)?)),
            other => return Err(invalid("argument", other)),
        },
        "host" => match c.word(help::TAG_HOST)? {
            "add" => TagAction::AddHost(c.word(help::TAG_HOST_ADD)?.to_string()),
            "remove" => TagAction::RemoveHost(c.word(help::TAG_HOST_REMOVE)?.to_string()),
            "list" => TagAction::ListHosts,
            other => return Err(invalid("command", other)),
        },
        "var" => TagAction::Var(parse_var_action(c)?),
        other => return Err(invalid("command", other)),
    };
    c.end(action)
}

fn parse_date(c: &mut Cursor<'_>, help: &'static str) -> Step<Option<DateArg>> {
    match c.word(help)? {
        "none" => Ok(None),
        word => Ok(Some(DateArg::parse(word)?)),
    }
}

fn parse_var_action(c: &mut Cursor<'_>) -> Step<VarAction> {
    let action = match c.word(help::VAR)? {
        "print" => {
            let path = match c.optional(help::VAR_PRINT)? {
                None => VarPath::root(),
                Some(path) => VarPath::parse(path)?,
            };
            VarAction::Print(path)
        }
        "set" => {
            let path = VarPath::parse(c.word(help::VAR_SET_PATH)?)?;
            let json = c.word(help::VAR_SET_VALUE)?.to_string();
            VarAction::Set { path, json }
        }
        "append" => {
            let path = VarPath::parse(c.word(help::VAR_APPEND_PATH)?)?;
            let json = c.word(help::VAR_APPEND_VALUE)?.to_string();
            VarAction::Append { path, json }
        }
        "unset" => VarAction::Unset(VarPath::parse(c.word(help::VAR_UNSET)?)?),
        other => return Err(invalid("command", other)),
    };
    Ok(action)
}
