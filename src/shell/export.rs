//! `show config`: the database as a script of shell commands

use std::borrow::Cow;
use std::io::Write;

use tracing::warn;

use crate::error::Result;
use crate::store::{format_date, HostFilter, Store, TagOrder};

/// Quote `word` so the shell lexer reads it back unchanged.
pub fn shell_quote(word: &str) -> Cow<'_, str> {
    let safe = !word.is_empty()
        && word
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "@%+=:,./-_".contains(c));
    if safe {
        Cow::Borrowed(word)
    } else {
        Cow::Owned(format!("'{}'", word.replace('\'', r#"'"'"'"#)))
    }
}

/// A stored value the shell cannot tell apart from "absent".
fn reads_back_as_none(value: Option<&str>) -> bool {
    value == Some("none")
}

/// Optional text: `none` when absent. The quoted form of a value that is
/// literally `none` reads back as absent too, so that case is logged.
fn quote_optional<'a>(value: Option<&'a str>, field: &str, owner: &str) -> Cow<'a, str> {
    if reads_back_as_none(value) {
        warn!(%owner, field, "value `none` will read back as no value");
    }
    value.map_or(Cow::Borrowed("none"), shell_quote)
}

/// Write the commands that rebuild every host, tag, variable and assignment.
pub fn write_config(store: &Store, out: &mut dyn Write) -> Result<()> {
    let hosts = store.hosts(HostFilter::All)?;
    let tags = store.tags(TagOrder::ByName)?;

    for host in &hosts {
        let name = shell_quote(host.hostname());
        writeln!(out, "create host {}", name)?;
        let commissioned = host.commission_date().map(format_date);
        writeln!(
            out,
            "host {} set commissioned {}",
            name,
            quote_optional(commissioned.as_deref(), "commissioned", host.hostname())
        )?;
        let decommissioned = host.decommission_date().map(format_date);
        writeln!(
            out,
            "host {} set decommissioned {}",
            name,
            quote_optional(decommissioned.as_deref(), "decommissioned", host.hostname())
        )?;
        writeln!(
            out,
            "host {} set description {}",
            name,
            quote_optional(host.description(), "description", host.hostname())
        )?;
        let vars = serde_json::to_string(host.variables())?;
        writeln!(out, "host {} var set $ {}", name, shell_quote(&vars))?;
    }
    writeln!(out)?;

    for tag in &tags {
        let name = shell_quote(tag.name());
        writeln!(out, "create tag {}", name)?;
        writeln!(
            out,
            "tag {} set group {}",
            name,
            quote_optional(tag.group(), "group", tag.name())
        )?;
        writeln!(
            out,
            "tag {} set description {}",
            name,
            quote_optional(tag.description(), "description", tag.name())
        )?;
        let vars = serde_json::to_string(tag.variables())?;
        writeln!(out, "tag {} var set $ {}", name, shell_quote(&vars))?;
    }
    writeln!(out)?;

    for host in &hosts {
        let name = shell_quote(host.hostname());
        for tag in store.host_tags(host, TagOrder::ByName)? {
            writeln!(out, "host {} tag add {}", name, shell_quote(tag.name()))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::lexer;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_shell_quote() {
        assert_eq!(shell_quote("web1.example.com"), "web1.example.com");
        assert_eq!(shell_quote(""), "''");
        assert_eq!(shell_quote("a b"), "'a b'");
        assert_eq!(shell_quote("$"), "'$'");
        assert_eq!(shell_quote("it's"), r#"'it'"'"'s'"#);
    }

    #[test]
    fn test_quoted_words_lex_back() {
        for word in ["it's", "a \"b\" c", "{\"k\":[1,2]}", "back\\slash", "", "none"] {
            let line = format!("echo {}", shell_quote(word));
            assert_eq!(lexer::split(&line).unwrap(), vec!["echo", word]);
        }
    }

    #[test]
    fn test_literal_none_is_flagged() {
        assert!(reads_back_as_none(Some("none")));
        assert!(!reads_back_as_none(Some("None")));
        assert!(!reads_back_as_none(Some("nothing")));
        assert!(!reads_back_as_none(None));

        let store = Store::open_in_memory().unwrap();
        let mut tag = store.create_tag("odd").unwrap();
        store.set_tag_group(&mut tag, Some("none")).unwrap();
        let mut out = Vec::new();
        write_config(&store, &mut out).unwrap();
        assert!(String::from_utf8(out)
            .unwrap()
            .contains("tag odd set group none\n"));
    }

    #[test]
    fn test_write_config() {
        let store = Store::open_in_memory().unwrap();
        let mut host = store.create_host("web1").unwrap();
        store
            .set_host_description(&mut host, Some("Bob's box"))
            .unwrap();
        store.set_var_json(&mut host, "port", "80").unwrap();
        let mut tag = store.create_tag("prod").unwrap();
        store.set_tag_group(&mut tag, Some("env")).unwrap();
        store.add_host_tag(&host, &tag).unwrap();

        let mut out = Vec::new();
        write_config(&store, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            indoc! {r#"
                create host web1
                host web1 set commissioned none
                host web1 set decommissioned none
                host web1 set description 'Bob'"'"'s box'
                host web1 var set $ '{"port":80}'

                create tag prod
                tag prod set group env
                tag prod set description none
                tag prod var set $ '{}'

                host web1 tag add prod
            "#}
        );
    }
}
