//! Tag records and tag groups

use rusqlite::{params, OptionalExtension, Row};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{EntityKind, IsidoreError, Result};
use crate::store::hosts::host_from_row;
use crate::store::model::{Host, Tag, TagGroup, TagOrder};
use crate::store::{violated_constraint, Constraint, Store};

const TAG_COLUMNS: &str = "TagID, TagName, TagGroup, Description, Variables";

pub(crate) fn tag_from_row(row: &Row<'_>) -> rusqlite::Result<Tag> {
    Ok(Tag {
        id: row.get(0)?,
        name: row.get(1)?,
        group: row.get(2)?,
        description: row.get(3)?,
        variables: row.get(4)?,
    })
}

/// SQLite sorts NULL before any text, so tags without a group come first.
pub(crate) fn order_clause(order: TagOrder) -> &'static str {
    match order {
        TagOrder::ByName => "TagName ASC",
        TagOrder::ByGroupThenName => "TagGroup ASC, TagName ASC",
    }
}

impl Store {
    /// Create a tag with only its name set.
    pub fn create_tag(&self, name: &str) -> Result<Tag> {
        self.conn
            .execute("INSERT INTO Tag (TagName) VALUES (?1)", params![name])
            .map_err(|e| match violated_constraint(&e) {
                Some(Constraint::Unique) => IsidoreError::DuplicateName {
                    kind: EntityKind::Tag,
                    name: name.to_string(),
                },
                _ => e.into(),
            })?;
        debug!(tag = name, "created tag");

        Ok(Tag {
            id: self.conn.last_insert_rowid(),
            name: name.to_string(),
            group: None,
            description: None,
            variables: Value::Object(Map::new()),
        })
    }

    /// Exact, case-sensitive lookup by name.
    pub fn tag(&self, name: &str) -> Result<Option<Tag>> {
        let sql = format!("SELECT {} FROM Tag WHERE TagName = ?1", TAG_COLUMNS);
        Ok(self
            .conn
            .query_row(&sql, params![name], tag_from_row)
            .optional()?)
    }

    pub fn tags(&self, order: TagOrder) -> Result<Vec<Tag>> {
        let sql = format!("SELECT {} FROM Tag ORDER BY {}", TAG_COLUMNS, order_clause(order));
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], tag_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Tag groups in group order, each with its tag names in name order.
    pub fn tag_groups(&self) -> Result<Vec<TagGroup>> {
        let mut groups: Vec<TagGroup> = Vec::new();
        for tag in self.tags(TagOrder::ByGroupThenName)? {
            match groups.last_mut() {
                Some(last) if last.group == tag.group => {
                    last.tags.push(tag.name);
                    continue;
                }
                _ => {}
            }
            groups.push(TagGroup {
                group: tag.group,
                tags: vec![tag.name],
            });
        }
        Ok(groups)
    }

    /// Delete a tag. Refused while hosts still carry it.
    pub fn delete_tag(&self, tag: Tag) -> Result<()> {
        self.conn
            .execute("DELETE FROM Tag WHERE TagID = ?1", params![tag.id])
            .map_err(|e| match violated_constraint(&e) {
                Some(Constraint::ForeignKey) => IsidoreError::StillReferenced {
                    kind: EntityKind::Tag,
                    name: tag.name.clone(),
                },
                _ => e.into(),
            })?;
        debug!(tag = %tag.name, "deleted tag");
        Ok(())
    }

    pub fn set_tag_name(&self, tag: &mut Tag, name: &str) -> Result<()> {
        self.conn
            .execute(
                "UPDATE Tag SET TagName = ?1 WHERE TagID = ?2",
                params![name, tag.id],
            )
            .map_err(|e| match violated_constraint(&e) {
                Some(Constraint::Unique) => IsidoreError::DuplicateName {
                    kind: EntityKind::Tag,
                    name: name.to_string(),
                },
                _ => e.into(),
            })?;
        debug!(from = %tag.name, to = name, "renamed tag");
        tag.name = name.to_string();
        Ok(())
    }

    /// `None` takes the tag out of its group.
    pub fn set_tag_group(&self, tag: &mut Tag, group: Option<&str>) -> Result<()> {
        self.conn.execute(
            "UPDATE Tag SET TagGroup = ?1 WHERE TagID = ?2",
            params![group, tag.id],
        )?;
        debug!(tag = %tag.name, ?group, "set tag group");
        tag.group = group.map(str::to_string);
        Ok(())
    }

    pub fn set_tag_description(&self, tag: &mut Tag, description: Option<&str>) -> Result<()> {
        self.conn.execute(
            "UPDATE Tag SET Description = ?1 WHERE TagID = ?2",
            params![description, tag.id],
        )?;
        tag.description = description.map(str::to_string);
        Ok(())
    }

    /// Commissioned hosts carrying `tag`, by hostname.
    pub fn tag_hosts(&self, tag: &Tag) -> Result<Vec<Host>> {
        let mut stmt = self.conn.prepare(
            "SELECT Host.HostID, Hostname, CommissionDate, DecommissionDate,
                    Host.Description, Host.Variables
             FROM Host
             INNER JOIN HostHasTag ON Host.HostID = HostHasTag.HostID
             WHERE HostHasTag.TagID = ?1 AND DecommissionDate IS NULL
             ORDER BY Hostname ASC",
        )?;
        let rows = stmt.query_map(params![tag.id], host_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }
}
