//! Host records and host/tag assignments

use chrono::NaiveDateTime;
use rusqlite::{params, OptionalExtension, Row};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{EntityKind, IsidoreError, Result};
use crate::store::model::{Host, HostFilter, Tag, TagOrder};
use crate::store::{violated_constraint, Constraint, Store};

const HOST_COLUMNS: &str =
    "Host.HostID, Hostname, CommissionDate, DecommissionDate, Host.Description, Host.Variables";

pub(crate) fn host_from_row(row: &Row<'_>) -> rusqlite::Result<Host> {
    Ok(Host {
        id: row.get(0)?,
        hostname: row.get(1)?,
        commission_date: row.get(2)?,
        decommission_date: row.get(3)?,
        description: row.get(4)?,
        variables: row.get(5)?,
    })
}

impl Store {
    /// Create a host with only its hostname set.
    pub fn create_host(&self, hostname: &str) -> Result<Host> {
        self.conn
            .execute("INSERT INTO Host (Hostname) VALUES (?1)", params![hostname])
            .map_err(|e| match violated_constraint(&e) {
                Some(Constraint::Unique) => IsidoreError::DuplicateName {
                    kind: EntityKind::Host,
                    name: hostname.to_string(),
                },
                _ => e.into(),
            })?;
        debug!(host = hostname, "created host");

        Ok(Host {
            id: self.conn.last_insert_rowid(),
            hostname: hostname.to_string(),
            commission_date: None,
            decommission_date: None,
            description: None,
            variables: Value::Object(Map::new()),
        })
    }

    /// Exact, case-sensitive lookup by hostname.
    pub fn host(&self, hostname: &str) -> Result<Option<Host>> {
        let sql = format!("SELECT {} FROM Host WHERE Hostname = ?1", HOST_COLUMNS);
        Ok(self
            .conn
            .query_row(&sql, params![hostname], host_from_row)
            .optional()?)
    }

    /// Hosts matching `filter`, by hostname ascending.
    pub fn hosts(&self, filter: HostFilter) -> Result<Vec<Host>> {
        let condition = match filter {
            HostFilter::All => "",
            HostFilter::Commissioned => "WHERE DecommissionDate IS NULL",
            HostFilter::Decommissioned => "WHERE DecommissionDate IS NOT NULL",
        };
        let sql = format!(
            "SELECT {} FROM Host {} ORDER BY Hostname ASC",
            HOST_COLUMNS, condition
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], host_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Delete a host. Refused while it still has tags.
    pub fn delete_host(&self, host: Host) -> Result<()> {
        self.conn
            .execute("DELETE FROM Host WHERE HostID = ?1", params![host.id])
            .map_err(|e| match violated_constraint(&e) {
                Some(Constraint::ForeignKey) => IsidoreError::StillReferenced {
                    kind: EntityKind::Host,
                    name: host.hostname.clone(),
                },
                _ => e.into(),
            })?;
        debug!(host = %host.hostname, "deleted host");
        Ok(())
    }

    /// Rename a host.
    pub fn set_hostname(&self, host: &mut Host, hostname: &str) -> Result<()> {
        self.conn
            .execute(
                "UPDATE Host SET Hostname = ?1 WHERE HostID = ?2",
                params![hostname, host.id],
            )
            .map_err(|e| match violated_constraint(&e) {
                Some(Constraint::Unique) => IsidoreError::DuplicateName {
                    kind: EntityKind::Host,
                    name: hostname.to_string(),
                },
                _ => e.into(),
            })?;
        debug!(from = %host.hostname, to = hostname, "renamed host");
        host.hostname = hostname.to_string();
        Ok(())
    }

    pub fn set_commission_date(&self, host: &mut Host, date: Option<NaiveDateTime>) -> Result<()> {
        self.conn.execute(
            "UPDATE Host SET CommissionDate = ?1 WHERE HostID = ?2",
            params![date, host.id],
        )?;
        debug!(host = %host.hostname, ?date, "set commission date");
        host.commission_date = date;
        Ok(())
    }

    /// Setting a date decommissions the host; `None` brings it back.
    pub fn set_decommission_date(
        &self,
        host: &mut Host,
        date: Option<NaiveDateTime>,
    ) -> Result<()> {
        self.conn.execute(
            "UPDATE Host SET DecommissionDate = ?1 WHERE HostID = ?2",
            params![date, host.id],
        )?;
        debug!(host = %host.hostname, ?date, "set decommission date");
        host.decommission_date = date;
        Ok(())
    }

    pub fn set_host_description(&self, host: &mut Host, description: Option<&str>) -> Result<()> {
        self.conn.execute(
            "UPDATE Host SET Description = ?1 WHERE HostID = ?2",
            params![description, host.id],
        )?;
        host.description = description.map(str::to_string);
        Ok(())
    }

    /// Tags assigned to `host`.
    pub fn host_tags(&self, host: &Host, order: TagOrder) -> Result<Vec<Tag>> {
        let sql = format!(
            "SELECT Tag.TagID, TagName, TagGroup, Tag.Description, Tag.Variables
             FROM Tag
             INNER JOIN HostHasTag ON Tag.TagID = HostHasTag.TagID
             WHERE HostHasTag.HostID = ?1
             ORDER BY {}",
            crate::store::tags::order_clause(order)
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![host.id], crate::store::tags::tag_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Assign `tag` to `host`. Assigning a tag twice is an error.
    pub fn add_host_tag(&self, host: &Host, tag: &Tag) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO HostHasTag (HostID, TagID) VALUES (?1, ?2)",
                params![host.id, tag.id],
            )
            .map_err(|e| match violated_constraint(&e) {
                Some(Constraint::Unique) => IsidoreError::AlreadyAssigned {
                    host: host.hostname.clone(),
                    tag: tag.name.clone(),
                },
                _ => e.into(),
            })?;
        debug!(host = %host.hostname, tag = %tag.name, "assigned tag");
        Ok(())
    }

    /// Remove `tag` from `host`. Returns whether the host had the tag.
    pub fn remove_host_tag(&self, host: &Host, tag: &Tag) -> Result<bool> {
        let removed = self.conn.execute(
            "DELETE FROM HostHasTag WHERE HostID = ?1 AND TagID = ?2",
            params![host.id, tag.id],
        )?;
        debug!(host = %host.hostname, tag = %tag.name, removed, "removed tag");
        Ok(removed > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_create_and_get_host() {
        let store = Store::open_in_memory().unwrap();
        let created = store.create_host("web1").unwrap();
        let fetched = store.host("web1").unwrap().unwrap();

        assert_eq!(created, fetched);
        assert_eq!(fetched.description(), None);
        assert_eq!(fetched.variables(), &serde_json::json!({}));
        assert!(fetched.is_commissioned());
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let store = Store::open_in_memory().unwrap();
        store.create_host("web1").unwrap();
        assert!(store.host("WEB1").unwrap().is_none());
        assert!(store.host("missing").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_host_is_rejected() {
        let store = Store::open_in_memory().unwrap();
        store.create_host("x").unwrap();
        let err = store.create_host("x").unwrap_err();
        assert!(matches!(
            err,
            IsidoreError::DuplicateName { kind: EntityKind::Host, ref name } if name == "x"
        ));
    }

    #[test]
    fn test_listing_filters_and_order() {
        let store = Store::open_in_memory().unwrap();
        for name in ["db1", "web2", "app1", "web1"] {
            store.create_host(name).unwrap();
        }
        let mut web2 = store.host("web2").unwrap().unwrap();
        store
            .set_decommission_date(&mut web2, Some(date(2023, 5, 1)))
            .unwrap();

        let names = |hosts: Vec<Host>| {
            hosts
                .into_iter()
                .map(|h| h.hostname)
                .collect::<Vec<_>>()
        };

        assert_eq!(
            names(store.hosts(HostFilter::All).unwrap()),
            vec!["app1", "db1", "web1", "web2"]
        );
        assert_eq!(
            names(store.hosts(HostFilter::Commissioned).unwrap()),
            vec!["app1", "db1", "web1"]
        );
        assert_eq!(
            names(store.hosts(HostFilter::Decommissioned).unwrap()),
            vec!["web2"]
        );
    }

    #[test]
    fn test_setters_persist_and_update_snapshot() {
        let store = Store::open_in_memory().unwrap();
        let mut host = store.create_host("web1").unwrap();

        store
            .set_commission_date(&mut host, Some(date(2022, 1, 31)))
            .unwrap();
        store
            .set_host_description(&mut host, Some("primary web"))
            .unwrap();
        store.set_hostname(&mut host, "web01").unwrap();

        assert_eq!(host.hostname(), "web01");
        assert_eq!(host.description(), Some("primary web"));
        assert_eq!(store.host("web01").unwrap().unwrap(), host);
        assert!(store.host("web1").unwrap().is_none());

        store.set_host_description(&mut host, None).unwrap();
        assert_eq!(store.host("web01").unwrap().unwrap().description(), None);
    }

    #[test]
    fn test_rename_onto_existing_host_fails() {
        let store = Store::open_in_memory().unwrap();
        store.create_host("a").unwrap();
        let mut b = store.create_host("b").unwrap();
        assert!(store.set_hostname(&mut b, "a").unwrap_err().is_duplicate());
        assert_eq!(b.hostname(), "b");
    }

    #[test]
    fn test_tag_assignment_is_unique() {
        let store = Store::open_in_memory().unwrap();
        let host = store.create_host("h").unwrap();
        let tag = store.create_tag("t").unwrap();

        store.add_host_tag(&host, &tag).unwrap();
        let err = store.add_host_tag(&host, &tag).unwrap_err();
        assert!(matches!(err, IsidoreError::AlreadyAssigned { .. }));
        assert!(err.is_duplicate());
    }

    #[test]
    fn test_delete_host_with_tags_is_refused() {
        let store = Store::open_in_memory().unwrap();
        let host = store.create_host("h").unwrap();
        let tag = store.create_tag("t").unwrap();
        store.add_host_tag(&host, &tag).unwrap();

        let err = store.delete_host(host.clone()).unwrap_err();
        assert!(matches!(err, IsidoreError::StillReferenced { kind: EntityKind::Host, .. }));
        assert!(store.host("h").unwrap().is_some());

        assert!(store.remove_host_tag(&host, &tag).unwrap());
        assert!(!store.remove_host_tag(&host, &tag).unwrap());
        store.delete_host(host).unwrap();
        assert!(store.host("h").unwrap().is_none());
    }

    #[test]
    fn test_host_tags_order() {
        let store = Store::open_in_memory().unwrap();
        let host = store.create_host("h").unwrap();
        for (name, group) in [("zeta", None), ("alpha", Some("os")), ("beta", Some("env"))] {
            let mut tag = store.create_tag(name).unwrap();
            store.set_tag_group(&mut tag, group).unwrap();
            store.add_host_tag(&host, &tag).unwrap();
        }

        let by_name: Vec<_> = store
            .host_tags(&host, TagOrder::ByName)
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(by_name, vec!["alpha", "beta", "zeta"]);

        let by_group: Vec<_> = store
            .host_tags(&host, TagOrder::ByGroupThenName)
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(by_group, vec!["zeta", "beta", "alpha"]);
    }
}
