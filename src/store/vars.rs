//! Persisted variable trees for hosts and tags

use rusqlite::{params, OptionalExtension};
use serde_json::Value;
use tracing::debug;

use crate::error::{EntityKind, IsidoreError, Result};
use crate::store::model::{Host, Tag};
use crate::store::Store;
use crate::vars::{self, VarPath};

/// A record that carries a variable tree.
pub trait VarOwner {
    #[doc(hidden)]
    const TABLE: &'static str;
    #[doc(hidden)]
    const ID_COLUMN: &'static str;
    const KIND: EntityKind;

    fn id(&self) -> i64;
    fn name(&self) -> &str;
    #[doc(hidden)]
    fn variables_mut(&mut self) -> &mut Value;
}

impl VarOwner for Host {
    const TABLE: &'static str = "Host";
    const ID_COLUMN: &'static str = "HostID";
    const KIND: EntityKind = EntityKind::Host;

    fn id(&self) -> i64 {
        self.id
    }

    fn name(&self) -> &str {
        &self.hostname
    }

    fn variables_mut(&mut self) -> &mut Value {
        &mut self.variables
    }
}

impl VarOwner for Tag {
    const TABLE: &'static str = "Tag";
    const ID_COLUMN: &'static str = "TagID";
    const KIND: EntityKind = EntityKind::Tag;

    fn id(&self) -> i64 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn variables_mut(&mut self) -> &mut Value {
        &mut self.variables
    }
}

impl Store {
    /// Value at `path` in the entity's stored tree, `None` when the path does
    /// not resolve.
    pub fn get_var<E: VarOwner>(&self, entity: &E, path: &VarPath) -> Result<Option<Value>> {
        let doc = self.load_vars(entity)?;
        Ok(vars::get(&doc, path).cloned())
    }

    /// Replace or create the value at `path`; `$` replaces the whole tree.
    pub fn set_var<E: VarOwner>(&self, entity: &mut E, path: &VarPath, value: Value) -> Result<()> {
        self.update_vars(entity, |doc| vars::set(doc, path, value))?;
        debug!(entity = entity.name(), %path, "set variable");
        Ok(())
    }

    /// Push `value` onto the list at `path`.
    pub fn append_var<E: VarOwner>(
        &self,
        entity: &mut E,
        path: &VarPath,
        value: Value,
    ) -> Result<()> {
        self.update_vars(entity, |doc| vars::append(doc, path, value))?;
        debug!(entity = entity.name(), %path, "appended to variable");
        Ok(())
    }

    /// Remove the value at `path`; absent values are ignored.
    pub fn unset_var<E: VarOwner>(&self, entity: &mut E, path: &VarPath) -> Result<()> {
        self.update_vars(entity, |doc| vars::unset(doc, path))?;
        debug!(entity = entity.name(), %path, "unset variable");
        Ok(())
    }

    /// [`Store::set_var`] with a raw path and raw JSON text.
    pub fn set_var_json<E: VarOwner>(&self, entity: &mut E, path: &str, json: &str) -> Result<()> {
        let path = VarPath::parse(path)?;
        let value = vars::parse_json(json)?;
        self.set_var(entity, &path, value)
    }

    /// [`Store::append_var`] with a raw path and raw JSON text.
    pub fn append_var_json<E: VarOwner>(
        &self,
        entity: &mut E,
        path: &str,
        json: &str,
    ) -> Result<()> {
        let path = VarPath::parse(path)?;
        let value = vars::parse_json(json)?;
        self.append_var(entity, &path, value)
    }

    fn load_vars<E: VarOwner>(&self, entity: &E) -> Result<Value> {
        let sql = format!(
            "SELECT Variables FROM {} WHERE {} = ?1",
            E::TABLE,
            E::ID_COLUMN
        );
        self.conn
            .query_row(&sql, params![entity.id()], |row| row.get(0))
            .optional()?
            .ok_or_else(|| IsidoreError::NotFound {
                kind: E::KIND,
                name: entity.name().to_string(),
            })
    }

    /// Read-modify-write of the tree. Nothing is written when `edit` fails.
    fn update_vars<E: VarOwner>(
        &self,
        entity: &mut E,
        edit: impl FnOnce(&mut Value) -> Result<()>,
    ) -> Result<()> {
        let mut doc = self.load_vars(entity)?;
        edit(&mut doc)?;

        let sql = format!(
            "UPDATE {} SET Variables = ?1 WHERE {} = ?2",
            E::TABLE,
            E::ID_COLUMN
        );
        self.conn.execute(&sql, params![doc, entity.id()])?;
        *entity.variables_mut() = doc;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn path(s: &str) -> VarPath {
        VarPath::parse(s).unwrap()
    }

    #[test]
    fn test_host_var_round_trip() {
        let store = Store::open_in_memory().unwrap();
        let mut host = store.create_host("web1").unwrap();

        store
            .set_var(&mut host, &path("net.ip"), json!("10.0.0.1"))
            .unwrap();
        assert_eq!(
            store.get_var(&host, &path("net.ip")).unwrap(),
            Some(json!("10.0.0.1"))
        );
        assert_eq!(host.variables(), &json!({"net": {"ip": "10.0.0.1"}}));

        let fresh = store.host("web1").unwrap().unwrap();
        assert_eq!(fresh.variables(), host.variables());
        assert_eq!(store.get_var(&host, &path("net.mask")).unwrap(), None);
    }

    #[test]
    fn test_tag_var_root_replace() {
        let store = Store::open_in_memory().unwrap();
        let mut tag = store.create_tag("prod").unwrap();

        store.set_var_json(&mut tag, "$", r#"{"k": 1}"#).unwrap();
        assert_eq!(
            store.get_var(&tag, &VarPath::root()).unwrap(),
            Some(json!({"k": 1}))
        );
    }

    #[test]
    fn test_append_to_non_list_leaves_data_unchanged() {
        let store = Store::open_in_memory().unwrap();
        let mut host = store.create_host("h").unwrap();
        store.set_var(&mut host, &path("tags"), json!("prod")).unwrap();

        let err = store.append_var_json(&mut host, "tags", "\"x\"").unwrap_err();
        assert!(matches!(err, IsidoreError::NotAList { .. }));
        assert_eq!(
            store.host("h").unwrap().unwrap().variables(),
            &json!({"tags": "prod"})
        );
        assert_eq!(host.variables(), &json!({"tags": "prod"}));
    }

    #[test]
    fn test_append_to_list() {
        let store = Store::open_in_memory().unwrap();
        let mut host = store.create_host("h").unwrap();
        store.set_var_json(&mut host, "roles", "[]").unwrap();
        store.append_var_json(&mut host, "roles", "\"web\"").unwrap();
        store.append_var_json(&mut host, "$.roles", "\"db\"").unwrap();
        assert_eq!(
            store.get_var(&host, &path("roles")).unwrap(),
            Some(json!(["web", "db"]))
        );
    }

    #[test]
    fn test_unset_twice_succeeds() {
        let store = Store::open_in_memory().unwrap();
        let mut host = store.create_host("h").unwrap();
        store.set_var(&mut host, &path("a"), json!(1)).unwrap();
        store.unset_var(&mut host, &path("a")).unwrap();
        store.unset_var(&mut host, &path("a")).unwrap();
        assert_eq!(store.get_var(&host, &path("a")).unwrap(), None);
    }

    #[test]
    fn test_invalid_json_and_bad_path_are_distinct() {
        let store = Store::open_in_memory().unwrap();
        let mut host = store.create_host("h").unwrap();

        assert!(matches!(
            store.set_var_json(&mut host, "a", "bar"),
            Err(IsidoreError::InvalidJson { .. })
        ));
        assert!(matches!(
            store.set_var_json(&mut host, "a[*]", "1"),
            Err(IsidoreError::MalformedPath { .. })
        ));
    }

    #[test]
    fn test_vars_of_deleted_entity() {
        let store = Store::open_in_memory().unwrap();
        let host = store.create_host("h").unwrap();
        let mut stale = host.clone();
        store.delete_host(host).unwrap();

        assert!(matches!(
            store.set_var(&mut stale, &path("a"), json!(1)),
            Err(IsidoreError::NotFound { kind: EntityKind::Host, .. })
        ));
    }
}
