//! Get/set/append/unset over a JSON variable tree

use serde_json::{Map, Value};

use crate::error::{IsidoreError, Result};
use crate::vars::path::{Segment, VarPath};

/// Resolve `path` in `doc`. `None` when any segment is missing or lands on
/// the wrong kind of container.
pub fn get<'a>(doc: &'a Value, path: &VarPath) -> Option<&'a Value> {
    path.segments()
        .iter()
        .try_fold(doc, |cur, segment| match (segment, cur) {
            (Segment::Key(key), Value::Object(map)) => map.get(key),
            (Segment::Index(index), Value::Array(items)) => items.get(*index),
            _ => None,
        })
}

fn get_mut<'a>(doc: &'a mut Value, path: &VarPath) -> Option<&'a mut Value> {
    path.segments()
        .iter()
        .try_fold(doc, |cur, segment| match (segment, cur) {
            (Segment::Key(key), Value::Object(map)) => map.get_mut(key),
            (Segment::Index(index), Value::Array(items)) => items.get_mut(*index),
            _ => None,
        })
}

/// Replace or create the value at `path`. Missing parents are created as
/// objects for key segments and lists for index segments; an index past the
/// end of a list appends.
pub fn set(doc: &mut Value, path: &VarPath, value: Value) -> Result<()> {
    let Some((last, parents)) = path.segments().split_last() else {
        if !value.is_object() {
            return Err(IsidoreError::RootNotObject);
        }
        *doc = value;
        return Ok(());
    };

    let mut cur = doc;
    for (depth, segment) in parents.iter().enumerate() {
        let next = &path.segments()[depth + 1];
        cur = descend_or_create(cur, segment, next)
            .ok_or_else(|| not_traversable(path, depth))?;
    }

    match (last, cur) {
        (Segment::Key(key), Value::Object(map)) => {
            map.insert(key.clone(), value);
        }
        (Segment::Index(index), Value::Array(items)) => {
            if *index < items.len() {
                items[*index] = value;
            } else {
                items.push(value);
            }
        }
        _ => return Err(not_traversable(path, parents.len())),
    }
    Ok(())
}

/// Push `value` onto the list at `path`. The document is left untouched when
/// `path` does not resolve to a list.
pub fn append(doc: &mut Value, path: &VarPath, value: Value) -> Result<()> {
    match get_mut(doc, path) {
        Some(Value::Array(items)) => {
            items.push(value);
            Ok(())
        }
        _ => Err(IsidoreError::NotAList {
            path: path.to_string(),
        }),
    }
}

/// Remove the member or element at `path`. Removing something that is not
/// there is not an error.
pub fn unset(doc: &mut Value, path: &VarPath) -> Result<()> {
    let Some(last) = path.segments().last() else {
        return Err(IsidoreError::MalformedPath {
            path: path.to_string(),
            reason: "the root cannot be unset".to_string(),
        });
    };

    let parent = path.prefix(path.segments().len() - 1);
    match (last, get_mut(doc, &parent)) {
        (Segment::Key(key), Some(Value::Object(map))) => {
            map.remove(key);
        }
        (Segment::Index(index), Some(Value::Array(items))) if *index < items.len() => {
            items.remove(*index);
        }
        _ => {}
    }
    Ok(())
}

fn descend_or_create<'a>(
    cur: &'a mut Value,
    segment: &Segment,
    next: &Segment,
) -> Option<&'a mut Value> {
    match (segment, cur) {
        (Segment::Key(key), Value::Object(map)) => {
            Some(map.entry(key.clone()).or_insert_with(|| empty_for(next)))
        }
        (Segment::Index(index), Value::Array(items)) => {
            if *index >= items.len() {
                items.push(empty_for(next));
                items.last_mut()
            } else {
                items.get_mut(*index)
            }
        }
        _ => None,
    }
}

fn empty_for(segment: &Segment) -> Value {
    match segment {
        Segment::Key(_) => Value::Object(Map::new()),
        Segment::Index(_) => Value::Array(Vec::new()),
    }
}

fn not_traversable(path: &VarPath, depth: usize) -> IsidoreError {
    let expected = match &path.segments()[depth] {
        Segment::Key(_) => "an object",
        Segment::Index(_) => "a list",
    };
    IsidoreError::MalformedPath {
        path: path.to_string(),
        reason: format!("{} is not {}", path.prefix(depth), expected),
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
    fn test_get_root_and_missing() {
        let doc = json!({"a": {"b": [1, 2]}});
        assert_eq!(get(&doc, &VarPath::root()), Some(&doc));
        assert_eq!(get(&doc, &path("a.b[1]")), Some(&json!(2)));
        assert_eq!(get(&doc, &path("a.c")), None);
        assert_eq!(get(&doc, &path("a.b.c")), None);
        assert_eq!(get(&doc, &path("a[0]")), None);
    }

    #[test]
    fn test_set_then_get_returns_value() {
        let values = [
            json!(null),
            json!(true),
            json!(42),
            json!("text"),
            json!([1, {"x": null}]),
            json!({"deep": {"er": []}}),
        ];
        for value in values {
            let mut doc = json!({});
            set(&mut doc, &path("some.where"), value.clone()).unwrap();
            assert_eq!(get(&doc, &path("some.where")), Some(&value));
        }
    }

    #[test]
    fn test_set_creates_missing_parents() {
        let mut doc = json!({});
        set(&mut doc, &path("a.b[0].c"), json!("x")).unwrap();
        assert_eq!(doc, json!({"a": {"b": [{"c": "x"}]}}));
    }

    #[test]
    fn test_set_index_past_end_appends() {
        let mut doc = json!({"l": [1]});
        set(&mut doc, &path("l[7]"), json!(2)).unwrap();
        set(&mut doc, &path("l[0]"), json!(0)).unwrap();
        assert_eq!(doc, json!({"l": [0, 2]}));
    }

    #[test]
    fn test_set_through_scalar_fails() {
        let mut doc = json!({"a": 5});
        let err = set(&mut doc, &path("a.b"), json!(1)).unwrap_err();
        assert!(matches!(err, IsidoreError::MalformedPath { .. }));
        assert_eq!(doc, json!({"a": 5}));
    }

    #[test]
    fn test_set_root() {
        let mut doc = json!({"old": 1});
        set(&mut doc, &VarPath::root(), json!({"new": 2})).unwrap();
        assert_eq!(doc, json!({"new": 2}));

        let err = set(&mut doc, &VarPath::root(), json!([1])).unwrap_err();
        assert!(matches!(err, IsidoreError::RootNotObject));
        assert_eq!(doc, json!({"new": 2}));
    }

    #[test]
    fn test_append() {
        let mut doc = json!({"tags": []});
        append(&mut doc, &path("tags"), json!("x")).unwrap();
        append(&mut doc, &path("tags"), json!({"y": 1})).unwrap();
        assert_eq!(doc, json!({"tags": ["x", {"y": 1}]}));
    }

    #[test]
    fn test_append_to_non_list_leaves_doc_unchanged() {
        let mut doc = json!({"tags": "prod", "n": {"m": 1}});
        let before = doc.clone();
        for p in ["tags", "n", "missing"] {
            let err = append(&mut doc, &path(p), json!("x")).unwrap_err();
            assert!(matches!(err, IsidoreError::NotAList { .. }));
        }
        assert_eq!(doc, before);
    }

    #[test]
    fn test_unset_is_idempotent() {
        let mut doc = json!({"a": {"b": 1, "c": 2}, "l": [1, 2, 3]});
        unset(&mut doc, &path("a.b")).unwrap();
        unset(&mut doc, &path("a.b")).unwrap();
        unset(&mut doc, &path("l[1]")).unwrap();
        unset(&mut doc, &path("l[9]")).unwrap();
        unset(&mut doc, &path("nope.deeper")).unwrap();
        assert_eq!(doc, json!({"a": {"c": 2}, "l": [1, 3]}));
    }

    #[test]
    fn test_unset_root_is_rejected() {
        let mut doc = json!({"a": 1});
        assert!(matches!(
            unset(&mut doc, &VarPath::root()),
            Err(IsidoreError::MalformedPath { .. })
        ));
    }
}
