//! Diff engine
//!
//! Turns the raw change argument of a mutation into the canonical `changes`
//! payload stored on a [`ChangeRecord`](super::ChangeRecord):
//!
//! - `create` / `delete`: the argument is kept verbatim.
//! - `update`: the argument maps field names either to an already
//!   normalized `{"old", "new"}` pair, kept as is, or to a bare new value,
//!   which is compared with the live value of that field fetched through the
//!   [`EntityResolver`]. Unchanged fields are dropped.
//!
//! Diffing is best effort. Lookups that fail or find nothing skip the field,
//! and nothing in here returns an error to the caller.

use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use super::entry::{ActionKind, EntityType};
use super::error::AuditError;
use super::resolver::EntityResolver;

/// Key holding the previous value in a change pair
pub const OLD_KEY: &str = "old";
/// Key holding the new value in a change pair
pub const NEW_KEY: &str = "new";

/// Whether a value is an already normalized `{"old", "new"}` pair
pub fn is_change_pair(value: &Value) -> bool {
    matches!(value, Value::Object(obj) if obj.contains_key(OLD_KEY) && obj.contains_key(NEW_KEY))
}

/// Build a `{"old", "new"}` pair
pub fn change_pair(old: Value, new: Value) -> Value {
    json!({ OLD_KEY: old, NEW_KEY: new })
}

/// Structural equality where numbers compare by value (`2023 == 2023.0`)
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            if let (Some(x), Some(y)) = (x.as_i64(), y.as_i64()) {
                return x == y;
            }
            if let (Some(x), Some(y)) = (x.as_u64(), y.as_u64()) {
                return x == y;
            }
            matches!((x.as_f64(), y.as_f64()), (Some(x), Some(y)) if x == y)
        }
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(a, b)| values_equal(a, b))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x
                    .iter()
                    .all(|(key, a)| y.get(key).map_or(false, |b| values_equal(a, b)))
        }
        _ => a == b,
    }
}

/// Top-level field diff between two entity snapshots.
///
/// Returns `{field: {"old", "new"}}` for every field whose value differs; a
/// field present on one side only is compared against `null`. Non-object
/// snapshots have no fields and produce an empty map.
pub fn field_changes(before: &Value, after: &Value) -> Map<String, Value> {
    let mut changes = Map::new();

    let (Value::Object(before_obj), Value::Object(after_obj)) = (before, after) else {
        return changes;
    };

    for (key, before_val) in before_obj {
        let after_val = after_obj.get(key).unwrap_or(&Value::Null);
        if !values_equal(before_val, after_val) {
            changes.insert(key.clone(), change_pair(before_val.clone(), after_val.clone()));
        }
    }

    for (key, after_val) in after_obj {
        if !before_obj.contains_key(key) && !after_val.is_null() {
            changes.insert(key.clone(), change_pair(Value::Null, after_val.clone()));
        }
    }

    changes
}

/// One-line summary of a changes payload, e.g. `status: "available" -> "rented"`
pub fn summarize_changes(changes: &Value) -> Option<String> {
    let obj = changes.as_object()?;

    let parts: Vec<String> = obj
        .iter()
        .map(|(field, value)| {
            if is_change_pair(value) {
                format!(
                    "{}: {} -> {}",
                    field,
                    format_value(&value[OLD_KEY]),
                    format_value(&value[NEW_KEY])
                )
            } else {
                format!("{} = {}", field, format_value(value))
            }
        })
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(", "))
    }
}

/// Format a JSON value for human-readable display
fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => {
            if s.chars().count() > 50 {
                let head: String = s.chars().take(47).collect();
                format!("\"{}...\"", head)
            } else {
                format!("\"{}\"", s)
            }
        }
        Value::Array(arr) => format!("[{} items]", arr.len()),
        Value::Object(obj) => format!("{{{} fields}}", obj.len()),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Normalized payload plus whatever went wrong on the way
#[derive(Debug, Clone, PartialEq)]
pub struct DiffResult {
    pub changes: Value,
    pub issues: Vec<AuditError>,
}

impl DiffResult {
    fn clean(changes: Value) -> Self {
        Self {
            changes,
            issues: Vec::new(),
        }
    }
}

/// Live state of the entity, fetched at most once per diff
enum LiveState {
    Unresolved,
    Found(Map<String, Value>),
    Unavailable,
}

/// Normalizes change payloads against live entity state
pub struct DiffEngine<'a> {
    resolver: &'a dyn EntityResolver,
}

impl<'a> DiffEngine<'a> {
    pub fn new(resolver: &'a dyn EntityResolver) -> Self {
        Self { resolver }
    }

    /// Produce the payload to store for one action.
    ///
    /// Never fails: problems are logged and listed in [`DiffResult::issues`].
    pub fn normalize(
        &self,
        action: ActionKind,
        entity_type: EntityType,
        entity_id: u64,
        changes: Value,
    ) -> DiffResult {
        match action {
            ActionKind::Create | ActionKind::Delete => DiffResult::clean(changes),
            ActionKind::Update => self.normalize_update(entity_type, entity_id, changes),
        }
    }

    fn normalize_update(&self, entity_type: EntityType, entity_id: u64, changes: Value) -> DiffResult {
        let mut issues = Vec::new();

        let fields = match changes {
            Value::Object(fields) => fields,
            Value::Null => Map::new(),
            other => {
                let issue = AuditError::Validation(format!(
                    "update of {} #{} expects an object of fields, got {}",
                    entity_type,
                    entity_id,
                    json_kind(&other)
                ));
                warn!(%issue, "discarding malformed change payload");
                issues.push(issue);
                return DiffResult {
                    changes: Value::Object(Map::new()),
                    issues,
                };
            }
        };

        let mut normalized = Map::new();
        let mut live = LiveState::Unresolved;

        for (field, value) in fields {
            if is_change_pair(&value) {
                if values_equal(&value[OLD_KEY], &value[NEW_KEY]) {
                    debug!(%entity_type, entity_id, field = %field, "dropping pair with identical old and new");
                } else {
                    normalized.insert(field, value);
                }
                continue;
            }

            let Some(current) =
                self.current_value(&mut live, entity_type, entity_id, &field, &mut issues)
            else {
                continue;
            };

            if !values_equal(&current, &value) {
                normalized.insert(field, change_pair(current, value));
            }
        }

        DiffResult {
            changes: Value::Object(normalized),
            issues,
        }
    }

    fn current_value(
        &self,
        live: &mut LiveState,
        entity_type: EntityType,
        entity_id: u64,
        field: &str,
        issues: &mut Vec<AuditError>,
    ) -> Option<Value> {
        if matches!(live, LiveState::Unresolved) {
            *live = self.fetch(entity_type, entity_id, issues);
        }

        match &*live {
            LiveState::Found(current) => match current.get(field) {
                Some(value) => Some(value.clone()),
                None => {
                    debug!(%entity_type, entity_id, field, "field not present on entity, skipping");
                    issues.push(AuditError::Lookup(format!(
                        "{} #{} has no field '{}'",
                        entity_type, entity_id, field
                    )));
                    None
                }
            },
            _ => None,
        }
    }

    fn fetch(
        &self,
        entity_type: EntityType,
        entity_id: u64,
        issues: &mut Vec<AuditError>,
    ) -> LiveState {
        if !entity_type.is_tracked() {
            debug!(%entity_type, entity_id, "untracked entity type, skipping bare values");
            issues.push(AuditError::Lookup(format!(
                "{} is not a tracked entity type",
                entity_type
            )));
            return LiveState::Unavailable;
        }

        match self.resolver.snapshot(entity_type, entity_id) {
            Ok(Some(Value::Object(current))) => LiveState::Found(current),
            Ok(Some(other)) => {
                issues.push(AuditError::Lookup(format!(
                    "snapshot of {} #{} is {}, not an object",
                    entity_type,
                    entity_id,
                    json_kind(&other)
                )));
                LiveState::Unavailable
            }
            Ok(None) => {
                debug!(%entity_type, entity_id, "entity not found, skipping bare values");
                issues.push(AuditError::Lookup(format!(
                    "{} #{} not found",
                    entity_type, entity_id
                )));
                LiveState::Unavailable
            }
            Err(error) => {
                warn!(%entity_type, entity_id, %error, "entity lookup failed, keeping the diff computed so far");
                issues.push(AuditError::Lookup(format!(
                    "failed to load {} #{}: {}",
                    entity_type, entity_id, error
                )));
                LiveState::Unavailable
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FleetError, FleetResult};
    use std::cell::Cell;
    use std::collections::HashMap;

    #[derive(Default)]
    struct FakeResolver {
        entities: HashMap<(EntityType, u64), Value>,
        calls: Cell<usize>,
    }

    impl FakeResolver {
        fn with(mut self, entity_type: EntityType, id: u64, value: Value) -> Self {
            self.entities.insert((entity_type, id), value);
            self
        }
    }

    impl EntityResolver for FakeResolver {
        fn snapshot(&self, entity_type: EntityType, entity_id: u64) -> FleetResult<Option<Value>> {
            self.calls.set(self.calls.get() + 1);
            Ok(self.entities.get(&(entity_type, entity_id)).cloned())
        }
    }

    struct BrokenResolver;

    impl EntityResolver for BrokenResolver {
        fn snapshot(&self, _: EntityType, _: u64) -> FleetResult<Option<Value>> {
            Err(FleetError::Storage("disk on fire".into()))
        }
    }

    fn vehicle_resolver() -> FakeResolver {
        FakeResolver::default().with(
            EntityType::Vehicle,
            1,
            json!({"id": 1, "brand": "Tesla", "year": 2023, "status": "available", "parking_spot": null}),
        )
    }

    fn assert_pairs_differ(changes: &Value) {
        for (field, pair) in changes.as_object().unwrap() {
            assert!(is_change_pair(pair), "{} is not a pair", field);
            assert!(!values_equal(&pair[OLD_KEY], &pair[NEW_KEY]), "{} is a no-op", field);
        }
    }

    #[test]
    fn test_bare_value_resolved_against_live_state() {
        let resolver = vehicle_resolver();
        let engine = DiffEngine::new(&resolver);

        let result = engine.normalize(
            ActionKind::Update,
            EntityType::Vehicle,
            1,
            json!({"status": "rented"}),
        );

        assert_eq!(
            result.changes,
            json!({"status": {"old": "available", "new": "rented"}})
        );
        assert!(result.issues.is_empty());
    }

    #[test]
    fn test_unchanged_bare_value_dropped() {
        let resolver = vehicle_resolver();
        let engine = DiffEngine::new(&resolver);

        let result = engine.normalize(
            ActionKind::Update,
            EntityType::Vehicle,
            1,
            json!({"status": "available", "year": 2023.0}),
        );

        assert_eq!(result.changes, json!({}));
    }

    #[test]
    fn test_create_and_delete_pass_through_verbatim() {
        let resolver = FakeResolver::default();
        let engine = DiffEngine::new(&resolver);
        let payload = json!({"brand": "BMW", "model": "X5", "year": "2022", "extra": [1, 2]});

        for action in [ActionKind::Create, ActionKind::Delete] {
            let result = engine.normalize(action, EntityType::Vehicle, 9, payload.clone());
            assert_eq!(result.changes, payload);
        }

        let result = engine.normalize(ActionKind::Delete, EntityType::Note, 3, Value::Null);
        assert_eq!(result.changes, Value::Null);
        assert_eq!(resolver.calls.get(), 0);
    }

    #[test]
    fn test_normalized_input_is_idempotent() {
        let resolver = FakeResolver::default();
        let engine = DiffEngine::new(&resolver);
        let input = json!({
            "brand": {"old": "Tesla", "new": "BMW"},
            "parking_spot": {"old": null, "new": "A1"}
        });

        let once = engine.normalize(ActionKind::Update, EntityType::Vehicle, 1, input.clone());
        assert_eq!(once.changes, input);

        let twice = engine.normalize(ActionKind::Update, EntityType::Vehicle, 1, once.changes);
        assert_eq!(twice.changes, input);
        assert_eq!(resolver.calls.get(), 0);
    }

    #[test]
    fn test_identical_pair_dropped() {
        let resolver = FakeResolver::default();
        let engine = DiffEngine::new(&resolver);

        let result = engine.normalize(
            ActionKind::Update,
            EntityType::Vehicle,
            1,
            json!({"status": {"old": "rented", "new": "rented"}, "brand": {"old": "A", "new": "B"}}),
        );

        assert_eq!(result.changes, json!({"brand": {"old": "A", "new": "B"}}));
    }

    #[test]
    fn test_mixed_payload_fetches_entity_once() {
        let resolver = vehicle_resolver();
        let engine = DiffEngine::new(&resolver);

        let result = engine.normalize(
            ActionKind::Update,
            EntityType::Vehicle,
            1,
            json!({
                "brand": "BMW",
                "year": 2024,
                "status": "available",
                "model": {"old": "3", "new": "X5"}
            }),
        );

        assert_eq!(resolver.calls.get(), 1);
        assert_eq!(
            result.changes,
            json!({
                "brand": {"old": "Tesla", "new": "BMW"},
                "year": {"old": 2023, "new": 2024},
                "model": {"old": "3", "new": "X5"}
            })
        );
        assert_pairs_differ(&result.changes);
    }

    #[test]
    fn test_missing_entity_skips_bare_fields() {
        let resolver = FakeResolver::default();
        let engine = DiffEngine::new(&resolver);

        let result = engine.normalize(
            ActionKind::Update,
            EntityType::Note,
            42,
            json!({"content": "hello", "tag": {"old": 1, "new": 2}}),
        );

        assert_eq!(result.changes, json!({"tag": {"old": 1, "new": 2}}));
        assert!(matches!(result.issues.as_slice(), [AuditError::Lookup(_)]));
    }

    #[test]
    fn test_unknown_field_skipped() {
        let resolver = vehicle_resolver();
        let engine = DiffEngine::new(&resolver);

        let result = engine.normalize(
            ActionKind::Update,
            EntityType::Vehicle,
            1,
            json!({"colour": "red", "status": "rented"}),
        );

        assert_eq!(
            result.changes,
            json!({"status": {"old": "available", "new": "rented"}})
        );
        assert_eq!(result.issues.len(), 1);
    }

    #[test]
    fn test_untracked_entity_type_skips_without_lookup() {
        let resolver = FakeResolver::default().with(EntityType::Rental, 1, json!({"status": "active"}));
        let engine = DiffEngine::new(&resolver);

        let result = engine.normalize(
            ActionKind::Update,
            EntityType::Rental,
            1,
            json!({"status": "completed"}),
        );

        assert_eq!(result.changes, json!({}));
        assert_eq!(resolver.calls.get(), 0);
    }

    #[test]
    fn test_lookup_failure_keeps_safe_output() {
        let engine = DiffEngine::new(&BrokenResolver);

        let result = engine.normalize(
            ActionKind::Update,
            EntityType::Vehicle,
            1,
            json!({"brand": "BMW", "status": {"old": "available", "new": "rented"}}),
        );

        assert_eq!(
            result.changes,
            json!({"status": {"old": "available", "new": "rented"}})
        );
        assert_eq!(result.issues.len(), 1);
    }

    #[test]
    fn test_malformed_update_payload() {
        let resolver = FakeResolver::default();
        let engine = DiffEngine::new(&resolver);

        let result = engine.normalize(ActionKind::Update, EntityType::Vehicle, 1, json!(["status"]));
        assert_eq!(result.changes, json!({}));
        assert!(matches!(result.issues.as_slice(), [AuditError::Validation(_)]));

        let result = engine.normalize(ActionKind::Update, EntityType::Vehicle, 1, Value::Null);
        assert_eq!(result.changes, json!({}));
        assert!(result.issues.is_empty());
    }

    #[test]
    fn test_null_vs_value_is_a_change() {
        let resolver = vehicle_resolver();
        let engine = DiffEngine::new(&resolver);

        let result = engine.normalize(
            ActionKind::Update,
            EntityType::Vehicle,
            1,
            json!({"parking_spot": "B2"}),
        );

        assert_eq!(
            result.changes,
            json!({"parking_spot": {"old": null, "new": "B2"}})
        );
    }

    #[test]
    fn test_field_changes() {
        let before = json!({"name": "Checking", "balance": 1000, "gone": true});
        let after = json!({"name": "Checking", "balance": 1500, "added": "x"});

        let changes = Value::Object(field_changes(&before, &after));
        assert_eq!(
            changes,
            json!({
                "balance": {"old": 1000, "new": 1500},
                "gone": {"old": true, "new": null},
                "added": {"old": null, "new": "x"}
            })
        );
        assert_pairs_differ(&changes);
    }

    #[test]
    fn test_field_changes_identical_is_empty() {
        let snapshot = json!({"a": 1, "b": [1, 2]});
        assert!(field_changes(&snapshot, &snapshot).is_empty());
        assert!(field_changes(&json!(1), &json!(2)).is_empty());
    }

    #[test]
    fn test_values_equal() {
        assert!(values_equal(&json!(2023), &json!(2023.0)));
        assert!(!values_equal(&json!(2023), &json!("2023")));
        assert!(values_equal(&json!({"a": [1.0]}), &json!({"a": [1]})));
        assert!(!values_equal(&json!({"a": 1}), &json!({"a": 1, "b": 2})));
    }

    #[test]
    fn test_summarize_changes() {
        let summary = summarize_changes(&json!({
            "status": {"old": "available", "new": "rented"},
            "year": {"old": 2022, "new": 2023}
        }))
        .unwrap();
        assert!(summary.contains("status: \"available\" -> \"rented\""));
        assert!(summary.contains("year: 2022 -> 2023"));

        assert!(summarize_changes(&json!({})).is_none());
        assert!(summarize_changes(&Value::Null).is_none());
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(&json!(null)), "null");
        assert_eq!(format_value(&json!(true)), "true");
        assert_eq!(format_value(&json!(42)), "42");
        assert_eq!(format_value(&json!("test")), "\"test\"");
        assert_eq!(format_value(&json!([1, 2, 3])), "[3 items]");
        assert_eq!(format_value(&json!({"a": 1, "b": 2})), "{2 fields}");
        assert!(format_value(&json!("é".repeat(60))).ends_with("...\""));
    }
}
