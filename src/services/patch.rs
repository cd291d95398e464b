//! Raw JSON patches for entities edited field by field

use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

use crate::error::{FleetError, FleetResult};

/// Keys a patch may never touch
pub const IMMUTABLE_FIELDS: [&str; 3] = ["id", "vehicle_id", "created_at"];

/// Merge `patch` into the serialized entity and read it back.
///
/// Returns the patched entity and the patched fields as they serialize on
/// it, so a date or enum written loosely by the caller compares cleanly
/// against stored state.
pub fn apply_patch<T>(entity: &T, patch: &Value) -> FleetResult<(T, Map<String, Value>)>
where
    T: Serialize + DeserializeOwned,
{
    let Value::Object(fields) = patch else {
        return Err(FleetError::Validation(
            "An update must be a JSON object of fields".into(),
        ));
    };

    let mut merged = serde_json::to_value(entity)?;
    let Value::Object(target) = &mut merged else {
        return Err(FleetError::Validation("Entity is not patchable".into()));
    };

    for (key, value) in fields {
        if IMMUTABLE_FIELDS.contains(&key.as_str()) {
            return Err(FleetError::Validation(format!(
                "Field '{}' cannot be changed",
                key
            )));
        }
        if !target.contains_key(key) {
            return Err(FleetError::Validation(format!("Unknown field '{}'", key)));
        }
        target.insert(key.clone(), value.clone());
    }

    let patched: T = serde_json::from_value(merged)
        .map_err(|e| FleetError::Validation(format!("Invalid update: {}", e)))?;

    let canonical = serde_json::to_value(&patched)?;
    let changes = fields
        .keys()
        .filter_map(|key| canonical.get(key).map(|v| (key.clone(), v.clone())))
        .collect();

    Ok((patched, changes))
}
