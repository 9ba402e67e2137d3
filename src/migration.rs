// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Schema migration for persisted profile records
//!
//! Stored records carry an integer `version` stamp. Before the engine
//! consumes a stored profile it runs the record through a sequential chain
//! of single-version transformations (v1 to v2, v2 to v3, ...), each
//! renaming or defaulting the fields its version introduced. Migration
//! works on raw JSON so fields the current code does not recognize are
//! carried through untouched, never dropped.

use serde_json::{json, Map, Value};
use tracing::debug;

use crate::error::{EngineError, Result};

/// Version stamped on records written by the current engine
pub const CURRENT_SCHEMA_VERSION: u32 = 3;

/// Upgrade a stored record from `from_version` to the current schema.
///
/// Fails with [`EngineError::UnsupportedVersion`] when `from_version` is
/// newer than the current schema; records already at the current version
/// pass through unchanged apart from the `version` stamp.
pub fn migrate(record: Value, from_version: u32) -> Result<Value> {
    if from_version > CURRENT_SCHEMA_VERSION {
        return Err(EngineError::UnsupportedVersion {
            from: from_version,
            current: CURRENT_SCHEMA_VERSION,
        });
    }

    let mut record = record;
    let mut version = from_version;
    while version < CURRENT_SCHEMA_VERSION {
        record = match version {
            1 => migrate_v1_to_v2(record),
            2 => migrate_v2_to_v3(record),
            unknown => {
                return Err(EngineError::UnsupportedVersion {
                    from: unknown,
                    current: CURRENT_SCHEMA_VERSION,
                })
            }
        };
        version += 1;
        debug!(version, "migrated profile record one schema step");
    }

    stamp_version(record, CURRENT_SCHEMA_VERSION)
}

/// v2 renamed `etp` to `threshold_pace` and introduced the limiter field.
fn migrate_v1_to_v2(record: Value) -> Value {
    let mut fields = into_fields(record);
    if let Some(etp) = fields.remove("etp") {
        fields.insert("threshold_pace".into(), etp);
    }
    fields
        .entry("limiter")
        .or_insert_with(|| json!("balanced"));
    Value::Object(fields)
}

/// v3 renamed `results` to `test_results` and introduced weekly
/// availability and the age category.
fn migrate_v2_to_v3(record: Value) -> Value {
    let mut fields = into_fields(record);
    if let Some(results) = fields.remove("results") {
        fields.insert("test_results".into(), results);
    }
    fields
        .entry("availability")
        .or_insert_with(|| json!([true, true, true, true, true, true, true]));
    fields
        .entry("age_category")
        .or_insert_with(|| json!("senior"));
    Value::Object(fields)
}

fn into_fields(record: Value) -> Map<String, Value> {
    match record {
        Value::Object(fields) => fields,
        other => {
            // Non-object records were never written by any released schema;
            // wrap rather than drop so nothing is lost.
            let mut fields = Map::new();
            fields.insert("data".into(), other);
            fields
        }
    }
}

fn stamp_version(record: Value, version: u32) -> Result<Value> {
    let mut fields = into_fields(record);
    fields.insert("version".into(), json!(version));
    Ok(Value::Object(fields))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_v1_rename_and_limiter_default() {
        let record = json!({ "etp": 300 });
        let migrated = migrate_v1_to_v2(record);
        assert_eq!(migrated["threshold_pace"], json!(300));
        assert_eq!(migrated["limiter"], json!("balanced"));
        assert!(migrated.get("etp").is_none());
    }

    #[test]
    fn test_v1_existing_limiter_survives() {
        let record = json!({ "etp": 300, "limiter": "cardio" });
        let migrated = migrate_v1_to_v2(record);
        assert_eq!(migrated["limiter"], json!("cardio"));
    }

    #[test]
    fn test_full_chain_from_v1() {
        let record = json!({ "etp": 300, "results": [{ "distance_m": 5000.0, "time_s": 1200.0 }] });
        let migrated = migrate(record, 1).unwrap();

        assert_eq!(migrated["threshold_pace"], json!(300));
        assert_eq!(migrated["limiter"], json!("balanced"));
        assert_eq!(
            migrated["test_results"],
            json!([{ "distance_m": 5000.0, "time_s": 1200.0 }])
        );
        assert_eq!(
            migrated["availability"],
            json!([true, true, true, true, true, true, true])
        );
        assert_eq!(migrated["age_category"], json!("senior"));
        assert_eq!(migrated["version"], json!(CURRENT_SCHEMA_VERSION));
    }

    #[test]
    fn test_unknown_fields_carried_through() {
        let record = json!({ "etp": 300, "coach_notes": "negative splits", "hr_max": 192 });
        let migrated = migrate(record, 1).unwrap();
        assert_eq!(migrated["coach_notes"], json!("negative splits"));
        assert_eq!(migrated["hr_max"], json!(192));
    }

    #[test]
    fn test_current_version_passes_through() {
        let record = json!({
            "threshold_pace": 94.1,
            "limiter": "muscular",
            "test_results": [],
            "version": 3,
        });
        let migrated = migrate(record.clone(), CURRENT_SCHEMA_VERSION).unwrap();
        assert_eq!(migrated, record);
    }

    #[test]
    fn test_future_version_is_rejected() {
        let record = json!({ "threshold_pace": 94.1 });
        let err = migrate(record, CURRENT_SCHEMA_VERSION + 1).unwrap_err();
        assert!(matches!(
            err,
            EngineError::UnsupportedVersion { from, current }
                if from == CURRENT_SCHEMA_VERSION + 1 && current == CURRENT_SCHEMA_VERSION
        ));
    }

    #[test]
    fn test_v2_records_skip_v1_step() {
        // A v2 record may legitimately contain a field named `etp` again
        // (free-form user data); only the v2 to v3 step runs.
        let record = json!({ "threshold_pace": 94.1, "results": [] });
        let migrated = migrate(record, 2).unwrap();
        assert_eq!(migrated["test_results"], json!([]));
        assert_eq!(migrated["version"], json!(3));
    }
}
