//! Effect store codec - the only decode/encode boundary for persisted state.
//!
//! Legacy rows stored the containers either as structured JSON or as a JSON
//! string wrapping one (double-encoded). Decoding accepts both; encoding always
//! emits native structures. Malformed payloads degrade to the empty container,
//! and an undecodable entry inside an otherwise-sound container is dropped
//! individually - state decoding never fails.

use crate::core::state::{
    ActiveEffect, ActiveEffects, Cosmetics, Inventory, OwnedItem, PermanentEffect,
    PermanentEffects,
};
use crate::errors::Result;
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

/// Peels at most one layer of string wrapping off a stored value.
fn unwrap_text(value: &Value) -> Value {
    match value {
        Value::String(text) => serde_json::from_str(text).unwrap_or_else(|err| {
            warn!("discarding malformed serialized container: {err}");
            Value::Null
        }),
        other => other.clone(),
    }
}

/// Decodes the active-effects container. Unknown item entries with undecodable
/// instances lose only those instances.
#[must_use]
pub fn decode_active(value: &Value) -> ActiveEffects {
    let Value::Object(map) = unwrap_text(value) else {
        return ActiveEffects::new();
    };
    let mut out = ActiveEffects::new();
    for (item_id, entry) in map {
        let Value::Array(raw_instances) = entry else {
            warn!("active effects for '{item_id}' are not a list; dropping");
            continue;
        };
        let instances: Vec<ActiveEffect> = raw_instances
            .into_iter()
            .filter_map(|raw| match serde_json::from_value(raw) {
                Ok(inst) => Some(inst),
                Err(err) => {
                    warn!("dropping undecodable active effect under '{item_id}': {err}");
                    None
                }
            })
            .collect();
        if !instances.is_empty() {
            out.insert(item_id, instances);
        }
    }
    out
}

/// Decodes the permanent-effects container.
#[must_use]
pub fn decode_permanent(value: &Value) -> PermanentEffects {
    let Value::Object(map) = unwrap_text(value) else {
        return PermanentEffects::new();
    };
    let mut out = PermanentEffects::new();
    for (item_id, entry) in map {
        match serde_json::from_value::<PermanentEffect>(entry) {
            Ok(record) => {
                out.insert(item_id, record);
            }
            Err(err) => {
                warn!("dropping undecodable permanent effect under '{item_id}': {err}");
            }
        }
    }
    out
}

/// Decodes the inventory container.
#[must_use]
pub fn decode_inventory(value: &Value) -> Inventory {
    let Value::Object(map) = unwrap_text(value) else {
        return Inventory::new();
    };
    let mut out = Inventory::new();
    for (item_id, entry) in map {
        match serde_json::from_value::<OwnedItem>(entry) {
            Ok(owned) => {
                out.insert(item_id, owned);
            }
            Err(err) => {
                warn!("dropping undecodable inventory entry '{item_id}': {err}");
            }
        }
    }
    out
}

/// Decodes the cosmetics container.
#[must_use]
pub fn decode_cosmetics(value: &Value) -> Cosmetics {
    let Value::Object(map) = unwrap_text(value) else {
        return Cosmetics::new();
    };
    map.into_iter()
        .filter_map(|(id, flag)| match flag {
            Value::Bool(equipped) => Some((id, equipped)),
            _ => {
                warn!("dropping non-boolean cosmetic flag '{id}'");
                None
            }
        })
        .collect()
}

/// Decodes a TEXT column straight into the active container.
#[must_use]
pub fn decode_active_column(text: &str) -> ActiveEffects {
    decode_active(&parse_column(text))
}

/// Decodes a TEXT column straight into the permanent container.
#[must_use]
pub fn decode_permanent_column(text: &str) -> PermanentEffects {
    decode_permanent(&parse_column(text))
}

/// Decodes a TEXT column straight into the inventory.
#[must_use]
pub fn decode_inventory_column(text: &str) -> Inventory {
    decode_inventory(&parse_column(text))
}

/// Decodes a TEXT column straight into the cosmetics map.
#[must_use]
pub fn decode_cosmetics_column(text: &str) -> Cosmetics {
    decode_cosmetics(&parse_column(text))
}

fn parse_column(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|err| {
        warn!("discarding malformed stored column: {err}");
        Value::Null
    })
}

/// Encodes any container back to its stored TEXT form (always native JSON,
/// never the legacy string-wrapped form).
pub fn encode_column<T: Serialize>(container: &T) -> Result<String> {
    serde_json::to_string(container).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::catalog::effects::{EffectKind, Target};
    use chrono::{DateTime, Utc};

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-08-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn sample_active() -> ActiveEffects {
        let inst = ActiveEffect::from_effect(
            &EffectKind::Multiplier {
                targets: vec![Target::Work],
                multiplier: 1.25,
                duration: Some(3600),
            },
            now(),
        );
        let mut map = ActiveEffects::new();
        map.insert("coffee".to_string(), vec![inst]);
        map
    }

    #[test]
    fn test_structured_round_trip() {
        let original = sample_active();
        let text = encode_column(&original).unwrap();
        assert_eq!(decode_active_column(&text), original);
    }

    #[test]
    fn test_double_encoded_string_form_accepted() {
        let original = sample_active();
        let inner = serde_json::to_string(&original).unwrap();
        // Legacy rows: the column holds a JSON *string* containing the object
        let wrapped = serde_json::to_string(&inner).unwrap();
        assert_eq!(decode_active_column(&wrapped), original);
    }

    #[test]
    fn test_malformed_payload_degrades_to_empty() {
        assert!(decode_active_column("{not json").is_empty());
        assert!(decode_active_column("").is_empty());
        assert!(decode_active_column("42").is_empty());
        assert!(decode_permanent_column("[1,2,3]").is_empty());
        assert!(decode_inventory_column("\"still not an object\"").is_empty());
    }

    #[test]
    fn test_bad_entry_dropped_others_survive() {
        let mut value = serde_json::to_value(sample_active()).unwrap();
        value["coffee"]
            .as_array_mut()
            .unwrap()
            .push(serde_json::json!({ "effect": { "type": "frobnicator" } }));
        value["garbage"] = serde_json::json!("not a list");

        let decoded = decode_active(&value);
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded.get("coffee").unwrap().len(), 1);
    }

    #[test]
    fn test_cosmetics_decode_tolerates_junk_flags() {
        let value = serde_json::json!({ "top_hat": true, "party_crown": "yes" });
        let cosmetics = decode_cosmetics(&value);
        assert_eq!(cosmetics.len(), 1);
        assert_eq!(cosmetics.get("top_hat"), Some(&true));
    }

    #[test]
    fn test_permanent_round_trip() {
        let mut map = PermanentEffects::new();
        map.insert(
            "golden_watch".to_string(),
            PermanentEffect {
                effect: EffectKind::PermanentMultiplier {
                    targets: vec![Target::All],
                    multiplier: 1.1,
                },
                applied_at: now(),
            },
        );
        let text = encode_column(&map).unwrap();
        assert_eq!(decode_permanent_column(&text), map);
    }
}
