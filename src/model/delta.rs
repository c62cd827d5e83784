use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::model::game_state::{
    Coords, Enemy, EquipmentSlot, Item, ItemStats, ItemType, QuestSeed, QuestStatus,
};

/// The narrator's structured suggestion for how the game state should change
/// this turn. Produced by an LLM, so every field is treated as untrusted:
/// unknown fields are dropped, malformed sections are skipped with a warning,
/// and `add`/`remove`/`update` tolerate a bare object where an array was
/// expected.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeltaPayload {
    #[serde(deserialize_with = "lenient")]
    pub narration: String,
    #[serde(deserialize_with = "lenient")]
    pub log_entries: Vec<String>,
    #[serde(deserialize_with = "lenient")]
    pub player_updates: Option<PlayerUpdates>,
    #[serde(deserialize_with = "lenient")]
    pub inventory_updates: Option<InventoryUpdates>,
    #[serde(deserialize_with = "lenient")]
    pub enemy_updates: Option<EnemyUpdates>,
    #[serde(deserialize_with = "lenient")]
    pub quest_offer: Option<QuestSeed>,
    #[serde(deserialize_with = "lenient")]
    pub quest_updates: Option<QuestUpdates>,
    #[serde(deserialize_with = "lenient")]
    pub suggested_actions: Vec<String>,
}

impl DeltaPayload {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// An inert delta: narration and log lines only, no state-mutating claims.
    pub fn narration_only(narration: impl Into<String>, log_entries: Vec<String>) -> Self {
        Self {
            narration: narration.into(),
            log_entries,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PlayerUpdates {
    #[serde(deserialize_with = "lenient")]
    pub set: Option<SetFields>,
    #[serde(deserialize_with = "lenient")]
    pub increment: Option<IncrementFields>,
}

/// Absolute overwrites. The recognized field set is closed; anything else
/// lands in `unrecognized` and is dropped with a warning at merge time.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SetFields {
    pub hp: Option<f64>,
    pub mp: Option<f64>,
    pub max_hp: Option<f64>,
    pub max_mp: Option<f64>,
    pub exp: Option<f64>,
    pub gold: Option<f64>,
    pub atk: Option<f64>,
    pub def: Option<f64>,
    pub coords: Option<Coords>,
    pub location_name: Option<String>,
    #[serde(flatten)]
    pub unrecognized: serde_json::Map<String, Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IncrementFields {
    pub hp: Option<f64>,
    pub mp: Option<f64>,
    pub exp: Option<f64>,
    pub gold: Option<f64>,
    #[serde(flatten)]
    pub unrecognized: serde_json::Map<String, Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct InventoryUpdates {
    #[serde(deserialize_with = "one_or_many")]
    pub add: Vec<Item>,
    #[serde(deserialize_with = "one_or_many")]
    pub remove: Vec<String>,
    #[serde(deserialize_with = "one_or_many")]
    pub update: Vec<ItemUpdate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ItemUpdate {
    pub id: String,
    #[serde(default)]
    pub changes: ItemChanges,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ItemChanges {
    pub name: Option<String>,
    pub icon: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<ItemType>,
    pub count: Option<i64>,
    pub equipped: Option<bool>,
    pub slot: Option<EquipmentSlot>,
    pub stats: Option<ItemStats>,
    pub durability: Option<i64>,
    pub max_durability: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EnemyUpdates {
    #[serde(deserialize_with = "one_or_many")]
    pub add: Vec<Enemy>,
    #[serde(deserialize_with = "one_or_many")]
    pub remove: Vec<String>,
    #[serde(deserialize_with = "one_or_many")]
    pub update: Vec<EnemyUpdate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EnemyUpdate {
    pub id: String,
    #[serde(default)]
    pub changes: EnemyChanges,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EnemyChanges {
    pub hp: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct QuestUpdates {
    #[serde(deserialize_with = "one_or_many")]
    pub add: Vec<QuestSeed>,
    #[serde(deserialize_with = "one_or_many")]
    pub update: Vec<QuestUpdate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuestUpdate {
    pub id: String,
    #[serde(default)]
    pub changes: QuestChanges,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct QuestChanges {
    pub status: Option<QuestStatus>,
    pub description: Option<String>,
}

/// Decode a field, falling back to its default (and warning) instead of
/// failing the whole payload when the narrator mangles one section.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_else(|err| {
        log::warn!("ignoring malformed delta field: {err}");
        T::default()
    }))
}

/// Normalize a bare object into a one-element sequence and decode entries
/// individually, skipping the ones that don't fit.
fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let entries = match Value::deserialize(deserializer)? {
        Value::Null => Vec::new(),
        Value::Array(entries) => entries,
        single => vec![single],
    };

    Ok(entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value(entry) {
            Ok(decoded) => Some(decoded),
            Err(err) => {
                log::warn!("skipping malformed delta entry: {err}");
                None
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_object_is_coerced_to_a_sequence() {
        let delta = DeltaPayload::from_json(
            r#"{
                "narration": "x",
                "inventoryUpdates": {
                    "add": { "id": "apple", "name": "Apel", "type": "CONSUMABLE" },
                    "remove": "apple"
                }
            }"#,
        )
        .unwrap();

        let updates = delta.inventory_updates.unwrap();
        assert_eq!(updates.add.len(), 1);
        assert_eq!(updates.add[0].id, "apple");
        assert_eq!(updates.remove, vec!["apple".to_string()]);
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let delta = DeltaPayload::from_json(
            r#"{ "narration": "x", "mood": "ominous", "weather": { "rain": true } }"#,
        )
        .unwrap();
        assert_eq!(delta.narration, "x");
    }

    #[test]
    fn malformed_section_is_dropped_not_fatal() {
        let delta = DeltaPayload::from_json(
            r#"{ "narration": "x", "enemyUpdates": "a goblin appears" }"#,
        )
        .unwrap();
        assert!(delta.enemy_updates.is_none());
    }

    #[test]
    fn malformed_entry_is_skipped_but_siblings_survive() {
        let delta = DeltaPayload::from_json(
            r#"{
                "narration": "x",
                "enemyUpdates": {
                    "add": [
                        { "id": "goblin", "name": "Goblin", "hp": 12, "maxHp": 12 },
                        { "name": "missing id and hp" }
                    ]
                }
            }"#,
        )
        .unwrap();

        let updates = delta.enemy_updates.unwrap();
        assert_eq!(updates.add.len(), 1);
        assert_eq!(updates.add[0].id, "goblin");
    }

    #[test]
    fn unrecognized_player_set_keys_are_captured() {
        let delta = DeltaPayload::from_json(
            r#"{
                "narration": "x",
                "playerUpdates": { "set": { "hp": 10, "inventory": [], "luck": 7 } }
            }"#,
        )
        .unwrap();

        let set = delta.player_updates.unwrap().set.unwrap();
        assert_eq!(set.hp, Some(10.0));
        assert!(set.unrecognized.contains_key("inventory"));
        assert!(set.unrecognized.contains_key("luck"));
    }
}
