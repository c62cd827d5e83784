use serde::{Deserialize, Serialize};

use crate::engine::terrain::TerrainKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coords {
    pub x: i64,
    pub y: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemType {
    Equipment,
    Consumable,
    Material,
    Valuable,
    Key,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EquipmentSlot {
    Weapon,
    Armor,
    Helmet,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStats {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub atk: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub def: Option<i64>,
}

/// One inventory entry. Item ids are not unique across the inventory:
/// stackable entries share an id to merge, and duplicate pieces of equipment
/// keep separate entries under the same id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    pub name: String,
    #[serde(default = "default_icon")]
    pub icon: String,
    #[serde(rename = "type")]
    pub kind: ItemType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
    #[serde(default)]
    pub equipped: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slot: Option<EquipmentSlot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<ItemStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub durability: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_durability: Option<i64>,
}

fn default_icon() -> String {
    "📦".to_string()
}

impl Item {
    pub fn is_equipment(&self) -> bool {
        self.kind == ItemType::Equipment
    }

    /// Invariant: 0 <= durability <= max_durability whenever both are set.
    pub fn clamp_durability(&mut self) {
        if let (Some(durability), Some(max)) = (self.durability, self.max_durability) {
            self.durability = Some(durability.clamp(0, max.max(0)));
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerState {
    pub name: String,
    pub hp: i64,
    pub max_hp: i64,
    pub mp: i64,
    pub max_mp: i64,
    pub atk: i64,
    pub def: i64,
    pub lvl: u32,
    pub exp: i64,
    pub max_exp: i64,
    pub gold: i64,
    pub inventory: Vec<Item>,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            name: "Orion".to_string(),
            hp: 100,
            max_hp: 100,
            mp: 30,
            max_mp: 30,
            atk: 12,
            def: 5,
            lvl: 1,
            exp: 0,
            max_exp: 100,
            gold: 50,
            inventory: vec![
                Item {
                    id: "rusty_sword".to_string(),
                    name: "Pedang Berkarat".to_string(),
                    icon: "⚔️".to_string(),
                    kind: ItemType::Equipment,
                    count: None,
                    equipped: true,
                    slot: Some(EquipmentSlot::Weapon),
                    stats: Some(ItemStats { atk: Some(2), def: None }),
                    durability: Some(25),
                    max_durability: Some(30),
                },
                Item {
                    id: "leather_armor".to_string(),
                    name: "Zirah Kulit".to_string(),
                    icon: "👕".to_string(),
                    kind: ItemType::Equipment,
                    count: None,
                    equipped: true,
                    slot: Some(EquipmentSlot::Armor),
                    stats: Some(ItemStats { atk: None, def: Some(2) }),
                    durability: Some(40),
                    max_durability: Some(40),
                },
                Item {
                    id: "health_potion".to_string(),
                    name: "Potion Penyembuh".to_string(),
                    icon: "🧪".to_string(),
                    kind: ItemType::Consumable,
                    count: Some(3),
                    equipped: false,
                    slot: None,
                    stats: None,
                    durability: None,
                    max_durability: None,
                },
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enemy {
    pub id: String,
    pub name: String,
    pub hp: i64,
    pub max_hp: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestStatus {
    Active,
    Completed,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quest {
    pub id: String,
    pub title: String,
    pub description: String,
    pub status: QuestStatus,
}

/// A quest without a status yet: the shape of both a pending offer and a
/// narrator `questUpdates.add` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestSeed {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeOfDay {
    #[serde(rename = "Pagi")]
    Morning,
    #[serde(rename = "Siang")]
    Midday,
    #[serde(rename = "Sore")]
    Evening,
    #[serde(rename = "Malam")]
    Night,
}

impl TimeOfDay {
    pub fn label(&self) -> &'static str {
        match self {
            TimeOfDay::Morning => "Pagi",
            TimeOfDay::Midday => "Siang",
            TimeOfDay::Evening => "Sore",
            TimeOfDay::Night => "Malam",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub coords: Coords,
    #[serde(rename = "type")]
    pub kind: TerrainKind,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldState {
    pub location: Location,
    pub time_of_day: TimeOfDay,
    pub active_enemies: Vec<Enemy>,
}

impl Default for WorldState {
    fn default() -> Self {
        Self {
            location: Location {
                coords: Coords { x: 0, y: 0 },
                kind: TerrainKind::Village,
                name: "Desa Oakvale".to_string(),
            },
            time_of_day: TimeOfDay::Midday,
            active_enemies: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HistoryRole {
    #[serde(rename = "player")]
    Player,
    #[serde(rename = "GM")]
    Narrator,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: HistoryRole,
    pub content: String,
}

/// One line of the narrative log. Append-only; the authoritative log is never
/// truncated (the request builder trims its own copy instead).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LogEntry {
    System { content: String },
    Player { content: String },
    Narration { content: String },
    CombatBanner { content: String },
}

impl LogEntry {
    pub fn content(&self) -> &str {
        match self {
            LogEntry::System { content }
            | LogEntry::Player { content }
            | LogEntry::Narration { content }
            | LogEntry::CombatBanner { content } => content,
        }
    }
}

/// The single authoritative snapshot. Owned by the engine thread; everything
/// else only ever sees clones of it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub player: PlayerState,
    pub world: WorldState,
    pub quests: Vec<Quest>,
    pub history: Vec<HistoryEntry>,
    pub log: Vec<LogEntry>,
    pub quest_offer: Option<QuestSeed>,
    pub suggested_actions: Vec<String>,
    pub is_loading: bool,
}
