use serde::{Deserialize, Serialize};

/// Terrain category of a map tile. The world is infinite and never stored:
/// every tile is derived on demand from its coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TerrainKind {
    Plains,
    Forest,
    Mountains,
    River,
    Bridge,
    Swamp,
    Village,
    Ruins,
    Cave,
}

impl TerrainKind {
    pub fn name(&self) -> &'static str {
        match self {
            TerrainKind::Plains => "Padang Rumput",
            TerrainKind::Forest => "Hutan",
            TerrainKind::Mountains => "Pegunungan",
            TerrainKind::River => "Sungai",
            TerrainKind::Bridge => "Jembatan",
            TerrainKind::Swamp => "Rawa",
            TerrainKind::Village => "Desa",
            TerrainKind::Ruins => "Reruntuhan",
            TerrainKind::Cave => "Gua",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            TerrainKind::Plains => "🌾",
            TerrainKind::Forest => "🌲",
            TerrainKind::Mountains => "⛰️",
            TerrainKind::River => "💧",
            TerrainKind::Bridge => "🌉",
            TerrainKind::Swamp => "🐸",
            TerrainKind::Village => "🏡",
            TerrainKind::Ruins => "🏛️",
            TerrainKind::Cave => "🕸️",
        }
    }
}

/// mulberry32: a tiny deterministic PRNG. Seeded generators from the `rand`
/// crate make no reproducibility promise across versions, and the map must
/// stay identical across builds, processes and time, so the generator is
/// pinned here.
struct Mulberry32 {
    state: u32,
}

impl Mulberry32 {
    fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Next value, uniform in [0, 1).
    fn next(&mut self) -> f64 {
        self.state = self.state.wrapping_add(0x6D2B79F5);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        f64::from(t ^ (t >> 14)) / 4294967296.0
    }
}

const SEED_PRIME_X: i64 = 7345781;
const SEED_PRIME_Y: i64 = 3251761;

/// Deterministic terrain lookup: same coordinates, same category, always.
/// Total over all integers; never fails.
pub fn terrain_at(x: i64, y: i64) -> TerrainKind {
    // The starting point is always a village for narrative consistency.
    if x == 0 && y == 0 {
        return TerrainKind::Village;
    }

    let seed = x
        .wrapping_mul(SEED_PRIME_X)
        .wrapping_add(y.wrapping_mul(SEED_PRIME_Y));
    let value = Mulberry32::new(seed as u32).next();

    if value < 0.35 {
        TerrainKind::Plains
    } else if value < 0.70 {
        TerrainKind::Forest
    } else if value < 0.80 {
        TerrainKind::Mountains
    } else if value < 0.86 {
        // River zone; a second draw from a derived seed turns a few river
        // tiles into crossings.
        if Mulberry32::new(seed.wrapping_mul(2) as u32).next() < 0.10 {
            TerrainKind::Bridge
        } else {
            TerrainKind::River
        }
    } else if value < 0.92 {
        TerrainKind::Swamp
    } else if value < 0.94 {
        TerrainKind::Village
    } else if value < 0.96 {
        TerrainKind::Ruins
    } else if value < 0.98 {
        TerrainKind::Cave
    } else {
        TerrainKind::Plains
    }
}

/// The eight tiles around a position, as both the map view and the narrator
/// request expect them. North is negative y.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalMap {
    pub north: TerrainKind,
    pub north_east: TerrainKind,
    pub east: TerrainKind,
    pub south_east: TerrainKind,
    pub south: TerrainKind,
    pub south_west: TerrainKind,
    pub west: TerrainKind,
    pub north_west: TerrainKind,
}

pub fn local_map(x: i64, y: i64) -> LocalMap {
    LocalMap {
        north: terrain_at(x, y - 1),
        north_east: terrain_at(x + 1, y - 1),
        east: terrain_at(x + 1, y),
        south_east: terrain_at(x + 1, y + 1),
        south: terrain_at(x, y + 1),
        south_west: terrain_at(x - 1, y + 1),
        west: terrain_at(x - 1, y),
        north_west: terrain_at(x - 1, y - 1),
    }
}
