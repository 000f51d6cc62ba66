use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Number of crafted-item slots every snapshot carries.
pub const CRAFTED_SLOTS: usize = 3;

/// Infernal shale consumed per craft.
pub const INGREDIENT_A_QTY: i64 = 2520;
/// Oathplate shards consumed per craft.
pub const INGREDIENT_B_QTY: i64 = 450;

pub const INGREDIENT_A_NAME: &str = "Infernal shale";
pub const INGREDIENT_A_ID: u32 = 30848;
pub const INGREDIENT_B_NAME: &str = "Oathplate shards";
pub const INGREDIENT_B_ID: u32 = 30765;

const DEFAULT_CRAFTED: [(&str, u32); CRAFTED_SLOTS] = [
    ("Oathplate helm", 30750),
    ("Oathplate chest", 30753),
    ("Oathplate legs", 30756),
];

/// Pricing tier. Iteration order is always low, avg, high.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Low,
    Avg,
    High,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Low, Tier::Avg, Tier::High];

    pub fn label(&self) -> &'static str {
        match self {
            Tier::Low => "low",
            Tier::Avg => "avg",
            Tier::High => "high",
        }
    }
}

/// High/low/average price for one tradeable item, in whole gp.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceTriple {
    pub high: i64,
    pub low: i64,
    pub avg: i64,
}

impl PriceTriple {
    /// Builds a triple from market high/low; the average truncates.
    pub fn from_high_low(high: i64, low: i64) -> Self {
        Self {
            high,
            low,
            avg: high.saturating_add(low) / 2,
        }
    }

    /// Collapses all three members to one value.
    pub fn flat(value: i64) -> Self {
        Self {
            high: value,
            low: value,
            avg: value,
        }
    }

    pub fn get(&self, tier: Tier) -> i64 {
        match tier {
            Tier::Low => self.low,
            Tier::Avg => self.avg,
            Tier::High => self.high,
        }
    }
}

/// One of the finished-good slots whose profitability is compared.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CraftedItemOption {
    pub name: String,
    pub external_id: u32,
    pub price: PriceTriple,
}

impl CraftedItemOption {
    pub fn new(name: impl Into<String>, external_id: u32, price: PriceTriple) -> Self {
        Self {
            name: name.into(),
            external_id,
            price,
        }
    }
}

/// Raw market data the report is derived from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceSnapshot {
    pub ingredient_a: PriceTriple,
    pub ingredient_b: PriceTriple,
    /// Exactly [`CRAFTED_SLOTS`] entries for any snapshot built by this crate.
    pub items: Vec<CraftedItemOption>,
}

impl PriceSnapshot {
    pub fn has_full_item_list(&self) -> bool {
        self.items.len() == CRAFTED_SLOTS
    }
}

impl Default for PriceSnapshot {
    fn default() -> Self {
        Self {
            ingredient_a: PriceTriple::default(),
            ingredient_b: PriceTriple::default(),
            items: DEFAULT_CRAFTED
                .iter()
                .map(|(name, id)| CraftedItemOption::new(*name, *id, PriceTriple::default()))
                .collect(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProvenanceTag {
    Fetched,
    #[default]
    Manual,
}

impl ProvenanceTag {
    pub fn label(&self) -> &'static str {
        match self {
            ProvenanceTag::Fetched => "fetched",
            ProvenanceTag::Manual => "manual",
        }
    }
}

/// Where the snapshot came from, plus when it was last fetched.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    pub tag: ProvenanceTag,
    /// Unix seconds of the last successful fetch; `None` or `0` means never fetched.
    #[serde(default)]
    pub fetched_at: Option<u64>,
}

impl Provenance {
    pub fn manual() -> Self {
        Self::default()
    }

    pub fn fetched(at: SystemTime) -> Self {
        Self {
            tag: ProvenanceTag::Fetched,
            fetched_at: Some(unix_secs(at)),
        }
    }

    /// Fetch time, treating a zero timestamp as absent.
    pub fn fetched_at(&self) -> Option<SystemTime> {
        self.fetched_at
            .filter(|secs| *secs > 0)
            .map(|secs| UNIX_EPOCH + Duration::from_secs(secs))
    }

    /// Marks the data hand-edited. The fetch timestamp stays for display.
    pub fn mark_manual(&mut self) {
        self.tag = ProvenanceTag::Manual;
    }
}

/// Name and market id of one lookup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogEntry {
    pub name: String,
    pub id: u32,
}

impl CatalogEntry {
    pub fn new(name: impl Into<String>, id: u32) -> Self {
        Self {
            name: name.into(),
            id,
        }
    }
}

/// The five items a price fetch looks up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItemCatalog {
    pub ingredient_a: CatalogEntry,
    pub ingredient_b: CatalogEntry,
    pub items: Vec<CatalogEntry>,
}

impl ItemCatalog {
    /// Reuses the crafted item names and ids already present in `snapshot`.
    pub fn from_snapshot(snapshot: &PriceSnapshot) -> Self {
        Self {
            items: snapshot
                .items
                .iter()
                .map(|item| CatalogEntry::new(item.name.clone(), item.external_id))
                .collect(),
            ..Self::default()
        }
    }
}

impl Default for ItemCatalog {
    fn default() -> Self {
        Self {
            ingredient_a: CatalogEntry::new(INGREDIENT_A_NAME, INGREDIENT_A_ID),
            ingredient_b: CatalogEntry::new(INGREDIENT_B_NAME, INGREDIENT_B_ID),
            items: DEFAULT_CRAFTED
                .iter()
                .map(|(name, id)| CatalogEntry::new(*name, *id))
                .collect(),
        }
    }
}

pub fn unix_secs(at: SystemTime) -> u64 {
    at.duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
