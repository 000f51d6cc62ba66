//! Price model, profitability report and manual edits.

pub mod app_state;
pub mod gp;
pub mod overrides;
pub mod report;
pub mod snapshot;

pub use app_state::{AppState, CacheRecord, EditError};
pub use gp::{format_gp, parse_gp, GpParseError};
pub use overrides::{apply_field, apply_path, Component, FieldError, FieldPath, FieldTarget};
pub use report::{
    compute, compute_at, ingredient_cost, required_sale_price, tax_on, CraftedItemReport,
    IngredientCostTriple, ProfitCase, Recommendation, Report, TierAmounts, FRESHNESS_TTL,
    TARGET_PROFIT, TAX_PERCENT,
};
pub use snapshot::{
    CatalogEntry, CraftedItemOption, ItemCatalog, PriceSnapshot, PriceTriple, Provenance,
    ProvenanceTag, Tier, CRAFTED_SLOTS, INGREDIENT_A_NAME, INGREDIENT_A_QTY, INGREDIENT_B_NAME,
    INGREDIENT_B_QTY,
};
