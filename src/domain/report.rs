//! Derives a profitability report from a price snapshot.
//!
//! Everything here is pure: the same snapshot, provenance and clock reading
//! always produce the same [`Report`]. Arithmetic saturates instead of
//! overflowing so the engine has no failure path.

use std::time::{Duration, SystemTime};

use serde::Serialize;

use super::snapshot::{
    CraftedItemOption, PriceSnapshot, PriceTriple, Provenance, Tier, INGREDIENT_A_QTY,
    INGREDIENT_B_QTY,
};

/// Grand Exchange tax on the sale price, in percent.
pub const TAX_PERCENT: i64 = 2;
/// Fetched prices are considered fresh for this long (inclusive).
pub const FRESHNESS_TTL: Duration = Duration::from_secs(20 * 60);
/// Profit goal used for the "target sale" row.
pub const TARGET_PROFIT: i64 = 1_000_000;

/// One amount per pricing tier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TierAmounts {
    pub low: i64,
    pub avg: i64,
    pub high: i64,
}

/// Cost of one craft's ingredients at each tier.
pub type IngredientCostTriple = TierAmounts;

impl TierAmounts {
    fn from_fn(mut f: impl FnMut(Tier) -> i64) -> Self {
        Self {
            low: f(Tier::Low),
            avg: f(Tier::Avg),
            high: f(Tier::High),
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

/// Selling one crafted item at one tier's price.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ProfitCase {
    pub tier: Tier,
    pub sale_price: i64,
    pub tax_paid: i64,
    pub net_after_tax: i64,
    pub profit: i64,
}

impl ProfitCase {
    /// `ingredient_cost` must be the cost at the same tier as `sale_price`.
    pub fn new(tier: Tier, sale_price: i64, ingredient_cost: i64) -> Self {
        let tax_paid = tax_on(sale_price);
        let net_after_tax = sale_price.saturating_sub(tax_paid);
        Self {
            tier,
            sale_price,
            tax_paid,
            net_after_tax,
            profit: net_after_tax.saturating_sub(ingredient_cost),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CraftedItemReport {
    pub name: String,
    pub external_id: u32,
    pub price: PriceTriple,
    /// Ordered low, avg, high.
    pub cases: [ProfitCase; 3],
    pub best_case: ProfitCase,
}

impl CraftedItemReport {
    pub fn case(&self, tier: Tier) -> &ProfitCase {
        match tier {
            Tier::Low => &self.cases[0],
            Tier::Avg => &self.cases[1],
            Tier::High => &self.cases[2],
        }
    }
}

/// Points at one crafted item in the report's item list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub index: usize,
    pub name: String,
    /// The compared figure: avg-tier profit or high-tier sale price.
    pub value: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Report {
    pub provenance: Provenance,
    pub fresh: bool,
    /// Time since the last fetch, when there was one.
    pub age: Option<Duration>,
    pub ingredient_a: PriceTriple,
    pub ingredient_b: PriceTriple,
    pub ingredient_cost: IngredientCostTriple,
    pub break_even_sale: TierAmounts,
    pub target_sale: TierAmounts,
    pub items: Vec<CraftedItemReport>,
    /// `None` only when the snapshot has no crafted items.
    pub best_by_avg_profit: Option<Recommendation>,
    pub best_by_high_sale: Option<Recommendation>,
}

/// Builds the report against the current wall clock.
pub fn compute(snapshot: &PriceSnapshot, provenance: &Provenance) -> Report {
    compute_at(snapshot, provenance, SystemTime::now())
}

pub fn compute_at(snapshot: &PriceSnapshot, provenance: &Provenance, now: SystemTime) -> Report {
    let age = provenance.fetched_at().map(|fetched_at| {
        now.duration_since(fetched_at)
            .unwrap_or(Duration::ZERO)
    });
    let fresh = age.map(|age| age <= FRESHNESS_TTL).unwrap_or(false);

    let ingredient_cost = ingredient_cost(&snapshot.ingredient_a, &snapshot.ingredient_b);

    let items: Vec<CraftedItemReport> = snapshot
        .items
        .iter()
        .map(|item| evaluate_item(item, &ingredient_cost))
        .collect();

    let best_by_avg_profit = first_max_by(&items, |item| item.case(Tier::Avg).profit);
    let best_by_high_sale = first_max_by(&items, |item| item.price.high);

    Report {
        provenance: *provenance,
        fresh,
        age,
        ingredient_a: snapshot.ingredient_a,
        ingredient_b: snapshot.ingredient_b,
        ingredient_cost,
        break_even_sale: TierAmounts::from_fn(|tier| {
            required_sale_price(ingredient_cost.get(tier), 0)
        }),
        target_sale: TierAmounts::from_fn(|tier| {
            required_sale_price(ingredient_cost.get(tier), TARGET_PROFIT)
        }),
        items,
        best_by_avg_profit,
        best_by_high_sale,
    }
}

/// Cost of one craft at each tier, pairing like tiers only.
pub fn ingredient_cost(ingredient_a: &PriceTriple, ingredient_b: &PriceTriple) -> IngredientCostTriple {
    TierAmounts::from_fn(|tier| {
        INGREDIENT_A_QTY
            .saturating_mul(ingredient_a.get(tier))
            .saturating_add(INGREDIENT_B_QTY.saturating_mul(ingredient_b.get(tier)))
    })
}

/// Tax withheld on a sale; truncates toward zero.
pub fn tax_on(sale_price: i64) -> i64 {
    sale_price.saturating_mul(TAX_PERCENT) / 100
}

/// Smallest sale price whose after-tax net covers `cost + desired_profit`.
pub fn required_sale_price(cost: i64, desired_profit: i64) -> i64 {
    let target = i128::from(cost) + i128::from(desired_profit);
    if target <= 0 {
        return 0;
    }

    let net = |sale: i128| sale - sale * i128::from(TAX_PERCENT) / 100;
    let keep = i128::from(100 - TAX_PERCENT);

    // ceil(target / 0.98) always suffices; the truncated tax can let a coin or two less through.
    let mut sale = (target * 100 + keep - 1) / keep;
    while sale > 0 && net(sale - 1) >= target {
        sale -= 1;
    }

    sale.min(i128::from(i64::MAX)) as i64
}

fn evaluate_item(item: &CraftedItemOption, cost: &IngredientCostTriple) -> CraftedItemReport {
    let cases = Tier::ALL.map(|tier| ProfitCase::new(tier, item.price.get(tier), cost.get(tier)));

    let mut best_case = cases[0];
    for case in &cases[1..] {
        if case.profit > best_case.profit {
            best_case = *case;
        }
    }

    CraftedItemReport {
        name: item.name.clone(),
        external_id: item.external_id,
        price: item.price,
        cases,
        best_case,
    }
}

/// Strictly-greater scan, so the earliest item wins ties.
fn first_max_by(
    items: &[CraftedItemReport],
    key: impl Fn(&CraftedItemReport) -> i64,
) -> Option<Recommendation> {
    let mut best: Option<(usize, i64)> = None;
    for (index, item) in items.iter().enumerate() {
        let value = key(item);
        if best.map(|(_, current)| value > current).unwrap_or(true) {
            best = Some((index, value));
        }
    }

    best.map(|(index, value)| Recommendation {
        index,
        name: items[index].name.clone(),
        value,
    })
}
