use std::time::{Duration, UNIX_EPOCH};

use oathplate_calc::domain::{
    compute_at, ingredient_cost, required_sale_price, tax_on, CraftedItemOption, PriceSnapshot,
    PriceTriple, ProfitCase, Provenance, ProvenanceTag, Tier,
};

fn triple(low: i64, avg: i64, high: i64) -> PriceTriple {
    PriceTriple { high, low, avg }
}

fn sample_snapshot() -> PriceSnapshot {
    PriceSnapshot {
        ingredient_a: triple(10, 20, 30),
        ingredient_b: triple(100, 150, 200),
        items: vec![
            CraftedItemOption::new("Oathplate helm", 30750, triple(60_000, 130_000, 200_000)),
            CraftedItemOption::new("Oathplate chest", 30753, triple(90_000, 150_000, 170_000)),
            CraftedItemOption::new("Oathplate legs", 30756, triple(70_000, 120_000, 210_000)),
        ],
    }
}

#[test]
fn tax_truncates_and_net_follows() {
    let case = ProfitCase::new(Tier::Avg, 1_000_000, 0);
    assert_eq!(case.tax_paid, 20_000);
    assert_eq!(case.net_after_tax, 980_000);
    assert_eq!(tax_on(1), 0);
    assert_eq!(tax_on(99), 1);
}

#[test]
fn ingredient_cost_pairs_tiers() {
    let cost = ingredient_cost(&triple(10, 20, 30), &triple(100, 150, 200));
    assert_eq!(cost.low, 70_200);
    assert_eq!(cost.avg, 117_900);
    assert_eq!(cost.high, 165_600);
}

#[test]
fn profit_uses_same_tier_cost() {
    let report = compute_at(&sample_snapshot(), &Provenance::manual(), UNIX_EPOCH);
    let helm = &report.items[0];

    assert_eq!(helm.case(Tier::Low).profit, 60_000 - 1_200 - 70_200);
    assert_eq!(helm.case(Tier::Avg).profit, 130_000 - 2_600 - 117_900);
    assert_eq!(helm.case(Tier::High).profit, 200_000 - 4_000 - 165_600);
    assert_eq!(helm.best_case.tier, Tier::High);
}

#[test]
fn best_case_prefers_first_tier_on_ties() {
    let mut snapshot = PriceSnapshot::default();
    snapshot.items[0].price = PriceTriple::flat(500);
    let report = compute_at(&snapshot, &Provenance::manual(), UNIX_EPOCH);
    assert_eq!(report.items[0].best_case.tier, Tier::Low);
}

#[test]
fn recommendations_pick_strict_maxima() {
    let report = compute_at(&sample_snapshot(), &Provenance::manual(), UNIX_EPOCH);

    let by_profit = report.best_by_avg_profit.unwrap();
    assert_eq!(by_profit.index, 1);
    assert_eq!(by_profit.name, "Oathplate chest");
    assert_eq!(by_profit.value, 150_000 - 3_000 - 117_900);

    let by_sale = report.best_by_high_sale.unwrap();
    assert_eq!(by_sale.index, 2);
    assert_eq!(by_sale.value, 210_000);
}

#[test]
fn avg_profit_tie_goes_to_first_item() {
    let mut snapshot = sample_snapshot();
    snapshot.items[0].price.avg = 150_000;
    snapshot.items[1].price.avg = 150_000;
    let report = compute_at(&snapshot, &Provenance::manual(), UNIX_EPOCH);
    assert_eq!(report.best_by_avg_profit.unwrap().index, 0);
}

#[test]
fn empty_item_list_has_no_recommendation() {
    let mut snapshot = sample_snapshot();
    snapshot.items.clear();
    let report = compute_at(&snapshot, &Provenance::manual(), UNIX_EPOCH);
    assert!(report.items.is_empty());
    assert!(report.best_by_avg_profit.is_none());
    assert!(report.best_by_high_sale.is_none());
}

#[test]
fn freshness_boundary_is_inclusive() {
    let fetched_at = UNIX_EPOCH + Duration::from_secs(1_700_000_000);
    let provenance = Provenance::fetched(fetched_at);
    let snapshot = sample_snapshot();

    let at_ttl = compute_at(&snapshot, &provenance, fetched_at + Duration::from_secs(20 * 60));
    assert!(at_ttl.fresh);
    assert_eq!(at_ttl.age, Some(Duration::from_secs(1200)));

    let past_ttl = compute_at(&snapshot, &provenance, fetched_at + Duration::from_secs(20 * 60 + 1));
    assert!(!past_ttl.fresh);
}

#[test]
fn never_fetched_is_not_fresh() {
    let report = compute_at(&sample_snapshot(), &Provenance::manual(), UNIX_EPOCH);
    assert!(!report.fresh);
    assert!(report.age.is_none());

    let zero = Provenance {
        tag: ProvenanceTag::Fetched,
        fetched_at: Some(0),
    };
    assert!(compute_at(&sample_snapshot(), &zero, UNIX_EPOCH).age.is_none());
}

#[test]
fn identical_inputs_give_identical_reports() {
    let now = UNIX_EPOCH + Duration::from_secs(1_700_000_300);
    let provenance = Provenance::fetched(UNIX_EPOCH + Duration::from_secs(1_700_000_000));
    let first = compute_at(&sample_snapshot(), &provenance, now);
    let second = compute_at(&sample_snapshot(), &provenance, now);

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_vec(&first).unwrap(),
        serde_json::to_vec(&second).unwrap()
    );
}

#[test]
fn sale_targets_are_minimal() {
    assert_eq!(required_sale_price(98, 0), 99);
    assert_eq!(required_sale_price(1, 0), 1);
    assert_eq!(required_sale_price(0, 0), 0);
    assert_eq!(required_sale_price(-50, 0), 0);

    let cost = 117_900;
    let sale = required_sale_price(cost, 1_000_000);
    assert!(sale - tax_on(sale) >= cost + 1_000_000);
    assert!((sale - 1) - tax_on(sale - 1) < cost + 1_000_000);
}

#[test]
fn absurd_inputs_saturate_instead_of_panicking() {
    let mut snapshot = PriceSnapshot::default();
    snapshot.ingredient_a = PriceTriple::flat(i64::MAX);
    snapshot.items[0].price = PriceTriple::flat(i64::MIN);
    let report = compute_at(&snapshot, &Provenance::manual(), UNIX_EPOCH);
    assert_eq!(report.ingredient_cost.avg, i64::MAX);
    assert_eq!(report.items[0].case(Tier::Avg).profit, i64::MIN);
}
