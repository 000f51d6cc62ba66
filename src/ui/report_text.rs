//! Plain-text rendering of a [`Report`], shared by the dashboard and the
//! one-shot `report` command.

use crate::domain::{
    format_gp, CraftedItemReport, PriceTriple, ProvenanceTag, Report, Tier, TierAmounts,
    FRESHNESS_TTL, INGREDIENT_A_NAME, INGREDIENT_A_QTY, INGREDIENT_B_NAME, INGREDIENT_B_QTY,
    TARGET_PROFIT, TAX_PERCENT,
};
use crate::util::{format_age, format_unix_time};

/// How a line should be emphasised; the dashboard maps this to colours.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tone {
    Plain,
    Heading,
    Muted,
    Good,
    Bad,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportLine {
    pub text: String,
    pub tone: Tone,
}

impl ReportLine {
    fn new(tone: Tone, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tone,
        }
    }
}

pub fn render_report(report: &Report) -> Vec<ReportLine> {
    let mut lines = Vec::new();

    lines.push(provenance_line(report));
    lines.push(ReportLine::new(Tone::Plain, ""));

    lines.push(ReportLine::new(
        Tone::Heading,
        format!("{:<28}{:>15}{:>15}{:>15}", "Ingredients", "low", "avg", "high"),
    ));
    lines.push(triple_row(
        &format!("{INGREDIENT_A_NAME} x{INGREDIENT_A_QTY}"),
        &report.ingredient_a,
    ));
    lines.push(triple_row(
        &format!("{INGREDIENT_B_NAME} x{INGREDIENT_B_QTY}"),
        &report.ingredient_b,
    ));
    lines.push(amounts_row("Cost per craft", &report.ingredient_cost, Tone::Plain));
    lines.push(amounts_row("Break-even sale", &report.break_even_sale, Tone::Muted));
    lines.push(amounts_row(
        &format!("Sale for {} profit", format_gp(TARGET_PROFIT)),
        &report.target_sale,
        Tone::Muted,
    ));

    for item in &report.items {
        lines.push(ReportLine::new(Tone::Plain, ""));
        lines.extend(item_lines(item));
    }

    lines.push(ReportLine::new(Tone::Plain, ""));
    lines.push(ReportLine::new(Tone::Heading, "Recommendations"));
    lines.push(match &report.best_by_avg_profit {
        Some(rec) => ReportLine::new(
            tone_for(rec.value),
            format!("  Best avg profit: {} ({} gp)", rec.name, format_gp(rec.value)),
        ),
        None => ReportLine::new(Tone::Muted, "  Best avg profit: no crafted items"),
    });
    lines.push(match &report.best_by_high_sale {
        Some(rec) => ReportLine::new(
            Tone::Plain,
            format!("  Highest sale:    {} ({} gp high)", rec.name, format_gp(rec.value)),
        ),
        None => ReportLine::new(Tone::Muted, "  Highest sale:    no crafted items"),
    });

    lines
}

/// Joins the rendered lines, for printing outside the dashboard.
pub fn render_report_string(report: &Report) -> String {
    render_report(report)
        .into_iter()
        .map(|line| line.text)
        .collect::<Vec<_>>()
        .join("\n")
}

fn provenance_line(report: &Report) -> ReportLine {
    let mode = match report.provenance.tag {
        ProvenanceTag::Fetched => "FETCHED",
        ProvenanceTag::Manual => "MANUAL",
    };

    match (report.provenance.fetched_at, report.age) {
        (Some(secs), Some(age)) => {
            let freshness = if report.fresh { "fresh" } else { "stale" };
            ReportLine::new(
                if report.fresh { Tone::Good } else { Tone::Bad },
                format!(
                    "Mode: {mode} | {freshness} (age {}, TTL {}) | fetched {}",
                    format_age(age),
                    format_age(FRESHNESS_TTL),
                    format_unix_time(secs)
                ),
            )
        }
        _ => ReportLine::new(Tone::Muted, format!("Mode: {mode} | never fetched")),
    }
}

fn item_lines(item: &CraftedItemReport) -> Vec<ReportLine> {
    let mut lines = vec![ReportLine::new(
        Tone::Heading,
        format!("{} (id {})", item.name, item.external_id),
    )];

    for tier in Tier::ALL {
        let case = item.case(tier);
        let outcome = if case.profit >= 0 {
            format!("profit {}", format_gp(case.profit))
        } else {
            format!("loss {}", format_gp(case.profit.saturating_neg()))
        };
        lines.push(ReportLine::new(
            tone_for(case.profit),
            format!(
                "  {:<5} sale {:>14} | tax ({TAX_PERCENT}%) {:>12} | net {:>14} | {outcome}",
                tier.label(),
                format_gp(case.sale_price),
                format_gp(case.tax_paid),
                format_gp(case.net_after_tax),
            ),
        ));
    }

    lines.push(ReportLine::new(
        Tone::Muted,
        format!(
            "  best: {} ({} gp)",
            item.best_case.tier.label(),
            format_gp(item.best_case.profit)
        ),
    ));
    lines
}

fn triple_row(label: &str, triple: &PriceTriple) -> ReportLine {
    ReportLine::new(
        Tone::Plain,
        format!(
            "{:<28}{:>15}{:>15}{:>15}",
            label,
            format_gp(triple.low),
            format_gp(triple.avg),
            format_gp(triple.high)
        ),
    )
}

fn amounts_row(label: &str, amounts: &TierAmounts, tone: Tone) -> ReportLine {
    ReportLine::new(
        tone,
        format!(
            "{:<28}{:>15}{:>15}{:>15}",
            label,
            format_gp(amounts.low),
            format_gp(amounts.avg),
            format_gp(amounts.high)
        ),
    )
}

fn tone_for(profit: i64) -> Tone {
    if profit >= 0 {
        Tone::Good
    } else {
        Tone::Bad
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{compute_at, PriceSnapshot, Provenance};
    use std::time::{Duration, UNIX_EPOCH};

    #[test]
    fn manual_report_mentions_never_fetched() {
        let report = compute_at(&PriceSnapshot::default(), &Provenance::manual(), UNIX_EPOCH);
        let text = render_report_string(&report);
        assert!(text.starts_with("Mode: MANUAL | never fetched"));
        assert!(text.contains("Oathplate helm (id 30750)"));
        assert!(text.contains("Best avg profit: Oathplate helm"));
    }

    #[test]
    fn losses_are_labelled() {
        let mut snapshot = PriceSnapshot::default();
        snapshot.ingredient_a = PriceTriple::flat(1_000);
        let report = compute_at(&snapshot, &Provenance::manual(), UNIX_EPOCH);
        let lines = render_report(&report);
        let low_line = lines
            .iter()
            .find(|line| line.text.trim_start().starts_with("low"))
            .unwrap();
        assert!(low_line.text.ends_with("loss 2,520,000"));
        assert_eq!(low_line.tone, Tone::Bad);
    }

    #[test]
    fn fetched_report_shows_freshness() {
        let fetched = UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        let report = compute_at(
            &PriceSnapshot::default(),
            &Provenance::fetched(fetched),
            fetched + Duration::from_secs(180),
        );
        let first = &render_report(&report)[0];
        assert_eq!(first.tone, Tone::Good);
        assert_eq!(
            first.text,
            "Mode: FETCHED | fresh (age 3m, TTL 20m) | fetched 2023-11-14 22:13:20 UTC"
        );
    }
}
