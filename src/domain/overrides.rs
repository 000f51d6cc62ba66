//! Single-field edits to a [`PriceSnapshot`].
//!
//! Field paths keep the string form edit callers already send
//! (`ingredientA`, `item2.high`, `armor1.avg`), but are parsed into a closed
//! [`FieldPath`] before anything is touched. Provenance is left to the caller.

use std::{fmt, str::FromStr};

use thiserror::Error;

use super::snapshot::{PriceSnapshot, PriceTriple};

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("unknown field {0:?}; use ingredientA, ingredientB or item1..item3 with optional .high/.low/.avg")]
    UnknownField(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldTarget {
    IngredientA,
    IngredientB,
    /// Zero-based crafted item slot.
    Item(usize),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Component {
    High,
    Low,
    Avg,
}

/// A target plus an optional component; no component means "all three".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FieldPath {
    pub target: FieldTarget,
    pub component: Option<Component>,
}

impl FieldPath {
    pub fn new(target: FieldTarget, component: Option<Component>) -> Self {
        Self { target, component }
    }

    pub fn parse(raw: &str) -> Result<Self, FieldError> {
        let unknown = || FieldError::UnknownField(raw.to_string());
        let lowered = raw.trim().to_ascii_lowercase();

        let (target_part, component_part) = match lowered.split_once('.') {
            Some((target, component)) => (target, Some(component)),
            None => (lowered.as_str(), None),
        };

        let target = match target_part {
            "ingredienta" | "shale" => FieldTarget::IngredientA,
            "ingredientb" | "shard" => FieldTarget::IngredientB,
            other => {
                let slot = other
                    .strip_prefix("item")
                    .or_else(|| other.strip_prefix("armor"))
                    .ok_or_else(unknown)?;
                match slot {
                    "1" => FieldTarget::Item(0),
                    "2" => FieldTarget::Item(1),
                    "3" => FieldTarget::Item(2),
                    _ => return Err(unknown()),
                }
            }
        };

        let component = match component_part {
            None => None,
            Some("high") => Some(Component::High),
            Some("low") => Some(Component::Low),
            Some("avg") => Some(Component::Avg),
            Some(_) => return Err(unknown()),
        };

        Ok(Self { target, component })
    }
}

impl FromStr for FieldPath {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.target {
            FieldTarget::IngredientA => write!(f, "ingredientA")?,
            FieldTarget::IngredientB => write!(f, "ingredientB")?,
            FieldTarget::Item(slot) => write!(f, "item{}", slot + 1)?,
        }
        match self.component {
            Some(Component::High) => write!(f, ".high"),
            Some(Component::Low) => write!(f, ".low"),
            Some(Component::Avg) => write!(f, ".avg"),
            None => Ok(()),
        }
    }
}

/// Parses `field` and applies `value` to the snapshot.
pub fn apply_field(snapshot: &mut PriceSnapshot, field: &str, value: i64) -> Result<(), FieldError> {
    let path = FieldPath::parse(field)?;
    apply_path(snapshot, path, value)
}

/// Applies `value` at an already-parsed path. Item targets fail without
/// touching the snapshot unless all crafted item slots are present.
pub fn apply_path(snapshot: &mut PriceSnapshot, path: FieldPath, value: i64) -> Result<(), FieldError> {
    if matches!(path.target, FieldTarget::Item(_)) && !snapshot.has_full_item_list() {
        return Err(FieldError::UnknownField(path.to_string()));
    }

    let triple = match path.target {
        FieldTarget::IngredientA => &mut snapshot.ingredient_a,
        FieldTarget::IngredientB => &mut snapshot.ingredient_b,
        FieldTarget::Item(slot) => match snapshot.items.get_mut(slot) {
            Some(item) => &mut item.price,
            None => return Err(FieldError::UnknownField(path.to_string())),
        },
    };

    set_component(triple, path.component, value);
    Ok(())
}

fn set_component(triple: &mut PriceTriple, component: Option<Component>, value: i64) {
    match component {
        Some(Component::High) => triple.high = value,
        Some(Component::Low) => triple.low = value,
        Some(Component::Avg) => triple.avg = value,
        None => *triple = PriceTriple::flat(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_canonical_and_legacy_names() {
        assert_eq!(
            FieldPath::parse("ingredientA").unwrap(),
            FieldPath::new(FieldTarget::IngredientA, None)
        );
        assert_eq!(
            FieldPath::parse("shard.low").unwrap(),
            FieldPath::new(FieldTarget::IngredientB, Some(Component::Low))
        );
        assert_eq!(
            FieldPath::parse("ARMOR3.Avg").unwrap(),
            FieldPath::new(FieldTarget::Item(2), Some(Component::Avg))
        );
        assert_eq!(
            "item1.high".parse::<FieldPath>().unwrap(),
            FieldPath::new(FieldTarget::Item(0), Some(Component::High))
        );
    }

    #[test]
    fn rejects_unknown_targets_and_components() {
        for raw in ["ingredientC", "item0", "item4", "item", "ingredientA.mid", "item1.", "item1.high.low", ""] {
            assert!(
                matches!(FieldPath::parse(raw), Err(FieldError::UnknownField(_))),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn display_round_trips_canonical_form() {
        let path = FieldPath::new(FieldTarget::Item(1), Some(Component::High));
        assert_eq!(path.to_string(), "item2.high");
        assert_eq!(FieldPath::parse(&path.to_string()).unwrap(), path);
    }

    #[test]
    fn missing_slot_leaves_snapshot_alone() {
        let mut snapshot = PriceSnapshot::default();
        snapshot.items.truncate(2);
        let before = snapshot.clone();
        for field in ["item1", "item2.high", "item3"] {
            assert!(matches!(
                apply_field(&mut snapshot, field, 10),
                Err(FieldError::UnknownField(_))
            ));
        }
        assert_eq!(snapshot, before);
        assert!(apply_field(&mut snapshot, "ingredientA", 10).is_ok());
    }

    #[test]
    fn component_edit_keeps_siblings() {
        let mut snapshot = PriceSnapshot::default();
        apply_field(&mut snapshot, "item2", 400).unwrap();
        apply_field(&mut snapshot, "item2.low", 350).unwrap();
        assert_eq!(
            snapshot.items[1].price,
            PriceTriple {
                high: 400,
                low: 350,
                avg: 400
            }
        );
    }
}
