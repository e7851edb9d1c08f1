/// Inventory accumulation and selling for caught fish
use std::collections::BTreeMap;

use super::catalog::{Catalog, QualityTier};
use super::errors::FishingError;
use super::types::FishCatch;

/// What a sell request targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SellTarget {
    /// Every fish in the bag.
    All,
    /// Every fish of one quality.
    Quality(QualityTier),
    /// The first entry with this exact name.
    Name(String),
}

impl SellTarget {
    /// `all` or `*` sells everything; a quality id or display name sells that tier;
    /// anything else is treated as a fish name.
    pub fn parse(input: &str, catalog: &Catalog) -> SellTarget {
        let trimmed = input.trim();
        if trimmed.eq_ignore_ascii_case("all") || trimmed == "*" {
            return SellTarget::All;
        }
        match catalog.parse_quality(trimmed) {
            Some(tier) => SellTarget::Quality(tier),
            None => SellTarget::Name(trimmed.to_string()),
        }
    }
}

/// Merge a new catch into an inventory. Entries with the same name and quality stack by
/// total length, not by count.
pub fn merge(inventory: &mut Vec<FishCatch>, catch: FishCatch) {
    if let Some(existing) = inventory.iter_mut().find(|f| f.same_kind(&catch)) {
        existing.length = existing.length.saturating_add(catch.length);
    } else {
        inventory.push(catch);
    }
}

/// Sale price of one entry.
pub fn price_of(fish: &FishCatch, catalog: &Catalog) -> f64 {
    f64::from(fish.length) * catalog.price(fish.quality)
}

/// Remove the targeted entries and return them with their total price.
pub fn sell(
    inventory: &mut Vec<FishCatch>,
    target: &SellTarget,
    catalog: &Catalog,
) -> Result<(Vec<FishCatch>, f64), FishingError> {
    if inventory.is_empty() {
        return Err(FishingError::EmptyInventory);
    }
    let removed = match target {
        SellTarget::All => std::mem::take(inventory),
        SellTarget::Quality(tier) => {
            let (sold, kept): (Vec<FishCatch>, Vec<FishCatch>) =
                inventory.drain(..).partition(|f| f.quality == *tier);
            *inventory = kept;
            sold
        }
        SellTarget::Name(name) => {
            let idx = inventory
                .iter()
                .position(|f| f.name == *name)
                .ok_or_else(|| FishingError::UnknownQualityOrName(name.clone()))?;
            vec![inventory.remove(idx)]
        }
    };
    let price = removed.iter().map(|f| price_of(f, catalog)).sum();
    Ok((removed, price))
}

/// Group entries by quality; every tier is present, possibly empty.
pub fn group_by_quality(inventory: &[FishCatch]) -> BTreeMap<QualityTier, Vec<FishCatch>> {
    let mut grouped: BTreeMap<QualityTier, Vec<FishCatch>> = QualityTier::ALL
        .into_iter()
        .map(|tier| (tier, Vec::new()))
        .collect();
    for fish in inventory {
        grouped.entry(fish.quality).or_default().push(fish.clone());
    }
    grouped
}

/// Compact one-line-per-tier listing, e.g. `Common: Grass Carp (25cm), Fish (3cm)`.
pub fn format_inventory_compact(inventory: &[FishCatch], catalog: &Catalog) -> String {
    if inventory.is_empty() {
        return "Your bag is empty.".to_string();
    }
    let mut lines = Vec::new();
    for (tier, fishes) in group_by_quality(inventory) {
        if fishes.is_empty() {
            continue;
        }
        let items: Vec<String> = fishes
            .iter()
            .map(|f| format!("{} ({}cm)", f.name, f.length))
            .collect();
        lines.push(format!("{}: {}", catalog.display(tier), items.join(", ")));
    }
    lines.join("\n")
}
