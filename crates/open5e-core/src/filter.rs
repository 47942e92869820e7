//! In-memory filters over fetched collections.
//!
//! Filters never fail: unset fields skip their predicate, and an empty
//! collection filters to an empty collection.

use serde::{Deserialize, Serialize};

use crate::models::{MagicItem, Monster};

pub const MAGIC_ITEM_RARITIES: [&str; 5] = ["Common", "Uncommon", "Rare", "Very Rare", "Legendary"];

pub const MAGIC_ITEM_TYPES: [&str; 9] = [
    "Armor",
    "Potion",
    "Ring",
    "Rod",
    "Scroll",
    "Staff",
    "Wand",
    "Weapon",
    "Wondrous Item",
];

/// Inclusive numeric range. A missing low bound is 0, a missing high bound
/// is unbounded. A range with neither bound set matches everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RangeFilter {
    pub low: Option<f64>,
    pub high: Option<f64>,
}

impl RangeFilter {
    pub fn new(low: Option<f64>, high: Option<f64>) -> Self {
        Self { low, high }
    }

    pub fn between(low: f64, high: f64) -> Self {
        Self::new(Some(low), Some(high))
    }

    pub fn is_unset(&self) -> bool {
        self.low.is_none() && self.high.is_none()
    }

    pub fn contains(&self, value: f64) -> bool {
        if self.is_unset() {
            return true;
        }
        let low = self.low.unwrap_or(0.0);
        let high = self.high.unwrap_or(f64::INFINITY);
        value >= low && value <= high
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonsterFilter {
    pub name: Option<String>,
    pub cr: RangeFilter,
    pub hit_points: RangeFilter,
    pub size: Option<String>,
    #[serde(rename = "type")]
    pub monster_type: Option<String>,
}

impl MonsterFilter {
    pub fn matches(&self, monster: &Monster) -> bool {
        contains_ci(&monster.name, self.name.as_deref())
            && self.cr.contains(monster.cr)
            && self.hit_points.contains(monster.hit_points as f64)
            && contains_ci(&monster.size, self.size.as_deref())
            && contains_ci(&monster.monster_type, self.monster_type.as_deref())
    }
}

/// Returns the monsters matching every set predicate of `filter`.
pub fn filter_monsters(monsters: &[Monster], filter: &MonsterFilter) -> Vec<Monster> {
    let matched: Vec<Monster> = monsters
        .iter()
        .filter(|m| filter.matches(m))
        .cloned()
        .collect();
    tracing::trace!(total = monsters.len(), matched = matched.len(), "filtered monsters");
    matched
}

/// Magic item filter. Empty strings behave like unset fields, so
/// `MagicItemFilter::default()` is the pass-everything filter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MagicItemFilter {
    /// Name contains, case-insensitive.
    pub name: Option<String>,
    pub rarity: Option<String>,
    #[serde(rename = "type")]
    pub item_type: Option<String>,
    pub requires_attunement: Option<bool>,
}

impl MagicItemFilter {
    /// Rarity is checked twice, once as a case-insensitive substring and once
    /// for exact equality; the stricter check decides.
    ///
    /// The attunement predicate only ever removes items that require
    /// attunement when the caller asked for items that do not. Items without
    /// an attunement requirement always pass, even when
    /// `requires_attunement == Some(true)`. Both behaviours are kept as the
    /// service's web client shipped them; they look unintended.
    pub fn matches(&self, item: &MagicItem) -> bool {
        if !contains_ci(&item.name, self.name.as_deref()) {
            return false;
        }
        if let Some(rarity) = non_empty(self.rarity.as_deref())
            && !(contains_ci(&item.rarity, Some(rarity)) && item.rarity == rarity)
        {
            return false;
        }
        if let Some(item_type) = non_empty(self.item_type.as_deref())
            && item.item_type != item_type
        {
            return false;
        }
        if let Some(wanted) = self.requires_attunement {
            let requires = item.requires_attunement();
            if !((requires && wanted) || !requires) {
                return false;
            }
        }
        true
    }
}

pub fn filter_magic_items(items: &[MagicItem], filter: &MagicItemFilter) -> Vec<MagicItem> {
    let matched: Vec<MagicItem> = items
        .iter()
        .filter(|i| filter.matches(i))
        .cloned()
        .collect();
    tracing::trace!(total = items.len(), matched = matched.len(), "filtered magic items");
    matched
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Case-insensitive substring match; an unset or empty needle matches.
pub(crate) fn contains_ci(haystack: &str, needle: Option<&str>) -> bool {
    match non_empty(needle) {
        Some(needle) => haystack.to_lowercase().contains(&needle.to_lowercase()),
        None => true,
    }
}
