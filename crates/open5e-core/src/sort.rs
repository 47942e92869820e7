//! Field-based sorting over records.

use std::cmp::Ordering;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{
    Archetype, Background, CharacterClass, Document, MagicItem, Monster, SearchResult, Section,
    Spell,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Ascending),
            "desc" | "descending" => Ok(Self::Descending),
            other => Err(format!("unknown sort direction: {other}")),
        }
    }
}

/// A field value that takes part in comparisons.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Number(f64),
    Text(&'a str),
    Bool(bool),
}

impl FieldValue<'_> {
    /// Values of different kinds, and NaN, are incomparable.
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a.partial_cmp(b),
            (Self::Text(a), Self::Text(b)) => Some(a.cmp(b)),
            (Self::Bool(a), Self::Bool(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl<'a> FieldValue<'a> {
    pub fn from_json(value: &'a Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_f64().map(Self::Number),
            Value::String(s) => Some(Self::Text(s)),
            Value::Bool(b) => Some(Self::Bool(*b)),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }
}

/// Named-field access used by [`sort_by_field`].
pub trait FieldAccess {
    fn field(&self, name: &str) -> Option<FieldValue<'_>>;
}

impl FieldAccess for Value {
    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        self.get(name).and_then(FieldValue::from_json)
    }
}

fn compare_field<T: FieldAccess>(a: &T, b: &T, field: &str) -> Ordering {
    match (a.field(field), b.field(field)) {
        (Some(a), Some(b)) => a.compare(&b).unwrap_or(Ordering::Equal),
        _ => Ordering::Equal,
    }
}

/// Returns a copy of `items` ordered by `field`.
///
/// The sort is stable. Records missing the field, or holding a value of a
/// different kind, compare equal to everything and keep their relative
/// order. Descending reverses the comparison, so ties still keep input
/// order.
pub fn sort_by_field<T: FieldAccess + Clone>(
    items: &[T],
    field: &str,
    direction: SortDirection,
) -> Vec<T> {
    let mut sorted = items.to_vec();
    sorted.sort_by(|a, b| {
        let ord = compare_field(a, b, field);
        match direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });
    sorted
}

macro_rules! field_access {
    (
        $ty:ty,
        text: [$($text:ident),* $(,)?],
        number: [$($num:ident),* $(,)?],
        renamed: [$($wire:literal => $field:ident),* $(,)?] $(,)?
    ) => {
        impl FieldAccess for $ty {
            fn field(&self, name: &str) -> Option<FieldValue<'_>> {
                match name {
                    $(stringify!($text) => Some(FieldValue::Text(&self.$text)),)*
                    $(stringify!($num) => Some(FieldValue::Number(self.$num as f64)),)*
                    $($wire => Some(FieldValue::Text(&self.$field)),)*
                    _ => self.extra.get(name).and_then(FieldValue::from_json),
                }
            }
        }
    };
}

field_access!(
    Monster,
    text: [slug, name, size, subtype, alignment, hit_dice, challenge_rating],
    number: [
        armor_class, hit_points, cr, strength, dexterity, constitution, intelligence, wisdom,
        charisma,
    ],
    renamed: ["type" => monster_type, "document__slug" => document_slug],
);

field_access!(
    Spell,
    text: [
        slug, name, desc, higher_level, range, components, material, ritual, duration,
        concentration, casting_time, level, school, dnd_class,
    ],
    number: [level_int],
    renamed: ["document__slug" => document_slug],
);

field_access!(
    MagicItem,
    text: [slug, name, desc, rarity, requires_attunement],
    number: [],
    renamed: ["type" => item_type, "document__slug" => document_slug],
);

field_access!(
    Background,
    text: [
        slug, name, desc, skill_proficiencies, tool_proficiencies, languages, equipment, feature,
        feature_desc,
    ],
    number: [],
    renamed: ["document__slug" => document_slug],
);

field_access!(
    Archetype,
    text: [slug, name, desc],
    number: [],
    renamed: ["document__slug" => document_slug],
);

field_access!(
    CharacterClass,
    text: [slug, name, desc, hit_dice, spellcasting_ability, subtypes_name],
    number: [],
    renamed: ["document__slug" => document_slug],
);

field_access!(
    Section,
    text: [slug, name, desc, parent],
    number: [],
    renamed: ["document__slug" => document_slug],
);

field_access!(
    Document,
    text: [slug, title, desc, license, author, organization, version, url],
    number: [],
    renamed: [],
);

field_access!(
    SearchResult,
    text: [slug, name, route, text, document_slug, document_title],
    number: [],
    renamed: [],
);
