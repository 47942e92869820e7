//! Typed Open5e records.
//!
//! Every record decodes leniently: missing fields fall back to their
//! defaults and unknown fields are kept in `extra`, so an upstream schema
//! addition never breaks decoding.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{CoreError, Result};

/// Record kinds served by the API, with their endpoint names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Monster,
    Spell,
    MagicItem,
    Background,
    Class,
    Section,
    Document,
}

impl RecordKind {
    pub const ALL: [RecordKind; 7] = [
        Self::Monster,
        Self::Spell,
        Self::MagicItem,
        Self::Background,
        Self::Class,
        Self::Section,
        Self::Document,
    ];

    /// Path segment of the list/detail endpoint.
    pub fn endpoint(self) -> &'static str {
        match self {
            Self::Monster => "monsters",
            Self::Spell => "spells",
            Self::MagicItem => "magicitems",
            Self::Background => "backgrounds",
            Self::Class => "classes",
            Self::Section => "sections",
            Self::Document => "documents",
        }
    }

    /// Human-readable singular name.
    pub fn label(self) -> &'static str {
        match self {
            Self::Monster => "monster",
            Self::Spell => "spell",
            Self::MagicItem => "magic item",
            Self::Background => "background",
            Self::Class => "class",
            Self::Section => "section",
            Self::Document => "document",
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A typed record that can be decoded from an API response.
pub trait Record: DeserializeOwned + Serialize + Clone {
    const KIND: RecordKind;

    fn slug(&self) -> &str;

    fn name(&self) -> &str;

    /// Decode one record, tagging failures with the record kind.
    fn from_value(value: Value) -> Result<Self> {
        decode_record(value, Self::KIND.label())
    }
}

/// Decode `value` as `T`. `null` members are dropped first so they decode
/// as the field default.
pub fn decode_record<T: DeserializeOwned>(mut value: Value, kind: &'static str) -> Result<T> {
    strip_nulls(&mut value);
    serde_json::from_value(value).map_err(|e| CoreError::invalid_record(kind, e.to_string()))
}

fn strip_nulls(value: &mut Value) {
    match value {
        Value::Object(obj) => {
            obj.retain(|_, v| !v.is_null());
            obj.values_mut().for_each(strip_nulls);
        }
        Value::Array(items) => items.iter_mut().for_each(strip_nulls),
        _ => {}
    }
}

/// Decode a list response (`{count, next, previous, results}`) into records.
pub fn decode_list<T: Record>(value: Value) -> Result<Vec<T>> {
    let results = match value {
        Value::Object(mut obj) => obj.remove("results"),
        _ => None,
    };
    match results {
        Some(Value::Array(items)) => items.into_iter().map(T::from_value).collect(),
        Some(Value::Null) | None => Err(CoreError::missing_results(T::KIND.endpoint())),
        Some(other) => Err(CoreError::invalid_record(
            T::KIND.label(),
            format!("`results` is not an array: {other}"),
        )),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Monster {
    pub slug: String,
    pub name: String,
    pub size: String,
    #[serde(rename = "type")]
    pub monster_type: String,
    pub subtype: String,
    pub alignment: String,
    pub armor_class: i64,
    pub hit_points: i64,
    pub hit_dice: String,
    /// Challenge rating as a decimal (0.125, 0.25, 0.5, 1, ...).
    pub cr: f64,
    /// Challenge rating as display text ("1/8", "5").
    pub challenge_rating: String,
    pub strength: i64,
    pub dexterity: i64,
    pub constitution: i64,
    pub intelligence: i64,
    pub wisdom: i64,
    pub charisma: i64,
    #[serde(rename = "document__slug")]
    pub document_slug: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Monster {
    pub fn ability_score(&self, ability: Ability) -> i64 {
        match ability {
            Ability::Strength => self.strength,
            Ability::Dexterity => self.dexterity,
            Ability::Constitution => self.constitution,
            Ability::Intelligence => self.intelligence,
            Ability::Wisdom => self.wisdom,
            Ability::Charisma => self.charisma,
        }
    }
}

impl Record for Monster {
    const KIND: RecordKind = RecordKind::Monster;

    fn slug(&self) -> &str {
        &self.slug
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// The six ability scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ability {
    Strength,
    Dexterity,
    Constitution,
    Intelligence,
    Wisdom,
    Charisma,
}

impl Ability {
    pub const ALL: [Ability; 6] = [
        Self::Strength,
        Self::Dexterity,
        Self::Constitution,
        Self::Intelligence,
        Self::Wisdom,
        Self::Charisma,
    ];

    pub fn abbreviation(self) -> &'static str {
        match self {
            Self::Strength => "STR",
            Self::Dexterity => "DEX",
            Self::Constitution => "CON",
            Self::Intelligence => "INT",
            Self::Wisdom => "WIS",
            Self::Charisma => "CHA",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Spell {
    pub slug: String,
    pub name: String,
    pub desc: String,
    pub higher_level: String,
    pub range: String,
    pub components: String,
    pub material: String,
    pub ritual: String,
    pub duration: String,
    pub concentration: String,
    pub casting_time: String,
    /// Level as display text ("Cantrip", "3rd-level").
    pub level: String,
    #[serde(alias = "lvl")]
    pub level_int: i64,
    pub school: String,
    /// Comma-joined list of classes that can cast the spell.
    pub dnd_class: String,
    #[serde(rename = "document__slug")]
    pub document_slug: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Record for Spell {
    const KIND: RecordKind = RecordKind::Spell;

    fn slug(&self) -> &str {
        &self.slug
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MagicItem {
    pub slug: String,
    pub name: String,
    #[serde(rename = "type")]
    pub item_type: String,
    pub desc: String,
    pub rarity: String,
    /// Empty, or "requires attunement" optionally followed by a qualifier.
    pub requires_attunement: String,
    #[serde(rename = "document__slug")]
    pub document_slug: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MagicItem {
    pub fn requires_attunement(&self) -> bool {
        !self.requires_attunement.trim().is_empty()
    }
}

impl Record for MagicItem {
    const KIND: RecordKind = RecordKind::MagicItem;

    fn slug(&self) -> &str {
        &self.slug
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Background {
    pub slug: String,
    pub name: String,
    pub desc: String,
    pub skill_proficiencies: String,
    pub tool_proficiencies: String,
    pub languages: String,
    pub equipment: String,
    pub feature: String,
    pub feature_desc: String,
    #[serde(rename = "document__slug")]
    pub document_slug: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Record for Background {
    const KIND: RecordKind = RecordKind::Background;

    fn slug(&self) -> &str {
        &self.slug
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// A subclass nested under a class record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Archetype {
    pub slug: String,
    pub name: String,
    pub desc: String,
    #[serde(rename = "document__slug")]
    pub document_slug: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterClass {
    pub slug: String,
    pub name: String,
    pub desc: String,
    pub hit_dice: String,
    pub spellcasting_ability: String,
    pub subtypes_name: String,
    pub archetypes: Vec<Archetype>,
    #[serde(rename = "document__slug")]
    pub document_slug: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CharacterClass {
    pub fn archetype(&self, slug: &str) -> Option<&Archetype> {
        self.archetypes.iter().find(|a| a.slug == slug)
    }
}

impl Record for CharacterClass {
    const KIND: RecordKind = RecordKind::Class;

    fn slug(&self) -> &str {
        &self.slug
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Section {
    pub slug: String,
    pub name: String,
    pub desc: String,
    pub parent: String,
    #[serde(rename = "document__slug")]
    pub document_slug: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Record for Section {
    const KIND: RecordKind = RecordKind::Section;

    fn slug(&self) -> &str {
        &self.slug
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// A sourcebook. Its slug is what a source selection refers to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Document {
    pub slug: String,
    pub title: String,
    pub desc: String,
    pub license: String,
    pub author: String,
    pub organization: String,
    pub version: String,
    pub url: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Record for Document {
    const KIND: RecordKind = RecordKind::Document;

    fn slug(&self) -> &str {
        &self.slug
    }

    fn name(&self) -> &str {
        &self.title
    }
}

/// One hit of the full-text search endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchResult {
    pub slug: String,
    pub name: String,
    pub route: String,
    pub text: String,
    pub document_slug: String,
    pub document_title: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
