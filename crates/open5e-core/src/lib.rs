pub mod display;
pub mod error;
pub mod filter;
pub mod models;
pub mod sort;
pub mod spells;

pub use display::{ability_modifier, format_challenge_rating, format_modifier};
pub use error::{CoreError, ErrorCategory, Result};
pub use filter::{
    MAGIC_ITEM_RARITIES, MAGIC_ITEM_TYPES, MagicItemFilter, MonsterFilter, RangeFilter,
    filter_magic_items, filter_monsters,
};
pub use models::{
    Ability, Archetype, Background, CharacterClass, Document, MagicItem, Monster, Record,
    RecordKind, SearchResult, Section, Spell, decode_list, decode_record,
};
pub use sort::{FieldAccess, FieldValue, SortDirection, sort_by_field};
pub use spells::{SPELL_LEVEL_LABELS, SpellLevelGroup, group_spells_by_level, level_label};
