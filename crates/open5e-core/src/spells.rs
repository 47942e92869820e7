use std::borrow::Cow;

use serde::Serialize;

use crate::filter::contains_ci;
use crate::models::Spell;

/// Level labels indexed by spell level.
pub const SPELL_LEVEL_LABELS: [&str; 10] = [
    "Cantrip",
    "1st-level",
    "2nd-level",
    "3rd-level",
    "4th-level",
    "5th-level",
    "6th-level",
    "7th-level",
    "8th-level",
    "9th-level",
];

pub fn level_label(level: i64) -> Cow<'static, str> {
    usize::try_from(level)
        .ok()
        .and_then(|idx| SPELL_LEVEL_LABELS.get(idx))
        .map(|label| Cow::Borrowed(*label))
        .unwrap_or_else(|| Cow::Owned(format!("Level {level}")))
}

/// Spells of one level, in the order they were fetched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpellLevelGroup {
    pub level: i64,
    pub label: Cow<'static, str>,
    pub spells: Vec<Spell>,
}

/// Spells castable by `class_name`, grouped by level in ascending order.
///
/// Class matching is a case-insensitive substring test against the
/// comma-joined `dnd_class` field. Within a group spells keep their input
/// order.
pub fn group_spells_by_level(spells: &[Spell], class_name: &str) -> Vec<SpellLevelGroup> {
    let mut castable: Vec<&Spell> = spells
        .iter()
        .filter(|s| contains_ci(&s.dnd_class, Some(class_name)))
        .collect();
    castable.sort_by_key(|s| s.level_int);

    let mut groups: Vec<SpellLevelGroup> = Vec::new();
    for spell in castable {
        match groups.last_mut() {
            Some(group) if group.level == spell.level_int => group.spells.push(spell.clone()),
            _ => groups.push(SpellLevelGroup {
                level: spell.level_int,
                label: level_label(spell.level_int),
                spells: vec![spell.clone()],
            }),
        }
    }
    tracing::trace!(class = class_name, groups = groups.len(), "grouped spells by level");
    groups
}
