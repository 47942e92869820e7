use anyhow::Result;
use open5e_client::{Open5eApi, Sources};

use super::apply_sort;
use crate::cli::{OutputFormat, SpellsArgs};
use crate::output::{print_record, print_records, print_spell_groups};

const COLUMNS: &[&str] = &["slug", "name", "level", "school", "dnd_class", "document__slug"];

/// With `--class`, prints the class's spells grouped by level instead of a flat list.
pub async fn list(
    api: &Open5eApi,
    sources: &Sources,
    args: &SpellsArgs,
    format: OutputFormat,
) -> Result<()> {
    if let Some(class_name) = &args.class_name {
        let groups = api.spells_by_class(sources, class_name).await?;
        return print_spell_groups(&groups, format);
    }
    let spells = api.spells(sources).await?;
    print_records(&apply_sort(spells, &args.sort), COLUMNS, format)
}

pub async fn show(api: &Open5eApi, slug: &str, format: OutputFormat) -> Result<()> {
    print_record(&api.spell(slug).await?, format)
}
