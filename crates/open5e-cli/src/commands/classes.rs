use anyhow::Result;
use colored::Colorize;
use open5e_client::{Open5eApi, Sources};

use super::apply_sort;
use crate::cli::{OutputFormat, SortArgs};
use crate::output::{print_record, print_records};

const COLUMNS: &[&str] = &["slug", "name", "hit_dice", "spellcasting_ability", "document__slug"];

pub async fn list(
    api: &Open5eApi,
    sources: &Sources,
    args: &SortArgs,
    format: OutputFormat,
) -> Result<()> {
    let classes = api.classes(sources).await?;
    print_records(&apply_sort(classes, args), COLUMNS, format)
}

pub async fn show(api: &Open5eApi, slug: &str, format: OutputFormat) -> Result<()> {
    let class = api.class(slug).await?;
    print_record(&class, format)?;
    if matches!(format, OutputFormat::Table) && !class.archetypes.is_empty() {
        let label = if class.subtypes_name.is_empty() {
            "Archetypes"
        } else {
            class.subtypes_name.as_str()
        };
        println!("{}:", label.cyan());
        for archetype in &class.archetypes {
            println!("  {} ({})", archetype.name, archetype.slug.dimmed());
        }
    }
    Ok(())
}

pub async fn archetype(
    api: &Open5eApi,
    class_slug: &str,
    slug: &str,
    format: OutputFormat,
) -> Result<()> {
    print_record(&api.archetype(class_slug, slug).await?, format)
}
