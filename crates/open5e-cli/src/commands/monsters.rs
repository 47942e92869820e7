use anyhow::Result;
use open5e_client::{Open5eApi, Sources};

use super::apply_sort;
use crate::cli::{MonstersArgs, OutputFormat};
use crate::output::{print_monster, print_records};

const COLUMNS: &[&str] = &[
    "slug",
    "name",
    "size",
    "type",
    "challenge_rating",
    "hit_points",
    "armor_class",
    "document__slug",
];

pub async fn list(
    api: &Open5eApi,
    sources: &Sources,
    args: &MonstersArgs,
    format: OutputFormat,
) -> Result<()> {
    let monsters = api.filtered_monsters(sources, &args.filter()).await?;
    print_records(&apply_sort(monsters, &args.sort), COLUMNS, format)
}

pub async fn show(api: &Open5eApi, slug: &str, format: OutputFormat) -> Result<()> {
    let monster = api.monster(slug).await?;
    print_monster(&monster, format)
}
