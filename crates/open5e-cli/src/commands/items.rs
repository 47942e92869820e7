use anyhow::Result;
use open5e_client::{Open5eApi, Sources};
use open5e_core::{MAGIC_ITEM_RARITIES, MAGIC_ITEM_TYPES};

use super::apply_sort;
use crate::cli::{MagicItemsArgs, OutputFormat};
use crate::output::{print_record, print_records};

const COLUMNS: &[&str] = &["slug", "name", "type", "rarity", "requires_attunement", "document__slug"];

pub async fn list(
    api: &Open5eApi,
    sources: &Sources,
    args: &MagicItemsArgs,
    format: OutputFormat,
) -> Result<()> {
    warn_unknown(args);
    let items = api.filtered_magic_items(sources, &args.filter()).await?;
    print_records(&apply_sort(items, &args.sort), COLUMNS, format)
}

pub async fn show(api: &Open5eApi, slug: &str, format: OutputFormat) -> Result<()> {
    print_record(&api.magic_item(slug).await?, format)
}

/// Values outside the known vocabularies are still sent through the filter.
fn warn_unknown(args: &MagicItemsArgs) {
    if let Some(rarity) = args.rarity.as_deref()
        && !is_known(&MAGIC_ITEM_RARITIES, rarity)
    {
        tracing::warn!(rarity, known = ?MAGIC_ITEM_RARITIES, "unrecognized rarity");
    }
    if let Some(item_type) = args.item_type.as_deref()
        && !is_known(&MAGIC_ITEM_TYPES, item_type)
    {
        tracing::warn!(item_type, known = ?MAGIC_ITEM_TYPES, "unrecognized item type");
    }
}

fn is_known(vocabulary: &[&str], value: &str) -> bool {
    value.is_empty() || vocabulary.iter().any(|v| v.eq_ignore_ascii_case(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_known() {
        assert!(is_known(&MAGIC_ITEM_RARITIES, "Very Rare"));
        assert!(is_known(&MAGIC_ITEM_RARITIES, ""));
        assert!(!is_known(&MAGIC_ITEM_RARITIES, "mythic"));
        assert!(is_known(&MAGIC_ITEM_TYPES, "wondrous item"));
    }
}
