//! Backgrounds, rules sections, documents and search.

use anyhow::Result;
use open5e_client::{Open5eApi, Sources};

use super::apply_sort;
use crate::cli::{OutputFormat, SortArgs};
use crate::output::{print_record, print_records};

pub async fn backgrounds(
    api: &Open5eApi,
    sources: &Sources,
    args: &SortArgs,
    format: OutputFormat,
) -> Result<()> {
    let backgrounds = api.backgrounds(sources).await?;
    print_records(
        &apply_sort(backgrounds, args),
        &["slug", "name", "skill_proficiencies", "document__slug"],
        format,
    )
}

pub async fn background(api: &Open5eApi, slug: &str, format: OutputFormat) -> Result<()> {
    print_record(&api.background(slug).await?, format)
}

pub async fn sections(
    api: &Open5eApi,
    sources: &Sources,
    args: &SortArgs,
    format: OutputFormat,
) -> Result<()> {
    let sections = api.sections(sources).await?;
    print_records(
        &apply_sort(sections, args),
        &["slug", "name", "parent", "document__slug"],
        format,
    )
}

pub async fn section(api: &Open5eApi, slug: &str, format: OutputFormat) -> Result<()> {
    print_record(&api.section(slug).await?, format)
}

/// Documents are listed regardless of the source selection.
pub async fn documents(api: &Open5eApi, args: &SortArgs, format: OutputFormat) -> Result<()> {
    let documents = api.documents().await?;
    print_records(
        &apply_sort(documents, args),
        &["slug", "title", "organization", "version"],
        format,
    )
}

pub async fn document(api: &Open5eApi, slug: &str, format: OutputFormat) -> Result<()> {
    print_record(&api.document(slug).await?, format)
}

pub async fn search(
    api: &Open5eApi,
    sources: &Sources,
    text: &str,
    format: OutputFormat,
) -> Result<()> {
    let results = api.search(text, sources).await?;
    print_records(&results, &["name", "route", "slug", "document_title"], format)
}
