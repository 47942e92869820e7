pub mod classes;
pub mod items;
pub mod monsters;
pub mod reference;
pub mod sources;
pub mod spells;

use open5e_core::{FieldAccess, sort_by_field};

use crate::cli::SortArgs;

/// Applies `--sort`/`--order`; without `--sort` the API order is kept.
pub(crate) fn apply_sort<T: FieldAccess + Clone>(records: Vec<T>, args: &SortArgs) -> Vec<T> {
    match &args.sort {
        Some(field) => sort_by_field(&records, field, args.order),
        None => records,
    }
}
