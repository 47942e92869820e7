use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use open5e_core::{MagicItemFilter, MonsterFilter, RangeFilter, SortDirection};

#[derive(Parser)]
#[command(name = "open5e")]
#[command(about = "Browse Open5e reference data from the command line")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API base URL (overrides config and OPEN5E__API__URL)
    #[arg(short, long, global = true)]
    pub api_url: Option<String>,

    /// Path to a TOML config file
    #[arg(short, long, global = true, env = "OPEN5E_CONFIG")]
    pub config: Option<PathBuf>,

    /// Document slugs to query for this command only (comma-separated)
    #[arg(short, long, global = true, value_delimiter = ',')]
    pub sources: Option<Vec<String>>,

    /// Output format
    #[arg(short, long, global = true)]
    pub format: Option<OutputFormat>,
}

#[derive(Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Table,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List monsters, optionally filtered
    Monsters(MonstersArgs),
    /// Show a monster stat block
    Monster(SlugArgs),
    /// List spells, grouped by level when --class is given
    Spells(SpellsArgs),
    /// Show a spell
    Spell(SlugArgs),
    /// List magic items, optionally filtered
    MagicItems(MagicItemsArgs),
    /// Show a magic item
    MagicItem(SlugArgs),
    /// List backgrounds
    Backgrounds(SortArgs),
    /// Show a background
    Background(SlugArgs),
    /// List classes
    Classes(SortArgs),
    /// Show a class and its archetypes
    Class(SlugArgs),
    /// Show one archetype of a class
    Archetype(ArchetypeArgs),
    /// List rules sections
    Sections(SortArgs),
    /// Show a rules section
    Section(SlugArgs),
    /// List all documents (sourcebooks)
    Documents(SortArgs),
    /// Show a document
    Document(SlugArgs),
    /// Full-text search
    Search(SearchArgs),
    /// Manage the persisted source selection
    Sources(SourcesArgs),
    /// Inspect CLI configuration
    Config(ConfigArgs),
}

#[derive(clap::Args)]
pub struct SlugArgs {
    /// Record slug (e.g. goblin, fireball)
    pub slug: String,
}

#[derive(clap::Args, Clone)]
pub struct SortArgs {
    /// Field to sort by (e.g. name, cr, hit_points, level_int)
    #[arg(long)]
    pub sort: Option<String>,
    /// Sort direction: asc or desc
    #[arg(long, default_value = "asc")]
    pub order: SortDirection,
}

#[derive(clap::Args)]
pub struct MonstersArgs {
    /// Name contains (case-insensitive)
    #[arg(long)]
    pub name: Option<String>,
    /// Minimum challenge rating
    #[arg(long)]
    pub cr_min: Option<f64>,
    /// Maximum challenge rating
    #[arg(long)]
    pub cr_max: Option<f64>,
    /// Minimum hit points
    #[arg(long)]
    pub hp_min: Option<f64>,
    /// Maximum hit points
    #[arg(long)]
    pub hp_max: Option<f64>,
    /// Size contains (e.g. large)
    #[arg(long)]
    pub size: Option<String>,
    /// Type contains (e.g. dragon)
    #[arg(long = "type")]
    pub monster_type: Option<String>,
    #[command(flatten)]
    pub sort: SortArgs,
}

impl MonstersArgs {
    pub fn filter(&self) -> MonsterFilter {
        MonsterFilter {
            name: self.name.clone(),
            cr: RangeFilter::new(self.cr_min, self.cr_max),
            hit_points: RangeFilter::new(self.hp_min, self.hp_max),
            size: self.size.clone(),
            monster_type: self.monster_type.clone(),
        }
    }
}

#[derive(clap::Args)]
pub struct SpellsArgs {
    /// Group the spells of this class by level; groups are always in level order
    #[arg(long = "class", conflicts_with = "sort")]
    pub class_name: Option<String>,
    #[command(flatten)]
    pub sort: SortArgs,
}

#[derive(clap::Args)]
pub struct MagicItemsArgs {
    /// Name contains (case-insensitive)
    #[arg(long)]
    pub name: Option<String>,
    /// Rarity (e.g. uncommon, very rare)
    #[arg(long)]
    pub rarity: Option<String>,
    /// Exact item type (e.g. "Wondrous item")
    #[arg(long = "type")]
    pub item_type: Option<String>,
    /// Attunement filter; `false` hides items that require attunement
    #[arg(long)]
    pub attunement: Option<bool>,
    #[command(flatten)]
    pub sort: SortArgs,
}

impl MagicItemsArgs {
    pub fn filter(&self) -> MagicItemFilter {
        MagicItemFilter {
            name: self.name.clone(),
            rarity: self.rarity.clone(),
            item_type: self.item_type.clone(),
            requires_attunement: self.attunement,
        }
    }
}

#[derive(clap::Args)]
pub struct ArchetypeArgs {
    /// Class slug (e.g. wizard)
    pub class: String,
    /// Archetype slug (e.g. school-of-evocation)
    pub slug: String,
}

#[derive(clap::Args)]
pub struct SearchArgs {
    /// Text to search for
    pub text: String,
}

#[derive(clap::Args)]
pub struct SourcesArgs {
    #[command(subcommand)]
    pub command: SourcesCommands,
}

#[derive(Subcommand)]
pub enum SourcesCommands {
    /// Show the current selection
    Show,
    /// Replace the selection
    Set {
        /// Document slugs
        #[arg(required = true, value_delimiter = ',')]
        slugs: Vec<String>,
    },
    /// Add a document to the selection
    Add { slug: String },
    /// Remove a document from the selection
    Remove { slug: String },
}

#[derive(clap::Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,
}
