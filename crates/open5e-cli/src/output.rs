use anyhow::Result;
use colored::Colorize;
use open5e_client::{ClientError, ErrorSignal};
use open5e_core::{
    Ability, FieldAccess, FieldValue, Monster, SpellLevelGroup, format_challenge_rating,
    format_modifier,
};
use serde::Serialize;
use serde_json::{Map, Value};
use tabled::builder::Builder;
use tabled::settings::Style;

use crate::cli::OutputFormat;

pub fn print_value(value: &Value, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(value)?);
        }
        OutputFormat::Table => print_as_table(value),
    }
    Ok(())
}

/// Prints a record list, as JSON or as a table of `columns`.
pub fn print_records<T>(records: &[T], columns: &[&str], format: OutputFormat) -> Result<()>
where
    T: Serialize + FieldAccess,
{
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(records)?);
        }
        OutputFormat::Table => {
            if records.is_empty() {
                println!("No results found.");
                return Ok(());
            }
            println!("{}", records_table(records, columns));
            println!("Total: {}", records.len());
        }
    }
    Ok(())
}

/// Prints a single record; tables show its top-level scalar members.
pub fn print_record<T: Serialize>(record: &T, format: OutputFormat) -> Result<()> {
    print_value(&serde_json::to_value(record)?, format)
}

pub fn print_monster(monster: &Monster, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_record(monster, format),
        OutputFormat::Table => {
            println!("{}", stat_block(monster));
            Ok(())
        }
    }
}

pub fn print_spell_groups(groups: &[SpellLevelGroup], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(groups)?);
        }
        OutputFormat::Table => {
            if groups.is_empty() {
                println!("No spells found.");
                return Ok(());
            }
            for group in groups {
                println!("{} ({})", group.label.cyan().bold(), group.spells.len());
                for spell in &group.spells {
                    println!("  {}  {}", spell.name, spell.school.dimmed());
                }
            }
        }
    }
    Ok(())
}

pub fn print_success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Error signal for the terminal: points the user at the likely cause.
#[derive(Debug, Clone, Copy, Default)]
pub struct CliSignal;

impl ErrorSignal for CliSignal {
    fn raise(&self, error: &ClientError) {
        tracing::debug!(error = %error, "lookup failed");
        if error.is_not_found() {
            eprintln!(
                "{} {}",
                "hint:".yellow(),
                "check the slug and the active sources (`open5e sources show`)"
            );
        }
    }
}

fn records_table<T: FieldAccess>(records: &[T], columns: &[&str]) -> String {
    let mut builder = Builder::default();
    builder.push_record(columns.iter().copied());
    for record in records {
        builder.push_record(columns.iter().map(|c| render_field(record.field(c))));
    }
    builder.build().with(Style::rounded()).to_string()
}

fn render_field(value: Option<FieldValue<'_>>) -> String {
    match value {
        Some(FieldValue::Text("")) | None => "-".to_string(),
        Some(FieldValue::Text(s)) => s.to_string(),
        Some(FieldValue::Number(n)) if n.fract() == 0.0 => format!("{n:.0}"),
        Some(FieldValue::Number(n)) => n.to_string(),
        Some(FieldValue::Bool(true)) => "yes".to_string(),
        Some(FieldValue::Bool(false)) => "no".to_string(),
    }
}

fn print_as_table(value: &Value) {
    let Some(object) = value.as_object() else {
        println!("{value}");
        return;
    };
    let mut rows = Vec::new();
    flatten_members("", object, &mut rows);
    let mut builder = Builder::default();
    for row in rows {
        builder.push_record(row);
    }
    println!("{}", builder.build().with(Style::rounded()));
}

/// Scalar members as `[key, value]` rows; nested objects use dotted keys.
fn flatten_members(prefix: &str, object: &Map<String, Value>, rows: &mut Vec<[String; 2]>) {
    for (key, member) in object {
        let key = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        let rendered = match member {
            Value::String(s) if s.is_empty() => continue,
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Array(items) if items.is_empty() => continue,
            Value::Array(items) if items.iter().all(Value::is_string) => items
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(", "),
            Value::Array(items) => format!("[{} items]", items.len()),
            Value::Object(nested) => {
                flatten_members(&key, nested, rows);
                continue;
            }
            Value::Null => continue,
        };
        rows.push([key, rendered]);
    }
}

fn stat_block(monster: &Monster) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", monster.name.bold()));
    let mut kind = format!("{} {}", monster.size, monster.monster_type.to_lowercase());
    if !monster.subtype.is_empty() {
        kind.push_str(&format!(" ({})", monster.subtype));
    }
    if !monster.alignment.is_empty() {
        kind.push_str(&format!(", {}", monster.alignment));
    }
    out.push_str(&format!("{}\n", kind.italic()));
    out.push_str(&format!("{} {}\n", "Armor Class".cyan(), monster.armor_class));
    out.push_str(&format!(
        "{} {} ({})\n",
        "Hit Points".cyan(),
        monster.hit_points,
        monster.hit_dice
    ));

    let mut builder = Builder::default();
    builder.push_record(Ability::ALL.iter().map(|a| a.abbreviation().to_string()));
    builder.push_record(Ability::ALL.iter().map(|a| {
        let score = monster.ability_score(*a);
        format!("{score} ({})", format_modifier(score))
    }));
    out.push_str(&format!("{}\n", builder.build().with(Style::rounded())));

    out.push_str(&format!(
        "{} {}",
        "Challenge".cyan(),
        format_challenge_rating(monster.cr)
    ));
    out
}
