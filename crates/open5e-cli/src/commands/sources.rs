use anyhow::Result;
use colored::Colorize;
use open5e_client::{FileStore, SourceSelection, Sources};

use crate::cli::SourcesCommands;
use crate::output::print_success;

pub fn run(selection: &mut SourceSelection<FileStore>, command: &SourcesCommands) -> Result<()> {
    match command {
        SourcesCommands::Show => {
            let current = selection.current();
            if current.is_empty() {
                println!("{}: (none, all documents)", "Sources".cyan());
            } else {
                println!("{}: {}", "Sources".cyan(), current.joined());
            }
            println!(
                "{}: {}",
                "Store".cyan(),
                selection.store().path().display()
            );
        }
        SourcesCommands::Set { slugs } => {
            selection.set(Sources::new(slugs.clone()))?;
            print_success(&format!("Sources set to {}", selection.current().joined()));
        }
        SourcesCommands::Add { slug } => {
            if selection.add(slug)? {
                print_success(&format!("Added {slug}"));
            } else {
                println!("{slug} is already selected");
            }
        }
        SourcesCommands::Remove { slug } => {
            if selection.remove(slug)? {
                print_success(&format!("Removed {slug}"));
            } else {
                println!("{slug} is not selected");
            }
        }
    }
    Ok(())
}
