//! Category command - manage the category set.

use clap::{Args, Subcommand};
use console::style;

use compras_core::models::DEFAULT_CATEGORY;

use super::Context;

/// Arguments for the category command.
#[derive(Args)]
pub struct CategoryArgs {
    #[command(subcommand)]
    command: CategoryCommand,
}

#[derive(Subcommand)]
enum CategoryCommand {
    /// Show all categories
    Ls,

    /// Add a category
    Add {
        /// Category label (stored lowercase)
        label: String,
    },

    /// Remove a category; its items move to the default category
    Remove {
        /// Category label
        label: String,
    },
}

pub fn run(args: CategoryArgs, ctx: &Context) -> anyhow::Result<()> {
    let (_, storage, mut store) = ctx.open_store()?;

    match args.command {
        CategoryCommand::Ls => {
            for label in &store.categories {
                if label == DEFAULT_CATEGORY {
                    println!("{} {}", label, style("(default)").dim());
                } else {
                    println!("{}", label);
                }
            }
        }
        CategoryCommand::Add { label } => {
            if store.add_category(&label)? {
                storage.save(&store)?;
                println!(
                    "{} Added category {}",
                    style("✓").green(),
                    label.trim().to_lowercase()
                );
            } else {
                println!(
                    "{} Category {} already exists",
                    style("ℹ").blue(),
                    label.trim().to_lowercase()
                );
            }
        }
        CategoryCommand::Remove { label } => {
            let moved = store.remove_category(&label)?;
            storage.save(&store)?;
            println!(
                "{} Removed category {} ({} items moved to {})",
                style("✓").green(),
                label.trim().to_lowercase(),
                moved,
                DEFAULT_CATEGORY
            );
        }
    }

    Ok(())
}
