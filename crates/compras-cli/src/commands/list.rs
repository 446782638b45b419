//! List command - manage shopping lists.

use clap::{Args, Subcommand};
use console::style;
use rust_decimal::Decimal;

use compras_core::models::ShoppingList;
use compras_core::{format_brl_amount, Store};

use super::{item_index, plain_amount, to_csv, Context, OutputFormat};

/// Arguments for the list command.
#[derive(Args)]
pub struct ListArgs {
    #[command(subcommand)]
    command: ListCommand,
}

#[derive(Subcommand)]
enum ListCommand {
    /// Create an empty list
    Create {
        /// List name
        name: String,
    },

    /// Delete a list and its items
    Delete {
        /// List name
        name: String,
    },

    /// Show all lists
    Ls,

    /// Show the items of a list
    Show {
        /// List name
        name: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Mark items as picked
    Check {
        /// List name
        name: String,
        /// Item numbers, as shown by `list show`
        #[arg(required = true)]
        items: Vec<usize>,
    },

    /// Unmark items
    Uncheck {
        /// List name
        name: String,
        /// Item numbers, as shown by `list show`
        #[arg(required = true)]
        items: Vec<usize>,
    },

    /// Mark every item as picked
    CheckAll {
        /// List name
        name: String,
    },

    /// Remove picked items
    ClearChecked {
        /// List name
        name: String,
    },

    /// Change an item's category and remember it for that product
    SetCategory {
        /// List name
        name: String,
        /// Item number, as shown by `list show`
        item: usize,
        /// New category
        category: String,
    },
}

pub fn run(args: ListArgs, ctx: &Context) -> anyhow::Result<()> {
    let (_, storage, mut store) = ctx.open_store()?;

    match args.command {
        ListCommand::Create { name } => {
            let name = store.create_list(&name)?;
            storage.save(&store)?;
            println!("{} Created list '{}'", style("✓").green(), name);
        }
        ListCommand::Delete { name } => {
            let removed = store.delete_list(&name)?;
            storage.save(&store)?;
            println!(
                "{} Deleted list '{}' ({} items)",
                style("✓").green(),
                name,
                removed.len()
            );
        }
        ListCommand::Ls => {
            if store.lists.is_empty() {
                println!("No lists yet. Run 'compras list create <NAME>' to start one.");
            }
            for (name, items) in &store.lists {
                let picked = items.iter().filter(|i| i.checked).count();
                println!(
                    "{}  {}/{} picked  {}",
                    style(name).bold(),
                    picked,
                    items.len(),
                    format_brl_amount(store.checked_total(name)?)
                );
            }
        }
        ListCommand::Show { name, format } => {
            let items = store.list(&name)?;
            print!("{}", format_list(&name, items, format)?);
        }
        ListCommand::Check { name, items } => {
            set_checked(&mut store, &name, &items, true)?;
            storage.save(&store)?;
            print_checked_total(&store, &name)?;
        }
        ListCommand::Uncheck { name, items } => {
            set_checked(&mut store, &name, &items, false)?;
            storage.save(&store)?;
            print_checked_total(&store, &name)?;
        }
        ListCommand::CheckAll { name } => {
            store.check_all(&name)?;
            storage.save(&store)?;
            print_checked_total(&store, &name)?;
        }
        ListCommand::ClearChecked { name } => {
            let removed = store.clear_checked(&name)?;
            storage.save(&store)?;
            println!(
                "{} Removed {} picked items from '{}'",
                style("✓").green(),
                removed,
                name
            );
        }
        ListCommand::SetCategory {
            name,
            item,
            category,
        } => {
            let index = item_index(item)?;
            store.set_item_category(&name, index, &category)?;
            storage.save(&store)?;
            let product = &store.list(&name)?[index].product_name;
            println!(
                "{} {} is now in {}",
                style("✓").green(),
                product,
                style(category.trim().to_lowercase()).cyan()
            );
        }
    }

    Ok(())
}

fn set_checked(
    store: &mut Store,
    name: &str,
    items: &[usize],
    checked: bool,
) -> anyhow::Result<()> {
    for &number in items {
        store.set_checked(name, item_index(number)?, checked)?;
    }
    Ok(())
}

fn print_checked_total(store: &Store, name: &str) -> anyhow::Result<()> {
    println!(
        "{} Picked total for '{}': {}",
        style("✓").green(),
        name,
        format_brl_amount(store.checked_total(name)?)
    );
    Ok(())
}

fn format_list(name: &str, items: &ShoppingList, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string_pretty(items)?)),
        OutputFormat::Csv => to_csv(
            &["item", "product", "category", "price", "checked"],
            items.iter().enumerate().map(|(i, item)| {
                vec![
                    (i + 1).to_string(),
                    item.product_name.clone(),
                    item.category.clone(),
                    plain_amount(item.price),
                    item.checked.to_string(),
                ]
            }),
        ),
        OutputFormat::Text => {
            let mut output = format!("{}\n", style(name).bold());
            if items.is_empty() {
                output.push_str("  (empty)\n");
            }
            for (i, item) in items.iter().enumerate() {
                let mark = if item.checked { "[x]" } else { "[ ]" };
                output.push_str(&format!(
                    "{:>3}. {} {:<40} {:<12} {:>14}\n",
                    i + 1,
                    mark,
                    item.product_name,
                    item.category,
                    format_brl_amount(item.price)
                ));
            }
            let picked: Decimal = items.iter().filter(|i| i.checked).map(|i| i.price).sum();
            let total: Decimal = items.iter().map(|i| i.price).sum();
            output.push_str(&format!(
                "\nPicked: {}  of  {}\n",
                format_brl_amount(picked),
                format_brl_amount(total)
            ));
            Ok(output)
        }
    }
}
