//! Import command - scrape a receipt into a shopping list.

use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use compras_core::{format_brl_amount, qr, ImportOutcome, Importer, ReceiptExtractor};

use super::Context;

/// Arguments for the import command.
#[derive(Args)]
pub struct ImportArgs {
    /// Receipt URL (the address in the NFC-e QR code)
    #[arg(required_unless_present = "qr", conflicts_with = "qr")]
    url: Option<String>,

    /// Read the receipt URL from a photo of the QR code
    #[arg(long, value_name = "IMAGE")]
    qr: Option<PathBuf>,

    /// Shopping list that receives the items
    #[arg(short, long)]
    list: String,
}

pub fn run(args: ImportArgs, ctx: &Context) -> anyhow::Result<()> {
    let (config, storage, mut store) = ctx.open_store()?;

    let url = match (args.url, args.qr) {
        (Some(url), _) => url,
        (None, Some(image)) => {
            let url = qr::decode_url(&image)?;
            println!("{} Receipt URL: {}", style("ℹ").blue(), url);
            url
        }
        (None, None) => anyhow::bail!("Provide a receipt URL or --qr IMAGE"),
    };

    let extractor = ReceiptExtractor::from_config(&config)?;
    let importer = Importer::new(&extractor, &storage, &config.categories);

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(120));
    pb.set_message("Fetching receipt...");

    let result = importer.import(&mut store, &url, &args.list);
    pb.finish_and_clear();

    match result? {
        ImportOutcome::Imported {
            purchase_id,
            store_name,
            item_count,
        } => {
            info!("Stored purchase {}", purchase_id);
            let total = store
                .history
                .last()
                .map(|p| p.total())
                .unwrap_or_default();
            println!(
                "{} Imported {} items from {} into '{}' ({})",
                style("✓").green(),
                item_count,
                style(&store_name).bold(),
                args.list,
                format_brl_amount(total)
            );
        }
        ImportOutcome::AlreadyImported { .. } => {
            eprintln!(
                "{} This receipt was already imported; nothing changed.",
                style("⚠").yellow()
            );
        }
    }

    Ok(())
}
