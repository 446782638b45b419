//! History command - show imported purchases.

use clap::Args;

use compras_core::{format_brl_amount, HistoryEntry};

use super::{plain_amount, to_csv, Context, OutputFormat};

const DATE_FORMAT: &str = "%d/%m/%Y %H:%M";

/// Arguments for the history command.
#[derive(Args)]
pub struct HistoryArgs {
    /// Show only the most recent N purchases
    #[arg(short = 'n', long)]
    limit: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

pub fn run(args: HistoryArgs, ctx: &Context) -> anyhow::Result<()> {
    let (_, _, store) = ctx.open_store()?;

    let mut entries = store.history_newest_first();
    if let Some(limit) = args.limit {
        entries.truncate(limit);
    }

    print!("{}", format_history(&entries, args.format)?);
    Ok(())
}

fn format_history(entries: &[HistoryEntry<'_>], format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string_pretty(entries)?)),
        OutputFormat::Csv => to_csv(
            &["date", "month", "store", "items", "total", "url"],
            entries.iter().map(|e| {
                vec![
                    date(e),
                    e.purchase.month_key.clone(),
                    e.purchase.store_name.clone(),
                    e.purchase.items.len().to_string(),
                    plain_amount(e.total),
                    e.purchase.url.clone().unwrap_or_default(),
                ]
            }),
        ),
        OutputFormat::Text => {
            if entries.is_empty() {
                return Ok("No purchases imported yet.\n".to_string());
            }
            let mut output = String::new();
            for e in entries {
                output.push_str(&format!(
                    "{:<16}  {:<40} {:>3} items {:>14}\n",
                    date(e),
                    e.purchase.store_name,
                    e.purchase.items.len(),
                    format_brl_amount(e.total)
                ));
            }
            Ok(output)
        }
    }
}

fn date(entry: &HistoryEntry<'_>) -> String {
    entry
        .purchase
        .timestamp
        .map(|ts| ts.format(DATE_FORMAT).to_string())
        .unwrap_or_else(|| "-".to_string())
}
