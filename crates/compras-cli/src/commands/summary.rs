//! Summary command - monthly spending by category.

use chrono::Local;
use clap::Args;
use console::style;

use compras_core::{format_brl_amount, MonthlySummary};

use super::{plain_amount, to_csv, Context, OutputFormat};

/// Arguments for the summary command.
#[derive(Args)]
pub struct SummaryArgs {
    /// Month to summarize (YYYY-MM); defaults to the latest month with purchases
    #[arg(short, long)]
    month: Option<String>,

    /// List the months that have purchases
    #[arg(long, conflicts_with = "month")]
    months: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

pub fn run(args: SummaryArgs, ctx: &Context) -> anyhow::Result<()> {
    let (_, _, store) = ctx.open_store()?;

    if args.months {
        for month in store.months() {
            println!("{}", month);
        }
        return Ok(());
    }

    let month = match args.month {
        Some(month) => month,
        None => store
            .months()
            .iter()
            .max()
            .map(|m| m.to_string())
            .unwrap_or_else(|| Local::now().format("%Y-%m").to_string()),
    };

    let summary = store.monthly_summary(month.trim());
    print!("{}", format_summary(&summary, args.format)?);
    Ok(())
}

fn format_summary(summary: &MonthlySummary, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string_pretty(summary)?)),
        OutputFormat::Csv => to_csv(
            &["month", "category", "amount"],
            summary.by_category.iter().map(|(category, amount)| {
                vec![summary.month.clone(), category.clone(), plain_amount(*amount)]
            }),
        ),
        OutputFormat::Text => {
            let mut output = format!("{}\n", style(format!("Spending for {}", summary.month)).bold());

            if summary.purchase_count == 0 {
                output.push_str("  No purchases this month.\n");
                return Ok(output);
            }

            output.push_str("\nBy category:\n");
            for (category, amount) in &summary.by_category {
                output.push_str(&format!("  {:<20} {:>14}\n", category, format_brl_amount(*amount)));
            }

            output.push_str("\nTop products:\n");
            for (i, (product, amount)) in summary.top_products.iter().enumerate() {
                output.push_str(&format!(
                    "  {}. {:<37} {:>14}\n",
                    i + 1,
                    product,
                    format_brl_amount(*amount)
                ));
            }

            output.push_str(&format!(
                "\nTotal: {} in {} purchases\n",
                format_brl_amount(summary.total),
                summary.purchase_count
            ));
            Ok(output)
        }
    }
}
