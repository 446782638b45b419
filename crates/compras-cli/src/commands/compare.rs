//! Compare command - prices of one product across purchases.

use clap::Args;
use console::style;

use compras_core::{format_brl_amount, PriceObservation};

use super::{plain_amount, to_csv, Context, OutputFormat};

/// Arguments for the compare command.
#[derive(Args)]
pub struct CompareArgs {
    /// Product name (case-insensitive); omit to list known products
    product: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

pub fn run(args: CompareArgs, ctx: &Context) -> anyhow::Result<()> {
    let (_, _, store) = ctx.open_store()?;

    let Some(product) = args.product else {
        for name in store.products() {
            println!("{}", name);
        }
        return Ok(());
    };

    let observations = store.price_comparison(&product);
    if observations.is_empty() {
        anyhow::bail!("No purchases of {} found", product.trim().to_uppercase());
    }

    print!("{}", format_prices(&product, &observations, args.format)?);
    Ok(())
}

fn format_prices(
    product: &str,
    observations: &[PriceObservation],
    format: OutputFormat,
) -> anyhow::Result<String> {
    let date = |o: &PriceObservation| {
        o.timestamp
            .map(|ts| ts.format("%d/%m/%Y").to_string())
            .unwrap_or_else(|| "-".to_string())
    };

    match format {
        OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string_pretty(observations)?)),
        OutputFormat::Csv => to_csv(
            &["store", "date", "price"],
            observations
                .iter()
                .map(|o| vec![o.store_name.clone(), date(o), plain_amount(o.price)]),
        ),
        OutputFormat::Text => {
            let mut output = format!("{}\n", style(product.trim().to_uppercase()).bold());
            for (i, o) in observations.iter().enumerate() {
                let marker = if i == 0 { style("cheapest").green().to_string() } else { String::new() };
                output.push_str(&format!(
                    "  {:<40} {:<10} {:>14}  {}\n",
                    o.store_name,
                    date(o),
                    format_brl_amount(o.price),
                    marker
                ));
            }
            Ok(output)
        }
    }
}
