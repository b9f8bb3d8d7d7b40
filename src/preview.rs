//! The `preview` command: first rows of the normalized table, after
//! coercion and invalid-row removal but before any filtering.

use anyhow::Result;
use log::info;

use crate::{cli::PreviewArgs, data::Restaurant, loader, table};

pub fn execute(args: &PreviewArgs) -> Result<()> {
    let delimiter = loader::resolve_input_delimiter(&args.input.input, args.input.delimiter);
    let encoding = loader::resolve_encoding(args.input.input_encoding.as_deref())?;
    let dataset = loader::load_cached(&args.input.input, delimiter, encoding)?;

    let headers = [
        "name",
        "latitude",
        "longitude",
        "rating",
        "price",
        "pickup",
        "delivery",
        "delivery (min)",
        "pickup (min)",
        "address",
    ]
    .map(String::from)
    .to_vec();

    let rows = dataset
        .rows
        .iter()
        .take(args.rows)
        .map(preview_row)
        .collect::<Vec<_>>();
    table::print_table(&headers, &rows);

    info!(
        "Displayed {} of {} normalized row(s) from {:?}",
        rows.len(),
        dataset.len(),
        args.input.input
    );
    Ok(())
}

fn preview_row(row: &Restaurant) -> Vec<String> {
    vec![
        row.name.clone().unwrap_or_default(),
        format!("{:.5}", row.latitude),
        format!("{:.5}", row.longitude),
        row.average_rating
            .map(|r| format!("{r:.1}"))
            .unwrap_or_default(),
        row.price_range.map(|p| p.to_string()).unwrap_or_default(),
        row.pickup_available
            .map(|a| a.to_string())
            .unwrap_or_default(),
        row.delivery_available
            .map(|a| a.to_string())
            .unwrap_or_default(),
        row.delivery_minutes
            .map(|m| format!("{m:.0}"))
            .unwrap_or_default(),
        row.pickup_minutes
            .map(|m| format!("{m:.0}"))
            .unwrap_or_default(),
        row.display_address.clone().unwrap_or_default(),
    ]
}
