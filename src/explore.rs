//! The `explore` command: one full filter-and-aggregate pass over the
//! dataset, reported as ASCII tables.

use anyhow::Result;
use itertools::Itertools;
use log::info;

use crate::{
    aggregate::{Aggregates, AvailabilityCounts},
    cli::ExploreArgs,
    data::{Availability, Restaurant},
    filter, loader, table,
    theme::Theme,
};

pub fn execute(args: &ExploreArgs) -> Result<()> {
    let theme = match &args.theme {
        Some(path) => Theme::load(path)?,
        None => Theme::default(),
    };

    let delimiter = loader::resolve_input_delimiter(&args.input.input, args.input.delimiter);
    let encoding = loader::resolve_encoding(args.input.input_encoding.as_deref())?;
    let dataset = loader::load_cached(&args.input.input, delimiter, encoding)?;

    let criteria = args.filter.to_criteria(&dataset);
    let (subset, aggregates) = filter::apply(&dataset, &criteria);

    println!("{}", theme.title);
    println!();
    print_kpis(&theme, &aggregates);
    println!();
    print_availability(&theme, &aggregates);
    println!();
    print_price_counts(&theme, &aggregates);
    println!();
    print_map_view(&theme, &aggregates, args);

    if args.details {
        println!();
        print_details(&theme, &subset, args.limit);
    }

    info!(
        "Matched {} of {} restaurant(s) in {:?}",
        aggregates.count,
        dataset.len(),
        args.input.input
    );
    Ok(())
}

fn print_kpis(theme: &Theme, aggregates: &Aggregates) {
    let headers = vec!["metric".to_string(), "value".to_string()];
    let rows = vec![
        vec![theme.found_label.clone(), aggregates.count.to_string()],
        vec![
            theme.mean_rating_label.clone(),
            format_rating(theme, aggregates.mean_rating),
        ],
        vec![
            theme.mean_delivery_label.clone(),
            format_minutes(theme, aggregates.mean_delivery_minutes),
        ],
        vec![
            theme.mean_pickup_label.clone(),
            format_minutes(theme, aggregates.mean_pickup_minutes),
        ],
    ];
    table::print_table(&headers, &rows);
}

fn print_availability(theme: &Theme, aggregates: &Aggregates) {
    let headers = vec![
        "service".to_string(),
        theme.yes_label.clone(),
        theme.no_label.clone(),
        theme.unknown_label.clone(),
    ];
    let rows = vec![
        availability_row(&theme.pickup_caption, aggregates.pickup_availability),
        availability_row(&theme.delivery_caption, aggregates.delivery_availability),
    ];
    table::print_table(&headers, &rows);
}

fn availability_row(caption: &str, counts: AvailabilityCounts) -> Vec<String> {
    vec![
        caption.to_string(),
        counts.yes.to_string(),
        counts.no.to_string(),
        counts.unknown.to_string(),
    ]
}

fn print_price_counts(theme: &Theme, aggregates: &Aggregates) {
    let headers = vec![theme.price_caption.clone(), "count".to_string()];
    let rows = aggregates
        .price_counts
        .iter()
        .map(|(price, count)| vec![price.to_string(), count.to_string()])
        .collect::<Vec<_>>();
    if rows.is_empty() {
        table::print_table(&headers, &[vec![theme.no_data_label.clone(), "0".to_string()]]);
    } else {
        table::print_table(&headers, &rows);
    }
}

fn print_map_view(theme: &Theme, aggregates: &Aggregates, args: &ExploreArgs) {
    let headers = vec![
        theme.map_caption.clone(),
        "latitude".to_string(),
        "longitude".to_string(),
        "color".to_string(),
    ];
    let color = args.measure.point_color();
    let rows = vec![vec![
        args.measure.to_string(),
        format!("{:.4}", aggregates.map_center.latitude),
        format!("{:.4}", aggregates.map_center.longitude),
        format!("[{}]", color.iter().join(", ")),
    ]];
    table::print_table(&headers, &rows);
}

fn print_details(theme: &Theme, subset: &[&Restaurant], limit: usize) {
    let headers = vec![
        "name".to_string(),
        "rating".to_string(),
        "price".to_string(),
        theme.delivery_caption.clone(),
        theme.pickup_caption.clone(),
        "delivery (min)".to_string(),
        "pickup (min)".to_string(),
        "address".to_string(),
    ];
    let shown = if limit > 0 {
        subset.len().min(limit)
    } else {
        subset.len()
    };
    let rows = subset[..shown]
        .iter()
        .map(|row| detail_row(theme, row))
        .collect::<Vec<_>>();
    table::print_table(&headers, &rows);
}

fn detail_row(theme: &Theme, row: &Restaurant) -> Vec<String> {
    vec![
        row.name.clone().unwrap_or_default(),
        row.average_rating
            .map(|r| format!("{r:.1}"))
            .unwrap_or_default(),
        row.price_range.map(|p| p.to_string()).unwrap_or_default(),
        label_or_empty(theme, row.delivery_available),
        label_or_empty(theme, row.pickup_available),
        row.delivery_minutes
            .map(|m| format!("{m:.0}"))
            .unwrap_or_default(),
        row.pickup_minutes
            .map(|m| format!("{m:.0}"))
            .unwrap_or_default(),
        row.display_address.clone().unwrap_or_default(),
    ]
}

fn label_or_empty(theme: &Theme, value: Option<Availability>) -> String {
    match value {
        Some(value) => theme.availability_label(Some(value)).to_string(),
        None => String::new(),
    }
}

fn format_rating(theme: &Theme, mean: Option<f64>) -> String {
    match mean {
        Some(mean) => format!("{mean:.2}"),
        None => theme.no_data_label.clone(),
    }
}

fn format_minutes(theme: &Theme, mean: Option<f64>) -> String {
    match mean {
        Some(mean) => format!("{} {}", mean.trunc() as i64, theme.minutes_suffix),
        None => theme.no_data_label.clone(),
    }
}
