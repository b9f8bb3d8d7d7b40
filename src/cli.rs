use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::{
    data::{Dataset, PriceRange},
    filter::{FilterCriteria, Requirement},
    render::Measure,
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Explore restaurant datasets from the command line", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Filter the dataset and print aggregate statistics
    Explore(ExploreArgs),
    /// Emit the filtered rows and aggregates as render-ready JSON
    Export(ExportArgs),
    /// Preview the first rows of the normalized dataset
    Preview(PreviewArgs),
}

#[derive(Debug, Args)]
pub struct InputArgs {
    /// Input CSV file containing the restaurant dataset
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

/// Filter flags shared by `explore` and `export`; one invocation equals one
/// dashboard interaction.
#[derive(Debug, Args)]
pub struct FilterArgs {
    /// Case-insensitive substring to match against restaurant names
    #[arg(long = "name", default_value = "")]
    pub name_query: String,
    /// Price categories to keep (repeatable; defaults to every category observed in the data)
    #[arg(long = "price", value_enum, action = clap::ArgAction::Append)]
    pub prices: Vec<PriceRange>,
    /// Inclusive upper bound on the average rating
    #[arg(long = "max-rating", default_value_t = 5.0)]
    pub max_rating: f64,
    /// Inclusive upper bound on delivery minutes (defaults to the observed maximum)
    #[arg(long = "max-delivery-minutes")]
    pub max_delivery_minutes: Option<f64>,
    /// Inclusive upper bound on pickup minutes (defaults to the observed maximum)
    #[arg(long = "max-pickup-minutes")]
    pub max_pickup_minutes: Option<f64>,
    /// Pickup availability requirement
    #[arg(long = "pickup", value_enum, default_value = "any")]
    pub pickup: Requirement,
    /// Delivery availability requirement
    #[arg(long = "delivery", value_enum, default_value = "any")]
    pub delivery: Requirement,
}

impl FilterArgs {
    /// Builds criteria against a concrete table: omitted bounds fall back
    /// to the observed maxima and an omitted price list to every observed
    /// category, matching the dashboard's default control positions.
    pub fn to_criteria(&self, dataset: &Dataset) -> FilterCriteria {
        let price_categories = if self.prices.is_empty() {
            dataset.observed_price_categories()
        } else {
            self.prices.iter().copied().collect()
        };
        FilterCriteria {
            name_query: self.name_query.clone(),
            price_categories,
            max_rating: self.max_rating,
            max_delivery_minutes: self
                .max_delivery_minutes
                .unwrap_or_else(|| dataset.max_delivery_minutes()),
            max_pickup_minutes: self
                .max_pickup_minutes
                .unwrap_or_else(|| dataset.max_pickup_minutes()),
            pickup_requirement: self.pickup,
            delivery_requirement: self.delivery,
        }
    }
}

#[derive(Debug, Args)]
pub struct ExploreArgs {
    #[command(flatten)]
    pub input: InputArgs,
    #[command(flatten)]
    pub filter: FilterArgs,
    /// Measure used to scale map point radii
    #[arg(long, value_enum, default_value = "rating")]
    pub measure: Measure,
    /// Print the filtered rows as a detail table
    #[arg(long)]
    pub details: bool,
    /// Limit the number of detail rows printed (0 = all)
    #[arg(long, default_value_t = 0)]
    pub limit: usize,
    /// YAML file overriding the report labels
    #[arg(long)]
    pub theme: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    #[command(flatten)]
    pub input: InputArgs,
    #[command(flatten)]
    pub filter: FilterArgs,
    /// Measure used to scale map point radii
    #[arg(long, value_enum, default_value = "rating")]
    pub measure: Measure,
    /// Output JSON file (stdout if omitted)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// Pretty-print the JSON payload
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Debug, Args)]
pub struct PreviewArgs {
    #[command(flatten)]
    pub input: InputArgs,
    /// Number of normalized rows to display
    #[arg(long, default_value_t = 10)]
    pub rows: usize,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}
