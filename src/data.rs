use std::collections::BTreeSet;
use std::fmt;

use clap::ValueEnum;
use serde::Serialize;

/// Four-level price category mapped from the dataset's raw `$` tier symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, ValueEnum)]
pub enum PriceRange {
    Budget,
    #[serde(rename = "Mid-range")]
    MidRange,
    Expensive,
    Luxury,
}

impl PriceRange {
    pub const ALL: [PriceRange; 4] = [
        PriceRange::Budget,
        PriceRange::MidRange,
        PriceRange::Expensive,
        PriceRange::Luxury,
    ];

    /// Maps a raw tier symbol (`$` through `$$$$`) to a category.
    /// Anything outside the known symbol set maps to `None`.
    pub fn from_tier_symbol(raw: &str) -> Option<Self> {
        match raw.trim() {
            "$" => Some(PriceRange::Budget),
            "$$" => Some(PriceRange::MidRange),
            "$$$" => Some(PriceRange::Expensive),
            "$$$$" => Some(PriceRange::Luxury),
            _ => None,
        }
    }
}

impl fmt::Display for PriceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PriceRange::Budget => "Budget",
            PriceRange::MidRange => "Mid-range",
            PriceRange::Expensive => "Expensive",
            PriceRange::Luxury => "Luxury",
        };
        write!(f, "{label}")
    }
}

/// Boolean-like service availability flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Availability {
    Yes,
    No,
}

impl Availability {
    /// Strict boolean mapping: only `true`/`false` (ASCII case-insensitive)
    /// produce a value. Anything else is absent, never defaulted to `No`.
    pub fn from_bool_str(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case("true") {
            Some(Availability::Yes)
        } else if trimmed.eq_ignore_ascii_case("false") {
            Some(Availability::No)
        } else {
            None
        }
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Availability::Yes => write!(f, "Yes"),
            Availability::No => write!(f, "No"),
        }
    }
}

/// One normalized row of the restaurant dataset. Latitude and longitude are
/// always present; every other field may be absent after coercion.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    pub name: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub average_rating: Option<f64>,
    pub price_range: Option<PriceRange>,
    #[serde(rename = "asapPickupAvailable")]
    pub pickup_available: Option<Availability>,
    #[serde(rename = "asapDeliveryAvailable")]
    pub delivery_available: Option<Availability>,
    #[serde(rename = "asapDeliveryTimeMinutes")]
    pub delivery_minutes: Option<f64>,
    #[serde(rename = "asapPickupMinutes")]
    pub pickup_minutes: Option<f64>,
    pub display_address: Option<String>,
}

/// The normalized table: built once per source file, then read-only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub rows: Vec<Restaurant>,
}

impl Dataset {
    pub fn new(rows: Vec<Restaurant>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Largest observed rating, or 0 when no row has one.
    pub fn max_rating(&self) -> f64 {
        field_max(self.rows.iter().filter_map(|r| r.average_rating))
    }

    /// Largest observed delivery time in minutes, or 0 when no row has one.
    pub fn max_delivery_minutes(&self) -> f64 {
        field_max(self.rows.iter().filter_map(|r| r.delivery_minutes))
    }

    /// Largest observed pickup time in minutes, or 0 when no row has one.
    pub fn max_pickup_minutes(&self) -> f64 {
        field_max(self.rows.iter().filter_map(|r| r.pickup_minutes))
    }

    /// Price categories that occur at least once, in tier order.
    pub fn observed_price_categories(&self) -> BTreeSet<PriceRange> {
        self.rows.iter().filter_map(|r| r.price_range).collect()
    }
}

fn field_max(values: impl Iterator<Item = f64>) -> f64 {
    values.fold(0.0_f64, f64::max)
}

/// Coerces a raw cell to a finite float. Empty, unparsable, and non-finite
/// inputs all become absent rather than zero.
pub fn parse_optional_f64(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Passes text through unchanged, except that blank cells become absent.
pub fn parse_optional_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
