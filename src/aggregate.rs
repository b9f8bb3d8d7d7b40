//! Summary statistics over a filtered subset.
//!
//! Every aggregate tolerates an empty subset and absent fields: means are
//! taken over present values only, and a row with unusable data for one
//! aggregate is excluded from that aggregate alone.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::data::{Availability, PriceRange, Restaurant};

/// Map view anchor when the subset is empty: the dataset's home city
/// centroid (Houston).
pub const DEFAULT_MAP_CENTER: MapCenter = MapCenter {
    latitude: 29.76,
    longitude: -95.36,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapCenter {
    pub latitude: f64,
    pub longitude: f64,
}

/// Frequency of service availability across a subset, including rows whose
/// flag could not be normalized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AvailabilityCounts {
    pub yes: usize,
    pub no: usize,
    pub unknown: usize,
}

impl AvailabilityCounts {
    fn tally(&mut self, value: Option<Availability>) {
        match value {
            Some(Availability::Yes) => self.yes += 1,
            Some(Availability::No) => self.no += 1,
            None => self.unknown += 1,
        }
    }
}

/// Derived statistics handed to the rendering layer alongside the subset.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Aggregates {
    pub count: usize,
    pub mean_rating: Option<f64>,
    pub mean_delivery_minutes: Option<f64>,
    pub mean_pickup_minutes: Option<f64>,
    pub pickup_availability: AvailabilityCounts,
    pub delivery_availability: AvailabilityCounts,
    /// Counts per price category present in the subset, in tier order.
    pub price_counts: BTreeMap<PriceRange, usize>,
    pub map_center: MapCenter,
}

/// Computes all aggregates in one pass over the subset.
pub fn summarize(subset: &[&Restaurant]) -> Aggregates {
    let mut rating = MeanAccumulator::default();
    let mut delivery = MeanAccumulator::default();
    let mut pickup = MeanAccumulator::default();
    let mut latitude = MeanAccumulator::default();
    let mut longitude = MeanAccumulator::default();
    let mut pickup_availability = AvailabilityCounts::default();
    let mut delivery_availability = AvailabilityCounts::default();
    let mut price_counts = BTreeMap::new();

    for row in subset {
        rating.push_optional(row.average_rating);
        delivery.push_optional(row.delivery_minutes);
        pickup.push_optional(row.pickup_minutes);
        latitude.push(row.latitude);
        longitude.push(row.longitude);
        pickup_availability.tally(row.pickup_available);
        delivery_availability.tally(row.delivery_available);
        if let Some(price) = row.price_range {
            *price_counts.entry(price).or_insert(0) += 1;
        }
    }

    let map_center = match (latitude.mean(), longitude.mean()) {
        (Some(latitude), Some(longitude)) => MapCenter {
            latitude,
            longitude,
        },
        _ => DEFAULT_MAP_CENTER,
    };

    Aggregates {
        count: subset.len(),
        mean_rating: rating.mean(),
        mean_delivery_minutes: delivery.mean(),
        mean_pickup_minutes: pickup.mean(),
        pickup_availability,
        delivery_availability,
        price_counts,
        map_center,
    }
}

/// Arithmetic mean over present values; absent values appear in neither the
/// numerator nor the denominator.
#[derive(Debug, Default)]
struct MeanAccumulator {
    sum: f64,
    count: usize,
}

impl MeanAccumulator {
    fn push(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    fn push_optional(&mut self, value: Option<f64>) {
        if let Some(value) = value {
            self.push(value);
        }
    }

    fn mean(&self) -> Option<f64> {
        if self.count > 0 {
            Some(self.sum / self.count as f64)
        } else {
            None
        }
    }
}
