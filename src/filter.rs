//! Filter criteria and the compound row predicate.
//!
//! A row survives only when every clause passes. Threshold clauses treat an
//! absent value as failing: a rating that is unknown cannot be known to sit
//! under the bound, so the row is excluded rather than waved through.

use std::collections::BTreeSet;

use clap::ValueEnum;
use serde::Serialize;

use crate::{
    aggregate::{self, Aggregates},
    data::{Availability, Dataset, PriceRange, Restaurant},
};

/// Tri-state service requirement: `Any` imposes no constraint, `Yes`/`No`
/// demand an exact availability match (absent availability never matches).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ValueEnum)]
pub enum Requirement {
    Any,
    Yes,
    No,
}

impl Requirement {
    pub fn admits(self, value: Option<Availability>) -> bool {
        match self {
            Requirement::Any => true,
            Requirement::Yes => value == Some(Availability::Yes),
            Requirement::No => value == Some(Availability::No),
        }
    }
}

/// The complete user selection at one point in time, independent of the
/// dataset. Rebuilt fresh on every interaction; never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCriteria {
    /// Case-insensitive substring for the restaurant name; empty means
    /// no constraint.
    pub name_query: String,
    /// Allowed price categories. An empty set matches no row at all; that
    /// is membership in the empty set, not "no filter".
    pub price_categories: BTreeSet<PriceRange>,
    /// Inclusive upper bound on the average rating.
    pub max_rating: f64,
    /// Inclusive upper bound on delivery minutes.
    pub max_delivery_minutes: f64,
    /// Inclusive upper bound on pickup minutes.
    pub max_pickup_minutes: f64,
    pub pickup_requirement: Requirement,
    pub delivery_requirement: Requirement,
}

impl FilterCriteria {
    /// The "no constraints" selection for a given table: every observed
    /// price category, bounds at the observed maxima (rating at least the
    /// 5.0 slider ceiling), no name query, no service requirements.
    pub fn unrestricted(dataset: &Dataset) -> Self {
        Self {
            name_query: String::new(),
            price_categories: dataset.observed_price_categories(),
            max_rating: dataset.max_rating().max(5.0),
            max_delivery_minutes: dataset.max_delivery_minutes(),
            max_pickup_minutes: dataset.max_pickup_minutes(),
            pickup_requirement: Requirement::Any,
            delivery_requirement: Requirement::Any,
        }
    }

    /// Conjunction of the seven filter clauses.
    pub fn matches(&self, row: &Restaurant) -> bool {
        within(row.average_rating, self.max_rating)
            && row
                .price_range
                .is_some_and(|price| self.price_categories.contains(&price))
            && within(row.delivery_minutes, self.max_delivery_minutes)
            && within(row.pickup_minutes, self.max_pickup_minutes)
            && self.pickup_requirement.admits(row.pickup_available)
            && self.delivery_requirement.admits(row.delivery_available)
            && self.name_matches(row)
    }

    fn name_matches(&self, row: &Restaurant) -> bool {
        if self.name_query.is_empty() {
            return true;
        }
        let needle = self.name_query.to_lowercase();
        row.name
            .as_deref()
            .is_some_and(|name| name.to_lowercase().contains(&needle))
    }
}

fn within(value: Option<f64>, bound: f64) -> bool {
    value.is_some_and(|v| v <= bound)
}

/// Runs the filter-and-aggregate pipeline: the surviving subset plus the
/// summary statistics derived from it. Pure and deterministic; the dataset
/// is only read.
pub fn apply<'a>(
    dataset: &'a Dataset,
    criteria: &FilterCriteria,
) -> (Vec<&'a Restaurant>, Aggregates) {
    let subset: Vec<&Restaurant> = dataset
        .rows
        .iter()
        .filter(|row| criteria.matches(row))
        .collect();
    let aggregates = aggregate::summarize(&subset);
    (subset, aggregates)
}
