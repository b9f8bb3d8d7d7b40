//! Algebraic properties of the filter/aggregate pipeline over generated
//! datasets and criteria.

use std::collections::BTreeSet;

use proptest::prelude::*;

use resto_explore::{
    aggregate::DEFAULT_MAP_CENTER,
    data::{Availability, Dataset, PriceRange, Restaurant},
    filter::{self, FilterCriteria, Requirement},
};

fn price_strategy() -> impl Strategy<Value = PriceRange> {
    prop_oneof![
        Just(PriceRange::Budget),
        Just(PriceRange::MidRange),
        Just(PriceRange::Expensive),
        Just(PriceRange::Luxury),
    ]
}

fn availability_strategy() -> impl Strategy<Value = Availability> {
    prop_oneof![Just(Availability::Yes), Just(Availability::No)]
}

fn requirement_strategy() -> impl Strategy<Value = Requirement> {
    prop_oneof![
        Just(Requirement::Any),
        Just(Requirement::Yes),
        Just(Requirement::No),
    ]
}

fn restaurant_strategy() -> impl Strategy<Value = Restaurant> {
    (
        proptest::option::of("[A-Za-z ]{1,16}"),
        29.5..30.0f64,
        -95.8..-95.0f64,
        proptest::option::of(0.0..5.0f64),
        proptest::option::of(price_strategy()),
        proptest::option::of(availability_strategy()),
        proptest::option::of(availability_strategy()),
        proptest::option::of(0.0..90.0f64),
        proptest::option::of(0.0..45.0f64),
        proptest::option::of("[A-Za-z0-9 ]{1,20}"),
    )
        .prop_map(
            |(
                name,
                latitude,
                longitude,
                average_rating,
                price_range,
                pickup_available,
                delivery_available,
                delivery_minutes,
                pickup_minutes,
                display_address,
            )| Restaurant {
                name,
                latitude,
                longitude,
                average_rating,
                price_range,
                pickup_available,
                delivery_available,
                delivery_minutes,
                pickup_minutes,
                display_address,
            },
        )
}

fn criteria_strategy() -> impl Strategy<Value = FilterCriteria> {
    (
        proptest::option::of("[a-z]{1,4}"),
        proptest::collection::btree_set(price_strategy(), 0..=4),
        0.0..6.0f64,
        0.0..100.0f64,
        0.0..50.0f64,
        requirement_strategy(),
        requirement_strategy(),
    )
        .prop_map(
            |(
                name_query,
                price_categories,
                max_rating,
                max_delivery_minutes,
                max_pickup_minutes,
                pickup_requirement,
                delivery_requirement,
            )| FilterCriteria {
                name_query: name_query.unwrap_or_default(),
                price_categories,
                max_rating,
                max_delivery_minutes,
                max_pickup_minutes,
                pickup_requirement,
                delivery_requirement,
            },
        )
}

proptest! {
    #[test]
    fn subset_rows_all_come_from_the_table(
        rows in proptest::collection::vec(restaurant_strategy(), 0..40),
        criteria in criteria_strategy(),
    ) {
        let dataset = Dataset::new(rows);
        let (subset, aggregates) = filter::apply(&dataset, &criteria);
        prop_assert!(subset.len() <= dataset.len());
        prop_assert_eq!(subset.len(), aggregates.count);
        for row in &subset {
            prop_assert!(dataset.rows.iter().any(|candidate| candidate == *row));
            prop_assert!(criteria.matches(row));
        }
    }

    #[test]
    fn excluded_rows_fail_at_least_one_clause(
        rows in proptest::collection::vec(restaurant_strategy(), 0..40),
        criteria in criteria_strategy(),
    ) {
        let dataset = Dataset::new(rows);
        let (subset, _) = filter::apply(&dataset, &criteria);
        let kept = subset.len();
        let matching = dataset.rows.iter().filter(|row| criteria.matches(row)).count();
        prop_assert_eq!(kept, matching);
    }

    #[test]
    fn apply_is_a_pure_function(
        rows in proptest::collection::vec(restaurant_strategy(), 0..30),
        criteria in criteria_strategy(),
    ) {
        let dataset = Dataset::new(rows);
        let first = filter::apply(&dataset, &criteria);
        let second = filter::apply(&dataset, &criteria);
        prop_assert_eq!(first.0, second.0);
        prop_assert_eq!(first.1, second.1);
    }

    #[test]
    fn empty_price_set_always_yields_an_empty_subset(
        rows in proptest::collection::vec(restaurant_strategy(), 0..40),
        mut criteria in criteria_strategy(),
    ) {
        criteria.price_categories = BTreeSet::new();
        let dataset = Dataset::new(rows);
        let (subset, aggregates) = filter::apply(&dataset, &criteria);
        prop_assert!(subset.is_empty());
        prop_assert_eq!(aggregates.count, 0);
        prop_assert_eq!(aggregates.map_center, DEFAULT_MAP_CENTER);
    }

    #[test]
    fn mean_rating_stays_within_subset_bounds(
        rows in proptest::collection::vec(restaurant_strategy(), 1..40),
        criteria in criteria_strategy(),
    ) {
        let dataset = Dataset::new(rows);
        let (subset, aggregates) = filter::apply(&dataset, &criteria);
        let ratings: Vec<f64> = subset.iter().filter_map(|r| r.average_rating).collect();
        match aggregates.mean_rating {
            Some(mean) => {
                let min = ratings.iter().copied().fold(f64::INFINITY, f64::min);
                let max = ratings.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                prop_assert!(mean >= min - 1e-9 && mean <= max + 1e-9);
            }
            None => prop_assert!(ratings.is_empty()),
        }
    }
}
