//! The rendering-collaborator boundary.
//!
//! The map widget itself is out of scope; this module produces exactly what
//! it consumes: each filtered row with a point radius and color, the map
//! center, and the aggregate summary.

use std::fmt;

use clap::ValueEnum;
use serde::Serialize;

use crate::{
    aggregate::{Aggregates, MapCenter},
    data::Restaurant,
};

/// Field selected by the user to scale map point size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Measure {
    Rating,
    DeliveryTime,
    PickupTime,
}

impl Measure {
    /// Linear radius scale of the underlying field; absent when the row
    /// lacks the field. Rendering emphasis only, never a filter.
    pub fn point_radius(self, row: &Restaurant) -> Option<f64> {
        match self {
            Measure::Rating => row.average_rating.map(|r| r * 15.0),
            Measure::DeliveryTime => row.delivery_minutes.map(|m| m * 2.0),
            Measure::PickupTime => row.pickup_minutes.map(|m| m * 5.0),
        }
    }

    /// RGBA fill shared by every point under this measure.
    pub fn point_color(self) -> [u8; 4] {
        match self {
            Measure::Rating => [255, 165, 0, 160],
            Measure::DeliveryTime => [0, 200, 100, 160],
            Measure::PickupTime => [0, 100, 255, 160],
        }
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Measure::Rating => "rating",
            Measure::DeliveryTime => "delivery-time",
            Measure::PickupTime => "pickup-time",
        };
        write!(f, "{label}")
    }
}

/// One map point: the normalized row plus its rendering attributes.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapPoint<'a> {
    #[serde(flatten)]
    pub restaurant: &'a Restaurant,
    pub point_radius: Option<f64>,
    pub point_color: [u8; 4],
}

/// Everything the rendering layer needs for one interaction.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderModel<'a> {
    pub measure: Measure,
    pub map_center: MapCenter,
    pub points: Vec<MapPoint<'a>>,
    pub aggregates: &'a Aggregates,
}

pub fn build<'a>(
    subset: &[&'a Restaurant],
    aggregates: &'a Aggregates,
    measure: Measure,
) -> RenderModel<'a> {
    let color = measure.point_color();
    let points = subset
        .iter()
        .map(|row| MapPoint {
            restaurant: row,
            point_radius: measure.point_radius(row),
            point_color: color,
        })
        .collect();
    RenderModel {
        measure,
        map_center: aggregates.map_center,
        points,
        aggregates,
    }
}
