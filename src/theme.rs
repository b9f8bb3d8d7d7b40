//! Report labels as configuration.
//!
//! The original report shipped in several near-identical per-language
//! variants; here the wording lives in one value object that can be
//! overridden from a YAML file, so a locale is data rather than a fork.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::Availability;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Theme {
    pub title: String,
    pub found_label: String,
    pub mean_rating_label: String,
    pub mean_delivery_label: String,
    pub mean_pickup_label: String,
    pub pickup_caption: String,
    pub delivery_caption: String,
    pub price_caption: String,
    pub map_caption: String,
    pub yes_label: String,
    pub no_label: String,
    pub unknown_label: String,
    pub minutes_suffix: String,
    pub no_data_label: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            title: "Restaurant Explorer".to_string(),
            found_label: "Restaurants found".to_string(),
            mean_rating_label: "Average rating".to_string(),
            mean_delivery_label: "Mean delivery time".to_string(),
            mean_pickup_label: "Mean pickup time".to_string(),
            pickup_caption: "Pickup availability".to_string(),
            delivery_caption: "Delivery availability".to_string(),
            price_caption: "Price categories".to_string(),
            map_caption: "Map view".to_string(),
            yes_label: "Yes".to_string(),
            no_label: "No".to_string(),
            unknown_label: "Unknown".to_string(),
            minutes_suffix: "min".to_string(),
            no_data_label: "no data".to_string(),
        }
    }
}

impl Theme {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Reading theme file {path:?}"))?;
        serde_yaml::from_str(&raw).with_context(|| format!("Parsing theme file {path:?}"))
    }

    pub fn availability_label(&self, value: Option<Availability>) -> &str {
        match value {
            Some(Availability::Yes) => &self.yes_label,
            Some(Availability::No) => &self.no_label,
            None => &self.unknown_label,
        }
    }
}
