//! Road-classification configuration.
//!
//! Every lookup table the graph builder consults lives in [`RoadConfig`] and
//! is passed in explicitly.  Nothing here is process-global, so tests can
//! hand in a fixture table.
//!
//! # TOML format
//!
//! All fields are optional; missing fields take the defaults below.  A table
//! that is present replaces the default table wholesale.
//!
//! ```toml
//! earth_radius_miles = 3958.8
//! oneway_values = ["yes", "true", "1"]
//! drivable_classes = ["motorway", "primary", "residential"]
//!
//! [default_speeds_mph]
//! motorway = 70
//! primary = 60
//! residential = 25
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::geo::EARTH_RADIUS_MILES;
use crate::{CoreError, CoreResult};

/// `highway=*` values treated as drivable, with their default speed in mph.
const DEFAULT_SPEEDS_MPH: [(&str, f64); 14] = [
    ("motorway",       70.0),
    ("trunk",          60.0),
    ("primary",        60.0),
    ("secondary",      45.0),
    ("tertiary",       35.0),
    ("unclassified",   55.0),
    ("residential",    25.0),
    ("living_street",  25.0),
    ("service",        25.0),
    ("motorway_link",  45.0),
    ("trunk_link",     35.0),
    ("primary_link",   30.0),
    ("secondary_link", 30.0),
    ("tertiary_link",  35.0),
];

const DEFAULT_ONEWAY_VALUES: [&str; 3] = ["yes", "true", "1"];

/// Tag keys, allow-list, speed table, and Earth radius used by graph
/// construction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RoadConfig {
    /// Tag holding the road classification.  Default: `highway`.
    pub class_tag: String,

    /// Tag holding the posted speed limit.  Default: `maxspeed`.
    pub speed_tag: String,

    /// Tag marking one-way roads.  Default: `oneway`.
    pub oneway_tag: String,

    /// Values of `oneway_tag` that make a path one-way.
    pub oneway_values: Vec<String>,

    /// Road classifications kept by the builder.  Paths with any other
    /// classification (or none) are ignored.
    pub drivable_classes: BTreeSet<String>,

    /// Fallback speed per classification when the path has no usable speed
    /// tag.
    pub default_speeds_mph: BTreeMap<String, f64>,

    /// Sphere radius for haversine distances.  Edge distances are in miles,
    /// so this must be in miles too.
    pub earth_radius_miles: f64,
}

impl Default for RoadConfig {
    fn default() -> Self {
        Self {
            class_tag:  "highway".to_owned(),
            speed_tag:  "maxspeed".to_owned(),
            oneway_tag: "oneway".to_owned(),
            oneway_values: DEFAULT_ONEWAY_VALUES.iter().map(|v| (*v).to_owned()).collect(),
            drivable_classes: DEFAULT_SPEEDS_MPH.iter().map(|(c, _)| (*c).to_owned()).collect(),
            default_speeds_mph: DEFAULT_SPEEDS_MPH
                .iter()
                .map(|(c, mph)| ((*c).to_owned(), *mph))
                .collect(),
            earth_radius_miles: EARTH_RADIUS_MILES,
        }
    }
}

impl RoadConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> CoreResult<Self> {
        let config: RoadConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse, and validate a TOML file.
    pub fn load(path: &Path) -> CoreResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Reject values that would make every derived edge weight meaningless.
    ///
    /// A drivable class without a default speed is allowed: such paths only
    /// resolve when they carry their own speed tag.
    pub fn validate(&self) -> CoreResult<()> {
        for (name, key) in [
            ("class_tag", &self.class_tag),
            ("speed_tag", &self.speed_tag),
            ("oneway_tag", &self.oneway_tag),
        ] {
            if key.is_empty() {
                return Err(CoreError::Config(format!("{name} must not be empty")));
            }
        }
        if !(self.earth_radius_miles.is_finite() && self.earth_radius_miles > 0.0) {
            return Err(CoreError::Config(format!(
                "earth_radius_miles must be positive, got {}",
                self.earth_radius_miles
            )));
        }
        for (class, mph) in &self.default_speeds_mph {
            if !(mph.is_finite() && *mph > 0.0) {
                return Err(CoreError::Config(format!(
                    "default speed for {class:?} must be positive, got {mph}"
                )));
            }
        }
        Ok(())
    }

    #[inline]
    pub fn is_drivable(&self, class: &str) -> bool {
        self.drivable_classes.contains(class)
    }

    #[inline]
    pub fn default_speed_mph(&self, class: &str) -> Option<f64> {
        self.default_speeds_mph.get(class).copied()
    }

    /// `true` if `value` of the one-way tag marks a one-way road.
    #[inline]
    pub fn is_oneway_value(&self, value: &str) -> bool {
        self.oneway_values.iter().any(|v| v == value)
    }
}
