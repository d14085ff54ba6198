//! Maximum-speed resolution from path tags.
//!
//! Resolution order:
//!
//! 1. speed tag containing `mph` → its leading integer, as mph;
//! 2. speed tag containing `km/h` → its leading integer converted to mph;
//! 3. otherwise → the classification's entry in the default-speed table.
//!
//! Any other speed tag value (`"50"`, `"none"`, `"signals"`) is ignored in
//! favour of the table.  A resolution never yields zero or NaN: those cases
//! come back as a [`SpeedError`].

use rg_core::RoadConfig;

use crate::{SpeedError, Tags};

/// Kilometres per statute mile.
pub const KM_PER_MILE: f64 = 1.60934;

/// Resolves a path's maximum legal speed in miles per hour.
#[derive(Clone, Copy, Debug)]
pub struct SpeedResolver<'c> {
    config: &'c RoadConfig,
}

impl<'c> SpeedResolver<'c> {
    pub fn new(config: &'c RoadConfig) -> Self {
        Self { config }
    }

    /// Resolve from the road classification and the raw speed tag, if any.
    pub fn resolve(&self, class: &str, speed_tag: Option<&str>) -> Result<f64, SpeedError> {
        if let Some(raw) = speed_tag {
            if raw.contains("mph") {
                return parse_positive(raw).map(f64::from);
            }
            if raw.contains("km/h") {
                return parse_positive(raw).map(|kmh| f64::from(kmh) / KM_PER_MILE);
            }
        }
        match self.config.default_speed_mph(class) {
            Some(mph) if mph.is_finite() && mph > 0.0 => Ok(mph),
            _ => Err(SpeedError::NoDefault(class.to_owned())),
        }
    }

    /// Resolve straight from a tag set, using the configured tag keys.
    pub fn resolve_tags(&self, tags: &Tags) -> Result<f64, SpeedError> {
        let class = tags.get(&self.config.class_tag).map_or("", String::as_str);
        let speed = tags.get(&self.config.speed_tag).map(String::as_str);
        self.resolve(class, speed)
    }
}

fn parse_positive(raw: &str) -> Result<u32, SpeedError> {
    match leading_integer(raw) {
        None => Err(SpeedError::Unparseable(raw.to_owned())),
        Some(0) => Err(SpeedError::Zero(raw.to_owned())),
        Some(n) => Ok(n),
    }
}

/// Digits at the start of `s` after leading whitespace: `"30 mph"` → 30.
fn leading_integer(s: &str) -> Option<u32> {
    let s = s.trim_start();
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    s[..end].parse().ok()
}
