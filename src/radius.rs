use geo::{Distance as _, Haversine, Point};
use serde::Serialize;
use uom::si::f64::Length;
use uom::si::length::{kilometer, meter, nautical_mile};

use crate::BoundaryError;

// larger radii are typos in the source text
const MAX_NAUTICAL_MILES: f64 = 500.0;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Radius(pub Length);

impl Radius {
    pub fn parse(value: &str, unit: &str) -> Result<Self, BoundaryError> {
        let malformed = || BoundaryError::MalformedRadius(format!("{value} {unit}"));
        let value = value.parse::<f64>().map_err(|_| malformed())?;
        if !value.is_finite() {
            return Err(malformed());
        }
        let length = match unit.to_ascii_lowercase().as_str() {
            "nm" => Length::new::<nautical_mile>(value),
            "m" => Length::new::<meter>(value),
            "km" => Length::new::<kilometer>(value),
            _ => return Err(malformed()),
        };
        if length.get::<nautical_mile>() > MAX_NAUTICAL_MILES {
            return Err(malformed());
        }
        Ok(Self(length))
    }

    pub fn from_nautical_miles(value: f64) -> Self {
        Self(Length::new::<nautical_mile>(value))
    }

    pub fn nautical_miles(&self) -> f64 {
        self.0.get::<nautical_mile>()
    }

    pub fn degrees_of_latitude(&self) -> f64 {
        self.nautical_miles() / 60.0
    }

    /// Same arc of a meridian, measured on the sphere `Haversine` works on.
    pub fn haversine_metres(&self) -> f64 {
        Haversine::distance(
            Point::new(0.0, 0.0),
            Point::new(0.0, self.degrees_of_latitude()),
        )
    }
}
