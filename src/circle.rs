use std::f64::consts::TAU;

use geo::Coord;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::{coordinate::DmsExt as _, radius::Radius, BoundaryError};

pub const MIN_CIRCLE_SEGMENTS: usize = 12;

static CIRCLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)cercle\s+de\s+([0-9.]+)\s*(NM|m|km)\s+de\s+rayon\s+centré\s+sur\s+([0-9]{6}[NS])(?:\s*@\s*([0-9]{7}[EW]))?",
    )
    .unwrap()
});

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Circle {
    pub center: Coord,
    pub radius: Radius,
}

impl Circle {
    pub fn is_circle_phrase(lowercase: &str) -> bool {
        lowercase.contains("cercle de") && lowercase.contains("centré sur")
    }

    pub fn parse(text: &str) -> Result<Self, BoundaryError> {
        let captures = CIRCLE_RE
            .captures(text)
            .ok_or_else(|| BoundaryError::UnrecognizedToken(text.to_string()))?;
        let radius = Radius::parse(&captures[1], &captures[2])?;
        let lng = captures
            .get(4)
            .ok_or_else(|| BoundaryError::MalformedCoordinate(captures[3].to_string()))?;
        let center = Coord::from_dms(&captures[3], lng.as_str())?;

        Ok(Self { center, radius })
    }

    pub fn segments(&self) -> usize {
        ((self.radius.nautical_miles() * 12.0).round() as usize).max(MIN_CIRCLE_SEGMENTS)
    }

    /// Closed polygon, first point repeated at the end. Angles start east and
    /// run counter-clockwise; the longitude radius is widened by 1/cos(lat).
    pub fn polygon(&self) -> Vec<Coord> {
        let r_lat = self.radius.degrees_of_latitude();
        let r_lng = r_lat / self.center.y.to_radians().cos();
        let segments = self.segments();

        let mut points = (0..segments)
            .map(|i| {
                let angle = TAU * i as f64 / segments as f64;
                Coord {
                    x: self.center.x + r_lng * angle.cos(),
                    y: self.center.y + r_lat * angle.sin(),
                }
            })
            .collect::<Vec<_>>();
        if let Some(first) = points.first().copied() {
            points.push(first);
        }
        points
    }
}
