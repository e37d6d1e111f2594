use geo::{Bearing as _, Coord, Destination as _, Haversine, Point};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::trace;

use crate::{
    coordinate::{first_pair, DmsExt as _},
    radius::Radius,
    BoundaryError,
};

const DEGREES_PER_SEGMENT: f64 = 5.0;
const FULL_TURN: f64 = 360.0;

static ARC_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)arc\s+(anti-horaire|horaire)\s+de\s+([0-9.]+)\s*(NM|m|km)\s+de\s+rayon\s+centré\s+sur\s+([0-9]{6}[NS])(?:\s*@\s*([0-9]{7}[EW]))?",
    )
    .unwrap()
});

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Rotation {
    Clockwise,
    CounterClockwise,
}

impl Rotation {
    fn parse(text: &str) -> Self {
        if text.eq_ignore_ascii_case("horaire") {
            Self::Clockwise
        } else {
            Self::CounterClockwise
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct CircularArc {
    pub center: Coord,
    pub radius: Radius,
    pub rotation: Rotation,
}

/// Signed sweep in degrees from `start` to `end`, positive clockwise, picking
/// the side consistent with the rotation.
pub fn arc_sweep(start: f64, end: f64, rotation: Rotation) -> f64 {
    let delta = end - start;
    match rotation {
        Rotation::Clockwise if delta < 0.0 => delta + FULL_TURN,
        Rotation::CounterClockwise if delta > 0.0 => delta - FULL_TURN,
        _ => delta,
    }
}

impl CircularArc {
    pub fn is_arc_phrase(lowercase: &str) -> bool {
        lowercase.contains("arc horaire") || lowercase.contains("arc anti-horaire")
    }

    pub fn parse(text: &str) -> Result<Self, BoundaryError> {
        let captures = ARC_RE
            .captures(text)
            .ok_or_else(|| BoundaryError::UnrecognizedToken(text.to_string()))?;
        let rotation = Rotation::parse(&captures[1]);
        let radius = Radius::parse(&captures[2], &captures[3])?;
        let lng = captures
            .get(5)
            .ok_or_else(|| BoundaryError::MalformedCoordinate(captures[4].to_string()))?;
        let center = Coord::from_dms(&captures[4], lng.as_str())?;

        Ok(Self {
            center,
            radius,
            rotation,
        })
    }

    /// Interior points of the arc between the first coordinate pairs found
    /// in the neighbouring tokens. Free text around those pairs is ignored.
    pub fn interpolate(&self, prev_token: &str, next_token: &str) -> Result<Vec<Coord>, BoundaryError> {
        let prev = first_pair(prev_token)
            .ok_or_else(|| BoundaryError::MissingNeighborContext(prev_token.to_string()))?;
        let next = first_pair(next_token)
            .ok_or_else(|| BoundaryError::MissingNeighborContext(next_token.to_string()))?;
        Ok(self.interpolate_between(prev, next))
    }

    pub fn interpolate_between(&self, prev: Coord, next: Coord) -> Vec<Coord> {
        let center = Point::from(self.center);
        let start = Haversine::bearing(center, Point::from(prev));
        let end = Haversine::bearing(center, Point::from(next));
        let sweep = arc_sweep(start, end, self.rotation);
        let segments = ((sweep.abs() / DEGREES_PER_SEGMENT).round() as usize).max(2);
        let distance = self.radius.haversine_metres();

        trace!(
            "arc {:?} around {}: {sweep:.1}° in {segments} segments",
            self.rotation,
            self.center.dms_fmt(),
        );

        (1..segments)
            .map(|i| {
                let bearing = (start + sweep * i as f64 / segments as f64).rem_euclid(FULL_TURN);
                Haversine::destination(center, bearing, distance).0
            })
            .collect()
    }
}

#[cfg(test)]
mod test {
    use geo::{Bearing as _, Coord, Destination as _, Distance as _, Haversine, Point};

    use crate::{
        arc::{arc_sweep, CircularArc, Rotation},
        radius::Radius,
        BoundaryError,
    };

    const CENTER: Coord = Coord { x: 1.0, y: 45.0 };

    fn arc(rotation: Rotation) -> CircularArc {
        CircularArc {
            center: CENTER,
            radius: Radius::from_nautical_miles(5.0),
            rotation,
        }
    }

    fn on_radius(bearing: f64) -> Coord {
        let distance = Radius::from_nautical_miles(5.0).haversine_metres();
        Haversine::destination(Point::from(CENTER), bearing, distance).0
    }

    fn bearing_from_center(point: Coord) -> f64 {
        Haversine::bearing(Point::from(CENTER), Point::from(point))
    }

    #[test]
    fn test_parse() {
        let arc = CircularArc::parse(
            "arc anti-horaire de 2.5 NM de rayon centré sur 433015N@0052300E",
        )
        .unwrap();
        assert_eq!(arc.rotation, Rotation::CounterClockwise);
        assert!((arc.radius.nautical_miles() - 2.5).abs() < 1e-12);

        let arc = CircularArc::parse("Arc HORAIRE de 8 km de rayon centré sur 433015N@0052300E").unwrap();
        assert_eq!(arc.rotation, Rotation::Clockwise);

        assert_eq!(
            CircularArc::parse("arc horaire de 2 NM de rayon centré sur 433015N"),
            Err(BoundaryError::MalformedCoordinate("433015N".to_string()))
        );
    }

    #[test]
    fn test_sweep() {
        assert!((arc_sweep(0.0, 90.0, Rotation::Clockwise) - 90.0).abs() < 1e-12);
        assert!((arc_sweep(90.0, 0.0, Rotation::Clockwise) - 270.0).abs() < 1e-12);
        assert!((arc_sweep(0.0, 90.0, Rotation::CounterClockwise) + 270.0).abs() < 1e-12);
        assert!((arc_sweep(90.0, 0.0, Rotation::CounterClockwise) + 90.0).abs() < 1e-12);
    }

    #[test]
    fn test_clockwise_interior() {
        let points = arc(Rotation::Clockwise).interpolate_between(on_radius(10.0), on_radius(100.0));
        // 90° in 5° steps, end points excluded
        assert_eq!(points.len(), 17);

        let bearings = points.iter().map(|p| bearing_from_center(*p)).collect::<Vec<_>>();
        assert!(bearings.windows(2).all(|w| w[0] < w[1]));
        assert!(bearings[0] > 10.0);
        assert!(bearings[16] < 100.0);
    }

    #[test]
    fn test_counter_clockwise_interior() {
        let points =
            arc(Rotation::CounterClockwise).interpolate_between(on_radius(10.0), on_radius(100.0));
        // the long way round: 270°
        assert_eq!(points.len(), 53);

        // unwrap through north so the sequence is monotonic
        let bearings = points
            .iter()
            .map(|p| {
                let bearing = bearing_from_center(*p);
                if bearing < 10.0 {
                    bearing + 360.0
                } else {
                    bearing
                }
            })
            .collect::<Vec<_>>();
        assert!(bearings.windows(2).all(|w| w[0] > w[1]));
        assert!(bearings[0] < 370.0);
        assert!(bearings[52] > 100.0);
    }

    #[test]
    fn test_points_on_radius() {
        let distance = Radius::from_nautical_miles(5.0).haversine_metres();
        for point in arc(Rotation::Clockwise).interpolate_between(on_radius(300.0), on_radius(60.0)) {
            let from_center = Haversine::distance(Point::from(CENTER), Point::from(point));
            assert!((from_center - distance).abs() < 1e-6, "{point:?}");
        }
    }

    #[test]
    fn test_missing_neighbour() {
        let result = arc(Rotation::Clockwise).interpolate("le long de la côte", "450500N@0010000E");
        assert_eq!(
            result,
            Err(BoundaryError::MissingNeighborContext("le long de la côte".to_string()))
        );
    }
}
