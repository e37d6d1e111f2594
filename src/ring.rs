use bevy_derive::Deref;
use geo::{Coord, LineString, Polygon};
use serde::Serialize;
use thiserror::Error;

pub const MIN_RING_POINTS: usize = 4;

#[derive(Error, Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum RingDefect {
    #[error("ring has {0} points, at least 4 are required")]
    TooShort(usize),
    #[error("ring is not closed")]
    NotClosed,
    #[error("point {0} is not a finite coordinate")]
    MalformedPoint(usize),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deref)]
pub struct Ring(Vec<Coord>);

impl Ring {
    pub fn validate(points: &[Coord]) -> Result<(), RingDefect> {
        if points.len() < MIN_RING_POINTS {
            return Err(RingDefect::TooShort(points.len()));
        }
        if points.first() != points.last() {
            return Err(RingDefect::NotClosed);
        }
        if let Some(index) = points
            .iter()
            .position(|point| !(point.x.is_finite() && point.y.is_finite()))
        {
            return Err(RingDefect::MalformedPoint(index));
        }
        Ok(())
    }

    pub fn into_inner(self) -> Vec<Coord> {
        self.0
    }
}

impl TryFrom<Vec<Coord>> for Ring {
    type Error = RingDefect;

    fn try_from(points: Vec<Coord>) -> Result<Self, Self::Error> {
        Self::validate(&points)?;
        Ok(Self(points))
    }
}

impl From<Ring> for Polygon {
    fn from(ring: Ring) -> Self {
        Polygon::new(LineString::from(ring.0), vec![])
    }
}

#[cfg(test)]
mod test {
    use geo::{coord, Area as _, Coord, Polygon};

    use crate::ring::{Ring, RingDefect};

    fn square() -> Vec<Coord> {
        vec![
            coord! { x: 0.0, y: 0.0 },
            coord! { x: 1.0, y: 0.0 },
            coord! { x: 1.0, y: 1.0 },
            coord! { x: 0.0, y: 1.0 },
            coord! { x: 0.0, y: 0.0 },
        ]
    }

    #[test]
    fn test_valid() {
        let ring = Ring::try_from(square()).unwrap();
        assert_eq!(ring.len(), 5);
        let polygon = Polygon::from(ring);
        assert!((polygon.unsigned_area() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_defects() {
        assert_eq!(
            Ring::try_from(square()[..3].to_vec()),
            Err(RingDefect::TooShort(3))
        );
        assert_eq!(Ring::try_from(vec![]), Err(RingDefect::TooShort(0)));
        assert_eq!(
            Ring::try_from(square()[..4].to_vec()),
            Err(RingDefect::NotClosed)
        );

        let mut points = square();
        points[2].y = f64::NAN;
        assert_eq!(Ring::try_from(points), Err(RingDefect::MalformedPoint(2)));
    }
}
