use geo::Coord;
use serde::Serialize;
use tracing::trace;

use crate::{
    arc::CircularArc,
    border::{park_from_phrase, BorderKey},
    circle::Circle,
    coordinate::coordinate_pairs,
    BoundaryError,
};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum TokenKind {
    Elided,
    Point(Coord),
    TwinPoint(Vec<Coord>),
    Circle(Circle),
    Arc(CircularArc),
    BorderRef(BorderKey),
    ParkRef(&'static str),
    Unrecognized,
}

impl TokenKind {
    pub fn classify(text: &str) -> Result<Self, BoundaryError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(Self::Elided);
        }
        let lowercase = trimmed.to_lowercase();

        let kind = if CircularArc::is_arc_phrase(&lowercase) {
            Self::Arc(CircularArc::parse(trimmed)?)
        } else if Circle::is_circle_phrase(&lowercase) {
            Self::Circle(Circle::parse(trimmed)?)
        } else if BorderKey::is_border_phrase(&lowercase) {
            BorderKey::from_phrase(&lowercase).map_or(Self::Unrecognized, Self::BorderRef)
        } else if let Some(park) = park_from_phrase(&lowercase) {
            Self::ParkRef(park)
        } else if lowercase.contains("axe") || lowercase.contains("limite des eaux") {
            // axis/corridor descriptions and unnamed water limits carry no
            // usable geometry
            Self::Unrecognized
        } else {
            let mut pairs = coordinate_pairs(trimmed)?;
            match pairs.len() {
                0 => Self::Unrecognized,
                1 => Self::Point(pairs.remove(0)),
                _ => Self::TwinPoint(pairs),
            }
        };

        trace!("classified {trimmed:?} as {kind:?}");
        Ok(kind)
    }

    pub fn is_symbolic(&self) -> bool {
        !matches!(self, Self::Elided | Self::Point(_) | Self::TwinPoint(_))
    }
}
