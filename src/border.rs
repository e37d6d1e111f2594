use std::cmp::Ordering;

use bevy_derive::{Deref, DerefMut};
use geo::{Coord, Euclidean, Length as _, LineString};
use itertools::Itertools as _;
use phf::{phf_map, phf_ordered_map};
use serde::Serialize;
use tracing::trace;

use crate::{coordinate::pure_pair, BoundaryError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum BorderKey {
    France,
    Switzerland,
    Andorra,
    AtlanticCoast,
    Corsica,
}

// first match wins
static BORDER_PHRASES: phf::OrderedMap<&'static str, BorderKey> = phf_ordered_map! {
    "frontière franco-" => BorderKey::France,
    "limite des eaux territoriales atlantique françaises" => BorderKey::France,
    "germano-suisse" => BorderKey::Switzerland,
    "frontière hispano-andorrane" => BorderKey::Andorra,
    "la côte atlantique française" => BorderKey::AtlanticCoast,
    "côte corse" => BorderKey::Corsica,
};

const MEDITERRANEAN_COAST: &str = "côte méditérrannéenne";

static PARK_PHRASES: phf::Map<&'static str, &'static str> = phf_map! {
    "parc national des écrins" => "420 . PARC NATIONAL DES ECRINS",
};

impl BorderKey {
    pub fn name(self) -> &'static str {
        match self {
            Self::France => "france",
            Self::Switzerland => "switzerland",
            Self::Andorra => "andorra",
            Self::AtlanticCoast => "atlantique",
            Self::Corsica => "corse",
        }
    }

    pub fn is_border_phrase(lowercase: &str) -> bool {
        lowercase.contains("frontière")
            || lowercase.trim() == MEDITERRANEAN_COAST
            || BORDER_PHRASES.keys().any(|phrase| lowercase.contains(phrase))
    }

    pub fn from_phrase(lowercase: &str) -> Option<Self> {
        if lowercase.trim() == MEDITERRANEAN_COAST {
            return Some(Self::AtlanticCoast);
        }
        BORDER_PHRASES
            .entries()
            .find(|(phrase, _)| lowercase.contains(*phrase))
            .map(|(_, key)| *key)
            .filter(|key| *key != Self::Switzerland || lowercase.contains("frontière"))
    }
}

pub fn park_from_phrase(lowercase: &str) -> Option<&'static str> {
    PARK_PHRASES
        .entries()
        .find(|(phrase, _)| lowercase.contains(*phrase))
        .map(|(_, park)| *park)
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deref, DerefMut)]
pub struct ReferencePolyline(pub Vec<Coord>);

fn planar_length(path: &[Coord]) -> f64 {
    LineString::from(path.to_vec()).length::<Euclidean>()
}

fn circular_path(from: usize, to: usize, vertices: &[Coord]) -> Vec<Coord> {
    if from <= to {
        vertices[from..=to].to_vec()
    } else {
        vertices[from..].iter().chain(&vertices[..=to]).copied().collect()
    }
}

impl ReferencePolyline {
    fn cycle(&self) -> &[Coord] {
        match self.0.as_slice() {
            [first, .., last] if first == last => &self.0[..self.0.len() - 1],
            vertices => vertices,
        }
    }

    fn closest_index(vertices: &[Coord], to: Coord) -> Option<usize> {
        vertices
            .iter()
            .map(|vertex| (vertex.x - to.x).powi(2) + (vertex.y - to.y).powi(2))
            .position_min_by(f64::total_cmp)
    }

    /// The shorter of the two ways around the line between the vertices
    /// closest to `from` and `to`, oriented from `from` towards `to`.
    pub fn shortest_path(&self, from: Coord, to: Coord) -> Option<Vec<Coord>> {
        let vertices = self.cycle();
        let begin = Self::closest_index(vertices, from)?;
        let end = Self::closest_index(vertices, to)?;

        let forward = circular_path(begin, end, vertices);
        let mut backward = circular_path(end, begin, vertices);
        backward.reverse();

        let (forward_length, backward_length) = (planar_length(&forward), planar_length(&backward));
        trace!(
            "reference path {begin} -> {end}: forward {forward_length:.4}, backward {backward_length:.4}"
        );
        // ties go to the path that does not cross the seam
        Some(match forward_length.total_cmp(&backward_length) {
            Ordering::Less => forward,
            Ordering::Greater => backward,
            Ordering::Equal if begin <= end => forward,
            Ordering::Equal => backward,
        })
    }
}

pub fn resolve_reference(
    name: &str,
    polyline: Option<&ReferencePolyline>,
    prev_token: &str,
    next_token: &str,
) -> Result<Vec<Coord>, BoundaryError> {
    let from = pure_pair(prev_token)
        .ok_or_else(|| BoundaryError::MissingNeighborContext(prev_token.to_string()))?;
    let to = pure_pair(next_token)
        .ok_or_else(|| BoundaryError::MissingNeighborContext(next_token.to_string()))?;

    polyline
        .and_then(|polyline| polyline.shortest_path(from, to))
        .filter(|path| !path.is_empty())
        .ok_or_else(|| BoundaryError::BorderNotFound(name.to_string()))
}
