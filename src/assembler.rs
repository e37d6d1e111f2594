use std::borrow::Cow;

use geo::Coord;
use serde::{Deserialize, Serialize, Serializer};
use tracing::warn;

use crate::{
    border::resolve_reference, heuristic::implied_circle, registry::ReferenceRegistry,
    token::TokenKind, BoundaryError,
};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundarySpec {
    pub name: String,
    pub tokens: Vec<String>,
}

fn serialize_reason<S>(reason: &BoundaryError, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(reason)
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Diagnostic {
    pub airspace: String,
    pub token: String,
    #[serde(serialize_with = "serialize_reason")]
    pub reason: BoundaryError,
}

/// Assembled points of one airspace. With `had_missing` set the points are
/// partial and must not be used.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ProcessingOutcome {
    pub ring: Vec<Coord>,
    pub had_missing: bool,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Default)]
struct Accumulator {
    points: Vec<Coord>,
    last_resolved: Option<Vec<Coord>>,
    diagnostics: Vec<Diagnostic>,
}

struct Neighbours<'a> {
    prev: &'a str,
    next: &'a str,
}

impl Accumulator {
    fn resolve(
        &self,
        kind: TokenKind,
        token: &str,
        neighbours: &Neighbours,
        registry: &ReferenceRegistry,
    ) -> Result<Vec<Coord>, BoundaryError> {
        match kind {
            TokenKind::Elided => self
                .last_resolved
                .clone()
                .ok_or_else(|| BoundaryError::MissingNeighborContext(neighbours.prev.to_string())),
            TokenKind::Point(point) => Ok(vec![point]),
            TokenKind::TwinPoint(points) => Ok(points),
            TokenKind::Circle(circle) => {
                let mut polygon = circle.polygon();
                // the ring gets closed once all tokens are in
                polygon.pop();
                Ok(polygon)
            }
            TokenKind::Arc(arc) => arc.interpolate(neighbours.prev, neighbours.next),
            TokenKind::BorderRef(key) => resolve_reference(
                key.name(),
                registry.border(key.name()),
                neighbours.prev,
                neighbours.next,
            ),
            TokenKind::ParkRef(park) => {
                resolve_reference(park, registry.park(park), neighbours.prev, neighbours.next)
            }
            TokenKind::Unrecognized => Err(BoundaryError::UnrecognizedToken(token.to_string())),
        }
    }

    fn step(
        mut self,
        name: &str,
        token: &str,
        neighbours: &Neighbours,
        registry: &ReferenceRegistry,
    ) -> Self {
        let resolved = TokenKind::classify(token).and_then(|kind| {
            let carries = !kind.is_symbolic();
            self.resolve(kind, token, neighbours, registry)
                .map(|points| (points, carries))
        });

        match resolved {
            Ok((points, carries)) => {
                if carries {
                    self.last_resolved = Some(points.clone());
                }
                self.points.extend(points);
            }
            Err(reason) => {
                warn!("{name}: unprocessed token {token:?}: {reason}");
                self.diagnostics.push(Diagnostic {
                    airspace: name.to_string(),
                    token: token.to_string(),
                    reason,
                });
            }
        }

        self
    }

    fn close(mut self, name: &str) -> ProcessingOutcome {
        match (self.points.first().copied(), self.points.last().copied()) {
            (Some(first), Some(last)) => {
                if first != last {
                    self.points.push(first);
                }
            }
            _ => {
                warn!("{name}: no points to build a ring from");
                self.diagnostics.push(Diagnostic {
                    airspace: name.to_string(),
                    token: String::new(),
                    reason: BoundaryError::DegenerateRing,
                });
            }
        }

        ProcessingOutcome {
            had_missing: !self.diagnostics.is_empty(),
            ring: self.points,
            diagnostics: self.diagnostics,
        }
    }
}

impl BoundarySpec {
    pub fn new(name: impl Into<String>, tokens: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            name: name.into(),
            tokens: tokens.into_iter().map(Into::into).collect(),
        }
    }

    pub fn assemble(&self, registry: &ReferenceRegistry) -> ProcessingOutcome {
        let tokens: Cow<[String]> = implied_circle(&self.name, &self.tokens)
            .map_or(Cow::Borrowed(self.tokens.as_slice()), |circle| {
                Cow::Owned(vec![circle])
            });
        let total = tokens.len();

        tokens
            .iter()
            .enumerate()
            .fold(Accumulator::default(), |acc, (i, token)| {
                let neighbours = Neighbours {
                    prev: &tokens[(i + total - 1) % total],
                    next: &tokens[(i + 1) % total],
                };
                acc.step(&self.name, token, &neighbours, registry)
            })
            .close(&self.name)
    }
}
