use geo::Coord;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
    assembler::{BoundarySpec, Diagnostic},
    registry::ReferenceRegistry,
    ring::{Ring, MIN_RING_POINTS},
};

const PARK_PREFIX: &str = "PARC/RESERVE ";

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Airspace {
    pub name: String,
    pub ring: Ring,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub airspaces: usize,
    pub exported: usize,
    pub empty_airspaces: usize,
    pub incomplete: usize,
    pub empty_rings: usize,
    pub points: usize,
    pub segments: usize,
    pub triangles: usize,
    pub invalid_rings: usize,
    pub parks: usize,
    pub missing_parks: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Batch {
    pub airspaces: Vec<Airspace>,
    pub diagnostics: Vec<Diagnostic>,
    pub report: BatchReport,
}

impl Batch {
    fn accept(&mut self, name: String, points: Vec<Coord>) {
        match points.len() {
            0 => self.report.empty_rings += 1,
            1 => self.report.points += 1,
            2 => self.report.segments += 1,
            3 => self.report.triangles += 1,
            _ => {}
        }
        if points.len() < MIN_RING_POINTS {
            debug!("{name}: only {} points, skipped", points.len());
            return;
        }

        match Ring::try_from(points) {
            Ok(ring) => {
                self.report.exported += 1;
                self.airspaces.push(Airspace { name, ring });
            }
            Err(e) => {
                warn!("{name}: {e}");
                self.report.invalid_rings += 1;
            }
        }
    }
}

pub fn process_batch(specs: &[BoundarySpec], registry: &ReferenceRegistry) -> Batch {
    let mut batch = Batch::default();

    for spec in specs {
        batch.report.airspaces += 1;
        if spec.tokens.is_empty() {
            debug!("{}: no boundary", spec.name);
            batch.report.empty_airspaces += 1;
            continue;
        }

        match registry.park(&spec.name) {
            Some(outline) if !outline.is_empty() => {
                batch.report.parks += 1;
                let mut points = outline.to_vec();
                if let (Some(&first), Some(&last)) = (points.first(), points.last()) {
                    if first != last {
                        points.push(first);
                    }
                }
                batch.accept(format!("{PARK_PREFIX}{}", spec.name), points);
                continue;
            }
            Some(_) => {
                warn!("{}: park outline is empty", spec.name);
                batch.report.missing_parks += 1;
            }
            None => {}
        }

        let outcome = spec.assemble(registry);
        batch.diagnostics.extend(outcome.diagnostics);
        if outcome.had_missing {
            batch.report.incomplete += 1;
            continue;
        }
        batch.accept(spec.name.clone(), outcome.ring);
    }

    info!("processed airspaces: {:?}", batch.report);
    batch
}

#[cfg(test)]
mod test {
    use geo::coord;

    use crate::{
        assembler::BoundarySpec,
        batch::{process_batch, BatchReport},
        border::ReferencePolyline,
        registry::ReferenceRegistry,
        BoundaryError,
    };

    #[test]
    fn test_report() {
        let specs = vec![
            BoundarySpec::new(
                "TMA Cahors",
                ["445000N@0010000E", "450000N@0020000E", "443000N@0023000E"],
            ),
            BoundarySpec::new("Sans limite", Vec::<String>::new()),
            BoundarySpec::new("Segment", ["445000N@0010000E", "450000N@0020000E"]),
            BoundarySpec::new("Point", ["445000N@0010000E"]),
            BoundarySpec::new("TMA Route", ["445000N@0010000E", "puis la route D46"]),
            BoundarySpec::new(
                "CTR Rond",
                ["cercle de 2 NM de rayon centré sur 445000N@0010000E"],
            ),
        ];
        let batch = process_batch(&specs, &ReferenceRegistry::default());

        assert_eq!(
            batch.report,
            BatchReport {
                airspaces: 6,
                exported: 2,
                empty_airspaces: 1,
                incomplete: 1,
                points: 1,
                triangles: 1,
                ..Default::default()
            }
        );
        assert_eq!(
            batch
                .airspaces
                .iter()
                .map(|airspace| airspace.name.as_str())
                .collect::<Vec<_>>(),
            vec!["TMA Cahors", "CTR Rond"]
        );
        assert_eq!(batch.airspaces[0].ring.len(), 4);
        assert_eq!(batch.diagnostics.len(), 1);
        assert_eq!(
            batch.diagnostics[0].reason,
            BoundaryError::UnrecognizedToken("puis la route D46".to_string())
        );
    }

    #[test]
    fn test_non_ascii_digits_do_not_stop_batch() {
        let specs = vec![
            BoundarySpec::new(
                "TMA Arabe",
                ["٤٤٥٠٠٠N@٠٠١٠٠٠٠E", "450000N@0020000E", "443000N@0023000E"],
            ),
            BoundarySpec::new(
                "TMA Cahors",
                ["445000N@0010000E", "450000N@0020000E", "443000N@0023000E"],
            ),
        ];
        let batch = process_batch(&specs, &ReferenceRegistry::default());

        assert_eq!(batch.report.incomplete, 1);
        assert_eq!(batch.report.exported, 1);
        assert_eq!(batch.airspaces[0].name, "TMA Cahors");
        assert_eq!(batch.diagnostics.len(), 1);
        assert_eq!(batch.diagnostics[0].token, "٤٤٥٠٠٠N@٠٠١٠٠٠٠E");
        assert!(matches!(
            batch.diagnostics[0].reason,
            BoundaryError::MalformedCoordinate(_)
        ));
    }

    #[test]
    fn test_park_override() {
        let mut registry = ReferenceRegistry::default();
        registry.insert_park(
            "420 . PARC NATIONAL DES ECRINS",
            ReferencePolyline(vec![
                coord! { x: 6.1, y: 44.8 },
                coord! { x: 6.4, y: 45.0 },
                coord! { x: 6.5, y: 44.7 },
            ]),
        );
        registry.insert_park("RESERVE VIDE", ReferencePolyline::default());

        let specs = vec![
            BoundarySpec::new("420 . PARC NATIONAL DES ECRINS", ["texte libre"]),
            BoundarySpec::new(
                "RESERVE VIDE",
                ["445000N@0010000E", "450000N@0020000E", "443000N@0023000E"],
            ),
        ];
        let batch = process_batch(&specs, &registry);

        assert_eq!(batch.report.parks, 1);
        assert_eq!(batch.report.missing_parks, 1);
        assert_eq!(batch.report.exported, 2);
        assert!(batch.diagnostics.is_empty());

        let park = &batch.airspaces[0];
        assert_eq!(park.name, "PARC/RESERVE 420 . PARC NATIONAL DES ECRINS");
        assert_eq!(park.ring.len(), 4);
        assert_eq!(park.ring.first(), park.ring.last());
        assert_eq!(batch.airspaces[1].name, "RESERVE VIDE");
    }
}
