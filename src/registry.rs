use std::{collections::HashMap, io, path::Path};

use geo::Coord;
use geojson::{GeoJson, Value};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::{border::ReferencePolyline, config::ReferenceConfig, read_to_string};

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("failed to read reference file: {0}")]
    FileRead(#[from] io::Error),
    #[error("failed to parse GeoJSON: {0}")]
    GeoJson(#[from] geojson::Error),
    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Deserialize)]
struct ParkEntry {
    #[serde(default)]
    coordinates: Vec<Vec<f64>>,
}

fn polyline_from_positions(positions: Vec<Vec<f64>>) -> ReferencePolyline {
    ReferencePolyline(
        positions
            .into_iter()
            .filter_map(|position| match position.as_slice() {
                [x, y, ..] => Some(Coord { x: *x, y: *y }),
                _ => None,
            })
            .collect(),
    )
}

#[derive(Clone, Debug, Default)]
pub struct ReferenceRegistry {
    borders: HashMap<String, ReferencePolyline>,
    parks: HashMap<String, ReferencePolyline>,
}

impl ReferenceRegistry {
    pub fn insert_border(&mut self, name: impl Into<String>, polyline: ReferencePolyline) {
        self.borders.insert(name.into(), polyline);
    }

    pub fn insert_park(&mut self, name: impl Into<String>, outline: ReferencePolyline) {
        self.parks.insert(name.into(), outline);
    }

    pub fn border(&self, name: &str) -> Option<&ReferencePolyline> {
        self.borders.get(name)
    }

    pub fn park(&self, name: &str) -> Option<&ReferencePolyline> {
        self.parks.get(name)
    }

    pub fn border_from_geojson(contents: &[u8]) -> Result<ReferencePolyline, RegistryError> {
        let geometry = match read_to_string(contents)?.parse::<GeoJson>()? {
            GeoJson::FeatureCollection(collection) => collection
                .features
                .into_iter()
                .next()
                .and_then(|feature| feature.geometry),
            GeoJson::Feature(feature) => feature.geometry,
            GeoJson::Geometry(geometry) => Some(geometry),
        };

        Ok(match geometry.map(|geometry| geometry.value) {
            Some(Value::Polygon(rings)) => {
                polyline_from_positions(rings.into_iter().next().unwrap_or_default())
            }
            Some(Value::LineString(positions)) => polyline_from_positions(positions),
            Some(_) => {
                warn!("reference geometry is neither a polygon nor a line string");
                ReferencePolyline::default()
            }
            None => {
                warn!("reference file without geometry");
                ReferencePolyline::default()
            }
        })
    }

    pub fn parks_from_json(contents: &[u8]) -> Result<HashMap<String, ReferencePolyline>, RegistryError> {
        let parks: HashMap<String, ParkEntry> = serde_json::from_str(&read_to_string(contents)?)?;
        Ok(parks
            .into_iter()
            .map(|(name, entry)| (name, polyline_from_positions(entry.coordinates)))
            .collect())
    }

    /// Files that cannot be read or parsed are logged and left out, the
    /// tokens referring to them will then fail to resolve.
    pub fn load(config: &ReferenceConfig, base: &Path) -> Self {
        let mut registry = Self::default();

        for (name, path) in &config.borders {
            let path = ReferenceConfig::resolve(base, path);
            match fs_err::read(&path)
                .map_err(RegistryError::from)
                .and_then(|contents| Self::border_from_geojson(&contents))
            {
                Ok(polyline) => {
                    debug!("loaded {name} with {} vertices", polyline.len());
                    registry.insert_border(name.clone(), polyline);
                }
                Err(e) => warn!("reference {name}: {e}"),
            }
        }

        if let Some(path) = &config.parks {
            let path = ReferenceConfig::resolve(base, path);
            match fs_err::read(&path)
                .map_err(RegistryError::from)
                .and_then(|contents| Self::parks_from_json(&contents))
            {
                Ok(parks) => {
                    debug!("loaded {} park outlines", parks.len());
                    registry.parks = parks;
                }
                Err(e) => warn!("parks: {e}"),
            }
        }

        registry
    }
}
