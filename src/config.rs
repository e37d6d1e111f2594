use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::registry::RegistryError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceConfig {
    pub borders: BTreeMap<String, PathBuf>,
    pub parks: Option<PathBuf>,
}

impl Default for ReferenceConfig {
    fn default() -> Self {
        Self {
            borders: BTreeMap::from([
                ("france".to_string(), PathBuf::from("France.geojson")),
                ("andorra".to_string(), PathBuf::from("Andorre.geojson")),
                ("switzerland".to_string(), PathBuf::from("Suisse.geojson")),
                (
                    "atlantique".to_string(),
                    PathBuf::from("France_coastline.geojson"),
                ),
                ("corse".to_string(), PathBuf::from("Corsica.geojson")),
            ]),
            parks: Some(PathBuf::from("parks.json")),
        }
    }
}

impl ReferenceConfig {
    pub fn from_json(contents: &[u8]) -> Result<Self, RegistryError> {
        Ok(serde_json::from_slice(contents)?)
    }

    pub fn resolve(base: &Path, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            base.join(path)
        }
    }
}

#[cfg(test)]
mod test {
    use std::path::{Path, PathBuf};

    use crate::config::ReferenceConfig;

    #[test]
    fn test_partial_config() {
        let config = ReferenceConfig::from_json(br#"{ "borders": { "france": "data/fr.geojson" } }"#)
            .unwrap();
        assert_eq!(config.borders.len(), 1);
        assert_eq!(config.parks, Some(PathBuf::from("parks.json")));

        let default = ReferenceConfig::from_json(b"{}").unwrap();
        assert_eq!(default, ReferenceConfig::default());
        assert!(ReferenceConfig::from_json(br#"{ "borders": 3 }"#).is_err());
    }

    #[test]
    fn test_resolve() {
        assert_eq!(
            ReferenceConfig::resolve(Path::new("/srv/aip"), Path::new("France.geojson")),
            PathBuf::from("/srv/aip/France.geojson")
        );
        assert_eq!(
            ReferenceConfig::resolve(Path::new("/srv/aip"), Path::new("/data/parks.json")),
            PathBuf::from("/data/parks.json")
        );
    }
}
