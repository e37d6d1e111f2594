use std::{env::args_os, fs, io, path::Path};

use airspace_rings::{
    assembler::BoundarySpec, batch::process_batch, config::ReferenceConfig,
    registry::ReferenceRegistry,
};
use geo::Polygon;
use geojson::{Feature, FeatureCollection};
use serde_json::Map;

fn main() {
    tracing_subscriber::fmt().with_writer(io::stderr).init();
    let config_path = args_os()
        .nth(1)
        .expect("missing argument: path to reference config .json");
    let specs_path = args_os()
        .nth(2)
        .expect("missing argument: path to boundary descriptions .json");

    let config = ReferenceConfig::from_json(&fs::read(&config_path).unwrap())
        .expect("invalid reference config");
    let base = Path::new(&config_path).parent().unwrap_or(Path::new("."));
    let registry = ReferenceRegistry::load(&config, base);

    let specs: Vec<BoundarySpec> =
        serde_json::from_slice(&fs::read(specs_path).unwrap()).expect("invalid boundary descriptions");
    let batch = process_batch(&specs, &registry);

    let feature_collection = FeatureCollection::from_iter(batch.airspaces.into_iter().map(|airspace| {
        let polygon = Polygon::from(airspace.ring);
        Feature {
            geometry: Some((&polygon).into()),
            properties: Some(Map::from_iter(vec![(
                "name".to_string(),
                airspace.name.into(),
            )])),
            ..Default::default()
        }
    }));

    println!("{feature_collection}");
}
