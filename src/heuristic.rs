use tracing::debug;

use crate::{circle::Circle, coordinate::pair_matches};

enum ImpliedRadius {
    Fixed(&'static str),
    Named(&'static [(&'static str, &'static str)]),
}

struct ActivityZone {
    marker: &'static str,
    single_pair_only: bool,
    radius: ImpliedRadius,
}

// checked in order, the first marker found in the lower-cased name decides
const ACTIVITY_ZONES: &[ActivityZone] = &[
    ActivityZone {
        marker: " para ",
        single_pair_only: true,
        radius: ImpliedRadius::Fixed("3 NM"),
    },
    ActivityZone {
        marker: " treuillage ",
        single_pair_only: true,
        radius: ImpliedRadius::Fixed("600 m"),
    },
    ActivityZone {
        marker: "aéromodélisme",
        single_pair_only: false,
        radius: ImpliedRadius::Fixed("600 m"),
    },
    ActivityZone {
        marker: " voltige ",
        single_pair_only: false,
        radius: ImpliedRadius::Fixed("1 NM"),
    },
    ActivityZone {
        marker: " activité particulière ",
        single_pair_only: false,
        radius: ImpliedRadius::Fixed("1 km"),
    },
    ActivityZone {
        marker: "lf d ",
        single_pair_only: false,
        radius: ImpliedRadius::Named(&[
            ("LF D 562 - LA VALETTE", "1.35 NM"),
            ("LF D 595 LASER HAUTE PROVENCE", "1.5 km"),
        ]),
    },
];

pub fn implied_circle(name: &str, tokens: &[String]) -> Option<String> {
    let [token] = tokens else {
        return None;
    };
    if Circle::is_circle_phrase(&token.to_lowercase()) {
        return None;
    }

    let lowercase = name.to_lowercase();
    let zone = ACTIVITY_ZONES
        .iter()
        .find(|zone| lowercase.contains(zone.marker))?;
    let radius = match zone.radius {
        ImpliedRadius::Fixed(radius) => radius,
        ImpliedRadius::Named(radii) => radii
            .iter()
            .find(|(zone_name, _)| *zone_name == name)
            .map(|(_, radius)| *radius)?,
    };

    let pairs = pair_matches(token);
    if zone.single_pair_only && pairs.len() != 1 {
        return None;
    }
    let center = pairs.first()?;

    debug!("{name}: treating {token:?} as a {radius} activity circle");
    Some(format!("cercle de {radius} de rayon centré sur {center}"))
}
