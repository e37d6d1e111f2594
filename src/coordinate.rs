use geo::Coord;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::BoundaryError;

static DMS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^([0-9]{6,7})([NSEW])$").unwrap());
static EMBEDDED_DMS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)[0-9]{6,7}[NSEW]").unwrap());
pub(crate) static COORD_PAIR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)([0-9]{6}[NSEW])\s*@\s*([0-9]{7}[NSEW])").unwrap());

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dms {
    pub degrees: u16,
    pub minutes: u8,
    pub seconds: u8,
    pub hemisphere: char,
}

pub fn parse_dms(text: &str) -> Result<f64, BoundaryError> {
    let malformed = || BoundaryError::MalformedCoordinate(text.to_string());
    let captures = DMS_RE.captures(text.trim()).ok_or_else(malformed)?;
    let digits = &captures[1];
    let degree_len = if digits.len() == 6 { 2 } else { 3 };
    let field = |from: usize, to: usize| digits[from..to].parse::<u16>().map_err(|_| malformed());

    let degrees = field(0, degree_len)?;
    let minutes = field(degree_len, degree_len + 2)?;
    let seconds = field(degree_len + 2, degree_len + 4)?;
    let decimal = f64::from(degrees) + f64::from(minutes) / 60.0 + f64::from(seconds) / 3600.0;

    Ok(match captures[2].to_ascii_uppercase().as_str() {
        "S" | "W" => -decimal,
        _ => decimal,
    })
}

pub fn parse_dms_lenient(text: &str) -> Result<f64, BoundaryError> {
    parse_dms(text).or_else(|err| {
        EMBEDDED_DMS_RE
            .find_iter(text)
            .reduce(|longest, m| if m.len() > longest.len() { m } else { longest })
            .map_or(Err(err), |m| parse_dms(m.as_str()))
    })
}

pub fn decimal_to_dms(decimal: f64, is_latitude: bool) -> Dms {
    let abs = decimal.abs();
    let mut degrees = abs.trunc() as u16;
    let remainder = abs.fract() * 60.0;
    let mut minutes = remainder.trunc() as u8;
    let mut seconds = (remainder.fract() * 60.0).round() as u8;
    if seconds == 60 {
        seconds = 0;
        minutes += 1;
    }
    if minutes == 60 {
        minutes = 0;
        degrees += 1;
    }

    let hemisphere = match (is_latitude, decimal >= 0.0) {
        (true, true) => 'N',
        (true, false) => 'S',
        (false, true) => 'E',
        (false, false) => 'W',
    };

    Dms {
        degrees,
        minutes,
        seconds,
        hemisphere,
    }
}

pub fn format_dms(decimal: f64, is_latitude: bool) -> String {
    let dms = decimal_to_dms(decimal, is_latitude);
    if is_latitude {
        format!(
            "{:02}{:02}{:02}{}",
            dms.degrees, dms.minutes, dms.seconds, dms.hemisphere
        )
    } else {
        format!(
            "{:03}{:02}{:02}{}",
            dms.degrees, dms.minutes, dms.seconds, dms.hemisphere
        )
    }
}

pub trait DmsExt: Sized {
    fn from_dms(lat: &str, lng: &str) -> Result<Self, BoundaryError>;
    fn lat_dms_fmt(&self) -> String;
    fn lng_dms_fmt(&self) -> String;
    fn dms_fmt(&self) -> String {
        format!("{}@{}", self.lat_dms_fmt(), self.lng_dms_fmt())
    }
}

impl DmsExt for Coord {
    fn from_dms(lat: &str, lng: &str) -> Result<Self, BoundaryError> {
        Ok(Self {
            x: parse_dms_lenient(lng)?,
            y: parse_dms_lenient(lat)?,
        })
    }

    fn lat_dms_fmt(&self) -> String {
        format_dms(self.y, true)
    }

    fn lng_dms_fmt(&self) -> String {
        format_dms(self.x, false)
    }
}

fn coord_from_captures(captures: &Captures) -> Result<Coord, BoundaryError> {
    Coord::from_dms(&captures[1], &captures[2])
}

/// All `lat@lon` pairs found in the token, in order of appearance.
///
/// Tokens where the pattern finds nothing but which still split into exactly
/// two `@`-separated halves are read half by half, tolerating surrounding text.
pub fn coordinate_pairs(text: &str) -> Result<Vec<Coord>, BoundaryError> {
    let pairs = COORD_PAIR_RE
        .captures_iter(text)
        .map(|captures| coord_from_captures(&captures))
        .collect::<Result<Vec<_>, _>>()?;
    if !pairs.is_empty() {
        return Ok(pairs);
    }

    match text.split('@').collect::<Vec<_>>().as_slice() {
        [lat, lng] => Ok(vec![Coord::from_dms(lat.trim(), lng.trim())?]),
        _ => Ok(vec![]),
    }
}

pub fn pair_matches(text: &str) -> Vec<&str> {
    COORD_PAIR_RE.find_iter(text).map(|m| m.as_str()).collect()
}

pub fn first_pair(text: &str) -> Option<Coord> {
    COORD_PAIR_RE
        .captures(text)
        .and_then(|captures| coord_from_captures(&captures).ok())
}

pub fn pure_pair(text: &str) -> Option<Coord> {
    let trimmed = text.trim();
    COORD_PAIR_RE
        .captures(trimmed)
        .filter(|captures| captures.get(0).is_some_and(|m| m.len() == trimmed.len()))
        .and_then(|captures| coord_from_captures(&captures).ok())
}
