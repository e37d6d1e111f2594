use std::io;

use thiserror::Error;
use tracing::warn;

pub mod arc;
pub mod assembler;
pub mod batch;
pub mod border;
pub mod circle;
pub mod config;
pub mod coordinate;
pub mod heuristic;
pub mod radius;
pub mod registry;
pub mod ring;
pub mod token;

fn read_to_string(contents: &[u8]) -> Result<String, io::Error> {
    String::from_utf8(contents.to_vec()).or_else(|_| {
        let (string, _, errors) = encoding_rs::WINDOWS_1252.decode(contents);
        if errors {
            warn!("errors while decoding win-1252");
        }
        Ok(string.to_string())
    })
}

#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum BoundaryError {
    #[error("malformed coordinate: {0:?}")]
    MalformedCoordinate(String),
    #[error("malformed radius: {0:?}")]
    MalformedRadius(String),
    #[error("unrecognized token: {0:?}")]
    UnrecognizedToken(String),
    #[error("no usable coordinate pair in neighbouring token: {0:?}")]
    MissingNeighborContext(String),
    #[error("reference polyline {0:?} is missing or empty")]
    BorderNotFound(String),
    #[error("no points left to close into a ring")]
    DegenerateRing,
}

#[cfg(test)]
mod test {
    use crate::read_to_string;

    #[test]
    fn test_win1252_fallback() {
        let decoded = read_to_string(b"Fronti\xe8re franco-suisse").unwrap();
        assert_eq!(decoded, "Frontière franco-suisse");
    }
}
