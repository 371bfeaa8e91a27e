//! Error types for color parsing and palette validation.

use std::fmt;
use std::num::ParseIntError;

/// A hex color string could not be parsed.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseColorError {
    /// Must be 3 or 6 hex digits after stripping '#'
    InvalidLength,
    InvalidHex(ParseIntError),
}

impl From<ParseIntError> for ParseColorError {
    fn from(err: ParseIntError) -> Self {
        ParseColorError::InvalidHex(err)
    }
}

impl fmt::Display for ParseColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseColorError::InvalidLength => {
                write!(f, "invalid hex color length (expected 3 or 6 characters)")
            }
            ParseColorError::InvalidHex(err) => write!(f, "invalid hex character: {}", err),
        }
    }
}

impl std::error::Error for ParseColorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseColorError::InvalidHex(err) => Some(err),
            _ => None,
        }
    }
}

/// Palette construction was rejected.
#[derive(Debug, Clone, PartialEq)]
pub enum PaletteError {
    /// A panel palette needs at least two distinct colors
    TooFewColors { count: usize },
    /// Indices are stored as `u8`
    TooManyColors { count: usize },
    /// Two entries share an official or a measured color
    DuplicateColor { first: usize, second: usize },
    /// Official and measured lists differ in length
    LengthMismatch { official: usize, actual: usize },
    /// Two entries share a name
    DuplicateName { name: String },
    ParseColor(ParseColorError),
}

impl From<ParseColorError> for PaletteError {
    fn from(err: ParseColorError) -> Self {
        PaletteError::ParseColor(err)
    }
}

impl fmt::Display for PaletteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaletteError::TooFewColors { count } => {
                write!(f, "palette needs at least 2 distinct colors, got {}", count)
            }
            PaletteError::TooManyColors { count } => {
                write!(f, "palette holds at most 256 colors, got {}", count)
            }
            PaletteError::DuplicateColor { first, second } => {
                write!(f, "palette entries {} and {} have the same color", first, second)
            }
            PaletteError::LengthMismatch { official, actual } => write!(
                f,
                "palette length mismatch: official has {} colors, measured has {}",
                official, actual
            ),
            PaletteError::DuplicateName { name } => {
                write!(f, "palette entry name '{}' is used twice", name)
            }
            PaletteError::ParseColor(err) => write!(f, "invalid color: {}", err),
        }
    }
}

impl std::error::Error for PaletteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PaletteError::ParseColor(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            PaletteError::TooFewColors { count: 1 }.to_string(),
            "palette needs at least 2 distinct colors, got 1"
        );
        assert_eq!(
            PaletteError::DuplicateColor { first: 0, second: 3 }.to_string(),
            "palette entries 0 and 3 have the same color"
        );
        assert_eq!(
            PaletteError::LengthMismatch {
                official: 6,
                actual: 5
            }
            .to_string(),
            "palette length mismatch: official has 6 colors, measured has 5"
        );
    }

    #[test]
    fn test_parse_error_is_source() {
        use std::error::Error;
        let err = PaletteError::from(ParseColorError::InvalidLength);
        assert!(err.source().is_some());
        assert!(PaletteError::TooFewColors { count: 0 }.source().is_none());
    }
}
