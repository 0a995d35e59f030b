// Copyright (c) 2026 rezky_nightky

//! Error types shared by ingestion, configuration and the render sinks.

use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Terminal or file I/O failed
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The rainfall CSV could not be read
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A configuration value is outside the range the engine accepts
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Rainfall intensity must be a finite number; ingestion coerces bad cells to zero
    #[error("rainfall intensity must be finite, got {0}")]
    NonFiniteRain(f64),

    /// No monthly records were found in the input
    #[error("no monthly rainfall records in {0}")]
    EmptyInput(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let e = Error::Config("n_arms must be at least 1".to_string());
        assert_eq!(
            format!("{}", e),
            "invalid configuration: n_arms must be at least 1"
        );

        let e = Error::NonFiniteRain(f64::NAN);
        assert_eq!(format!("{}", e), "rainfall intensity must be finite, got NaN");
    }

    #[test]
    fn io_errors_convert() {
        let e: Error = io::Error::new(io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(e, Error::Io(_)));
    }
}
