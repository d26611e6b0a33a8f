//! Structured CLI errors with meaningful exit codes.
//!
//! Exit code scheme:
//! - 0:  success
//! - 2:  clap arg parse error (automatic, before our code runs)
//! - 10: attractor error (unknown attractor or constant, bulk failure, bad dimensions)
//! - 11: I/O error (point export, snapshot, settings file)
//! - 12: input error (bad `--constant`, bad JSON params, bad color)
//! - 13: serialization error

use attractors_core::AttractorError;
use std::fmt;

/// Errors produced by CLI operations, each mapped to a distinct exit code.
#[derive(Debug)]
pub enum CliError {
    Attractor(AttractorError),
    Io(String),
    Input(String),
    Serialization(String),
}

impl CliError {
    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Attractor(_) => 10,
            CliError::Io(_) => 11,
            CliError::Input(_) => 12,
            CliError::Serialization(_) => 13,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Attractor(e) => write!(f, "{e}"),
            CliError::Io(msg) | CliError::Input(msg) | CliError::Serialization(msg) => {
                write!(f, "{msg}")
            }
        }
    }
}

impl From<AttractorError> for CliError {
    fn from(e: AttractorError) -> Self {
        match e {
            AttractorError::Io(msg) | AttractorError::StorageUnavailable(msg) => CliError::Io(msg),
            AttractorError::InvalidColor(_) => CliError::Input(e.to_string()),
            other => CliError::Attractor(other),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attractor_error_exit_code_is_10() {
        let err = CliError::from(AttractorError::UnknownAttractor("foo".into()));
        assert_eq!(err.exit_code(), 10);
        assert!(err.to_string().contains("foo"));
    }

    #[test]
    fn io_variants_route_to_11() {
        let err = CliError::from(AttractorError::Io("disk full".into()));
        assert_eq!(err.exit_code(), 11);
        assert!(err.to_string().contains("disk full"));

        let err = CliError::from(AttractorError::StorageUnavailable("read-only".into()));
        assert_eq!(err.exit_code(), 11);

        let err = CliError::from(std::io::Error::new(std::io::ErrorKind::Other, "pipe"));
        assert_eq!(err.exit_code(), 11);
    }

    #[test]
    fn bad_color_is_input_error() {
        let err = CliError::from(AttractorError::InvalidColor("#zz".into()));
        assert_eq!(err.exit_code(), 12);
    }

    #[test]
    fn serialization_error_exit_code_is_13() {
        let bad_json = serde_json::from_str::<serde_json::Value>("{invalid");
        let cli_err = CliError::from(bad_json.unwrap_err());
        assert_eq!(cli_err.exit_code(), 13);
    }
}
