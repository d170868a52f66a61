use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum DegloopError {
    #[error("Failed to read file '{path}'")]
    #[diagnostic(
        code(degloop::io_error),
        help("Check if the file exists and you have read permissions")
    )]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid line-feature document '{file}'")]
    #[diagnostic(
        code(degloop::feature_parse_error),
        help("The input must be a JSON FeatureCollection of LineString features")
    )]
    FeatureParseError {
        file: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Segment {id} has degenerate geometry")]
    #[diagnostic(
        code(degloop::degenerate_geometry),
        help("A segment needs at least two finite-coordinate vertices")
    )]
    DegenerateGeometry { id: u64 },

    #[error("JSON serialization error")]
    #[diagnostic(
        code(degloop::json_error),
        help("This is likely an internal error - please report it")
    )]
    Json(#[from] serde_json::Error),

    #[error("String formatting error")]
    #[diagnostic(
        code(degloop::fmt_error),
        help("This is likely an internal error - please report it")
    )]
    Fmt(#[from] std::fmt::Error),

    #[error("IO error")]
    #[diagnostic(code(degloop::io_error), help("Check file permissions and disk space"))]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    #[diagnostic(
        code(degloop::config_error),
        help("Check your command arguments and configuration")
    )]
    ConfigurationError { message: String },

    #[error("Graph error: {message}")]
    #[diagnostic(
        code(degloop::graph_error),
        help("This may be an internal error with network graph processing")
    )]
    GraphError { message: String },
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;

    #[test]
    fn test_file_read_error() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let error = DegloopError::FileReadError {
            path: PathBuf::from("/tmp/missing.json"),
            source: io_err,
        };

        let error_str = error.to_string();
        assert_eq!(error_str, "Failed to read file '/tmp/missing.json'");
    }

    #[test]
    fn test_degenerate_geometry_error() {
        let error = DegloopError::DegenerateGeometry { id: 17 };
        assert_eq!(error.to_string(), "Segment 17 has degenerate geometry");
    }

    #[test]
    fn test_configuration_error() {
        let error = DegloopError::ConfigurationError {
            message: "Invalid configuration value".to_string(),
        };

        let error_str = error.to_string();
        assert_eq!(
            error_str,
            "Configuration error: Invalid configuration value"
        );
    }

    #[test]
    fn test_error_codes() {
        // All user-facing variants carry diagnostic codes and help texts
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let file_err = DegloopError::FileReadError {
            path: PathBuf::from("test.json"),
            source: io_err,
        };

        use miette::Diagnostic;
        assert!(file_err.code().is_some());
        assert!(file_err.help().is_some());
    }

    #[test]
    fn test_error_conversion_from_io() {
        let io_err = io::Error::other("some io error");
        let err: DegloopError = io_err.into();

        match err {
            DegloopError::Io(_) => {}
            _ => panic!("Expected Io variant"),
        }
    }

    #[test]
    fn test_error_conversion_from_json() {
        let json_str = "{invalid json}";
        let json_err = serde_json::from_str::<serde_json::Value>(json_str).unwrap_err();
        let err: DegloopError = json_err.into();

        match err {
            DegloopError::Json(_) => {}
            _ => panic!("Expected Json variant"),
        }
    }
}
