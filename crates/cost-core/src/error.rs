use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the cloud cost pipeline.
#[derive(Error, Debug)]
pub enum CostError {
    /// The configuration file is missing, unreadable or not valid JSON.
    #[error("Failed to load config {path}: {message}")]
    Config { path: PathBuf, message: String },

    /// A provider billing export could not be opened or read as CSV.
    #[error("Failed to parse {provider} billing file {path}: {message}")]
    Parse {
        provider: String,
        path: PathBuf,
        message: String,
    },

    /// A provider tag is not one of `aws`, `azure` or `gcp`.
    #[error("Unknown cloud provider: {0}")]
    UnknownProvider(String),

    /// No billing records were loaded from any configured provider.
    #[error("No billing records loaded. Check config file paths.")]
    EmptyInput,

    /// The report file could not be written.
    #[error("Failed to write report {path}: {message}")]
    Output { path: PathBuf, message: String },
}

impl CostError {
    /// `true` for the error kinds that only drop a single provider's records.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, CostError::Parse { .. } | CostError::UnknownProvider(_))
    }
}

/// Convenience alias used throughout the cost crates.
pub type Result<T> = std::result::Result<T, CostError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_config() {
        let err = CostError::Config {
            path: PathBuf::from("config.example.json"),
            message: "no such file".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to load config"));
        assert!(msg.contains("config.example.json"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_error_display_parse() {
        let err = CostError::Parse {
            provider: "AWS".to_string(),
            path: PathBuf::from("/billing/aws.csv"),
            message: "unequal lengths".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to parse AWS billing file /billing/aws.csv: unequal lengths"
        );
    }

    #[test]
    fn test_error_display_unknown_provider() {
        let err = CostError::UnknownProvider("oracle".to_string());
        assert_eq!(err.to_string(), "Unknown cloud provider: oracle");
    }

    #[test]
    fn test_error_display_empty_input() {
        let msg = CostError::EmptyInput.to_string();
        assert_eq!(msg, "No billing records loaded. Check config file paths.");
    }

    #[test]
    fn test_error_display_output() {
        let err = CostError::Output {
            path: PathBuf::from("/readonly/out.xlsx"),
            message: "permission denied".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("Failed to write report /readonly/out.xlsx"));
    }

    #[test]
    fn test_recoverable_kinds() {
        assert!(CostError::UnknownProvider("x".into()).is_recoverable());
        assert!(CostError::Parse {
            provider: "GCP".into(),
            path: PathBuf::from("gcp.csv"),
            message: "missing".into(),
        }
        .is_recoverable());
        assert!(!CostError::EmptyInput.is_recoverable());
        assert!(!CostError::Config {
            path: PathBuf::from("c.json"),
            message: "bad".into(),
        }
        .is_recoverable());
    }
}
