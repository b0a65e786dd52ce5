//! CLI-specific error types and exit code mapping

use junkyard_core::error::{JunkyardError, ValidationError};
use junkyard_inventory::InventoryError;
use junkyard_scanner::ScannerError;

/// CLI-specific error type.
///
/// Each variant carries enough context for a user-friendly message.
/// The `exit_code()` method maps errors to standard Unix exit codes.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading or validation failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// A subcommand-specific operation failed.
    #[error("{0}")]
    Command(String),

    /// JSON serialisation failed during output rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// IO error (file read, stdout write, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapped domain error from junkyard-core.
    #[error("{0}")]
    Core(#[from] JunkyardError),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                                      |
    /// |------|----------------------------------------------|
    /// | 0    | Success                                      |
    /// | 1    | General / command error                      |
    /// | 2    | Configuration error                          |
    /// | 3    | Validation error (VIN, required field, ...)  |
    /// | 4    | Resource error (camera, attachment size)     |
    /// | 10   | IO error                                     |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 2,
            Self::Io(_) => 10,
            Self::Core(e) => match e {
                JunkyardError::Config(_) => 2,
                JunkyardError::Validation(_) => 3,
                JunkyardError::Resource(_) => 4,
                JunkyardError::Io(_) => 10,
                JunkyardError::Storage(_) | JunkyardError::Lookup(_) => 1,
            },
            Self::JsonSerialize(_) | Self::Command(_) => 1,
        }
    }
}

impl From<ValidationError> for CliError {
    fn from(e: ValidationError) -> Self {
        Self::Core(e.into())
    }
}

impl From<InventoryError> for CliError {
    fn from(e: InventoryError) -> Self {
        Self::Core(e.into())
    }
}

impl From<ScannerError> for CliError {
    fn from(e: ScannerError) -> Self {
        Self::Core(e.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use junkyard_core::error::{ConfigError, ResourceError, StorageError};

    #[test]
    fn test_exit_code_config_error() {
        let err = CliError::Config("test error".to_owned());
        assert_eq!(err.exit_code(), 2, "config error should return exit code 2");

        let core = CliError::from(JunkyardError::Config(ConfigError::ParseFailed {
            reason: "bad toml".to_owned(),
        }));
        assert_eq!(core.exit_code(), 2, "core config error should return exit code 2");
    }

    #[test]
    fn test_exit_code_validation_error() {
        let err = CliError::from(ValidationError::VinLength { len: 3 });
        assert_eq!(err.exit_code(), 3, "validation error should return exit code 3");
    }

    #[test]
    fn test_exit_code_resource_errors() {
        let denied = CliError::from(ScannerError::CameraDenied("no device".to_owned()));
        assert_eq!(denied.exit_code(), 4, "camera denial should return exit code 4");

        let too_large = CliError::from(InventoryError::AttachmentTooLarge {
            name: "big.png".to_owned(),
            size: 10,
            max: 5,
        });
        assert_eq!(too_large.exit_code(), 4, "oversized attachment should return exit code 4");
    }

    #[test]
    fn test_exit_code_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = CliError::Io(io_err);
        assert_eq!(err.exit_code(), 10, "io error should return exit code 10");

        let attachment = CliError::from(InventoryError::AttachmentIo {
            path: "missing.pdf".to_owned(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        });
        assert_eq!(attachment.exit_code(), 10, "attachment io should return exit code 10");
    }

    #[test]
    fn test_exit_code_command_error() {
        let err = CliError::Command("test error".to_owned());
        assert_eq!(err.exit_code(), 1, "command error should return exit code 1");

        let storage = CliError::from(JunkyardError::Storage(StorageError::Corrupt {
            key: "junkyardInventory".to_owned(),
            reason: "eof".to_owned(),
        }));
        assert_eq!(storage.exit_code(), 1, "storage error should return exit code 1");
    }

    #[test]
    fn test_exit_code_json_serialize_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{invalid json")
            .expect_err("should fail parsing");
        let err = CliError::JsonSerialize(json_err);
        assert_eq!(err.exit_code(), 1, "json serialize error should return exit code 1");
    }

    #[test]
    fn test_error_display_config() {
        let err = CliError::Config("invalid TOML syntax".to_owned());
        let display_str = format!("{}", err);
        assert!(display_str.contains("configuration error"));
        assert!(display_str.contains("invalid TOML syntax"));
    }

    #[test]
    fn test_error_display_passes_domain_message_through() {
        let err = CliError::from(JunkyardError::Resource(ResourceError::StreamEnded));
        assert!(format!("{}", err).contains("camera stream ended"));
    }
}
