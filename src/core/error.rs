use thiserror::Error;

/// Errors raised by the metrics engine and its configuration layer
#[derive(Error, Debug)]
pub enum RollstatError {
    /// An accessor of one aggregation kind was used on an event of another
    #[error("Type mismatch: {event} is not a {expected}")]
    TypeMismatch {
        /// Offending event name
        event: &'static str,
        /// Kind the accessor serves
        expected: &'static str,
    },

    /// The event is tagged with neither or both aggregation kinds
    #[error("Unknown type of event: {0}")]
    UnknownEventType(&'static str),

    /// A MaxUpdater-kind event was recorded without a value
    #[error("Missing value: {0} requires a value to record")]
    MissingValue(&'static str),

    /// A value outside the event's domain, such as a negative counter delta
    #[error("Invalid value: {event} cannot take {value}")]
    InvalidValue {
        /// Offending event name
        event: &'static str,
        /// Rejected value
        value: i64,
    },

    /// Invalid configuration or event registry
    #[error("Configuration error: {0}")]
    Config(String),

    /// Reading a configuration file failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A configuration document could not be parsed
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type alias for rollstat operations
pub type Result<T> = std::result::Result<T, RollstatError>;

impl RollstatError {
    /// Creates a new configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Creates a type mismatch error for an accessor of the wrong kind
    pub fn type_mismatch(event: &'static str, expected: &'static str) -> Self {
        Self::TypeMismatch { event, expected }
    }

    /// Returns true if this error points at a wiring defect between the
    /// event registry and its callers rather than at bad input.
    pub fn is_wiring_defect(&self) -> bool {
        matches!(self, Self::TypeMismatch { .. } | Self::UnknownEventType(_))
    }

    /// Returns the error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            Self::TypeMismatch { .. } | Self::UnknownEventType(_) => "registry",
            Self::MissingValue(_) | Self::InvalidValue { .. } => "validation",
            Self::Config(_) => "config",
            Self::Io(_) => "io",
            Self::Yaml(_) => "serialization",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_mismatch_message() {
        let err = RollstatError::type_mismatch("Success", "MaxUpdater");
        assert_eq!(err.to_string(), "Type mismatch: Success is not a MaxUpdater");
        assert_eq!(err.category(), "registry");
        assert!(err.is_wiring_defect());
    }

    #[test]
    fn test_unknown_event_type() {
        let err = RollstatError::UnknownEventType("Bogus");
        assert_eq!(err.to_string(), "Unknown type of event: Bogus");
        assert!(err.is_wiring_defect());
    }

    #[test]
    fn test_invalid_value() {
        let err = RollstatError::InvalidValue {
            event: "Success",
            value: -10,
        };
        assert_eq!(err.to_string(), "Invalid value: Success cannot take -10");
        assert_eq!(err.category(), "validation");
        assert!(!err.is_wiring_defect());
    }

    #[test]
    fn test_config_error() {
        let err = RollstatError::config("buckets must be greater than 0");
        assert_eq!(err.to_string(), "Configuration error: buckets must be greater than 0");
        assert_eq!(err.category(), "config");
        assert!(!err.is_wiring_defect());
    }
}
