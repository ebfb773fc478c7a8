//! Error types for provisioning configuration.

use thiserror::Error;

/// Errors that can occur when building or decoding provisioning config.
///
/// All of these abort the load of the configuration unit they came from.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProvisionError {
    /// The configuration is malformed or self-contradictory.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The provider family discriminator is not registered.
    #[error("unsupported provider type: {0:?}")]
    UnsupportedProviderType(String),

    /// The configuration could not be encoded.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl ProvisionError {
    /// Invalid value for a named field.
    pub fn invalid_field(field: &str, message: impl std::fmt::Display) -> Self {
        ProvisionError::InvalidConfiguration(format!("`{field}` {message}"))
    }

    /// Returns true if this is an [`ProvisionError::InvalidConfiguration`].
    pub fn is_invalid_configuration(&self) -> bool {
        matches!(self, ProvisionError::InvalidConfiguration(_))
    }

    /// Returns true if this is an [`ProvisionError::UnsupportedProviderType`].
    pub fn is_unsupported_provider(&self) -> bool {
        matches!(self, ProvisionError::UnsupportedProviderType(_))
    }

    pub(crate) fn encode(err: serde_json::Error) -> Self {
        ProvisionError::Serialization(err.to_string())
    }
}

const INVALID_PREFIX: &str = "invalid configuration: ";

impl From<serde_json::Error> for ProvisionError {
    fn from(err: serde_json::Error) -> Self {
        // Validation errors raised inside decode already carry the prefix.
        let message = err.to_string();
        let stripped = message.strip_prefix(INVALID_PREFIX).map(str::to_owned);
        ProvisionError::InvalidConfiguration(stripped.unwrap_or(message))
    }
}

/// Fail with [`ProvisionError::InvalidConfiguration`] unless `lower <= upper`.
pub(crate) fn check_bounds(
    lower_field: &str,
    lower: i32,
    upper_field: &str,
    upper: i32,
) -> Result<(), ProvisionError> {
    if lower < 0 {
        return Err(ProvisionError::invalid_field(
            lower_field,
            format_args!("must be non-negative, got {lower}"),
        ));
    }
    if upper < 0 {
        return Err(ProvisionError::invalid_field(
            upper_field,
            format_args!("must be non-negative, got {upper}"),
        ));
    }
    if lower > upper {
        return Err(ProvisionError::invalid_field(
            lower_field,
            format_args!("({lower}) must not exceed `{upper_field}` ({upper})"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_bounds() {
        assert!(check_bounds("min", 2, "max", 3).is_ok());
        assert!(check_bounds("min", 3, "max", 3).is_ok());

        let err = check_bounds("minNumWorkers", 3, "maxNumWorkers", 2).unwrap_err();
        assert!(err.is_invalid_configuration());
        assert!(err.to_string().contains("minNumWorkers"));

        let err = check_bounds("min", -1, "max", 2).unwrap_err();
        assert!(err.to_string().contains("non-negative"));
    }
}
