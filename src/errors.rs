use thiserror::Error;

/// Unified error type for every order-now operation.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed or unreadable configuration
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// A required secret or setting is absent; fatal at startup
    #[error("Missing required configuration: {name}")]
    ConfigurationMissing {
        /// Name of the missing environment variable or setting
        name: String,
    },

    /// Anything reported by the persistence layer
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Inbound data failed a type, shape or range check
    #[error("Validation failed for `{field}`: {message}")]
    Validation {
        /// External (camelCase) name of the offending field
        field: String,
        /// Human-readable reason
        message: String,
    },

    /// An operation that needs a persisted entity was given a detached one
    #[error("{entity} is not attached to an active unit of work")]
    OutOfUnitOfWork {
        /// Table name of the detached entity
        entity: &'static str,
    },

    /// A row looked up by primary key does not exist
    #[error("{entity} {id} not found")]
    NotFound {
        /// Table name of the missing entity
        entity: &'static str,
        /// Primary key that was looked up
        id: i64,
    },

    /// Argon2 parameter or encoding failure (never a plain mismatch)
    #[error("Password hashing error: {message}")]
    PasswordHash {
        /// Underlying reason
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON decoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Builds a validation error, reporting `field` under its external name.
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        Self::Validation {
            field: crate::naming::camel_case(field),
            message: message.into(),
        }
    }
}

impl From<argon2::password_hash::Error> for Error {
    fn from(value: argon2::password_hash::Error) -> Self {
        Self::PasswordHash {
            message: value.to_string(),
        }
    }
}

impl From<argon2::Error> for Error {
    fn from(value: argon2::Error) -> Self {
        Self::PasswordHash {
            message: value.to_string(),
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_reports_external_field_name() {
        let err = Error::validation("table_number", "must not be negative");
        assert!(matches!(
            &err,
            Error::Validation { field, .. } if field == "tableNumber"
        ));
        assert_eq!(
            err.to_string(),
            "Validation failed for `tableNumber`: must not be negative"
        );
    }
}
