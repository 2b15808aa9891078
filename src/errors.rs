use thiserror::Error;

/// Errors produced by the reporting engine, the seeder and the configuration layer.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read or contained an invalid value
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// The store rejected a query or could not be reached
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// The month path segment is not one of the twelve lowercase month names
    #[error("Unknown month: {name}")]
    UnknownMonth {
        /// The raw path segment
        name: String,
    },

    /// The page query parameter is not a positive integer
    #[error("Invalid page: {raw}")]
    InvalidPage {
        /// The raw query value
        raw: String,
    },

    /// A seed payload entry violates a record invariant
    #[error("Invalid record {id}: {reason}")]
    InvalidRecord {
        /// Source identifier of the entry
        id: i64,
        /// Which invariant failed
        reason: String,
    },

    /// Fetching the remote dataset failed
    #[error("Upstream fetch failed: {0}")]
    Upstream(#[from] reqwest::Error),

    /// Socket or filesystem failure, e.g. binding the listener
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_io_error_converts() {
        fn bind() -> Result<()> {
            let outcome: std::result::Result<(), std::io::Error> =
                Err(std::io::Error::new(std::io::ErrorKind::AddrInUse, "port taken"));
            outcome?;
            Ok(())
        }

        let err = bind().unwrap_err();
        assert!(matches!(err, Error::Io(_)));
        assert_eq!(err.to_string(), "I/O error: port taken");
    }
}
