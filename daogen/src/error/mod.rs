use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the daogen runtime
#[derive(Error, Debug)]
pub enum Error {
    /// The destination type cannot be bound to result columns
    #[error("Binding error: {0}")]
    Binding(String),

    /// A column value could not be converted into the bound field
    #[error("Scan error on column '{column}' (field '{field}'): {message}")]
    Scan {
        column: String,
        field: String,
        message: String,
    },

    #[error("No rows in result set")]
    NoRows,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    // Database-specific errors
    #[error("Database connection error: {0}")]
    DatabaseConnection(String),

    #[error("Database query error: {0}")]
    DatabaseQuery(String),

    // Error with context chain
    #[error("{message}")]
    WithContext {
        message: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    pub fn binding(msg: impl Into<String>) -> Self {
        Self::Binding(msg.into())
    }

    /// Scan failure for a field; the column is attached by the materializer
    pub fn scan(field: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::Scan {
            column: String::new(),
            field: field.into(),
            message: message.to_string(),
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    // Database error constructors
    pub fn database_connection(msg: impl Into<String>) -> Self {
        Self::DatabaseConnection(msg.into())
    }

    pub fn database_query(msg: impl Into<String>) -> Self {
        Self::DatabaseQuery(msg.into())
    }

    // Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            message: context.into(),
            source: Box::new(self),
        }
    }

    /// Fill in the result column of a scan error
    pub fn at_column(self, name: &str) -> Self {
        match self {
            Error::Scan { field, message, .. } => Error::Scan {
                column: name.to_string(),
                field,
                message,
            },
            other => other,
        }
    }

    /// Get error code for diagnostics
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::Binding(_) => "E_BINDING",
            Error::Scan { .. } => "E_SCAN",
            Error::NoRows => "E_NO_ROWS",
            Error::Validation(_) => "E_VALIDATION",
            Error::Config(_) => "E_CONFIG",
            Error::DatabaseConnection(_) => "E_DB_CONNECTION",
            Error::DatabaseQuery(_) => "E_DB_QUERY",
            Error::WithContext { source, .. } => source.error_code(),
        }
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                Self::DatabaseConnection(err.to_string())
            }
            other => Self::DatabaseQuery(other.to_string()),
        }
    }
}
