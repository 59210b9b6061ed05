use thiserror::Error;

#[derive(Debug, Error)]
pub enum SqlTemplateError {
    #[error(transparent)]
    SqliteError(#[from] rusqlite::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Invalid SQL: {0}")]
    InvalidSql(String),

    #[error("Parameter count mismatch: statement declares {expected} placeholder(s), got {actual} argument(s)")]
    ParameterCountMismatch { expected: usize, actual: usize },

    /// A caller argument could not be bound to the prepared statement.
    #[error("Cannot bind parameter {index} of type {type_name} via {setter}: {reason}")]
    BindingError {
        /// 1-based placeholder index.
        index: usize,
        type_name: String,
        setter: String,
        reason: String,
    },

    #[error("Row decoding error: {0}")]
    DecodeError(String),

    #[error("Query returned no rows")]
    NoRows,

    /// Failure while preparing, executing or reducing a statement.
    #[error("Cannot execute query `{sql}`: {source}")]
    ExecutionError {
        sql: String,
        #[source]
        source: Box<SqlTemplateError>,
    },
}

impl SqlTemplateError {
    #[must_use]
    pub fn is_binding_error(&self) -> bool {
        matches!(self, Self::BindingError { .. })
    }

    #[must_use]
    pub fn is_execution_error(&self) -> bool {
        matches!(self, Self::ExecutionError { .. })
    }

    /// SQL text carried by an execution error.
    #[must_use]
    pub fn sql(&self) -> Option<&str> {
        match self {
            Self::ExecutionError { sql, .. } => Some(sql),
            _ => None,
        }
    }

    /// Innermost error, skipping any execution wrappers.
    #[must_use]
    pub fn root_cause(&self) -> &SqlTemplateError {
        let mut current = self;
        while let Self::ExecutionError { source, .. } = current {
            current = source;
        }
        current
    }
}
