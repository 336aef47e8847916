use thiserror::Error;

use crate::dialect::Dialect;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while constructing or binding a statement.
///
/// Construction errors come back from the call that caused them. Bind errors
/// come back from [`Query::prepare`](crate::Query::prepare), before any
/// executor sees the statement.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("unknown sql dialect `{0}`")]
    UnknownDialect(String),

    #[error("raw fragment references `{{:{name}}}` but no value was bound for it")]
    MissingRawParam { name: String },

    #[error("raw fragment was given `{name}` but never references `{{:{name}}}`")]
    UnusedRawParam { name: String },

    #[error("{operation} is not supported by the {dialect} dialect")]
    Unsupported {
        dialect: Dialect,
        operation: &'static str,
    },

    #[error("{statement} on `{table}` has an empty filter, use `unsafe_all_rows()` to target every row")]
    UnfilteredWrite {
        statement: &'static str,
        table: String,
    },

    #[error("{statement} on `{table}` needs at least one column")]
    EmptyRecord {
        statement: &'static str,
        table: String,
    },

    #[error("placeholder `{{:{0}}}` has no bound value")]
    MissingParam(String),
}

impl Error {
    pub(crate) fn unsupported(dialect: Dialect, operation: &'static str) -> Self {
        Error::Unsupported { dialect, operation }
    }

    pub(crate) fn unfiltered(statement: &'static str, table: &str) -> Self {
        Error::UnfilteredWrite {
            statement,
            table: table.to_string(),
        }
    }

    pub(crate) fn empty_record(statement: &'static str, table: &str) -> Self {
        Error::EmptyRecord {
            statement,
            table: table.to_string(),
        }
    }
}

/// Failure of an executed statement: either the statement could not be bound,
/// or the transport rejected it.
#[derive(Debug, Error)]
pub enum ExecError<E> {
    #[error(transparent)]
    Bind(#[from] Error),

    #[error(transparent)]
    Transport(E),
}
