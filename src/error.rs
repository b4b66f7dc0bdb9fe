use thiserror::Error;

/// Result alias for `genlouvain`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by the partition, the move engine, coarsening and the
/// command boundary.
///
/// Every operation validates its input before mutating any state, so an
/// error always leaves the session as it was before the call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A command was called with the wrong number of arguments.
    #[error("{command} needs {expected} input argument(s), got {found}")]
    Arity {
        command: &'static str,
        expected: usize,
        found: usize,
    },

    /// A column, label vector or value array has the wrong length.
    #[error("expected {expected} entries, got {found}")]
    Shape { expected: usize, found: usize },

    /// The command handle is not part of the vocabulary.
    #[error("invalid handle '{0}'")]
    UnknownCommand(String),

    /// An argument had the wrong kind (index vs. number vs. column vs. text).
    #[error("argument '{argument}' must be {expected}")]
    TypeMismatch {
        argument: &'static str,
        expected: &'static str,
    },

    #[error("node {node} out of range (0..{count})")]
    NodeOutOfRange { node: usize, count: usize },

    #[error("group {group} out of range (0..{count})")]
    GroupOutOfRange { group: usize, count: usize },

    /// Group labels crossing the boundary must be positive integers.
    #[error("group label at position {position} is not a positive integer")]
    InvalidLabel { position: usize },

    #[error("no partition assigned")]
    Unassigned,

    #[error("malformed sparse column: {0}")]
    MalformedColumn(String),

    /// A packed column argument held the wrong number of columns.
    #[error("expected {expected} column(s), got {found}")]
    ColumnCount { expected: usize, found: usize },

    #[error("modularity matrix must be square, got {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },

    /// Weighted selection received weights it cannot sample from.
    #[error("move gains are not valid sampling weights")]
    InvalidWeights,

    #[error("failed to run trials: {0}")]
    ThreadPool(String),

    #[error("{0}")]
    Parse(String),

    #[error("{0}")]
    Io(String),
}
