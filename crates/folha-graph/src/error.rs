use thiserror::Error;

/// Faults that escape the graph
///
/// Operational failures (model outages, bad SQL) never show up here; nodes
/// turn them into messages. What remains are internal defects and misuse of
/// the session guard.
#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Routing fault: {0}")]
    Routing(String),

    #[error("Session '{0}' already has a turn in flight")]
    SessionBusy(String),

    #[error("Tool task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

pub type GraphResult<T> = std::result::Result<T, GraphError>;
