use thiserror::Error;

/// Rejected user input. The host surfaces these as a blocking notice; no
/// state is mutated when validation fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("task title must not be empty")]
    EmptyTitle,
    #[error("end time must be later than start time")]
    EndNotAfterStart,
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failures on the TickTick bridge. `MissingToken` is raised before any
/// network call; the rest are per-request.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("no TickTick access token configured")]
    MissingToken,
    #[error("TickTick API error: {status} - {body}")]
    Api { status: u16, body: String },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("task has an invalid date or time: {0}")]
    InvalidTask(String),
    #[error("unexpected TickTick response: {0}")]
    BadResponse(String),
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Umbrella error for controller operations; everything in here degrades to
/// a visible message in the host UI.
#[derive(Debug, Error)]
pub enum PanelError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Sync(#[from] SyncError),
    #[error("finish editing the current task first")]
    EditorBusy,
    #[error("a sync is already running")]
    SyncBusy,
    #[error("task not found")]
    TaskNotFound,
}
