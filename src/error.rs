use thiserror::Error;

#[derive(Error, Debug)]
pub enum QuizError {
    #[error("no words match the selected years and filter")]
    EmptyPool,

    #[error("a quiz needs at least one word")]
    EmptySession,

    #[error("no missed words to retry")]
    NothingToRetry,
}

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("network support is not compiled in")]
    NetworkDisabled,

    #[error("feed request returned HTTP {0}")]
    Http(u16),

    #[error("feed request failed: {0}")]
    Request(String),

    #[error("failed to read feed file: {0}")]
    Io(#[from] std::io::Error),

    #[error("feed contained no valid lines")]
    Empty,
}
