use thiserror::Error;

#[derive(Error, Debug)]
pub enum CollectError {
    #[error(transparent)]
    RequestError(#[from] reqwest::Error),
    #[error("bad status {0}")]
    BadStatus(u16),
    #[error("deadline exceeded")]
    Deadline(#[from] tokio::time::error::Elapsed),
    #[error("no proxies collected (all sources failed or filtered)")]
    Empty,
}
