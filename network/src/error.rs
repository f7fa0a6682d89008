use thiserror::Error;

#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("transport failure: {0}")]
    Transport(String),

    #[error("HTTP {status} from {url}")]
    Http { status: u16, url: String },

    #[error("response decode failure: {0}")]
    Decode(String),

    #[error("transaction rejected: {0}")]
    TxRejected(String),
}
