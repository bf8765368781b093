use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum DefinitionError {
    #[error("default value of '{key}' is {found}, expected {expected}")]
    DefaultKind {
        key: String,
        expected: String,
        found: String,
    },
    #[error("filter key '{key}' defined more than once")]
    DuplicateKey {
        key: String,
    },
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum IndexError {
    #[error("dimension with name: {name} not found")]
    NotFound {
        name: String,
    },
    #[error("collection of {len} entities exceeds bitmap capacity")]
    TooLarge {
        len: usize,
    },
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum StoreError {
    #[error("unknown filter key: '{key}'")]
    UnknownKey {
        key: String,
    },
    #[error("value for '{key}' is {found}, expected {expected}")]
    KindMismatch {
        key: String,
        expected: String,
        found: String,
    },
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {endpoint} failed: {source}")]
    Http {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("request to {endpoint} returned status {status}")]
    Status {
        endpoint: String,
        status: u16,
    },
    #[error("request to {endpoint} timed out after {secs}s")]
    Timeout {
        endpoint: String,
        secs: u64,
    },
    #[error("can not decode response from {endpoint}: {reason}")]
    Decode {
        endpoint: String,
        reason: String,
    },
}

#[derive(Debug, Error)]
pub enum ViewError {
    #[error("view is not ready")]
    NotReady,
    #[error("view was unmounted before data arrived")]
    Unmounted,
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Definition(#[from] DefinitionError),
    #[error(transparent)]
    Index(#[from] IndexError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Error)]
pub enum GlobalError {
    #[error(transparent)]
    Definition(#[from] DefinitionError),
    #[error(transparent)]
    Index(#[from] IndexError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    View(#[from] ViewError),
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
}
