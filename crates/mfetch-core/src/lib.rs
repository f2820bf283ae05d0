pub mod config;
pub mod logging;

pub mod checksum;
pub mod engine;
pub mod error;
pub mod options;
pub mod transfer;

pub use engine::{
    Engine, FetchResult, ResultHandler, SessionView, DEFAULT_MAX_BYTES, DEFAULT_MAX_SESSIONS,
    DEFAULT_POLL_BUDGET,
};
pub use error::EngineError;
pub use options::RequestOptions;
pub use transfer::{
    check_environment, Closed, Connector, CurlConnector, ResponseInfo, Transfer, TransferError,
};
