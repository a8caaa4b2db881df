//! Mail dispatch
//!
//! Transport and template rendering live outside this service. The logging
//! dispatcher resolves which template a mail would be rendered with and
//! records the dispatch without exposing credentials.

pub mod log_dispatcher;

pub use log_dispatcher::LogMailDispatcher;
