//! SMS dispatch
//!
//! Only the logging dispatcher ships here; a carrier integration implements
//! `SmsDispatcher` the same way.

pub mod log_dispatcher;

pub use log_dispatcher::LogSmsDispatcher;
