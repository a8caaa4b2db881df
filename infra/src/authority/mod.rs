//! Access token authority clients
//!
//! The authority owns access tokens and user credentials. `HttpAccessAuthority`
//! talks to a deployed authority; `DevAccessAuthority` stands in for it during
//! local development.

pub mod dev;
pub mod http;

pub use dev::DevAccessAuthority;
pub use http::HttpAccessAuthority;
