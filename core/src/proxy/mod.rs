//! Proxy module - path-based reverse proxy server

pub mod error;
pub mod handlers;
pub mod headers;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod upstream;

pub use error::{ProxyError, ProxyResult};
pub use routes::{RouteEntry, RouteTable};
pub use server::{build_router, AppState, ProxyServer};
