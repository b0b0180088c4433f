//! AI Proxy Core Library
//! Route table, header edits, upstream forwarding and the HTTP server

pub mod config;
pub mod proxy;
