// Request handlers
pub mod custom;
pub mod dispatch;
