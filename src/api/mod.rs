//! API Module
//!
//! HTTP surface of the dashboard service: handlers and the route table.

pub mod handlers;
pub mod routes;

pub use handlers::AppState;
pub use routes::create_router;
