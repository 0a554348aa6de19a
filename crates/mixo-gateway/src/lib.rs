//! HTTP endpoint for recipe conversion with CORS, rate limiting and a health check.

mod error;
mod handlers;
mod router;
mod server;

pub use error::GatewayError;
pub use server::GatewayServer;
