//! Web API module for cumulus.
//!
//! A REST API over the catalog, quota accounting and ingestion
//! pipeline. Authentication is handled upstream; see
//! [`middleware::AuthIdentity`].

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use router::create_router;
pub use server::WebServer;
