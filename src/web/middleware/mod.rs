//! Middleware for the Web API.

mod auth;
mod cors;

pub use auth::{
    AuthIdentity, ACCOUNT_EMAIL_HEADER, ACCOUNT_FIRST_NAME_HEADER, ACCOUNT_ID_HEADER,
    ACCOUNT_LAST_NAME_HEADER, ACCOUNT_PROFILE_IMAGE_HEADER,
};
pub use cors::create_cors_layer;
