//! Data transfer objects for the Web API.

mod request;
mod response;

pub use request::ConnectTelegramRequest;
pub use response::{AccountResponse, ApiResponse, FileResponse, MessageResponse};
