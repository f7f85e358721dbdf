//! Identity extraction for the Web API.
//!
//! Authentication is an external collaborator: an upstream middleware
//! terminates the session and forwards the resolved account identity in
//! trusted headers. This extractor reads those headers; it never
//! re-verifies them.

use axum::http::request::Parts;
use axum::{extract::FromRequestParts, http::HeaderMap};

use crate::db::NewAccount;
use crate::web::error::ApiError;

/// Header carrying the resolved account identity.
pub const ACCOUNT_ID_HEADER: &str = "x-account-id";
/// Optional profile headers forwarded by the auth layer.
pub const ACCOUNT_EMAIL_HEADER: &str = "x-account-email";
pub const ACCOUNT_FIRST_NAME_HEADER: &str = "x-account-first-name";
pub const ACCOUNT_LAST_NAME_HEADER: &str = "x-account-last-name";
pub const ACCOUNT_PROFILE_IMAGE_HEADER: &str = "x-account-profile-image";

/// The authenticated identity attached to a request.
#[derive(Debug, Clone)]
pub struct AuthIdentity {
    /// Opaque account identity. Trusted as-is.
    pub account_id: String,
    /// Email forwarded by the auth layer, if any.
    pub email: Option<String>,
    /// First name forwarded by the auth layer, if any.
    pub first_name: Option<String>,
    /// Last name forwarded by the auth layer, if any.
    pub last_name: Option<String>,
    /// Profile image URL forwarded by the auth layer, if any.
    pub profile_image_url: Option<String>,
}

impl AuthIdentity {
    /// Build the profile record used for the insert-or-update on
    /// authentication.
    pub fn to_new_account(&self) -> NewAccount {
        NewAccount {
            id: self.account_id.clone(),
            email: self.email.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            profile_image_url: self.profile_image_url.clone(),
        }
    }
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl<S> FromRequestParts<S> for AuthIdentity
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            let account_id = header_value(&parts.headers, ACCOUNT_ID_HEADER)
                .ok_or_else(|| ApiError::unauthorized("Missing account identity"))?;

            Ok(AuthIdentity {
                account_id,
                email: header_value(&parts.headers, ACCOUNT_EMAIL_HEADER),
                first_name: header_value(&parts.headers, ACCOUNT_FIRST_NAME_HEADER),
                last_name: header_value(&parts.headers, ACCOUNT_LAST_NAME_HEADER),
                profile_image_url: header_value(&parts.headers, ACCOUNT_PROFILE_IMAGE_HEADER),
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_header_value_trims_and_filters_empty() {
        let mut headers = HeaderMap::new();
        headers.insert(ACCOUNT_ID_HEADER, HeaderValue::from_static("  user-1  "));
        headers.insert(ACCOUNT_EMAIL_HEADER, HeaderValue::from_static(""));

        assert_eq!(
            header_value(&headers, ACCOUNT_ID_HEADER).as_deref(),
            Some("user-1")
        );
        assert!(header_value(&headers, ACCOUNT_EMAIL_HEADER).is_none());
        assert!(header_value(&headers, ACCOUNT_FIRST_NAME_HEADER).is_none());
    }

    #[test]
    fn test_to_new_account() {
        let identity = AuthIdentity {
            account_id: "user-1".to_string(),
            email: Some("a@example.com".to_string()),
            first_name: None,
            last_name: None,
            profile_image_url: None,
        };

        let new_account = identity.to_new_account();
        assert_eq!(new_account.id, "user-1");
        assert_eq!(new_account.email.as_deref(), Some("a@example.com"));
    }
}
