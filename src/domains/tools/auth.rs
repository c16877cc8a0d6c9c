//! Authorization header construction for outbound calls.

use base64::{Engine, engine::general_purpose::STANDARD};

use crate::domains::services::{AuthScheme, ServiceDefinition};

/// Scheme used for `token` auth when `token_type` is not configured.
const DEFAULT_TOKEN_TYPE: &str = "Bearer";

/// Build the `Authorization` header value for a service, if any.
///
/// - `basic`: `Basic base64(username:password)`
/// - `token`: `<token_type> <token>`, `token_type` defaulting to `Bearer`;
///   an explicitly empty `token_type` sends the bare token
/// - `oauth`: `Bearer <access_token>`
/// - anything else: no header
pub fn authorization_header(service: &ServiceDefinition) -> Option<String> {
    match service.auth_scheme() {
        AuthScheme::Basic => {
            let username = service.auth_field("username").unwrap_or_default();
            let password = service.auth_field("password").unwrap_or_default();
            let encoded = STANDARD.encode(format!("{}:{}", username, password));
            Some(format!("Basic {}", encoded))
        }
        AuthScheme::Token => {
            let token = service.auth_field("token").unwrap_or_default();
            let token_type = service
                .auth_field("token_type")
                .unwrap_or_else(|| DEFAULT_TOKEN_TYPE.to_string());
            if token_type.is_empty() {
                Some(token)
            } else {
                Some(format!("{} {}", token_type, token))
            }
        }
        AuthScheme::OAuth => {
            let access_token = service.auth_field("access_token").unwrap_or_default();
            Some(format!("Bearer {}", access_token))
        }
        AuthScheme::None => None,
    }
}
