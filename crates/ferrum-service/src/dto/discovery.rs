//! OpenID Connect discovery document.

use serde::{Deserialize, Serialize};

/// Discovery document of a realm, laid out like Keycloak's
/// `.well-known/openid-configuration`.
///
/// Endpoints the server does not serve are published as empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenIdConfiguration {
    pub issuer: String,
    pub authorization_endpoint: String,
    pub token_endpoint: String,
    pub introspection_endpoint: String,
    pub userinfo_endpoint: String,
    pub end_session_endpoint: String,
    pub device_authorization_endpoint: String,
    pub registration_endpoint: String,
    pub pushed_authorization_request_endpoint: String,
    pub bach_channel_authorization_endpoint: String,
    pub grant_types_supported: Vec<String>,
    pub response_types_supported: Vec<String>,
    pub response_modes_supported: Vec<String>,
    pub scopes_supported: Vec<String>,
    pub claims_supported: Vec<String>,
    pub claim_types_supported: Vec<String>,
    pub claims_parameter_supported: bool,
    pub request_parameter_supported: bool,
    pub code_challenge_methods_supported: Vec<String>,
    pub tls_client_certificate_bound_access_token: bool,
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl OpenIdConfiguration {
    /// Document for the realm whose tokens carry `issuer`.
    pub fn for_issuer(issuer: &str) -> Self {
        let endpoint = |path: &str| format!("{issuer}/protocol/openid-connect/{path}");

        Self {
            issuer: issuer.to_string(),
            authorization_endpoint: endpoint("auth"),
            token_endpoint: endpoint("token"),
            introspection_endpoint: endpoint("token/introspect"),
            userinfo_endpoint: endpoint("userinfo"),
            end_session_endpoint: endpoint("logout"),
            device_authorization_endpoint: String::new(),
            registration_endpoint: String::new(),
            pushed_authorization_request_endpoint: String::new(),
            bach_channel_authorization_endpoint: String::new(),
            grant_types_supported: owned(&["authorization_token", "refresh_token", "password"]),
            response_types_supported: owned(&["token", "code", "code token"]),
            response_modes_supported: owned(&["query", "fragment", "form_post"]),
            scopes_supported: owned(&["openid", "profile", "email"]),
            claims_supported: owned(&["sub", "email", "preferred_username"]),
            claim_types_supported: owned(&["normal"]),
            claims_parameter_supported: false,
            request_parameter_supported: false,
            code_challenge_methods_supported: Vec::new(),
            tls_client_certificate_bound_access_token: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_under_issuer() {
        let doc = OpenIdConfiguration::for_issuer("http://localhost:8182/auth/realms/r1");
        assert_eq!(
            doc.token_endpoint,
            "http://localhost:8182/auth/realms/r1/protocol/openid-connect/token"
        );
        assert_eq!(
            doc.introspection_endpoint,
            "http://localhost:8182/auth/realms/r1/protocol/openid-connect/token/introspect"
        );
        assert!(doc.grant_types_supported.iter().any(|g| g == "password"));
        assert!(doc.registration_endpoint.is_empty());
    }
}
