//! Grant flows: client validation, credential checks, issuance and refresh.

use tracing::{info, warn};

use ferrum_auth::jwt::{TOKEN_TYPE_BEARER, TOKEN_TYPE_REFRESH};
use ferrum_auth::password::PasswordEncoder;
use ferrum_core::ErrorKind;
use ferrum_core::error::AppError;
use ferrum_core::result::AppResult;
use ferrum_entity::client::Client;
use ferrum_entity::realm::Realm;
use ferrum_entity::user::UserDocument;

use super::AuthorizationEngine;
use crate::dto::error::{
    INVALID_CLIENT_CREDENTIALS_DESC, INVALID_TOKEN_DESC, INVALID_USER_CREDENTIALS_DESC,
};
use crate::dto::token::{GRANT_TYPE_PASSWORD, GRANT_TYPE_REFRESH_TOKEN};
use crate::dto::{TokenGenerationData, TokenResponse};

impl AuthorizationEngine {
    /// Handles a token endpoint request for `realm`.
    ///
    /// The realm must exist. `password` grants validate the client and the
    /// user and then issue tokens; `refresh_token` grants validate the
    /// client and then refresh the session behind the token.
    pub async fn get_token(
        &self,
        realm: &str,
        grant: &TokenGenerationData,
    ) -> AppResult<TokenResponse> {
        let realm = self.store.get_realm(realm).await?;

        match grant.grant_type.as_str() {
            GRANT_TYPE_PASSWORD => {
                self.validate_client(&realm, grant).await?;
                let user = self.check_credentials(&realm, grant).await?;
                self.issue(&realm, &user, &grant.scope)
            }
            GRANT_TYPE_REFRESH_TOKEN => {
                self.validate_client(&realm, grant).await?;
                self.refresh(&realm, &grant.refresh_token).await
            }
            other => Err(AppError::validation(format!(
                "unsupported grant type '{other}'"
            ))),
        }
    }

    /// Looks up the requesting client and checks its secret.
    ///
    /// An unknown client and a wrong secret both fail with
    /// `InvalidClient`. Store failures other than a missing client pass
    /// through.
    pub async fn validate_client(
        &self,
        realm: &Realm,
        grant: &TokenGenerationData,
    ) -> AppResult<Client> {
        let client = match self.store.get_client(&realm.name, &grant.client_id).await {
            Ok(client) => client,
            Err(e) if e.is(ErrorKind::NotFound) => {
                warn!(realm = %realm.name, client_id = %grant.client_id, "Unknown client");
                return Err(AppError::invalid_client(INVALID_CLIENT_CREDENTIALS_DESC));
            }
            Err(e) => return Err(e),
        };

        if !client.accepts_secret(grant.client_secret.as_deref()) {
            warn!(realm = %realm.name, client_id = %grant.client_id, "Client secret rejected");
            return Err(AppError::invalid_client(INVALID_CLIENT_CREDENTIALS_DESC));
        }

        Ok(client)
    }

    /// Checks the username and password of a password grant.
    ///
    /// Federated users fail with `NotImplemented`.
    pub async fn check_credentials(
        &self,
        realm: &Realm,
        grant: &TokenGenerationData,
    ) -> AppResult<UserDocument> {
        let rejected = || AppError::invalid_user_credentials(INVALID_USER_CREDENTIALS_DESC);

        if grant.username.is_empty() {
            return Err(rejected());
        }

        let user = match self.store.get_user(&realm.name, &grant.username).await {
            Ok(user) => user,
            Err(e) if e.is(ErrorKind::NotFound) || e.is(ErrorKind::ZeroLength) => {
                warn!(realm = %realm.name, username = %grant.username, "Unknown user");
                return Err(rejected());
            }
            Err(e) => return Err(e),
        };

        if user.is_federated() {
            warn!(
                realm = %realm.name,
                username = %grant.username,
                federation = user.federation_name().unwrap_or_default(),
                "Federated user cannot sign in"
            );
            return Err(AppError::not_implemented("user federation is not supported"));
        }

        let encoder = PasswordEncoder::for_realm(realm);
        match user.password_hash() {
            Some(hash) if encoder.matches(&grant.password, hash) => Ok(user),
            _ => {
                warn!(realm = %realm.name, username = %grant.username, "Password rejected");
                Err(rejected())
            }
        }
    }

    /// Starts or renews the user's session and mints a token pair for it.
    pub fn issue(&self, realm: &Realm, user: &UserDocument, scope: &str) -> AppResult<TokenResponse> {
        let user_id = user.id()?;
        let session_id = self.sessions.start_or_update_session(
            &realm.name,
            user_id,
            realm.token_expiration,
            realm.refresh_expiration,
        );
        let session = self
            .sessions
            .get_session(&realm.name, user_id)
            .ok_or_else(|| AppError::internal(format!("session {session_id} vanished")))?;

        let issuer = self.issuer(&realm.name);
        let access_token =
            self.encoder
                .generate_access_token(&issuer, TOKEN_TYPE_BEARER, scope, &session, user)?;
        let refresh_token =
            self.encoder
                .generate_refresh_token(&issuer, TOKEN_TYPE_REFRESH, scope, &session)?;
        self.sessions
            .assign_tokens(&realm.name, user_id, &access_token, &refresh_token);

        info!(
            realm = %realm.name,
            username = %user.username(),
            session_id = %session_id,
            "Tokens issued"
        );

        Ok(TokenResponse {
            access_token,
            expires_in: realm.token_expiration,
            refresh_expires_in: realm.refresh_expiration,
            refresh_token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            not_before_policy: 0,
            session_state: session_id,
            scope: scope.to_string(),
        })
    }

    /// Exchanges a refresh token for a new token pair of the same session.
    ///
    /// The token must be the last one issued for its session, carry a
    /// valid signature and still be inside the refresh window.
    ///
    /// The lookup and the token rotation take the realm's session lock
    /// separately, so concurrent refreshes presenting the same token can
    /// all succeed. Refresh tokens are not strictly single-use.
    pub async fn refresh(&self, realm: &Realm, refresh_token: &str) -> AppResult<TokenResponse> {
        let rejected = || AppError::unauthorized(INVALID_TOKEN_DESC);

        let session = self
            .sessions
            .get_session_by_refresh_token(&realm.name, refresh_token)
            .ok_or_else(|| {
                warn!(realm = %realm.name, "Unknown refresh token");
                rejected()
            })?;

        if session.is_refresh_expired() {
            warn!(realm = %realm.name, session_id = %session.id, "Refresh token expired");
            return Err(rejected());
        }

        let claims = self.decoder.decode(refresh_token).map_err(|e| {
            warn!(realm = %realm.name, session_id = %session.id, error = %e, "Refresh token rejected");
            rejected()
        })?;
        let scope = claims
            .get("scope")
            .and_then(|s| s.as_str())
            .unwrap_or_default()
            .to_string();

        let user = match self.store.get_user_by_id(&realm.name, session.user_id).await {
            Ok(user) => user,
            Err(e) if e.is(ErrorKind::NotFound) || e.is(ErrorKind::ZeroLength) => {
                warn!(realm = %realm.name, user_id = %session.user_id, "Session user is gone");
                return Err(rejected());
            }
            Err(e) => return Err(e),
        };

        self.issue(realm, &user, &scope)
    }
}
