use log::info;
use serde::de::IgnoredAny;

use crate::models::auth::{
    LoginRequest, LogoutRequest, RefreshTokenRequest, RegisterRequest, TokenPair,
    UpdatePasswordRequest,
};
use crate::models::core::MessageResponse;
use crate::{Credentials, Gateway, Result};

impl Gateway {
    /// Registers a new account and returns its first token pair
    #[allow(clippy::missing_errors_doc)]
    pub async fn register(&self, credentials: &Credentials, request: &RegisterRequest) -> Result<TokenPair> {
        info!("Registering user '{}'", request.username);
        self.post(credentials, "/v1/auth/register", request).await
    }

    #[allow(clippy::missing_errors_doc)]
    pub async fn login(&self, credentials: &Credentials, request: &LoginRequest) -> Result<TokenPair> {
        info!("Logging in as '{}'", request.login);
        self.post(credentials, "/v1/auth/login", request).await
    }

    #[allow(clippy::missing_errors_doc)]
    pub async fn refresh_token(&self, credentials: &Credentials, refresh_token: &str) -> Result<TokenPair> {
        let request = RefreshTokenRequest {
            refresh_token: refresh_token.to_string(),
        };
        self.post(credentials, "/v1/auth/refresh", &request).await
    }

    #[allow(clippy::missing_errors_doc)]
    pub async fn logout(&self, credentials: &Credentials, refresh_token: &str) -> Result<()> {
        let request = LogoutRequest {
            refresh_token: refresh_token.to_string(),
        };
        self.post::<IgnoredAny, _>(credentials, "/v1/auth/logout", &request)
            .await?;
        info!("Logged out");
        Ok(())
    }

    #[allow(clippy::missing_errors_doc)]
    pub async fn update_password(
        &self,
        credentials: &Credentials,
        request: &UpdatePasswordRequest,
    ) -> Result<MessageResponse> {
        info!("Updating password");
        self.post(credentials, "/v1/auth/update-password", request)
            .await
    }
}
