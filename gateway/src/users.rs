use log::info;
use reqwest::Method;
use serde::de::IgnoredAny;

use crate::models::core::Id;
use crate::models::user::{
    CreateUserRequest, SearchUsersResponse, UpdateAvatarRequest, UpdateUserRequest, User,
};
use crate::{Credentials, Gateway, GatewayError, Result};

impl Gateway {
    #[allow(clippy::missing_errors_doc)]
    pub async fn create_user(&self, credentials: &Credentials, request: &CreateUserRequest) -> Result<User> {
        let user: User = self.post(credentials, "/v1/users", request).await?;
        info!("Created user {} '{}'", user.id, user.username);
        Ok(user)
    }

    #[allow(clippy::missing_errors_doc)]
    pub async fn get_user_by_id(&self, credentials: &Credentials, user_id: Id) -> Result<User> {
        self.get(credentials, &format!("/v1/users/{user_id}"), &[])
            .await
    }

    #[allow(clippy::missing_errors_doc)]
    pub async fn get_user_by_username(&self, credentials: &Credentials, username: &str) -> Result<User> {
        if username.is_empty() {
            return Err(GatewayError::RequiredParameter("username".into()));
        }
        let url = self.endpoint_url_with_segment("/v1/users/username", username)?;
        self.request(credentials, Method::GET, url, &[], None).await
    }

    #[allow(clippy::missing_errors_doc)]
    pub async fn get_user_by_email(&self, credentials: &Credentials, email: &str) -> Result<User> {
        if email.is_empty() {
            return Err(GatewayError::RequiredParameter("email".into()));
        }
        let url = self.endpoint_url_with_segment("/v1/users/email", email)?;
        self.request(credentials, Method::GET, url, &[], None).await
    }

    /// Updates the user identified by `request.id`
    #[allow(clippy::missing_errors_doc)]
    pub async fn update_user(&self, credentials: &Credentials, request: &UpdateUserRequest) -> Result<User> {
        let user: User = self
            .put(credentials, &format!("/v1/users/{}", request.id), Some(request))
            .await?;
        info!("Updated user {}", user.id);
        Ok(user)
    }

    #[allow(clippy::missing_errors_doc)]
    pub async fn update_avatar(
        &self,
        credentials: &Credentials,
        user_id: Id,
        request: &UpdateAvatarRequest,
    ) -> Result<()> {
        self.put::<IgnoredAny, _>(credentials, &format!("/v1/users/{user_id}/avatar"), Some(request))
            .await?;
        info!("Updated avatar of user {user_id}");
        Ok(())
    }

    #[allow(clippy::missing_errors_doc)]
    pub async fn delete_user(&self, credentials: &Credentials, user_id: Id) -> Result<()> {
        self.delete::<IgnoredAny>(credentials, &format!("/v1/users/{user_id}"))
            .await?;
        info!("Deleted user {user_id}");
        Ok(())
    }

    /// Page and limit are only sent when positive
    #[allow(clippy::missing_errors_doc)]
    pub async fn search_users(
        &self,
        credentials: &Credentials,
        query: &str,
        page: i32,
        limit: i32,
    ) -> Result<SearchUsersResponse> {
        let mut params = vec![("query", query.to_string())];
        if page > 0 {
            params.push(("page", page.to_string()));
        }
        if limit > 0 {
            params.push(("limit", limit.to_string()));
        }
        self.get(credentials, "/v1/users/search", &params).await
    }
}
