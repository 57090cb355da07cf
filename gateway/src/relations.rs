use log::info;

use crate::models::core::{Id, MessageResponse};
use crate::models::relation::{FolloweesPage, FollowRequest, FollowersPage};
use crate::{Credentials, Gateway, Result};

impl Gateway {
    /// The owner of `credentials` starts following `followee_id`
    #[allow(clippy::missing_errors_doc)]
    pub async fn follow(&self, credentials: &Credentials, followee_id: Id) -> Result<MessageResponse> {
        let request = FollowRequest { followee_id };
        let response: Option<MessageResponse> =
            self.post(credentials, "/v1/relation/follow", &request).await?;
        info!("Now following user {followee_id}");
        Ok(response.unwrap_or_default())
    }

    #[allow(clippy::missing_errors_doc)]
    pub async fn unfollow(&self, credentials: &Credentials, followee_id: Id) -> Result<MessageResponse> {
        let request = FollowRequest { followee_id };
        let response: Option<MessageResponse> = self
            .post(credentials, "/v1/relation/unfollow", &request)
            .await?;
        info!("Unfollowed user {followee_id}");
        Ok(response.unwrap_or_default())
    }

    /// Page and limit are sent as given, the relation endpoints validate them
    #[allow(clippy::missing_errors_doc)]
    pub async fn get_followers(
        &self,
        credentials: &Credentials,
        user_id: Id,
        page: i32,
        limit: i32,
    ) -> Result<FollowersPage> {
        let query = [("page", page.to_string()), ("limit", limit.to_string())];
        self.get(credentials, &format!("/v1/relation/{user_id}/followers"), &query)
            .await
    }

    #[allow(clippy::missing_errors_doc)]
    pub async fn get_followees(
        &self,
        credentials: &Credentials,
        user_id: Id,
        page: i32,
        limit: i32,
    ) -> Result<FolloweesPage> {
        let query = [("page", page.to_string()), ("limit", limit.to_string())];
        self.get(credentials, &format!("/v1/relation/{user_id}/followees"), &query)
            .await
    }
}
