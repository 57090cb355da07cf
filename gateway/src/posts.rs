use log::info;
use serde::de::IgnoredAny;

use crate::models::core::Id;
use crate::models::post::{
    CreatePostRequest, CreatePostResponse, ListPostsResponse, Post, PostFilter, UpdatePostRequest,
};
use crate::{Credentials, Gateway, Result};

impl Gateway {
    /// Creates a post authored by the owner of `credentials`
    #[allow(clippy::missing_errors_doc)]
    pub async fn create_post(
        &self,
        credentials: &Credentials,
        request: &CreatePostRequest,
    ) -> Result<CreatePostResponse> {
        let post: CreatePostResponse = self.post(credentials, "/v1/posts", request).await?;
        info!("Created post {} by author {}", post.id, post.author_id);
        Ok(post)
    }

    #[allow(clippy::missing_errors_doc)]
    pub async fn get_post_by_id(&self, credentials: &Credentials, post_id: Id) -> Result<Post> {
        self.get(credentials, &format!("/v1/posts/{post_id}"), &[])
            .await
    }

    #[allow(clippy::missing_errors_doc)]
    pub async fn update_post(
        &self,
        credentials: &Credentials,
        post_id: Id,
        request: &UpdatePostRequest,
    ) -> Result<Post> {
        let post: Post = self
            .put(credentials, &format!("/v1/posts/{post_id}"), Some(request))
            .await?;
        info!("Updated post {post_id}");
        Ok(post)
    }

    #[allow(clippy::missing_errors_doc)]
    pub async fn delete_post(&self, credentials: &Credentials, post_id: Id) -> Result<()> {
        self.delete::<IgnoredAny>(credentials, &format!("/v1/posts/{post_id}"))
            .await?;
        info!("Deleted post {post_id}");
        Ok(())
    }

    #[allow(clippy::missing_errors_doc)]
    pub async fn list_posts(&self, credentials: &Credentials, filter: &PostFilter) -> Result<ListPostsResponse> {
        self.get(credentials, "/v1/posts/list", &filter.to_query())
            .await
    }
}
