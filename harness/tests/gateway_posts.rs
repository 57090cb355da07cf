mod common;

use chrono::{Duration, Utc};
use common::{
    assert_api_error, assert_api_error_matching, config, invalid_token, is_invalid_input,
    NON_EXISTENT_ID,
};
use gateway::models::post::{CreatePostRequest, MediaItemInput, PostFilter, UpdatePostRequest};
use gateway::{ApiErrorKind, Credentials};
use harness::scenario;

#[tokio::test]
#[ignore = "needs a running gateway"]
async fn create_and_get_post() -> anyhow::Result<()> {
    scenario(config(), |ctx| async move {
        let author = ctx.register_user().await?;
        let request = ctx.fixtures().create_post_request();

        let created = ctx
            .gateway()
            .create_post(&author.credentials(), &request)
            .await?;
        ctx.track_post(created.id, author.id, author.access_token());

        assert!(created.id > 0);
        assert_eq!(created.title, request.title);
        assert_eq!(created.content, request.content);
        assert_eq!(created.author_id, author.id);
        assert_eq!(created.author_username, author.username);
        assert_eq!(created.media.len(), request.media_items.len());
        assert_eq!(created.tags.len(), request.tags.len());

        let fetched = ctx
            .gateway()
            .get_post_by_id(&author.credentials(), created.id)
            .await?;
        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.title, request.title);
        assert_eq!(fetched.author.id, author.id);
        Ok(())
    })
    .await
}

#[tokio::test]
#[ignore = "needs a running gateway"]
async fn create_post_rejections() -> anyhow::Result<()> {
    scenario(config(), |ctx| async move {
        let author = ctx.register_user().await?;
        let request = ctx.fixtures().create_post_request();

        assert_api_error(
            ctx.gateway().create_post(&Credentials::Anonymous, &request).await,
            ApiErrorKind::Unauthenticated,
        );
        assert_api_error(
            ctx.gateway().create_post(&invalid_token(), &request).await,
            ApiErrorKind::InvalidToken,
        );

        let invalid = [
            CreatePostRequest {
                title: String::new(),
                content: "Test content".into(),
                ..Default::default()
            },
            CreatePostRequest {
                title: "x".repeat(256),
                content: "Test content".into(),
                ..Default::default()
            },
            CreatePostRequest {
                title: "Test Title".into(),
                content: "Test content".into(),
                media_items: vec![MediaItemInput {
                    media_type: "invalid_type".into(),
                    url: "https://example.com/image.jpg".into(),
                    position: 1,
                }],
                ..Default::default()
            },
            CreatePostRequest {
                title: "Test Title".into(),
                content: "Test content".into(),
                media_items: vec![MediaItemInput {
                    media_type: "image".into(),
                    url: "not-a-valid-url".into(),
                    position: 1,
                }],
                ..Default::default()
            },
        ];
        for request in invalid {
            let result = ctx.gateway().create_post(&author.credentials(), &request).await;
            if let Ok(post) = &result {
                ctx.track_post(post.id, author.id, author.access_token());
            }
            assert_api_error_matching(result, is_invalid_input, "a validation error");
        }
        Ok(())
    })
    .await
}

#[tokio::test]
#[ignore = "needs a running gateway"]
async fn get_missing_post() -> anyhow::Result<()> {
    scenario(config(), |ctx| async move {
        let author = ctx.register_user().await?;
        assert_api_error(
            ctx.gateway()
                .get_post_by_id(&author.credentials(), NON_EXISTENT_ID)
                .await,
            ApiErrorKind::PostNotFound,
        );
        Ok(())
    })
    .await
}

#[tokio::test]
#[ignore = "needs a running gateway"]
async fn update_post() -> anyhow::Result<()> {
    scenario(config(), |ctx| async move {
        let author = ctx.register_user().await?;
        let post = ctx.create_post(&author).await?;

        let request = ctx.fixtures().update_post_request();
        let updated = ctx
            .gateway()
            .update_post(&author.credentials(), post.id, &request)
            .await?;
        assert_eq!(updated.id, post.id);
        assert_eq!(updated.title, request.title);
        assert_eq!(updated.content, request.content);

        // Fields left out of the request keep their value
        let title_only = UpdatePostRequest {
            title: "Updated Title Only".into(),
            ..Default::default()
        };
        let updated = ctx
            .gateway()
            .update_post(&author.credentials(), post.id, &title_only)
            .await?;
        assert_eq!(updated.title, title_only.title);
        assert_eq!(updated.content, request.content);
        Ok(())
    })
    .await
}

#[tokio::test]
#[ignore = "needs a running gateway"]
async fn update_post_rejections() -> anyhow::Result<()> {
    scenario(config(), |ctx| async move {
        let author = ctx.register_user().await?;
        let other = ctx.register_user().await?;
        let post = ctx.create_post(&author).await?;
        let request = ctx.fixtures().update_post_request();

        assert_api_error(
            ctx.gateway()
                .update_post(&other.credentials(), post.id, &request)
                .await,
            ApiErrorKind::Forbidden,
        );
        assert_api_error(
            ctx.gateway()
                .update_post(&author.credentials(), NON_EXISTENT_ID, &request)
                .await,
            ApiErrorKind::PostNotFound,
        );

        let too_long = UpdatePostRequest {
            title: "Valid Title".into(),
            content: "too long content ".repeat(10_000),
            ..Default::default()
        };
        if let Err(e) = ctx
            .gateway()
            .update_post(&author.credentials(), post.id, &too_long)
            .await
        {
            assert!(e.kind().is_some_and(is_invalid_input), "unexpected error: {e}");
        }
        Ok(())
    })
    .await
}

#[tokio::test]
#[ignore = "needs a running gateway"]
async fn delete_post() -> anyhow::Result<()> {
    scenario(config(), |ctx| async move {
        let author = ctx.register_user().await?;
        let other = ctx.register_user().await?;
        let post = ctx.create_post(&author).await?;

        assert_api_error(
            ctx.gateway().delete_post(&Credentials::Anonymous, post.id).await,
            ApiErrorKind::Unauthenticated,
        );
        assert_api_error(
            ctx.gateway().delete_post(&invalid_token(), post.id).await,
            ApiErrorKind::InvalidToken,
        );
        assert_api_error(
            ctx.gateway().delete_post(&other.credentials(), post.id).await,
            ApiErrorKind::Forbidden,
        );
        assert_api_error(
            ctx.gateway()
                .delete_post(&author.credentials(), NON_EXISTENT_ID)
                .await,
            ApiErrorKind::PostNotFound,
        );

        ctx.gateway().delete_post(&author.credentials(), post.id).await?;
        assert_api_error(
            ctx.gateway().get_post_by_id(&author.credentials(), post.id).await,
            ApiErrorKind::PostNotFound,
        );
        Ok(())
    })
    .await
}

#[tokio::test]
#[ignore = "needs a running gateway"]
async fn list_posts() -> anyhow::Result<()> {
    scenario(config(), |ctx| async move {
        let started = Utc::now() - Duration::minutes(1);
        let author = ctx.register_user().await?;
        let credentials = author.credentials();
        let mut created = Vec::new();
        for _ in 0..5 {
            created.push(ctx.create_post(&author).await?);
        }

        let all = ctx
            .gateway()
            .list_posts(&credentials, &PostFilter::by_author(author.id))
            .await?;
        assert_eq!(all.posts.len(), created.len());
        assert!(all.posts.iter().all(|p| p.author.id == author.id));
        for post in &created {
            assert!(all.posts.iter().any(|p| p.id == post.id));
        }

        let nobody = ctx
            .gateway()
            .list_posts(&credentials, &PostFilter::by_author(NON_EXISTENT_ID))
            .await?;
        assert!(nobody.posts.is_empty());

        let window = PostFilter {
            created_after: Some(started),
            created_before: Some(Utc::now() + Duration::minutes(1)),
            ..PostFilter::by_author(author.id)
        };
        let in_window = ctx.gateway().list_posts(&credentials, &window).await?;
        assert_eq!(in_window.posts.len(), created.len());

        let first = PostFilter {
            limit: Some(2),
            ..PostFilter::by_author(author.id)
        };
        let second = PostFilter {
            offset: Some(2),
            ..first.clone()
        };
        let first = ctx.gateway().list_posts(&credentials, &first).await?;
        let second = ctx.gateway().list_posts(&credentials, &second).await?;
        assert_eq!(first.posts.len(), 2);
        assert_eq!(second.posts.len(), 2);
        assert!(first
            .posts
            .iter()
            .all(|a| second.posts.iter().all(|b| a.id != b.id)));

        let reversed = PostFilter {
            created_after: Some(Utc::now() + Duration::days(1)),
            created_before: Some(Utc::now() - Duration::days(1)),
            ..PostFilter::by_author(author.id)
        };
        if let Err(e) = ctx.gateway().list_posts(&credentials, &reversed).await {
            assert!(e.kind().is_some_and(is_invalid_input), "unexpected error: {e}");
        }
        Ok(())
    })
    .await
}
