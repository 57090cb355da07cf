mod common;

use common::{
    assert_api_error, assert_api_error_matching, config, invalid_token, is_invalid_input,
    wait_for_notification, NON_EXISTENT_ID,
};
use gateway::models::notification::FOLLOW_CREATED;
use gateway::{ApiErrorKind, Credentials};
use harness::scenario;

#[tokio::test]
#[ignore = "needs a running gateway"]
async fn follow_user() -> anyhow::Result<()> {
    scenario(config(), |ctx| async move {
        let follower = ctx.register_user().await?;
        let followee = ctx.register_user().await?;

        ctx.follow(&follower, &followee).await?;

        let followers = ctx
            .gateway()
            .get_followers(&followee.credentials(), followee.id, 1, 10)
            .await?;
        assert!(followers.contains(follower.id));

        let followees = ctx
            .gateway()
            .get_followees(&follower.credentials(), follower.id, 1, 10)
            .await?;
        assert!(followees.contains(followee.id));
        Ok(())
    })
    .await
}

#[tokio::test]
#[ignore = "needs a running gateway"]
async fn follow_creates_a_notification() -> anyhow::Result<()> {
    scenario(config(), |ctx| async move {
        let follower = ctx.register_user().await?;
        let followee = ctx.register_user().await?;

        ctx.follow(&follower, &followee).await?;

        let notification = wait_for_notification(&ctx, &followee, FOLLOW_CREATED).await?;
        assert_eq!(notification.user_id, followee.id);
        assert!(!notification.is_read);
        assert!(ctx
            .tracker()
            .notifications()
            .iter()
            .any(|n| n.id == notification.id));
        Ok(())
    })
    .await
}

#[tokio::test]
#[ignore = "needs a running gateway"]
async fn follow_rejections() -> anyhow::Result<()> {
    scenario(config(), |ctx| async move {
        let follower = ctx.register_user().await?;
        let followee = ctx.register_user().await?;
        let gateway = ctx.gateway();

        assert_api_error(
            gateway.follow(&Credentials::Anonymous, followee.id).await,
            ApiErrorKind::Unauthenticated,
        );
        assert_api_error(
            gateway.follow(&invalid_token(), followee.id).await,
            ApiErrorKind::InvalidToken,
        );
        assert_api_error(
            gateway.follow(&follower.credentials(), NON_EXISTENT_ID).await,
            ApiErrorKind::UserNotFound,
        );
        assert_api_error(
            gateway.follow(&follower.credentials(), follower.id).await,
            ApiErrorKind::SelfFollow,
        );
        for id in [0, -1] {
            assert_api_error_matching(
                gateway.follow(&follower.credentials(), id).await,
                is_invalid_input,
                &format!("a validation error for followee {id}"),
            );
        }

        ctx.follow(&follower, &followee).await?;
        assert_api_error(
            gateway.follow(&follower.credentials(), followee.id).await,
            ApiErrorKind::AlreadyFollowing,
        );
        Ok(())
    })
    .await
}

#[tokio::test]
#[ignore = "needs a running gateway"]
async fn unfollow_user() -> anyhow::Result<()> {
    scenario(config(), |ctx| async move {
        let follower = ctx.register_user().await?;
        let followee = ctx.register_user().await?;
        ctx.follow(&follower, &followee).await?;

        ctx.gateway()
            .unfollow(&follower.credentials(), followee.id)
            .await?;
        let followees = ctx
            .gateway()
            .get_followees(&follower.credentials(), follower.id, 1, 10)
            .await?;
        assert!(!followees.contains(followee.id));

        assert_api_error(
            ctx.gateway()
                .unfollow(&follower.credentials(), followee.id)
                .await,
            ApiErrorKind::FollowRelationNotFound,
        );
        Ok(())
    })
    .await
}

#[tokio::test]
#[ignore = "needs a running gateway"]
async fn unfollow_rejections() -> anyhow::Result<()> {
    scenario(config(), |ctx| async move {
        let follower = ctx.register_user().await?;
        let stranger = ctx.register_user().await?;
        let gateway = ctx.gateway();

        assert_api_error(
            gateway.unfollow(&Credentials::Anonymous, stranger.id).await,
            ApiErrorKind::Unauthenticated,
        );
        assert_api_error(
            gateway.unfollow(&invalid_token(), stranger.id).await,
            ApiErrorKind::InvalidToken,
        );
        assert_api_error(
            gateway.unfollow(&follower.credentials(), follower.id).await,
            ApiErrorKind::SelfUnfollow,
        );
        assert_api_error(
            gateway.unfollow(&follower.credentials(), stranger.id).await,
            ApiErrorKind::FollowRelationNotFound,
        );
        for id in [0, -1] {
            assert_api_error_matching(
                gateway.unfollow(&follower.credentials(), id).await,
                is_invalid_input,
                &format!("a validation error for followee {id}"),
            );
        }
        Ok(())
    })
    .await
}

#[tokio::test]
#[ignore = "needs a running gateway"]
async fn followers_and_followees_pagination() -> anyhow::Result<()> {
    scenario(config(), |ctx| async move {
        let target = ctx.register_user().await?;
        let mut followers = Vec::new();
        for _ in 0..3 {
            let follower = ctx.register_user().await?;
            ctx.follow(&follower, &target).await?;
            followers.push(follower);
        }
        let credentials = target.credentials();

        let all = ctx
            .gateway()
            .get_followers(&credentials, target.id, 1, 10)
            .await?;
        assert_eq!(all.total, 3);
        for follower in &followers {
            assert!(all.contains(follower.id));
        }

        let page1 = ctx.gateway().get_followers(&credentials, target.id, 1, 2).await?;
        let page2 = ctx.gateway().get_followers(&credentials, target.id, 2, 2).await?;
        assert_eq!(page1.followers.len(), 2);
        assert_eq!(page2.followers.len(), 1);
        assert_eq!(page1.total_pages, 2);

        let nobody = ctx
            .gateway()
            .get_followees(&credentials, target.id, 1, 10)
            .await?;
        assert!(nobody.followees.is_empty());

        assert_api_error(
            ctx.gateway()
                .get_followers(&credentials, NON_EXISTENT_ID, 1, 10)
                .await,
            ApiErrorKind::UserNotFound,
        );
        assert_api_error(
            ctx.gateway()
                .get_followees(&credentials, NON_EXISTENT_ID, 1, 10)
                .await,
            ApiErrorKind::UserNotFound,
        );
        for id in [0, -1] {
            assert_api_error_matching(
                ctx.gateway().get_followers(&credentials, id, 1, 10).await,
                is_invalid_input,
                "a validation error",
            );
            assert_api_error_matching(
                ctx.gateway().get_followees(&credentials, id, 1, 10).await,
                is_invalid_input,
                "a validation error",
            );
        }
        Ok(())
    })
    .await
}
