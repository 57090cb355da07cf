//! Shared helpers for the live scenarios. These need a running gateway and are
//! `#[ignore]`d by default, run them with `cargo test -p harness -- --ignored`.
#![allow(dead_code)]

use std::fmt::Debug;
use std::sync::Arc;

use gateway::models::core::Id;
use gateway::models::notification::Notification;
use gateway::{ApiErrorKind, Credentials, GatewayError};
use harness::{eventually, HarnessConfig, HarnessError, TestContext, TestUser};
use lazy_static::lazy_static;

/// Id no backend will hand out in a test environment
pub const NON_EXISTENT_ID: Id = 999_999;
pub const INVALID_TOKEN: &str = "invalid_token_12345";

lazy_static! {
    static ref CONFIG: Arc<HarnessConfig> =
        Arc::new(HarnessConfig::load().expect("Unable to load the test configuration"));
}

pub fn config() -> Arc<HarnessConfig> {
    Arc::clone(&CONFIG)
}

pub fn invalid_token() -> Credentials {
    Credentials::bearer(INVALID_TOKEN)
}

/// Asserts that the call was rejected with exactly `expected`
pub fn assert_api_error<T: Debug>(result: Result<T, GatewayError>, expected: ApiErrorKind) {
    match result {
        Err(e) => assert_eq!(e.kind(), Some(expected), "unexpected error: {e}"),
        Ok(value) => panic!("Expected the gateway to fail with {expected}, got {value:?}"),
    }
}

/// Asserts that the call was rejected with an error `accept` approves of
pub fn assert_api_error_matching<T, P>(result: Result<T, GatewayError>, accept: P, what: &str)
where
    T: Debug,
    P: Fn(ApiErrorKind) -> bool,
{
    match result {
        Err(e) => assert!(
            e.kind().is_some_and(&accept),
            "Expected {what}, got error: {e}"
        ),
        Ok(value) => panic!("Expected {what}, got {value:?}"),
    }
}

pub fn is_invalid_input(kind: ApiErrorKind) -> bool {
    matches!(
        kind,
        ApiErrorKind::ValidationFailed | ApiErrorKind::InvalidInput
    )
}

/// Polls the feed of `user` until a notification of `notification_type` shows up, then
/// tracks everything in the feed for cleanup
pub async fn wait_for_notification(
    ctx: &TestContext,
    user: &TestUser,
    notification_type: &str,
) -> Result<Notification, HarnessError> {
    let gateway = ctx.gateway();
    let credentials = &user.credentials();
    let user_id = user.id;

    let notification = eventually(
        &ctx.poll_policy(),
        &format!("'{notification_type}' notification for user {user_id}"),
        move || async move {
            let feed = gateway
                .get_notification_feed(credentials, user_id, 1, 10)
                .await?;
            let found = feed.of_type(notification_type).next().cloned();
            Ok::<_, GatewayError>(found)
        },
    )
    .await?;

    ctx.discover_and_track_notifications(user.id, user.access_token())
        .await;
    Ok(notification)
}
