//! A [`TestContext`] belongs to exactly one scenario: its own gateway client, its own
//! resource tracker and its own fixture stream. Sub-tasks of the scenario share it
//! through an `Arc`.
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use anyhow::anyhow;
use futures::FutureExt;
use gateway::models::auth::{RegisterRequest, TokenPair};
use gateway::models::core::Id;
use gateway::models::notification::SendNotificationResponse;
use gateway::models::post::CreatePostResponse;
use gateway::{Credentials, Gateway, GatewayBuilder};
use log::{debug, info, warn};

use crate::config::HarnessConfig;
use crate::error::HarnessError;
use crate::eventually::PollPolicy;
use crate::fixtures::Fixtures;
use crate::logging;
use crate::tracker::{CleanupReport, ResourceTracker};

/// A registered account together with what is needed to act as it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestUser {
    pub id: Id,
    pub username: String,
    pub email: String,
    pub password: String,
    pub tokens: TokenPair,
}

impl TestUser {
    #[must_use]
    pub fn credentials(&self) -> Credentials {
        Credentials::bearer(self.tokens.access_token.as_str())
    }

    #[must_use]
    pub fn access_token(&self) -> &str {
        &self.tokens.access_token
    }
}

pub struct TestContext {
    gateway: Gateway,
    tracker: ResourceTracker,
    fixtures: Mutex<Fixtures>,
    config: Arc<HarnessConfig>,
}

impl TestContext {
    /// Creates a context with a gateway client configured from `config`
    #[allow(clippy::missing_errors_doc)]
    pub fn new(config: Arc<HarnessConfig>) -> Result<Self, HarnessError> {
        logging::init(&config);
        let gateway = GatewayBuilder::new()
            .from_config(&config.gateway_client_configuration()?)
            .build()?;
        Ok(Self::with_gateway(config, gateway))
    }

    #[must_use]
    pub fn with_gateway(config: Arc<HarnessConfig>, gateway: Gateway) -> Self {
        let fixtures = Fixtures::new(config.test.seed);
        debug!(
            "New test context against {} (fixture seed {})",
            gateway.base_url(),
            fixtures.seed()
        );
        TestContext {
            gateway,
            tracker: ResourceTracker::new(),
            fixtures: Mutex::new(fixtures),
            config,
        }
    }

    #[must_use]
    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    #[must_use]
    pub fn tracker(&self) -> &ResourceTracker {
        &self.tracker
    }

    #[must_use]
    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// The fixture generator of this context. Do not hold the guard across an `.await`.
    pub fn fixtures(&self) -> MutexGuard<'_, Fixtures> {
        self.fixtures.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Backoff for [`crate::eventually`], sized from the configuration
    #[must_use]
    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy::from_config(&self.config).unwrap_or_else(|e| {
            warn!("Falling back to the default poll policy: {e}");
            PollPolicy::default()
        })
    }

    pub fn track_user(&self, id: Id, username: &str, access_token: &str) {
        self.tracker.track_user(id, username, access_token);
    }

    pub fn track_post(&self, id: Id, author_id: Id, access_token: &str) {
        self.tracker.track_post(id, author_id, access_token);
    }

    pub fn track_notification(&self, id: Id, user_id: Id, recipient_access_token: &str) {
        self.tracker
            .track_notification(id, user_id, recipient_access_token);
    }

    pub fn track_relation(&self, follower_id: Id, followee_id: Id, follower_token: &str) {
        self.tracker
            .track_relation(follower_id, followee_id, follower_token);
    }

    /// Tracks the notifications currently in the feed of `user_id`. Best-effort.
    pub async fn discover_and_track_notifications(&self, user_id: Id, token: &str) {
        self.tracker
            .discover_and_track_notifications(&self.gateway, user_id, token)
            .await;
    }

    /// Deletes everything this context created. Never fails; problems are logged.
    /// With `test.cleanup = false` the records are only forgotten, which leaves the data
    /// on the backend for inspection.
    pub async fn cleanup(&self) {
        let _ = self.cleanup_with_report().await;
    }

    pub async fn cleanup_with_report(&self) -> CleanupReport {
        if !self.config.test.cleanup {
            let forgotten = self.tracker.forget();
            if forgotten.total() > 0 {
                info!("Cleanup disabled, leaving {forgotten:?} behind");
            }
            return CleanupReport::default();
        }
        self.tracker.cleanup(&self.gateway).await
    }

    /// Registers a fresh account from the fixtures, see [`TestContext::register_user_with`]
    #[allow(clippy::missing_errors_doc)]
    pub async fn register_user(&self) -> Result<TestUser, HarnessError> {
        let request = self.fixtures().register_request();
        self.register_user_with(request).await
    }

    /// Registers the account, looks up its id and tracks it for deletion
    #[allow(clippy::missing_errors_doc)]
    pub async fn register_user_with(&self, request: RegisterRequest) -> Result<TestUser, HarnessError> {
        let tokens = self
            .gateway
            .register(&Credentials::Anonymous, &request)
            .await?;
        let credentials = Credentials::bearer(tokens.access_token.as_str());

        let user = match self
            .gateway
            .get_user_by_username(&credentials, &request.username)
            .await
        {
            Ok(user) => user,
            Err(e) => {
                warn!(
                    "User '{}' was registered but could not be resolved, it will not be cleaned up",
                    request.username
                );
                return Err(HarnessError::Setup(format!(
                    "unable to resolve registered user '{}': {e}",
                    request.username
                )));
            }
        };

        self.track_user(user.id, &user.username, &tokens.access_token);
        Ok(TestUser {
            id: user.id,
            username: user.username,
            email: request.email,
            password: request.password,
            tokens,
        })
    }

    /// Creates a post from the fixtures as `author` and tracks it
    #[allow(clippy::missing_errors_doc)]
    pub async fn create_post(&self, author: &TestUser) -> Result<CreatePostResponse, HarnessError> {
        let request = self.fixtures().create_post_request();
        let post = self
            .gateway
            .create_post(&author.credentials(), &request)
            .await?;
        self.track_post(post.id, author.id, author.access_token());
        Ok(post)
    }

    /// `sender` sends a fixture notification to `recipient`, tracked with the recipient's token
    #[allow(clippy::missing_errors_doc)]
    pub async fn send_notification(
        &self,
        sender: &TestUser,
        recipient: &TestUser,
    ) -> Result<SendNotificationResponse, HarnessError> {
        let request = self.fixtures().send_notification_request(recipient.id);
        let response = self
            .gateway
            .send_notification(&sender.credentials(), &request)
            .await?;
        self.track_notification(
            response.notification_id,
            recipient.id,
            recipient.access_token(),
        );
        Ok(response)
    }

    /// `follower` follows `followee`. The relation is tracked, and so is whatever is
    /// already in the followee's feed.
    #[allow(clippy::missing_errors_doc)]
    pub async fn follow(&self, follower: &TestUser, followee: &TestUser) -> Result<(), HarnessError> {
        self.gateway
            .follow(&follower.credentials(), followee.id)
            .await?;
        self.track_relation(follower.id, followee.id, follower.access_token());
        self.discover_and_track_notifications(followee.id, followee.access_token())
            .await;
        Ok(())
    }
}

/// Runs `body` against a fresh [`TestContext`] and cleans up afterwards, also when the body
/// fails, panics or exceeds `test.test_timeout`. A panic is resumed after the cleanup.
///
/// # Errors
/// Whatever the body returned, or a timeout
pub async fn scenario<F, Fut>(config: Arc<HarnessConfig>, body: F) -> anyhow::Result<()>
where
    F: FnOnce(Arc<TestContext>) -> Fut,
    Fut: Future<Output = anyhow::Result<()>>,
{
    let context = Arc::new(TestContext::new(config)?);
    run_scenario(context, body).await
}

/// As [`scenario`], with a context built by the caller
///
/// # Errors
/// Whatever the body returned, or a timeout
pub async fn run_scenario<F, Fut>(context: Arc<TestContext>, body: F) -> anyhow::Result<()>
where
    F: FnOnce(Arc<TestContext>) -> Fut,
    Fut: Future<Output = anyhow::Result<()>>,
{
    let limit = context.config().test_timeout()?;
    let outcome = AssertUnwindSafe(tokio::time::timeout(limit, body(Arc::clone(&context))))
        .catch_unwind()
        .await;

    context.cleanup().await;

    match outcome {
        Ok(Ok(result)) => result,
        Ok(Err(_elapsed)) => Err(anyhow!("scenario did not finish within {limit:?}")),
        Err(panic) => panic::resume_unwind(panic),
    }
}
