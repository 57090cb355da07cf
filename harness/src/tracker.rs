//! The resource tracker keeps track of the entities a scenario created on the
//! gateway, together with the credentials needed to delete them, and deletes
//! them again when the scenario is done.
//!
//! Deletion order is fixed: notifications, relations, posts and finally users,
//! since the later categories own the earlier ones. Every deletion is best-effort;
//! failures are logged and never abort the cleanup.
use std::collections::HashSet;
use std::fmt;
use std::mem;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use gateway::models::core::Id;
use gateway::models::notification::NotificationFeed;
use gateway::{Credentials, Gateway, GatewayError};
use log::{debug, info, warn};

/// Page size used when listing a feed to discover notifications
pub const DISCOVERY_PAGE_SIZE: i32 = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserCleanupInfo {
    pub id: Id,
    pub username: String,
    pub access_token: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostCleanupInfo {
    pub id: Id,
    pub author_id: Id,
    /// Token of the author
    pub access_token: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationCleanupInfo {
    pub id: Id,
    /// The recipient, who is the only one allowed to remove it
    pub user_id: Id,
    pub recipient_access_token: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationCleanupInfo {
    pub follower_id: Id,
    pub followee_id: Id,
    pub follower_token: String,
}

/// The remote operations the tracker relies on
#[async_trait]
pub trait CleanupClient: Send + Sync {
    async fn remove_notification(
        &self,
        credentials: &Credentials,
        notification_id: Id,
    ) -> Result<(), GatewayError>;

    async fn unfollow(&self, credentials: &Credentials, followee_id: Id) -> Result<(), GatewayError>;

    async fn delete_post(&self, credentials: &Credentials, post_id: Id) -> Result<(), GatewayError>;

    async fn delete_user(&self, credentials: &Credentials, user_id: Id) -> Result<(), GatewayError>;

    async fn notification_feed(
        &self,
        credentials: &Credentials,
        user_id: Id,
        page: i32,
        limit: i32,
    ) -> Result<NotificationFeed, GatewayError>;
}

#[async_trait]
impl CleanupClient for Gateway {
    async fn remove_notification(
        &self,
        credentials: &Credentials,
        notification_id: Id,
    ) -> Result<(), GatewayError> {
        Gateway::remove_notification(self, credentials, notification_id)
            .await
            .map(|_| ())
    }

    async fn unfollow(&self, credentials: &Credentials, followee_id: Id) -> Result<(), GatewayError> {
        Gateway::unfollow(self, credentials, followee_id)
            .await
            .map(|_| ())
    }

    async fn delete_post(&self, credentials: &Credentials, post_id: Id) -> Result<(), GatewayError> {
        Gateway::delete_post(self, credentials, post_id).await
    }

    async fn delete_user(&self, credentials: &Credentials, user_id: Id) -> Result<(), GatewayError> {
        Gateway::delete_user(self, credentials, user_id).await
    }

    async fn notification_feed(
        &self,
        credentials: &Credentials,
        user_id: Id,
        page: i32,
        limit: i32,
    ) -> Result<NotificationFeed, GatewayError> {
        self.get_notification_feed(credentials, user_id, page, limit)
            .await
    }
}

/// Attempted versus successful deletions of one category
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CategoryReport {
    pub attempted: usize,
    pub succeeded: usize,
}

impl CategoryReport {
    #[must_use]
    pub fn failed(&self) -> usize {
        self.attempted - self.succeeded
    }
}

impl fmt::Display for CategoryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.succeeded, self.attempted)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CleanupReport {
    pub notifications: CategoryReport,
    pub relations: CategoryReport,
    pub posts: CategoryReport,
    pub users: CategoryReport,
}

impl CleanupReport {
    #[must_use]
    pub fn attempted(&self) -> usize {
        self.categories().iter().map(|c| c.attempted).sum()
    }

    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.categories().iter().map(|c| c.succeeded).sum()
    }

    /// True when every attempted deletion succeeded
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.attempted() == self.succeeded()
    }

    fn categories(&self) -> [CategoryReport; 4] {
        [self.notifications, self.relations, self.posts, self.users]
    }
}

impl fmt::Display for CleanupReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "notifications {}, relations {}, posts {}, users {}",
            self.notifications, self.relations, self.posts, self.users
        )
    }
}

/// Number of records per category
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TrackedCounts {
    pub users: usize,
    pub posts: usize,
    pub notifications: usize,
    pub relations: usize,
}

impl TrackedCounts {
    #[must_use]
    pub fn total(&self) -> usize {
        self.users + self.posts + self.notifications + self.relations
    }
}

#[derive(Debug, Default)]
struct Registry {
    users: Vec<UserCleanupInfo>,
    posts: Vec<PostCleanupInfo>,
    notifications: Vec<NotificationCleanupInfo>,
    relations: Vec<RelationCleanupInfo>,
}

impl Registry {
    fn counts(&self) -> TrackedCounts {
        TrackedCounts {
            users: self.users.len(),
            posts: self.posts.len(),
            notifications: self.notifications.len(),
            relations: self.relations.len(),
        }
    }
}

#[derive(Debug, Default)]
pub struct ResourceTracker {
    registry: Mutex<Registry>,
}

impl ResourceTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // A panicking scenario must not prevent the cleanup, so a poisoned lock is still used
    fn lock(&self) -> MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn track_user(&self, id: Id, username: &str, access_token: &str) {
        debug!("Tracking user {id} '{username}'");
        self.lock().users.push(UserCleanupInfo {
            id,
            username: username.to_string(),
            access_token: access_token.to_string(),
        });
    }

    pub fn track_post(&self, id: Id, author_id: Id, access_token: &str) {
        debug!("Tracking post {id} of author {author_id}");
        self.lock().posts.push(PostCleanupInfo {
            id,
            author_id,
            access_token: access_token.to_string(),
        });
    }

    pub fn track_notification(&self, id: Id, user_id: Id, recipient_access_token: &str) {
        debug!("Tracking notification {id} of user {user_id}");
        self.lock().notifications.push(NotificationCleanupInfo {
            id,
            user_id,
            recipient_access_token: recipient_access_token.to_string(),
        });
    }

    pub fn track_relation(&self, follower_id: Id, followee_id: Id, follower_token: &str) {
        debug!("Tracking relation {follower_id} -> {followee_id}");
        self.lock().relations.push(RelationCleanupInfo {
            follower_id,
            followee_id,
            follower_token: follower_token.to_string(),
        });
    }

    /// Lists the first page of the feed of `user_id` and tracks every notification in it that
    /// is not tracked yet. Listing failures are logged and otherwise ignored.
    ///
    /// Returns the number of newly tracked notifications.
    pub async fn discover_and_track_notifications<C>(&self, client: &C, user_id: Id, token: &str) -> usize
    where
        C: CleanupClient + ?Sized,
    {
        let credentials = Credentials::bearer(token);
        let feed = match client
            .notification_feed(&credentials, user_id, 1, DISCOVERY_PAGE_SIZE)
            .await
        {
            Ok(feed) => feed,
            Err(e) => {
                warn!("Unable to list notifications of user {user_id} for cleanup: {e}");
                return 0;
            }
        };

        let mut registry = self.lock();
        let mut known: HashSet<Id> = registry.notifications.iter().map(|n| n.id).collect();
        let mut added = 0;
        for notification in feed.notifications {
            if known.insert(notification.id) {
                registry.notifications.push(NotificationCleanupInfo {
                    id: notification.id,
                    user_id,
                    recipient_access_token: token.to_string(),
                });
                added += 1;
            }
        }
        debug!("Discovered {added} new notification(s) of user {user_id}");
        added
    }

    /// Deletes everything tracked, notifications first and users last, and leaves the
    /// tracker empty whatever the outcome. Records tracked while the cleanup runs are
    /// kept for the next cleanup.
    pub async fn cleanup<C>(&self, client: &C) -> CleanupReport
    where
        C: CleanupClient + ?Sized,
    {
        let drained = mem::take(&mut *self.lock());
        let mut report = CleanupReport::default();

        for n in &drained.notifications {
            let credentials = Credentials::bearer(n.recipient_access_token.as_str());
            let outcome = client.remove_notification(&credentials, n.id).await;
            record(&mut report.notifications, outcome, || {
                format!("notification {} of user {}", n.id, n.user_id)
            });
        }

        for r in &drained.relations {
            let credentials = Credentials::bearer(r.follower_token.as_str());
            let outcome = client.unfollow(&credentials, r.followee_id).await;
            record(&mut report.relations, outcome, || {
                format!("relation {} -> {}", r.follower_id, r.followee_id)
            });
        }

        for p in &drained.posts {
            let credentials = Credentials::bearer(p.access_token.as_str());
            let outcome = client.delete_post(&credentials, p.id).await;
            record(&mut report.posts, outcome, || {
                format!("post {} of author {}", p.id, p.author_id)
            });
        }

        for u in &drained.users {
            let credentials = Credentials::bearer(u.access_token.as_str());
            let outcome = client.delete_user(&credentials, u.id).await;
            record(&mut report.users, outcome, || {
                format!("user {} '{}'", u.id, u.username)
            });
        }

        if report.attempted() > 0 {
            info!("cleanup() :- deleted {report}");
        }
        report
    }

    /// Drops all records without deleting anything
    pub fn forget(&self) -> TrackedCounts {
        let drained = mem::take(&mut *self.lock());
        drained.counts()
    }

    #[must_use]
    pub fn counts(&self) -> TrackedCounts {
        self.lock().counts()
    }

    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.counts().total() == 0
    }

    #[must_use]
    pub fn users(&self) -> Vec<UserCleanupInfo> {
        self.lock().users.clone()
    }

    #[must_use]
    pub fn posts(&self) -> Vec<PostCleanupInfo> {
        self.lock().posts.clone()
    }

    #[must_use]
    pub fn notifications(&self) -> Vec<NotificationCleanupInfo> {
        self.lock().notifications.clone()
    }

    #[must_use]
    pub fn relations(&self) -> Vec<RelationCleanupInfo> {
        self.lock().relations.clone()
    }
}

fn record<F>(category: &mut CategoryReport, outcome: Result<(), GatewayError>, describe: F)
where
    F: FnOnce() -> String,
{
    category.attempted += 1;
    match outcome {
        Ok(()) => {
            category.succeeded += 1;
            debug!("cleanup() :- deleted {}", describe());
        }
        // Already gone, e.g. removed by the scenario itself or by a cascading delete
        Err(e) if e.is_not_found() => {
            category.succeeded += 1;
            debug!("cleanup() :- {} was already deleted", describe());
        }
        Err(e) => warn!("cleanup() :- unable to delete {}: {e}", describe()),
    }
}
