//!
//! `harness` drives system tests against the Pinstack API gateway.
//!
//! A scenario gets its own [`TestContext`], registers users, creates posts and
//! relations through it, and asserts on the results, polling with
//! [`eventually()`] where the backend reacts asynchronously. Everything the
//! scenario created is tracked and deleted afterwards by the cleanup, in
//! dependency order and on a best-effort basis.
//!
//! ```rust,ignore
//! let config = Arc::new(HarnessConfig::load()?);
//! scenario(config, |ctx| async move {
//!     let alice = ctx.register_user().await?;
//!     let bob = ctx.register_user().await?;
//!     ctx.follow(&alice, &bob).await?;
//!     Ok(())
//! })
//! .await?;
//! ```
pub mod config;
pub mod context;
pub mod error;
pub mod eventually;
pub mod fixtures;
pub mod logging;
pub mod tracker;

pub use crate::config::{parse_duration, HarnessConfig};
pub use context::{run_scenario, scenario, TestContext, TestUser};
pub use error::HarnessError;
pub use eventually::{eventually, PollPolicy};
pub use fixtures::Fixtures;
pub use tracker::{
    CleanupClient, CleanupReport, NotificationCleanupInfo, PostCleanupInfo, RelationCleanupInfo,
    ResourceTracker, UserCleanupInfo,
};
