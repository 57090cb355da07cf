use serde::{Deserialize, Serialize};

use super::core::Id;

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct FollowRequest {
    pub followee_id: Id,
}

/// A user as seen in follower and followee listings
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct Follower {
    pub id: Id,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub avatar_url: String,
}

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct FollowersPage {
    #[serde(default)]
    pub followers: Vec<Follower>,
    #[serde(default)]
    pub page: i64,
    #[serde(default)]
    pub limit: i64,
    #[serde(default)]
    pub total: i64,
    #[serde(default)]
    pub total_pages: i64,
}

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct FolloweesPage {
    #[serde(default)]
    pub followees: Vec<Follower>,
    #[serde(default)]
    pub page: i64,
    #[serde(default)]
    pub limit: i64,
    #[serde(default)]
    pub total: i64,
    #[serde(default)]
    pub total_pages: i64,
}

impl FollowersPage {
    #[must_use]
    pub fn contains(&self, user_id: Id) -> bool {
        self.followers.iter().any(|f| f.id == user_id)
    }
}

impl FolloweesPage {
    #[must_use]
    pub fn contains(&self, user_id: Id) -> bool {
        self.followees.iter().any(|f| f.id == user_id)
    }
}
