use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::core::Id;

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct MediaItemInput {
    #[serde(rename = "type")]
    pub media_type: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub position: i32,
}

fn is_zero(value: &i32) -> bool {
    *value == 0
}

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct PostMedia {
    pub id: Id,
    #[serde(rename = "type")]
    pub media_type: String,
    pub url: String,
    #[serde(default)]
    pub position: i32,
}

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq, Hash)]
pub struct Tag {
    pub id: Id,
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct PostAuthor {
    pub id: Id,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub avatar_url: String,
}

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: Id,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub author: PostAuthor,
    #[serde(default)]
    pub media: Vec<PostMedia>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct CreatePostRequest {
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub media_items: Vec<MediaItemInput>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

/// The create call answers with a flattened author rather than a nested one
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct CreatePostResponse {
    pub id: Id,
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub author_id: Id,
    #[serde(default)]
    pub author_username: String,
    #[serde(default)]
    pub author_full_name: String,
    #[serde(default)]
    pub author_email: String,
    #[serde(default)]
    pub author_bio: String,
    #[serde(default)]
    pub author_avatar_url: String,
    #[serde(default)]
    pub media: Vec<PostMedia>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct UpdatePostRequest {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub media_items: Vec<MediaItemInput>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct ListPostsResponse {
    #[serde(default)]
    pub posts: Vec<Post>,
    #[serde(default)]
    pub total: i64,
}

/// Filter for listing posts. Unset fields are left out of the query string.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PostFilter {
    pub author_id: Option<Id>,
    pub created_after: Option<DateTime<Utc>>,
    pub created_before: Option<DateTime<Utc>>,
    pub offset: Option<u32>,
    pub limit: Option<u32>,
}

impl PostFilter {
    #[must_use]
    pub fn by_author(author_id: Id) -> Self {
        PostFilter {
            author_id: Some(author_id),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(author_id) = self.author_id {
            query.push(("author_id", author_id.to_string()));
        }
        if let Some(after) = self.created_after {
            query.push(("created_after", after.to_rfc3339()));
        }
        if let Some(before) = self.created_before {
            query.push(("created_before", before.to_rfc3339()));
        }
        if let Some(offset) = self.offset {
            query.push(("offset", offset.to_string()));
        }
        if let Some(limit) = self.limit {
            query.push(("limit", limit.to_string()));
        }
        query
    }
}
