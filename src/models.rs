//! Entity records persisted as JSON documents, plus the redacted views the
//! API returns.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::generate_entity_id;

/// Maximum bio length in characters.
pub const BIO_MAX_CHARS: usize = 200;
/// Maximum comment length in characters.
pub const COMMENT_MAX_CHARS: usize = 280;
/// Bio assigned to freshly registered accounts.
pub const DEFAULT_BIO: &str = "Hey there! I'm using this app";

/// An account record. The password hash never leaves the storage layer;
/// outward-facing reads go through [`Profile`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub name: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub banner: String,
    pub bio: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    pub fn new(name: String, username: String, email: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: generate_entity_id(),
            name,
            username,
            email,
            password_hash,
            avatar: String::new(),
            banner: String::new(),
            bio: DEFAULT_BIO.to_string(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Account view without credential material, with relationship state attached.
#[derive(Debug, Clone, Serialize)]
pub struct Profile {
    pub id: String,
    pub name: String,
    pub username: String,
    pub email: String,
    pub avatar: String,
    pub banner: String,
    pub bio: String,
    pub followers: Vec<String>,
    pub following: Vec<String>,
    pub bookmarks: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    pub fn from_account(
        account: Account,
        followers: Vec<String>,
        following: Vec<String>,
        bookmarks: Vec<String>,
    ) -> Self {
        Self {
            id: account.id,
            name: account.name,
            username: account.username,
            email: account.email,
            avatar: account.avatar,
            banner: account.banner,
            bio: account.bio,
            followers,
            following,
            bookmarks,
            created_at: account.created_at,
            updated_at: account.updated_at,
        }
    }
}

/// Partial account update; absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AccountPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner: Option<String>,
}

impl AccountPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.username.is_none()
            && self.email.is_none()
            && self.bio.is_none()
            && self.avatar.is_none()
            && self.banner.is_none()
    }
}

/// Kind of media attached to a tweet, inferred from the upload's MIME type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    pub fn from_content_type(content_type: &str) -> Self {
        if content_type.starts_with("video") {
            Self::Video
        } else {
            Self::Image
        }
    }
}

/// Author display fields copied onto a tweet at creation time and never
/// re-synced with later profile edits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorSnapshot {
    pub id: String,
    pub name: String,
    pub username: String,
    pub avatar: String,
}

impl From<&Account> for AuthorSnapshot {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id.clone(),
            name: account.name.clone(),
            username: account.username.clone(),
            avatar: account.avatar.clone(),
        }
    }
}

/// A tweet record. `like` and `comments` are hydrated from their own storage
/// keys on every read; a tweet carries a description, a media attachment, or
/// both, never neither.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tweet {
    pub id: String,
    pub author_id: String,
    pub author: AuthorSnapshot,
    pub description: Option<String>,
    pub media_url: Option<String>,
    pub media_kind: Option<MediaKind>,
    #[serde(default)]
    pub like: Vec<String>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Tweet {
    pub fn new(
        author: AuthorSnapshot,
        description: Option<String>,
        media_url: Option<String>,
        media_kind: Option<MediaKind>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: generate_entity_id(),
            author_id: author.id.clone(),
            author,
            description,
            media_url,
            media_kind,
            like: Vec::new(),
            comments: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// A comment embedded in its tweet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub author_id: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(author_id: String, text: String) -> Self {
        Self {
            id: generate_entity_id(),
            author_id,
            text,
            created_at: Utc::now(),
        }
    }
}

/// A comment with its author resolved to display info. The author is `None`
/// only if the account record has vanished from under the comment.
#[derive(Debug, Clone, Serialize)]
pub struct CommentView {
    pub id: String,
    pub author: Option<AuthorSnapshot>,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_kind_inference() {
        assert_eq!(MediaKind::from_content_type("video/mp4"), MediaKind::Video);
        assert_eq!(MediaKind::from_content_type("image/png"), MediaKind::Image);
        assert_eq!(MediaKind::from_content_type("application/octet-stream"), MediaKind::Image);
    }

    #[test]
    fn new_account_gets_placeholder_bio() {
        let account = Account::new(
            "Alice".into(),
            "alice".into(),
            "alice@example.com".into(),
            "hash".into(),
        );
        assert_eq!(account.bio, DEFAULT_BIO);
        assert!(account.avatar.is_empty());
    }

    #[test]
    fn tweet_snapshots_author_fields() {
        let account = Account::new("Alice".into(), "alice".into(), "a@example.com".into(), "hash".into());
        let tweet = Tweet::new((&account).into(), Some("hello".into()), None, None);
        assert_eq!(tweet.author_id, account.id);
        assert_eq!(tweet.author.username, "alice");
        assert!(tweet.like.is_empty());
    }

    #[test]
    fn empty_patch_detection() {
        assert!(AccountPatch::default().is_empty());
        let patch = AccountPatch {
            bio: Some("new bio".into()),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }
}
