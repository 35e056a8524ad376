use crate::id::generate_entity_id;

/// Builds every Redis key the service touches.
///
/// Documents are plain JSON strings; relationship state lives beside them in
/// native sets and sorted sets so that toggles stay single atomic commands.
#[derive(Debug, Clone)]
pub struct KeySpace {
    prefix: String,
}

impl KeySpace {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into() }
    }

    /// JSON document for one account.
    pub fn account(&self, account_id: &str) -> String {
        format!("{}:account:{}", self.prefix, account_id)
    }

    /// Unique index: lowercased email -> account id.
    pub fn account_email_index(&self, email: &str) -> String {
        format!("{}{}", self.account_email_prefix(), email.to_lowercase())
    }

    pub fn account_email_prefix(&self) -> String {
        format!("{}:account:email:", self.prefix)
    }

    /// Unique index: lowercased username -> account id.
    pub fn account_username_index(&self, username: &str) -> String {
        format!("{}{}", self.account_username_prefix(), username.to_lowercase())
    }

    pub fn account_username_prefix(&self) -> String {
        format!("{}:account:username:", self.prefix)
    }

    /// Set of every account id, backing "list other users".
    pub fn accounts(&self) -> String {
        format!("{}:accounts", self.prefix)
    }

    /// Set of account ids following this account.
    pub fn followers(&self, account_id: &str) -> String {
        format!("{}:followers:{}", self.prefix, account_id)
    }

    /// Set of account ids this account follows.
    pub fn following(&self, account_id: &str) -> String {
        format!("{}:following:{}", self.prefix, account_id)
    }

    /// Sorted set of bookmarked tweet ids, scored by insertion time.
    pub fn bookmarks(&self, account_id: &str) -> String {
        format!("{}:bookmarks:{}", self.prefix, account_id)
    }

    /// JSON document for one tweet.
    pub fn tweet(&self, tweet_id: &str) -> String {
        format!("{}:tweet:{}", self.prefix, tweet_id)
    }

    /// Set of account ids that liked a tweet.
    pub fn likes(&self, tweet_id: &str) -> String {
        format!("{}:likes:{}", self.prefix, tweet_id)
    }

    /// List of embedded comment documents, containment-scoped to the tweet.
    pub fn comments(&self, tweet_id: &str) -> String {
        format!("{}:comments:{}", self.prefix, tweet_id)
    }

    /// Sorted set of one author's tweet ids, scored by creation time.
    pub fn timeline(&self, account_id: &str) -> String {
        format!("{}:timeline:{}", self.prefix, account_id)
    }

    pub fn timeline_prefix(&self) -> String {
        format!("{}:timeline:", self.prefix)
    }

    /// Throwaway key for feed union queries.
    pub fn feed_scratch(&self) -> String {
        format!("{}:scratch:feed:{}", self.prefix, generate_entity_id())
    }
}
