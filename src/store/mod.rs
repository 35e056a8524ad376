//! Storage seam for the service.
//!
//! Every document and relationship operation goes through the [`Store`]
//! trait. [`RedisStore`] is the production backend; [`MemoryStore`] drives
//! the test suite and local demos. The handle is constructed at process
//! start and injected into each operation rather than living in ambient
//! global state.

mod memory;
mod redis;
mod scripts;

pub use self::memory::MemoryStore;
pub use self::redis::RedisStore;

use serde::Serialize;

use crate::{
    errors::Result,
    models::{Account, AccountPatch, Comment, Tweet},
};

/// Branch taken by a follow toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FollowAction {
    Followed,
    Unfollowed,
}

/// Branch taken by a like toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LikeAction {
    Liked,
    Disliked,
}

/// Branch taken by a bookmark toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BookmarkAction {
    Added,
    Removed,
}

/// One page of tweets plus the total number of records matching the scope.
#[derive(Debug, Clone)]
pub struct TweetSlice {
    pub tweets: Vec<Tweet>,
    pub total: u64,
}

/// Document and relationship operations over the backing store.
///
/// Toggle methods are single atomic storage-level mutations (Lua scripts on
/// Redis, one critical section in memory), never read-then-write round trips,
/// so concurrent toggles from different callers cannot lose updates.
pub trait Store: Clone + Send + Sync + 'static {
    /// Writes a new account and its unique email/username indexes atomically.
    /// Fails with `Conflict` when either field is already taken.
    fn insert_account(&self, account: &Account) -> impl Future<Output = Result<()>> + Send;

    fn account(&self, account_id: &str) -> impl Future<Output = Result<Option<Account>>> + Send;

    fn account_by_email(&self, email: &str) -> impl Future<Output = Result<Option<Account>>> + Send;

    /// Every account except the given one.
    fn accounts_except(&self, exclude_id: &str) -> impl Future<Output = Result<Vec<Account>>> + Send;

    /// Applies a partial update; absent fields stay untouched. Fails with
    /// `NotFound` when the account no longer exists at write time and with
    /// `Conflict` when a changed email/username is already taken.
    fn patch_account(&self, account_id: &str, patch: &AccountPatch) -> impl Future<Output = Result<Account>> + Send;

    fn followers(&self, account_id: &str) -> impl Future<Output = Result<Vec<String>>> + Send;

    fn following(&self, account_id: &str) -> impl Future<Output = Result<Vec<String>>> + Send;

    /// Bookmarked tweet ids in insertion order.
    fn bookmarks(&self, account_id: &str) -> impl Future<Output = Result<Vec<String>>> + Send;

    /// Inverts the follow relationship, mutating both the target's follower
    /// set and the caller's following set in one atomic operation.
    fn toggle_follow(&self, caller_id: &str, target_id: &str) -> impl Future<Output = Result<FollowAction>> + Send;

    /// Inverts bookmark membership; adding is add-if-absent, so repeated
    /// toggles can never produce duplicates.
    fn toggle_bookmark(&self, caller_id: &str, tweet_id: &str)
    -> impl Future<Output = Result<BookmarkAction>> + Send;

    /// Writes the tweet document and its timeline entry.
    fn insert_tweet(&self, tweet: &Tweet) -> impl Future<Output = Result<()>> + Send;

    /// Reads a tweet with its like set and comments hydrated.
    fn tweet(&self, tweet_id: &str) -> impl Future<Output = Result<Option<Tweet>>> + Send;

    /// Deletes a tweet, its like set, its comments, and its timeline entry.
    /// Deleting an absent tweet is a no-op.
    fn remove_tweet(&self, tweet_id: &str) -> impl Future<Output = Result<()>> + Send;

    /// Inverts like-set membership for the account on the tweet.
    fn toggle_like(&self, tweet_id: &str, account_id: &str) -> impl Future<Output = Result<LikeAction>> + Send;

    /// Appends a comment to the tweet's embedded comment list.
    fn add_comment(&self, tweet_id: &str, comment: &Comment) -> impl Future<Output = Result<()>> + Send;

    /// Removes exactly one comment; only the comment's author or the tweet's
    /// owner may remove it.
    fn remove_comment(
        &self,
        tweet_id: &str,
        comment_id: &str,
        caller_id: &str,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Comments in storage (append) order.
    fn comments(&self, tweet_id: &str) -> impl Future<Output = Result<Vec<Comment>>> + Send;

    /// Tweets authored by any of the given accounts, newest first, with the
    /// total count of the whole scope.
    fn tweets_by_authors(
        &self,
        author_ids: &[String],
        skip: u64,
        limit: u64,
    ) -> impl Future<Output = Result<TweetSlice>> + Send;

    /// The account's bookmarked tweets re-sorted newest first. The total is
    /// the bookmark set size, so an entry whose tweet has since been deleted
    /// still counts.
    fn bookmarked_tweets(
        &self,
        account_id: &str,
        skip: u64,
        limit: u64,
    ) -> impl Future<Output = Result<TweetSlice>> + Send;
}
