//! Relationship toggles: follow, like, bookmark.

use crate::{
    errors::{Error, Result},
    store::{BookmarkAction, FollowAction, LikeAction, Store},
    validators::is_blank,
};

/// Follows or unfollows the target, whichever inverts the current state.
pub async fn toggle_follow<S: Store>(store: &S, caller_id: &str, target_id: &str) -> Result<FollowAction> {
    if is_blank(caller_id) || is_blank(target_id) {
        return Err(Error::validation("account id is required"));
    }
    if caller_id == target_id {
        return Err(Error::validation("you cannot follow yourself"));
    }
    store.toggle_follow(caller_id, target_id).await
}

/// Likes or unlikes the tweet for the caller.
pub async fn toggle_like<S: Store>(store: &S, caller_id: &str, tweet_id: &str) -> Result<LikeAction> {
    if is_blank(caller_id) || is_blank(tweet_id) {
        return Err(Error::validation("tweet id is required"));
    }
    store.toggle_like(tweet_id, caller_id).await
}

/// Bookmarks or unbookmarks the tweet for the caller.
pub async fn toggle_bookmark<S: Store>(store: &S, caller_id: &str, tweet_id: &str) -> Result<BookmarkAction> {
    if is_blank(caller_id) || is_blank(tweet_id) {
        return Err(Error::validation("tweet id is required"));
    }
    store.toggle_bookmark(caller_id, tweet_id).await
}
