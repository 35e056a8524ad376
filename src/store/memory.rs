//! In-process [`Store`] used by the test suite and local demos.
//!
//! Mirrors the Redis backend's semantics exactly: the same conflict,
//! not-found, and forbidden outcomes, and each toggle runs inside one
//! critical section so it is atomic with respect to other callers.

use std::{
    collections::HashMap,
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use crate::{
    errors::{Error, Result},
    models::{Account, AccountPatch, Comment, Tweet},
    store::{BookmarkAction, FollowAction, LikeAction, Store, TweetSlice},
};

#[derive(Default)]
struct Inner {
    accounts: HashMap<String, Account>,
    email_index: HashMap<String, String>,
    username_index: HashMap<String, String>,
    followers: HashMap<String, Vec<String>>,
    following: HashMap<String, Vec<String>>,
    bookmarks: HashMap<String, Vec<String>>,
    tweets: HashMap<String, Tweet>,
    likes: HashMap<String, Vec<String>>,
    comments: HashMap<String, Vec<Comment>>,
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().expect("store poisoned")
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().expect("store poisoned")
    }
}

fn hydrated(inner: &Inner, tweet: &Tweet) -> Tweet {
    let mut tweet = tweet.clone();
    tweet.like = inner.likes.get(&tweet.id).cloned().unwrap_or_default();
    tweet.comments = inner.comments.get(&tweet.id).cloned().unwrap_or_default();
    tweet
}

fn paginate(mut tweets: Vec<Tweet>, skip: u64, limit: u64) -> Vec<Tweet> {
    tweets.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    tweets.into_iter().skip(skip as usize).take(limit as usize).collect()
}

impl Store for MemoryStore {
    async fn insert_account(&self, account: &Account) -> Result<()> {
        let mut inner = self.write();
        let email = account.email.to_lowercase();
        let username = account.username.to_lowercase();
        if inner.email_index.contains_key(&email) || inner.username_index.contains_key(&username) {
            return Err(Error::Conflict("account"));
        }
        inner.email_index.insert(email, account.id.clone());
        inner.username_index.insert(username, account.id.clone());
        inner.accounts.insert(account.id.clone(), account.clone());
        Ok(())
    }

    async fn account(&self, account_id: &str) -> Result<Option<Account>> {
        Ok(self.read().accounts.get(account_id).cloned())
    }

    async fn account_by_email(&self, email: &str) -> Result<Option<Account>> {
        let inner = self.read();
        Ok(inner
            .email_index
            .get(&email.to_lowercase())
            .and_then(|id| inner.accounts.get(id))
            .cloned())
    }

    async fn accounts_except(&self, exclude_id: &str) -> Result<Vec<Account>> {
        let inner = self.read();
        let mut accounts: Vec<Account> = inner
            .accounts
            .values()
            .filter(|account| account.id != exclude_id)
            .cloned()
            .collect();
        accounts.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(accounts)
    }

    async fn patch_account(&self, account_id: &str, patch: &AccountPatch) -> Result<Account> {
        let mut inner = self.write();
        let current = inner.accounts.get(account_id).cloned().ok_or(Error::not_found("account"))?;

        if let Some(email) = &patch.email
            && !email.eq_ignore_ascii_case(&current.email)
        {
            if inner.email_index.contains_key(&email.to_lowercase()) {
                return Err(Error::Conflict("account"));
            }
            inner.email_index.remove(&current.email.to_lowercase());
            inner.email_index.insert(email.to_lowercase(), account_id.to_string());
        }
        if let Some(username) = &patch.username
            && !username.eq_ignore_ascii_case(&current.username)
        {
            if inner.username_index.contains_key(&username.to_lowercase()) {
                return Err(Error::Conflict("account"));
            }
            inner.username_index.remove(&current.username.to_lowercase());
            inner.username_index.insert(username.to_lowercase(), account_id.to_string());
        }

        let account = inner.accounts.get_mut(account_id).ok_or(Error::not_found("account"))?;
        if let Some(name) = &patch.name {
            account.name = name.clone();
        }
        if let Some(username) = &patch.username {
            account.username = username.clone();
        }
        if let Some(email) = &patch.email {
            account.email = email.clone();
        }
        if let Some(bio) = &patch.bio {
            account.bio = bio.clone();
        }
        if let Some(avatar) = &patch.avatar {
            account.avatar = avatar.clone();
        }
        if let Some(banner) = &patch.banner {
            account.banner = banner.clone();
        }
        account.updated_at = chrono::Utc::now();
        Ok(account.clone())
    }

    async fn followers(&self, account_id: &str) -> Result<Vec<String>> {
        Ok(self.read().followers.get(account_id).cloned().unwrap_or_default())
    }

    async fn following(&self, account_id: &str) -> Result<Vec<String>> {
        Ok(self.read().following.get(account_id).cloned().unwrap_or_default())
    }

    async fn bookmarks(&self, account_id: &str) -> Result<Vec<String>> {
        Ok(self.read().bookmarks.get(account_id).cloned().unwrap_or_default())
    }

    async fn toggle_follow(&self, caller_id: &str, target_id: &str) -> Result<FollowAction> {
        let mut guard = self.write();
        let inner = &mut *guard;
        if !inner.accounts.contains_key(caller_id) || !inner.accounts.contains_key(target_id) {
            return Err(Error::not_found("account"));
        }
        let target_followers = inner.followers.entry(target_id.to_string()).or_default();
        if target_followers.iter().any(|id| id == caller_id) {
            target_followers.retain(|id| id != caller_id);
            inner
                .following
                .entry(caller_id.to_string())
                .or_default()
                .retain(|id| id != target_id);
            Ok(FollowAction::Unfollowed)
        } else {
            target_followers.push(caller_id.to_string());
            inner
                .following
                .entry(caller_id.to_string())
                .or_default()
                .push(target_id.to_string());
            Ok(FollowAction::Followed)
        }
    }

    async fn toggle_bookmark(&self, caller_id: &str, tweet_id: &str) -> Result<BookmarkAction> {
        let mut inner = self.write();
        if !inner.accounts.contains_key(caller_id) {
            return Err(Error::not_found("account"));
        }
        let bookmarks = inner.bookmarks.entry(caller_id.to_string()).or_default();
        if bookmarks.iter().any(|id| id == tweet_id) {
            bookmarks.retain(|id| id != tweet_id);
            Ok(BookmarkAction::Removed)
        } else {
            bookmarks.push(tweet_id.to_string());
            Ok(BookmarkAction::Added)
        }
    }

    async fn insert_tweet(&self, tweet: &Tweet) -> Result<()> {
        self.write().tweets.insert(tweet.id.clone(), tweet.clone());
        Ok(())
    }

    async fn tweet(&self, tweet_id: &str) -> Result<Option<Tweet>> {
        let inner = self.read();
        Ok(inner.tweets.get(tweet_id).map(|tweet| hydrated(&inner, tweet)))
    }

    async fn remove_tweet(&self, tweet_id: &str) -> Result<()> {
        let mut inner = self.write();
        inner.tweets.remove(tweet_id);
        inner.likes.remove(tweet_id);
        inner.comments.remove(tweet_id);
        Ok(())
    }

    async fn toggle_like(&self, tweet_id: &str, account_id: &str) -> Result<LikeAction> {
        let mut inner = self.write();
        if !inner.tweets.contains_key(tweet_id) {
            return Err(Error::not_found("tweet"));
        }
        let likes = inner.likes.entry(tweet_id.to_string()).or_default();
        if likes.iter().any(|id| id == account_id) {
            likes.retain(|id| id != account_id);
            Ok(LikeAction::Disliked)
        } else {
            likes.push(account_id.to_string());
            Ok(LikeAction::Liked)
        }
    }

    async fn add_comment(&self, tweet_id: &str, comment: &Comment) -> Result<()> {
        let mut inner = self.write();
        if !inner.tweets.contains_key(tweet_id) {
            return Err(Error::not_found("tweet"));
        }
        inner.comments.entry(tweet_id.to_string()).or_default().push(comment.clone());
        Ok(())
    }

    async fn remove_comment(&self, tweet_id: &str, comment_id: &str, caller_id: &str) -> Result<()> {
        let mut inner = self.write();
        let owner_id = inner
            .tweets
            .get(tweet_id)
            .map(|tweet| tweet.author_id.clone())
            .ok_or(Error::not_found("tweet"))?;
        let comments = inner.comments.entry(tweet_id.to_string()).or_default();
        let comment = comments
            .iter()
            .find(|comment| comment.id == comment_id)
            .ok_or(Error::not_found("comment"))?;
        if comment.author_id != caller_id && owner_id != caller_id {
            return Err(Error::Forbidden("you are not allowed to delete this comment"));
        }
        comments.retain(|comment| comment.id != comment_id);
        Ok(())
    }

    async fn comments(&self, tweet_id: &str) -> Result<Vec<Comment>> {
        Ok(self.read().comments.get(tweet_id).cloned().unwrap_or_default())
    }

    async fn tweets_by_authors(&self, author_ids: &[String], skip: u64, limit: u64) -> Result<TweetSlice> {
        let inner = self.read();
        let matching: Vec<Tweet> = inner
            .tweets
            .values()
            .filter(|tweet| author_ids.iter().any(|id| *id == tweet.author_id))
            .map(|tweet| hydrated(&inner, tweet))
            .collect();
        let total = matching.len() as u64;
        Ok(TweetSlice {
            tweets: paginate(matching, skip, limit),
            total,
        })
    }

    async fn bookmarked_tweets(&self, account_id: &str, skip: u64, limit: u64) -> Result<TweetSlice> {
        let inner = self.read();
        let ids = inner.bookmarks.get(account_id).cloned().unwrap_or_default();
        let total = ids.len() as u64;
        let matching: Vec<Tweet> = ids
            .iter()
            .filter_map(|id| inner.tweets.get(id))
            .map(|tweet| hydrated(&inner, tweet))
            .collect();
        Ok(TweetSlice {
            tweets: paginate(matching, skip, limit),
            total,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(username: &str, email: &str) -> Account {
        Account::new(username.to_uppercase(), username.into(), email.into(), "hash".into())
    }

    #[tokio::test]
    async fn case_only_email_change_does_not_conflict_with_own_index() {
        let store = MemoryStore::new();
        let alice = account("alice", "Alice@Example.com");
        store.insert_account(&alice).await.unwrap();

        let patched = store
            .patch_account(
                &alice.id,
                &AccountPatch {
                    email: Some("alice@example.com".into()),
                    username: Some("ALICE".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(patched.email, "alice@example.com");
        assert_eq!(patched.username, "ALICE");

        let found = store.account_by_email("ALICE@EXAMPLE.COM").await.unwrap().unwrap();
        assert_eq!(found.id, alice.id);
    }

    #[tokio::test]
    async fn email_change_onto_another_account_conflicts() {
        let store = MemoryStore::new();
        let alice = account("alice", "alice@example.com");
        let bob = account("bob", "bob@example.com");
        store.insert_account(&alice).await.unwrap();
        store.insert_account(&bob).await.unwrap();

        let err = store
            .patch_account(
                &bob.id,
                &AccountPatch {
                    email: Some("ALICE@example.com".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
        let unchanged = store.account(&bob.id).await.unwrap().unwrap();
        assert_eq!(unchanged.email, "bob@example.com");
    }

    #[tokio::test]
    async fn email_change_re_homes_the_unique_index() {
        let store = MemoryStore::new();
        let alice = account("alice", "alice@example.com");
        store.insert_account(&alice).await.unwrap();

        store
            .patch_account(
                &alice.id,
                &AccountPatch {
                    email: Some("new@example.com".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert!(store.account_by_email("alice@example.com").await.unwrap().is_none());
        let found = store.account_by_email("new@example.com").await.unwrap().unwrap();
        assert_eq!(found.id, alice.id);
    }
}
