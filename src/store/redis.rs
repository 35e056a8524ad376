//! Redis-backed [`Store`].
//!
//! Account and tweet records are JSON documents under plain string keys.
//! Relationship state uses native structures: follower/following/like sets,
//! bookmark and timeline sorted sets. Every multi-step mutation runs as a
//! server-side Lua script, so each toggle is one atomic storage operation
//! and concurrent toggles from different callers cannot lose updates.

use redis::{Script, aio::ConnectionManager, cmd};
use serde_json::Value;

use crate::{
    errors::{Error, Result},
    keys::KeySpace,
    models::{Account, AccountPatch, Comment, Tweet},
    store::{
        BookmarkAction, FollowAction, LikeAction, Store, TweetSlice,
        scripts::{
            ADD_COMMENT_SCRIPT, CREATE_ACCOUNT_SCRIPT, PATCH_ACCOUNT_SCRIPT, REMOVE_COMMENT_SCRIPT,
            REMOVE_TWEET_SCRIPT, TOGGLE_BOOKMARK_SCRIPT, TOGGLE_FOLLOW_SCRIPT, TOGGLE_LIKE_SCRIPT,
        },
    },
};

#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
    keys: KeySpace,
}

impl RedisStore {
    pub fn new(conn: ConnectionManager, prefix: impl Into<String>) -> Self {
        Self {
            conn,
            keys: KeySpace::new(prefix),
        }
    }

    /// Runs a Lua script and decodes its JSON reply, mapping embedded error
    /// codes onto the crate error taxonomy.
    async fn invoke(&self, script: &Script, keys: &[String], args: &[&str]) -> Result<Value> {
        let mut conn = self.conn.clone();
        let mut invocation = script.prepare_invoke();
        for key in keys {
            invocation.key(key.as_str());
        }
        for arg in args {
            invocation.arg(*arg);
        }
        let raw: String = invocation.invoke_async(&mut conn).await?;
        let value: Value = serde_json::from_str(&raw)
            .map_err(|err| Error::internal(format!("failed to parse lua response: {err}")))?;
        if let Some(code) = value.get("error").and_then(|v| v.as_str()) {
            return Err(script_error(code));
        }
        Ok(value)
    }

    async fn read_account(&self, key: &str) -> Result<Option<Account>> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = cmd("GET").arg(key).query_async(&mut conn).await?;
        raw.map(|json| serde_json::from_str(&json).map_err(Error::from)).transpose()
    }

    async fn set_members(&self, key: &str) -> Result<Vec<String>> {
        let mut conn = self.conn.clone();
        let members: Vec<String> = cmd("SMEMBERS").arg(key).query_async(&mut conn).await?;
        Ok(members)
    }

    /// Fetches tweet documents by id, preserving order and hydrating each
    /// one's like set and comment list. Ids whose document has vanished are
    /// skipped.
    async fn read_tweets(&self, tweet_ids: &[String]) -> Result<Vec<Tweet>> {
        if tweet_ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.conn.clone();
        let mut mget = cmd("MGET");
        for id in tweet_ids {
            mget.arg(self.keys.tweet(id));
        }
        let docs: Vec<Option<String>> = mget.query_async(&mut conn).await?;
        let mut tweets = Vec::with_capacity(docs.len());
        for doc in docs.into_iter().flatten() {
            let mut tweet: Tweet = serde_json::from_str(&doc)?;
            self.hydrate(&mut tweet).await?;
            tweets.push(tweet);
        }
        Ok(tweets)
    }

    async fn hydrate(&self, tweet: &mut Tweet) -> Result<()> {
        let mut conn = self.conn.clone();
        tweet.like = cmd("SMEMBERS").arg(self.keys.likes(&tweet.id)).query_async(&mut conn).await?;
        let raw_comments: Vec<String> = cmd("LRANGE")
            .arg(self.keys.comments(&tweet.id))
            .arg(0)
            .arg(-1)
            .query_async(&mut conn)
            .await?;
        tweet.comments = raw_comments
            .iter()
            .map(|raw| serde_json::from_str(raw).map_err(Error::from))
            .collect::<Result<Vec<Comment>>>()?;
        Ok(())
    }
}

fn script_error(code: &str) -> Error {
    match code {
        "account_not_found" => Error::not_found("account"),
        "tweet_not_found" => Error::not_found("tweet"),
        "comment_not_found" => Error::not_found("comment"),
        "email_taken" | "username_taken" => Error::Conflict("account"),
        "forbidden" => Error::Forbidden("you are not allowed to delete this comment"),
        other => Error::internal(format!("unexpected script error: {other}")),
    }
}

fn script_action(value: &Value) -> Result<&str> {
    value
        .get("action")
        .and_then(|v| v.as_str())
        .ok_or_else(|| Error::internal("script reply missing action"))
}

impl Store for RedisStore {
    async fn insert_account(&self, account: &Account) -> Result<()> {
        let document = serde_json::to_string(account)?;
        let keys = [
            self.keys.account(&account.id),
            self.keys.account_email_index(&account.email),
            self.keys.account_username_index(&account.username),
            self.keys.accounts(),
        ];
        self.invoke(&CREATE_ACCOUNT_SCRIPT, &keys, &[&document, &account.id]).await?;
        Ok(())
    }

    async fn account(&self, account_id: &str) -> Result<Option<Account>> {
        self.read_account(&self.keys.account(account_id)).await
    }

    async fn account_by_email(&self, email: &str) -> Result<Option<Account>> {
        let mut conn = self.conn.clone();
        let id: Option<String> = cmd("GET")
            .arg(self.keys.account_email_index(email))
            .query_async(&mut conn)
            .await?;
        match id {
            Some(id) => self.account(&id).await,
            None => Ok(None),
        }
    }

    async fn accounts_except(&self, exclude_id: &str) -> Result<Vec<Account>> {
        let ids = self.set_members(&self.keys.accounts()).await?;
        let mut accounts = Vec::new();
        for id in ids {
            if id == exclude_id {
                continue;
            }
            if let Some(account) = self.account(&id).await? {
                accounts.push(account);
            }
        }
        Ok(accounts)
    }

    async fn patch_account(&self, account_id: &str, patch: &AccountPatch) -> Result<Account> {
        let payload = serde_json::to_string(patch)?;
        let updated_at = chrono::Utc::now().to_rfc3339();
        let keys = [self.keys.account(account_id)];
        let email_prefix = self.keys.account_email_prefix();
        let username_prefix = self.keys.account_username_prefix();
        let value = self
            .invoke(
                &PATCH_ACCOUNT_SCRIPT,
                &keys,
                &[&payload, &updated_at, &email_prefix, &username_prefix],
            )
            .await?;
        let raw = value
            .get("account")
            .and_then(|v| v.as_str())
            .ok_or_else(|| Error::internal("script reply missing account"))?;
        Ok(serde_json::from_str(raw)?)
    }

    async fn followers(&self, account_id: &str) -> Result<Vec<String>> {
        self.set_members(&self.keys.followers(account_id)).await
    }

    async fn following(&self, account_id: &str) -> Result<Vec<String>> {
        self.set_members(&self.keys.following(account_id)).await
    }

    async fn bookmarks(&self, account_id: &str) -> Result<Vec<String>> {
        let mut conn = self.conn.clone();
        let ids: Vec<String> = cmd("ZRANGE")
            .arg(self.keys.bookmarks(account_id))
            .arg(0)
            .arg(-1)
            .query_async(&mut conn)
            .await?;
        Ok(ids)
    }

    async fn toggle_follow(&self, caller_id: &str, target_id: &str) -> Result<FollowAction> {
        let keys = [
            self.keys.account(caller_id),
            self.keys.account(target_id),
            self.keys.followers(target_id),
            self.keys.following(caller_id),
        ];
        let value = self.invoke(&TOGGLE_FOLLOW_SCRIPT, &keys, &[caller_id, target_id]).await?;
        match script_action(&value)? {
            "followed" => Ok(FollowAction::Followed),
            "unfollowed" => Ok(FollowAction::Unfollowed),
            other => Err(Error::internal(format!("unexpected follow action: {other}"))),
        }
    }

    async fn toggle_bookmark(&self, caller_id: &str, tweet_id: &str) -> Result<BookmarkAction> {
        let keys = [self.keys.account(caller_id), self.keys.bookmarks(caller_id)];
        let score = chrono::Utc::now().timestamp_millis().to_string();
        let value = self.invoke(&TOGGLE_BOOKMARK_SCRIPT, &keys, &[tweet_id, &score]).await?;
        match script_action(&value)? {
            "added" => Ok(BookmarkAction::Added),
            "removed" => Ok(BookmarkAction::Removed),
            other => Err(Error::internal(format!("unexpected bookmark action: {other}"))),
        }
    }

    async fn insert_tweet(&self, tweet: &Tweet) -> Result<()> {
        let document = serde_json::to_string(tweet)?;
        let mut conn = self.conn.clone();
        redis::pipe()
            .atomic()
            .cmd("SET")
            .arg(self.keys.tweet(&tweet.id))
            .arg(&document)
            .ignore()
            .cmd("ZADD")
            .arg(self.keys.timeline(&tweet.author_id))
            .arg(tweet.created_at.timestamp_millis())
            .arg(&tweet.id)
            .ignore()
            .query_async::<()>(&mut conn)
            .await?;
        Ok(())
    }

    async fn tweet(&self, tweet_id: &str) -> Result<Option<Tweet>> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = cmd("GET").arg(self.keys.tweet(tweet_id)).query_async(&mut conn).await?;
        match raw {
            Some(json) => {
                let mut tweet: Tweet = serde_json::from_str(&json)?;
                self.hydrate(&mut tweet).await?;
                Ok(Some(tweet))
            }
            None => Ok(None),
        }
    }

    async fn remove_tweet(&self, tweet_id: &str) -> Result<()> {
        let keys = [
            self.keys.tweet(tweet_id),
            self.keys.likes(tweet_id),
            self.keys.comments(tweet_id),
        ];
        let timeline_prefix = self.keys.timeline_prefix();
        self.invoke(&REMOVE_TWEET_SCRIPT, &keys, &[&timeline_prefix]).await?;
        Ok(())
    }

    async fn toggle_like(&self, tweet_id: &str, account_id: &str) -> Result<LikeAction> {
        let keys = [self.keys.tweet(tweet_id), self.keys.likes(tweet_id)];
        let value = self.invoke(&TOGGLE_LIKE_SCRIPT, &keys, &[account_id]).await?;
        match script_action(&value)? {
            "liked" => Ok(LikeAction::Liked),
            "disliked" => Ok(LikeAction::Disliked),
            other => Err(Error::internal(format!("unexpected like action: {other}"))),
        }
    }

    async fn add_comment(&self, tweet_id: &str, comment: &Comment) -> Result<()> {
        let document = serde_json::to_string(comment)?;
        let keys = [self.keys.tweet(tweet_id), self.keys.comments(tweet_id)];
        self.invoke(&ADD_COMMENT_SCRIPT, &keys, &[&document]).await?;
        Ok(())
    }

    async fn remove_comment(&self, tweet_id: &str, comment_id: &str, caller_id: &str) -> Result<()> {
        let keys = [self.keys.tweet(tweet_id), self.keys.comments(tweet_id)];
        self.invoke(&REMOVE_COMMENT_SCRIPT, &keys, &[comment_id, caller_id]).await?;
        Ok(())
    }

    async fn comments(&self, tweet_id: &str) -> Result<Vec<Comment>> {
        let mut conn = self.conn.clone();
        let raw: Vec<String> = cmd("LRANGE")
            .arg(self.keys.comments(tweet_id))
            .arg(0)
            .arg(-1)
            .query_async(&mut conn)
            .await?;
        raw.iter().map(|entry| serde_json::from_str(entry).map_err(Error::from)).collect()
    }

    async fn tweets_by_authors(&self, author_ids: &[String], skip: u64, limit: u64) -> Result<TweetSlice> {
        if author_ids.is_empty() || limit == 0 {
            return Ok(TweetSlice {
                tweets: Vec::new(),
                total: 0,
            });
        }
        let mut conn = self.conn.clone();
        let scratch = self.keys.feed_scratch();
        let mut union = cmd("ZUNIONSTORE");
        union.arg(&scratch).arg(author_ids.len());
        for id in author_ids {
            union.arg(self.keys.timeline(id));
        }
        let total: u64 = union.query_async(&mut conn).await?;
        // Drop the scratch key even when the range read fails.
        let ids = cmd("ZREVRANGE")
            .arg(&scratch)
            .arg(skip as i64)
            .arg((skip + limit - 1) as i64)
            .query_async::<Vec<String>>(&mut conn)
            .await;
        let _: u64 = cmd("DEL").arg(&scratch).query_async(&mut conn).await?;
        let tweets = self.read_tweets(&ids?).await?;
        Ok(TweetSlice { tweets, total })
    }

    async fn bookmarked_tweets(&self, account_id: &str, skip: u64, limit: u64) -> Result<TweetSlice> {
        let ids = self.bookmarks(account_id).await?;
        let total = ids.len() as u64;
        let mut tweets = self.read_tweets(&ids).await?;
        tweets.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let tweets = tweets
            .into_iter()
            .skip(skip as usize)
            .take(limit as usize)
            .collect();
        Ok(TweetSlice { tweets, total })
    }
}
