//! Feed assembler: paginated, newest-first tweet listings.

use serde::Deserialize;

use crate::{
    errors::{Error, Result},
    models::Tweet,
    store::Store,
};

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 10;

/// Pagination parameters as they arrive on the query string.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

impl PageQuery {
    /// `(page, limit, skip)` with defaults applied and a zero page clamped
    /// up to the first.
    pub fn normalize(self) -> (u64, u64, u64) {
        let page = self.page.unwrap_or(DEFAULT_PAGE).max(1);
        let limit = self.limit.unwrap_or(DEFAULT_LIMIT);
        (page, limit, (page - 1) * limit)
    }
}

/// One page of a feed plus the counters the client paginates with.
#[derive(Debug, Clone)]
pub struct FeedPage {
    pub tweets: Vec<Tweet>,
    pub count: u64,
    pub current_page: u64,
    pub total_pages: u64,
}

impl FeedPage {
    fn new(tweets: Vec<Tweet>, total: u64, page: u64, limit: u64) -> Self {
        let total_pages = if limit == 0 { 0 } else { total.div_ceil(limit) };
        Self {
            tweets,
            count: total,
            current_page: page,
            total_pages,
        }
    }

    /// The page reported when the scope has no content at all.
    fn empty(page: u64) -> Self {
        Self {
            tweets: Vec::new(),
            count: 0,
            current_page: page,
            total_pages: 0,
        }
    }
}

/// Tweets by the caller and everyone they follow, newest first.
pub async fn home_feed<S: Store>(store: &S, caller_id: &str, query: PageQuery) -> Result<FeedPage> {
    if store.account(caller_id).await?.is_none() {
        return Err(Error::not_found("account"));
    }
    let (page, limit, skip) = query.normalize();
    let mut authors = store.following(caller_id).await?;
    authors.push(caller_id.to_string());
    let slice = store.tweets_by_authors(&authors, skip, limit).await?;
    Ok(FeedPage::new(slice.tweets, slice.total, page, limit))
}

/// Tweets by followed accounts only. When the caller follows nobody this
/// reports an empty page without touching the content store.
pub async fn following_feed<S: Store>(store: &S, caller_id: &str, query: PageQuery) -> Result<FeedPage> {
    if store.account(caller_id).await?.is_none() {
        return Err(Error::not_found("account"));
    }
    let (page, limit, skip) = query.normalize();
    let authors = store.following(caller_id).await?;
    if authors.is_empty() {
        return Ok(FeedPage::empty(page));
    }
    let slice = store.tweets_by_authors(&authors, skip, limit).await?;
    Ok(FeedPage::new(slice.tweets, slice.total, page, limit))
}

/// Tweets by one author, newest first. An unknown author yields an empty
/// feed rather than an error.
pub async fn author_feed<S: Store>(store: &S, author_id: &str, query: PageQuery) -> Result<FeedPage> {
    let (page, limit, skip) = query.normalize();
    let slice = store.tweets_by_authors(&[author_id.to_string()], skip, limit).await?;
    Ok(FeedPage::new(slice.tweets, slice.total, page, limit))
}

/// The caller's bookmarked tweets, newest first. The total counts bookmark
/// entries, so a bookmark whose tweet has since been deleted still counts.
pub async fn bookmarked_feed<S: Store>(store: &S, caller_id: &str, query: PageQuery) -> Result<FeedPage> {
    if store.account(caller_id).await?.is_none() {
        return Err(Error::not_found("account"));
    }
    let (page, limit, skip) = query.normalize();
    let bookmarks = store.bookmarks(caller_id).await?;
    if bookmarks.is_empty() {
        return Ok(FeedPage::empty(page));
    }
    let slice = store.bookmarked_tweets(caller_id, skip, limit).await?;
    Ok(FeedPage::new(slice.tweets, slice.total, page, limit))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{Account, AuthorSnapshot, Tweet},
        store::MemoryStore,
    };

    async fn seed_account(store: &MemoryStore, username: &str) -> Account {
        let account = Account::new(
            username.into(),
            username.into(),
            format!("{username}@example.com"),
            "hash".into(),
        );
        store.insert_account(&account).await.unwrap();
        account
    }

    async fn seed_tweet(store: &MemoryStore, author: &Account, text: &str, age_secs: i64) -> Tweet {
        let mut tweet = Tweet::new(AuthorSnapshot::from(author), Some(text.into()), None, None);
        tweet.created_at -= chrono::Duration::seconds(age_secs);
        store.insert_tweet(&tweet).await.unwrap();
        tweet
    }

    #[tokio::test]
    async fn pagination_math() {
        let store = MemoryStore::new();
        let alice = seed_account(&store, "alice").await;
        for i in 0..25 {
            seed_tweet(&store, &alice, &format!("tweet {i}"), i).await;
        }

        let page = author_feed(
            &store,
            &alice.id,
            PageQuery {
                page: Some(3),
                limit: Some(10),
            },
        )
        .await
        .unwrap();
        assert_eq!(page.tweets.len(), 5);
        assert_eq!(page.count, 25);
        assert_eq!(page.current_page, 3);
        assert_eq!(page.total_pages, 3);
    }

    #[tokio::test]
    async fn defaults_are_page_one_limit_ten() {
        let store = MemoryStore::new();
        let alice = seed_account(&store, "alice").await;
        for i in 0..12 {
            seed_tweet(&store, &alice, &format!("tweet {i}"), i).await;
        }

        let page = author_feed(&store, &alice.id, PageQuery::default()).await.unwrap();
        assert_eq!(page.tweets.len(), 10);
        assert_eq!(page.current_page, 1);
        assert_eq!(page.total_pages, 2);
    }

    #[tokio::test]
    async fn home_feed_merges_self_and_followed_newest_first() {
        let store = MemoryStore::new();
        let alice = seed_account(&store, "alice").await;
        let bob = seed_account(&store, "bob").await;
        let carol = seed_account(&store, "carol").await;
        store.toggle_follow(&alice.id, &bob.id).await.unwrap();

        seed_tweet(&store, &alice, "from alice", 30).await;
        seed_tweet(&store, &bob, "from bob", 10).await;
        seed_tweet(&store, &carol, "from carol", 20).await;

        let page = home_feed(&store, &alice.id, PageQuery::default()).await.unwrap();
        let texts: Vec<_> = page
            .tweets
            .iter()
            .map(|t| t.description.clone().unwrap())
            .collect();
        assert_eq!(texts, vec!["from bob", "from alice"]);
    }

    #[tokio::test]
    async fn following_feed_excludes_own_tweets() {
        let store = MemoryStore::new();
        let alice = seed_account(&store, "alice").await;
        let bob = seed_account(&store, "bob").await;
        store.toggle_follow(&alice.id, &bob.id).await.unwrap();

        seed_tweet(&store, &alice, "mine", 0).await;
        seed_tweet(&store, &bob, "theirs", 0).await;

        let page = following_feed(&store, &alice.id, PageQuery::default()).await.unwrap();
        assert_eq!(page.tweets.len(), 1);
        assert_eq!(page.tweets[0].description.as_deref(), Some("theirs"));
    }

    #[tokio::test]
    async fn empty_following_reports_zero_page() {
        let store = MemoryStore::new();
        let alice = seed_account(&store, "alice").await;
        seed_tweet(&store, &alice, "mine", 0).await;

        let page = following_feed(
            &store,
            &alice.id,
            PageQuery {
                page: Some(4),
                limit: Some(10),
            },
        )
        .await
        .unwrap();
        assert!(page.tweets.is_empty());
        assert_eq!(page.count, 0);
        // Empty scopes echo the requested page, matching the bookmarked feed.
        assert_eq!(page.current_page, 4);
        assert_eq!(page.total_pages, 0);
    }

    #[tokio::test]
    async fn feed_for_unknown_account_is_not_found() {
        let store = MemoryStore::new();
        let err = home_feed(&store, "ghost", PageQuery::default()).await.unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }

    #[tokio::test]
    async fn bookmarked_feed_sorts_and_counts_bookmarks() {
        let store = MemoryStore::new();
        let alice = seed_account(&store, "alice").await;
        let old = seed_tweet(&store, &alice, "old", 100).await;
        let fresh = seed_tweet(&store, &alice, "fresh", 1).await;
        store.toggle_bookmark(&alice.id, &old.id).await.unwrap();
        store.toggle_bookmark(&alice.id, &fresh.id).await.unwrap();

        let page = bookmarked_feed(&store, &alice.id, PageQuery::default()).await.unwrap();
        assert_eq!(page.count, 2);
        assert_eq!(page.tweets[0].description.as_deref(), Some("fresh"));
        assert_eq!(page.tweets[1].description.as_deref(), Some("old"));
    }

    #[tokio::test]
    async fn empty_bookmarks_short_circuit() {
        let store = MemoryStore::new();
        let alice = seed_account(&store, "alice").await;

        let page = bookmarked_feed(
            &store,
            &alice.id,
            PageQuery {
                page: Some(2),
                limit: Some(5),
            },
        )
        .await
        .unwrap();
        assert!(page.tweets.is_empty());
        assert_eq!(page.current_page, 2);
        assert_eq!(page.total_pages, 0);
    }
}
