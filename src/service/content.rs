//! Content store: tweet creation and deletion, comments.

use std::collections::HashMap;

use crate::{
    errors::{Error, Result},
    media::{MediaSink, Upload},
    models::{AuthorSnapshot, Comment, CommentView, MediaKind, Tweet, COMMENT_MAX_CHARS},
    store::Store,
    validators::is_blank,
};

/// A new tweet as submitted: free text, a media upload, or both.
#[derive(Debug, Default)]
pub struct NewTweet {
    pub description: Option<String>,
    pub media: Option<Upload>,
}

/// Creates a tweet for the author, uploading any attached media first.
///
/// The author's display fields are copied onto the tweet as a snapshot and
/// never re-synced with later profile edits.
pub async fn create_tweet<S: Store, M: MediaSink>(
    store: &S,
    sink: &M,
    author_id: &str,
    new_tweet: NewTweet,
) -> Result<Tweet> {
    let description = new_tweet.description.filter(|text| !is_blank(text));
    if description.is_none() && new_tweet.media.is_none() {
        return Err(Error::validation("provide text or media for your tweet"));
    }
    let author = store.account(author_id).await?.ok_or(Error::not_found("account"))?;

    let (media_url, media_kind) = match new_tweet.media {
        Some(upload) => {
            let kind = MediaKind::from_content_type(&upload.content_type);
            let url = sink.upload(upload).await?;
            (Some(url), Some(kind))
        }
        None => (None, None),
    };

    let tweet = Tweet::new(AuthorSnapshot::from(&author), description, media_url, media_kind);
    store.insert_tweet(&tweet).await?;
    tracing::info!(tweet_id = %tweet.id, author_id = %author.id, "tweet created");
    Ok(tweet)
}

/// Reads one tweet with likes and comments hydrated.
pub async fn tweet<S: Store>(store: &S, tweet_id: &str) -> Result<Tweet> {
    store.tweet(tweet_id).await?.ok_or(Error::not_found("tweet"))
}

/// Deletes a tweet along with its likes and comments. Any authenticated
/// caller may delete any tweet, and deleting an absent tweet succeeds.
pub async fn delete_tweet<S: Store>(store: &S, tweet_id: &str) -> Result<()> {
    if is_blank(tweet_id) {
        return Err(Error::validation("tweet id is required"));
    }
    store.remove_tweet(tweet_id).await
}

/// Appends a comment to the tweet and returns the updated tweet.
pub async fn add_comment<S: Store>(store: &S, caller_id: &str, tweet_id: &str, text: &str) -> Result<Tweet> {
    let text = text.trim();
    if text.is_empty() {
        return Err(Error::validation("comment text is required"));
    }
    if text.chars().count() > COMMENT_MAX_CHARS {
        return Err(Error::validation(format!(
            "comment must be at most {COMMENT_MAX_CHARS} characters"
        )));
    }
    let comment = Comment::new(caller_id.to_string(), text.to_string());
    store.add_comment(tweet_id, &comment).await?;
    tweet(store, tweet_id).await
}

/// Removes one comment. Only the comment's author or the tweet's owner may
/// do so.
pub async fn delete_comment<S: Store>(store: &S, caller_id: &str, tweet_id: &str, comment_id: &str) -> Result<()> {
    store.remove_comment(tweet_id, comment_id, caller_id).await
}

/// The tweet's comments newest first, each with its author resolved to
/// current display info.
pub async fn list_comments<S: Store>(store: &S, tweet_id: &str) -> Result<Vec<CommentView>> {
    if store.tweet(tweet_id).await?.is_none() {
        return Err(Error::not_found("tweet"));
    }
    let mut comments = store.comments(tweet_id).await?;
    comments.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let mut authors: HashMap<String, Option<AuthorSnapshot>> = HashMap::new();
    let mut views = Vec::with_capacity(comments.len());
    for comment in comments {
        let author = match authors.get(&comment.author_id) {
            Some(cached) => cached.clone(),
            None => {
                let resolved = store
                    .account(&comment.author_id)
                    .await?
                    .map(|account| AuthorSnapshot::from(&account));
                authors.insert(comment.author_id.clone(), resolved.clone());
                resolved
            }
        };
        views.push(CommentView {
            id: comment.id,
            author,
            text: comment.text,
            created_at: comment.created_at,
        });
    }
    Ok(views)
}
