//! Tweet-facing routes under `/api/v1/tweet`.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::{
    errors::Error,
    http::{
        error::ApiResult,
        extract::{ApiJson, ApiQuery, Caller},
        state::AppState,
    },
    media::{MediaSink, Upload},
    service::{
        content::{self, NewTweet},
        feed::{self, FeedPage, PageQuery},
        relations,
    },
    store::{LikeAction, Store},
};

/// The feed envelope shared by every paginated tweet listing.
pub(crate) fn feed_body(message: &str, page: FeedPage) -> serde_json::Value {
    json!({
        "success": true,
        "message": message,
        "tweets": page.tweets,
        "count": page.count,
        "currentPage": page.current_page,
        "totalPages": page.total_pages,
    })
}

pub async fn create<S: Store, M: MediaSink>(
    State(state): State<AppState<S, M>>,
    Caller(caller_id): Caller,
    mut multipart: Multipart,
) -> ApiResult<Response> {
    let mut new_tweet = NewTweet::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| Error::validation(format!("malformed multipart body: {err}")))?
    {
        match field.name().unwrap_or_default() {
            "description" => {
                let text = field
                    .text()
                    .await
                    .map_err(|err| Error::validation(format!("failed to read field: {err}")))?;
                new_tweet.description = Some(text);
            }
            "media" => {
                let content_type = field.content_type().unwrap_or("application/octet-stream").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|err| Error::validation(format!("failed to read upload: {err}")))?;
                new_tweet.media = Some(Upload {
                    bytes: bytes.to_vec(),
                    content_type,
                });
            }
            _ => {}
        }
    }

    let tweet = content::create_tweet(&state.store, &state.sink, &caller_id, new_tweet).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Tweet created successfully",
            "tweet": tweet,
        })),
    )
        .into_response())
}

pub async fn remove<S: Store, M: MediaSink>(
    State(state): State<AppState<S, M>>,
    _caller: Caller,
    Path(tweet_id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    content::delete_tweet(&state.store, &tweet_id).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Tweet deleted successfully",
    })))
}

pub async fn like<S: Store, M: MediaSink>(
    State(state): State<AppState<S, M>>,
    Caller(caller_id): Caller,
    Path(tweet_id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    let action = relations::toggle_like(&state.store, &caller_id, &tweet_id).await?;
    let message = match action {
        LikeAction::Liked => "Tweet liked successfully",
        LikeAction::Disliked => "Tweet disliked successfully",
    };
    Ok(Json(json!({
        "success": true,
        "message": message,
        "action": action,
    })))
}

pub async fn home_feed<S: Store, M: MediaSink>(
    State(state): State<AppState<S, M>>,
    _caller: Caller,
    Path(account_id): Path<String>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> ApiResult<Json<serde_json::Value>> {
    let page = feed::home_feed(&state.store, &account_id, query).await?;
    Ok(Json(feed_body("Tweets fetched successfully", page)))
}

pub async fn following_feed<S: Store, M: MediaSink>(
    State(state): State<AppState<S, M>>,
    _caller: Caller,
    Path(account_id): Path<String>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> ApiResult<Json<serde_json::Value>> {
    let page = feed::following_feed(&state.store, &account_id, query).await?;
    let message = if page.count == 0 && page.total_pages == 0 {
        "You are not following anyone yet."
    } else {
        "Tweets fetched successfully"
    };
    Ok(Json(feed_body(message, page)))
}

pub async fn author_feed<S: Store, M: MediaSink>(
    State(state): State<AppState<S, M>>,
    Path(author_id): Path<String>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> ApiResult<Json<serde_json::Value>> {
    let page = feed::author_feed(&state.store, &author_id, query).await?;
    Ok(Json(feed_body("Tweets fetched successfully", page)))
}

#[derive(Deserialize)]
pub struct CommentRequest {
    pub text: String,
}

pub async fn add_comment<S: Store, M: MediaSink>(
    State(state): State<AppState<S, M>>,
    Caller(caller_id): Caller,
    Path(tweet_id): Path<String>,
    ApiJson(request): ApiJson<CommentRequest>,
) -> ApiResult<Response> {
    let tweet = content::add_comment(&state.store, &caller_id, &tweet_id, &request.text).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Comment added successfully",
            "tweet": tweet,
        })),
    )
        .into_response())
}

pub async fn list_comments<S: Store, M: MediaSink>(
    State(state): State<AppState<S, M>>,
    _caller: Caller,
    Path(tweet_id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    let comments = content::list_comments(&state.store, &tweet_id).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Comments fetched successfully",
        "count": comments.len(),
        "comments": comments,
    })))
}

pub async fn remove_comment<S: Store, M: MediaSink>(
    State(state): State<AppState<S, M>>,
    Caller(caller_id): Caller,
    Path((tweet_id, comment_id)): Path<(String, String)>,
) -> ApiResult<Json<serde_json::Value>> {
    content::delete_comment(&state.store, &caller_id, &tweet_id, &comment_id).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Comment deleted successfully",
    })))
}
