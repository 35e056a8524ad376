//! Account-facing routes under `/api/v1/user`.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use serde_json::json;

use crate::{
    auth,
    errors::Error,
    http::{
        error::ApiResult,
        extract::{ApiJson, ApiQuery, Caller},
        state::AppState,
        tweet::feed_body,
    },
    media::{MediaSink, Upload},
    models::Profile,
    service::{accounts, feed, feed::PageQuery, relations},
    store::{FollowAction, Store},
};

pub async fn register<S: Store, M: MediaSink>(
    State(state): State<AppState<S, M>>,
    ApiJson(registration): ApiJson<auth::Registration>,
) -> ApiResult<Response> {
    let account = auth::register(&state.store, registration, state.bcrypt_cost).await?;
    let profile = Profile::from_account(account, Vec::new(), Vec::new(), Vec::new());
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Account created successfully",
            "user": profile,
        })),
    )
        .into_response())
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

pub async fn login<S: Store, M: MediaSink>(
    State(state): State<AppState<S, M>>,
    jar: CookieJar,
    ApiJson(request): ApiJson<LoginRequest>,
) -> ApiResult<Response> {
    let account = auth::login(&state.store, &request.email, &request.password).await?;
    let token = state.sessions.issue(&account.id)?;
    let jar = jar.add(state.sessions.session_cookie(token));
    let message = format!("Welcome back {}", account.name);
    let profile = accounts::profile(&state.store, &account.id).await?;
    Ok((
        jar,
        Json(json!({
            "success": true,
            "message": message,
            "user": profile,
        })),
    )
        .into_response())
}

/// Clears the session cookie. Tokens are not revoked server-side; an already
/// issued token stays valid until it expires.
pub async fn logout<S: Store, M: MediaSink>(
    State(state): State<AppState<S, M>>,
    jar: CookieJar,
) -> ApiResult<Response> {
    let jar = jar.add(state.sessions.expired_cookie());
    Ok((
        jar,
        Json(json!({
            "success": true,
            "message": "Logged out successfully",
        })),
    )
        .into_response())
}

pub async fn profile<S: Store, M: MediaSink>(
    State(state): State<AppState<S, M>>,
    _caller: Caller,
    Path(account_id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    let profile = accounts::profile(&state.store, &account_id).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Profile fetched successfully",
        "user": profile,
    })))
}

pub async fn other_users<S: Store, M: MediaSink>(
    State(state): State<AppState<S, M>>,
    _caller: Caller,
    Path(account_id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    let others = accounts::list_others(&state.store, &account_id).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Users fetched successfully",
        "users": others,
    })))
}

pub async fn follow_unfollow<S: Store, M: MediaSink>(
    State(state): State<AppState<S, M>>,
    Caller(caller_id): Caller,
    Path(target_id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    let action = relations::toggle_follow(&state.store, &caller_id, &target_id).await?;
    let message = match action {
        FollowAction::Followed => "User followed successfully",
        FollowAction::Unfollowed => "User unfollowed successfully",
    };
    Ok(Json(json!({
        "success": true,
        "message": message,
        "action": action,
        "user": caller_id,
        "target": target_id,
    })))
}

pub async fn toggle_bookmark<S: Store, M: MediaSink>(
    State(state): State<AppState<S, M>>,
    Caller(caller_id): Caller,
    Path(tweet_id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    let action = relations::toggle_bookmark(&state.store, &caller_id, &tweet_id).await?;
    let bookmarks = state.store.bookmarks(&caller_id).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Bookmark updated successfully",
        "action": action,
        "bookmarks": bookmarks,
    })))
}

pub async fn bookmarked<S: Store, M: MediaSink>(
    State(state): State<AppState<S, M>>,
    Caller(caller_id): Caller,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> ApiResult<Json<serde_json::Value>> {
    let page = feed::bookmarked_feed(&state.store, &caller_id, query).await?;
    Ok(Json(feed_body("Bookmarked tweets fetched successfully", page)))
}

pub async fn edit_profile<S: Store, M: MediaSink>(
    State(state): State<AppState<S, M>>,
    Caller(caller_id): Caller,
    mut multipart: Multipart,
) -> ApiResult<Json<serde_json::Value>> {
    let mut update = accounts::ProfileUpdate::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| Error::validation(format!("malformed multipart body: {err}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "avatar" | "banner" => {
                let content_type = field.content_type().unwrap_or("application/octet-stream").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|err| Error::validation(format!("failed to read upload: {err}")))?;
                let upload = Upload {
                    bytes: bytes.to_vec(),
                    content_type,
                };
                if name == "avatar" {
                    update.avatar = Some(upload);
                } else {
                    update.banner = Some(upload);
                }
            }
            "name" | "username" | "email" | "bio" => {
                let value = field
                    .text()
                    .await
                    .map_err(|err| Error::validation(format!("failed to read field: {err}")))?;
                match name.as_str() {
                    "name" => update.name = Some(value),
                    "username" => update.username = Some(value),
                    "email" => update.email = Some(value),
                    _ => update.bio = Some(value),
                }
            }
            _ => {}
        }
    }

    let profile = accounts::update_profile(&state.store, &state.sink, &caller_id, update).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Profile updated successfully",
        "user": profile,
    })))
}
