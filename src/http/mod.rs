//! HTTP surface: routing, shared state, the response envelope, and the
//! authenticated-caller extractor.

pub mod error;
pub mod extract;
pub mod state;
pub mod tweet;
pub mod user;

use axum::{
    http::{header::CONTENT_TYPE, HeaderValue, Method},
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;

pub use error::{ApiError, ApiResult};
pub use extract::{ApiJson, ApiQuery, Caller};
pub use state::AppState;

use crate::{media::MediaSink, store::Store};

/// Builds the full application router. CORS is restricted to the configured
/// frontend origin with credentials enabled so the session cookie survives
/// cross-origin requests.
pub fn router<S: Store, M: MediaSink>(state: AppState<S, M>, cors_origin: HeaderValue) -> Router {
    let user_routes = Router::new()
        .route("/register", post(user::register::<S, M>))
        .route("/login", post(user::login::<S, M>))
        .route("/logout", post(user::logout::<S, M>))
        .route("/profile/{id}", get(user::profile::<S, M>))
        .route("/other-user/{id}", get(user::other_users::<S, M>))
        .route("/follow-unfollow/{id}", post(user::follow_unfollow::<S, M>))
        .route("/bookmarks/{tweet_id}", put(user::toggle_bookmark::<S, M>))
        .route("/bookmarks", get(user::bookmarked::<S, M>))
        .route("/edit-profile", put(user::edit_profile::<S, M>));

    let tweet_routes = Router::new()
        .route("/create", post(tweet::create::<S, M>))
        .route("/delete/{id}", delete(tweet::remove::<S, M>))
        .route("/like/{id}", put(tweet::like::<S, M>))
        .route("/all-tweets/{id}", get(tweet::home_feed::<S, M>))
        .route("/all-following-tweets/{id}", get(tweet::following_feed::<S, M>))
        .route("/user/{id}", get(tweet::author_feed::<S, M>))
        .route("/{tweet_id}/comment", post(tweet::add_comment::<S, M>))
        .route("/{tweet_id}/comments", get(tweet::list_comments::<S, M>))
        .route("/comment/{tweet_id}/{comment_id}", delete(tweet::remove_comment::<S, M>));

    let cors = CorsLayer::new()
        .allow_origin(cors_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE])
        .allow_credentials(true);

    Router::new()
        .nest("/api/v1/user", user_routes)
        .nest("/api/v1/tweet", tweet_routes)
        .layer(cors)
        .with_state(state)
}
