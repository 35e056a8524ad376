use axum::{
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
};
use axum_extra::extract::cookie::CookieJar;

use crate::{
    auth::SESSION_COOKIE,
    errors::Error,
    http::{error::ApiError, state::AppState},
    media::MediaSink,
    store::Store,
};

/// The authenticated caller's account id, extracted from the session cookie.
///
/// Every handler that needs identity takes this one typed value; nothing
/// reads caller ids out of request bodies.
pub struct Caller(pub String);

impl<S: Store, M: MediaSink> FromRequestParts<AppState<S, M>> for Caller {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<S, M>,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar.get(SESSION_COOKIE).ok_or(ApiError(Error::Unauthenticated))?;
        let account_id = state.sessions.authenticate(token.value())?;
        Ok(Caller(account_id))
    }
}

/// `Json` whose rejections (missing fields, malformed bodies) render through
/// the structured failure envelope instead of axum's plain-text default.
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: serde::de::DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let axum::Json(value) = axum::Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError(Error::validation(rejection.body_text())))?;
        Ok(Self(value))
    }
}

/// `Query` counterpart of [`ApiJson`].
pub struct ApiQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: serde::de::DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError(Error::validation(rejection.body_text())))?;
        Ok(Self(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{header::CONTENT_TYPE, StatusCode},
        response::IntoResponse,
    };
    use serde::Deserialize;

    #[derive(Deserialize)]
    #[allow(dead_code)]
    struct SignupBody {
        email: String,
        password: String,
    }

    #[derive(Deserialize)]
    #[allow(dead_code)]
    struct Paging {
        page: Option<u64>,
    }

    async fn envelope_of(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn missing_json_field_renders_the_envelope() {
        let request = Request::builder()
            .method("POST")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"email":"a@example.com"}"#))
            .unwrap();
        let Err(err) = ApiJson::<SignupBody>::from_request(request, &()).await else {
            panic!("extraction should fail");
        };
        let (status, body) = envelope_of(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], serde_json::Value::Bool(false));
        assert!(body["message"].is_string());
    }

    #[tokio::test]
    async fn malformed_json_body_renders_the_envelope() {
        let request = Request::builder()
            .method("POST")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let Err(err) = ApiJson::<SignupBody>::from_request(request, &()).await else {
            panic!("extraction should fail");
        };
        let (status, body) = envelope_of(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], serde_json::Value::Bool(false));
    }

    #[tokio::test]
    async fn malformed_query_renders_the_envelope() {
        let request = Request::builder()
            .uri("/feed?page=abc")
            .body(Body::empty())
            .unwrap();
        let (mut parts, _) = request.into_parts();
        let Err(err) = ApiQuery::<Paging>::from_request_parts(&mut parts, &()).await else {
            panic!("extraction should fail");
        };
        let (status, body) = envelope_of(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], serde_json::Value::Bool(false));
    }
}
