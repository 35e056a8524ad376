//! JWT sessions carried in an HTTP-only cookie.

use axum_extra::extract::cookie::{Cookie, SameSite};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "token";

/// Session lifetime in seconds (24 hours).
const SESSION_TTL_SECS: i64 = 24 * 60 * 60;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: i64,
    exp: i64,
}

/// Mints and verifies session tokens.
#[derive(Clone)]
pub struct SessionIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    production: bool,
}

impl SessionIssuer {
    pub fn new(secret: &str, production: bool) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            production,
        }
    }

    /// Signs a token for the account, valid for 24 hours.
    pub fn issue(&self, account_id: &str) -> Result<String> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: account_id.to_string(),
            iat: now,
            exp: now + SESSION_TTL_SECS,
        };
        jsonwebtoken::encode(&Header::default(), &claims, &self.encoding)
            .map_err(|err| Error::internal(format!("failed to sign session token: {err}")))
    }

    /// Verifies a token and returns the account id it was issued for.
    /// Expired, tampered, and otherwise malformed tokens all collapse into
    /// `Unauthenticated`.
    pub fn authenticate(&self, token: &str) -> Result<String> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &Validation::default())
            .map_err(|_| Error::Unauthenticated)?;
        Ok(data.claims.sub)
    }

    /// The cookie carrying a fresh session token. Cross-site in production
    /// (the browser client lives on another origin), lax in development so
    /// plain HTTP works.
    pub fn session_cookie(&self, token: String) -> Cookie<'static> {
        let mut cookie = Cookie::new(SESSION_COOKIE, token);
        cookie.set_http_only(true);
        cookie.set_path("/");
        cookie.set_max_age(time::Duration::seconds(SESSION_TTL_SECS));
        if self.production {
            cookie.set_secure(true);
            cookie.set_same_site(SameSite::None);
        } else {
            cookie.set_same_site(SameSite::Lax);
        }
        cookie
    }

    /// A replacement cookie that expires immediately, used at logout.
    pub fn expired_cookie(&self) -> Cookie<'static> {
        let mut cookie = Cookie::new(SESSION_COOKIE, "");
        cookie.set_http_only(true);
        cookie.set_path("/");
        cookie.set_max_age(time::Duration::ZERO);
        if self.production {
            cookie.set_secure(true);
            cookie.set_same_site(SameSite::None);
        } else {
            cookie.set_same_site(SameSite::Lax);
        }
        cookie
    }
}
