//! Chirp: a micro-blogging backend over Redis.
//!
//! Accounts, sessions, tweets, likes, comments, follows, bookmarks, and
//! paginated feeds. The layering goes `http` → `service` → `store`, with
//! identity handled in `auth` and media uploads behind the `media` sink.

pub mod auth;
pub mod config;
pub mod errors;
pub mod http;
pub mod id;
pub mod keys;
pub mod media;
pub mod models;
pub mod service;
pub mod store;
pub mod validators;

pub use config::Config;
pub use errors::{Error, Result};
