//! Application workflows on top of the [`Store`](crate::store::Store) seam.
//!
//! Each submodule is a set of free async functions generic over the store
//! (and the media sink where uploads are involved); the HTTP layer does
//! nothing but translate between requests and these calls.

pub mod accounts;
pub mod content;
pub mod feed;
pub mod relations;
