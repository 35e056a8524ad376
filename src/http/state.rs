use crate::{auth::SessionIssuer, media::MediaSink, store::Store};

/// Shared handler state: the storage backend, the session issuer, and the
/// media sink, all injected at startup.
pub struct AppState<S, M> {
    pub store: S,
    pub sessions: SessionIssuer,
    pub sink: M,
    pub bcrypt_cost: u32,
}

impl<S: Store, M: MediaSink> AppState<S, M> {
    pub fn new(store: S, sessions: SessionIssuer, sink: M, bcrypt_cost: u32) -> Self {
        Self {
            store,
            sessions,
            sink,
            bcrypt_cost,
        }
    }
}

impl<S: Clone, M: Clone> Clone for AppState<S, M> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            sessions: self.sessions.clone(),
            sink: self.sink.clone(),
            bcrypt_cost: self.bcrypt_cost,
        }
    }
}
