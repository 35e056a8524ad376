//! Identity: password credentials and cookie-carried sessions.

pub mod credentials;
pub mod session;

pub use credentials::{login, register, Registration};
pub use session::{SessionIssuer, SESSION_COOKIE};
