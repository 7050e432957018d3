//! Persisted client state (tokens and the signed-in user).
//!
//! A JSON key/value file under the XDG state dir plays the role of browser
//! local storage. It is re-read on every access so separate CLI invocations
//! observe each other's logins and logouts.

mod storage;
mod store;

pub use storage::{LocalStorage, SessionError};
pub use store::{Session, SessionStore, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, USER_KEY};
