//! Session module
//!
//! Bounded, in-memory conversation history keyed by session id.

pub mod store;
pub mod turn;

pub use self::store::{Session, SessionGuard, SessionStore};
pub use self::turn::{Role, Turn};
