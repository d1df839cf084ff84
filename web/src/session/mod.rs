//! Client session derived from the stored bearer token.

pub mod claims;
pub mod clock;
pub mod storage;
pub mod store;

pub use claims::{decode_claims, Claims, ClaimsError};
pub use clock::{local_now, Clock, SystemClock};
pub use storage::{BrowserTokenStorage, MemoryTokenStorage, TokenStorage};
pub use store::{SessionNotice, SessionState, SessionStore, SessionUpdate};
