//! Typed records for users and their practice sessions

pub mod practice_session;
pub mod user;

pub use practice_session::{ensure_owned, NewPracticeSession, PracticeSession};
pub use user::{UserDocument, UserProfile, UserRecord, UserUpdate};
