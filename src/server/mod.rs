//! Action-server webhook
//!
//! The host dialogue server posts `{next_action, sender_id, tracker, domain,
//! version}` to `/webhook` and expects `{events, responses}` back.

pub mod error;
pub mod handlers;
pub mod router;

pub use error::AppError;
pub use router::build_router;
