//! sea-orm entities for the identity service.

pub mod accounts;
pub mod outbox_events;
pub mod verification_tokens;
