//! Session token types shared across Parley services.
//!
//! The identity service mints, refreshes, and patches session tokens; every
//! other service only verifies them. Minting APIs are behind the
//! `USE_ONLY_IN_IDENTITY_SERVICE` feature so a collaborator crate cannot
//! accidentally become a token issuer.

pub mod cookie;
pub mod extract;
pub mod method;
pub mod token;
