pub mod account;
pub mod credentials;
pub mod reconcile;
pub mod signin_link;
