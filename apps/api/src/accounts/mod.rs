// Per-email account store and the login/signup session flow.

pub mod handlers;
pub mod repository;
pub mod session;
