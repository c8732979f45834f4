pub mod account;
pub mod analysis;
pub mod opportunity;
pub mod profile;
