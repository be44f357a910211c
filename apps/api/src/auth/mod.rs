// Accounts: signup/login, password change and reset, profile lookups.

pub mod handlers;
pub mod password;
pub mod repo;
pub mod verification;
