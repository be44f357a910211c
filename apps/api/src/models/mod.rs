pub mod record;
pub mod score;
pub mod step;
pub mod user;
