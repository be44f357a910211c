// Movie recommendations backed by TMDB.

pub mod handlers;
pub mod tmdb;
