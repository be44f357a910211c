// Assessment history: listing, favourites, deletion.

pub mod handlers;
pub mod repo;
