// Daily step counts reported by the mobile client.

pub mod handlers;
pub mod repo;
