pub mod candidate;
pub mod profile;
