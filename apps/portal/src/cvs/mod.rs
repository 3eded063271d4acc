//! Candidate profiles and CV management: viewing versions, choosing the primary CV,
//! uploading and downloading files.

pub mod handlers;
pub mod profile;
