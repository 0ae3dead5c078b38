pub mod credential;
pub mod movies;
pub mod sessions;
