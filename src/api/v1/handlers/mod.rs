pub mod credential;
pub mod health;
pub mod movies;
pub mod sessions;
