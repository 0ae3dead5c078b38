pub mod cache_keys;
pub mod error;
pub mod movie_repo;

pub use error::RepoError;
pub use movie_repo::MovieRepository;
