pub mod cache;
pub mod catalog;
pub mod clock;
pub mod credentials;
pub mod search_session;
