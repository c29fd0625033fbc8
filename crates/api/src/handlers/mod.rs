pub mod auth;
pub mod generation;
pub mod image;
pub mod project;
pub mod user;
