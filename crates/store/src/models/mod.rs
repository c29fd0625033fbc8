pub mod image;
pub mod project;
pub mod user;
