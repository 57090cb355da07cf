pub mod auth;
pub mod core;
pub mod notification;
pub mod post;
pub mod relation;
pub mod user;
