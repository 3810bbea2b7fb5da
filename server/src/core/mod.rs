pub mod app;
pub mod auth;
pub mod cache;
pub mod request;
pub mod roles;

// vim: ts=4
