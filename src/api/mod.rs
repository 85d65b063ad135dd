//! Request handlers, one module per downstream integration

pub mod discord;
pub mod email;
pub mod hacker_news;
pub mod oauth;
