mod client;
mod errors;

pub use client::{HttpConfig, HttpForumClient};
