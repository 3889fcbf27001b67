//! HTTP request handlers for the cloud proxy.

pub mod fetch;
pub mod health;
