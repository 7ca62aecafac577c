//! HTTP request handlers.

pub mod auth;
pub mod files;
pub mod health;

pub use auth::*;
pub use files::*;
pub use health::*;
