//! HTTP handlers for the server.

pub mod codes;
pub mod control;
pub mod health;
pub mod image;
pub mod raw;
pub mod text;
