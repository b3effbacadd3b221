#![doc = include_str!("../README.md")]

pub mod auth;
mod error;
pub use error::MissingFieldError;
pub mod key_management;
