//! Loxone home-automation gateway integration.

pub mod client;

pub use client::{IoState, LoxoneClient, LoxoneError};
