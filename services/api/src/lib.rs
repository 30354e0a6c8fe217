//! services/api/src/lib.rs
//!
//! The Story Time HTTP service: configuration, adapters and the web layer.

pub mod adapters;
pub mod config;
pub mod error;
pub mod web;
