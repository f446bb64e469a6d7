//! HTTP client for the bookchain queue router.
//!
//! This crate provides the [`RouterClient`] a node uses to register itself
//! and to exchange queue messages with the remote router.

mod client;

pub use client::{RouterClient, RouterClientBuilder};
pub use bookchain_core::{BookchainError, Result};
