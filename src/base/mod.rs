//! Core components, types, and utilities for chat-hvac.
//!
//! This module contains fundamental building blocks used throughout the application:
//! - Configuration handling and environment variables.
//! - Chat events, replies, and result handling.
//! - The cooperative shutdown signal.

pub mod config;
pub mod shutdown;
pub mod types;
