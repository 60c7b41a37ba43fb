//! Service integrations for external APIs and clients.
//!
//! This module contains implementations for the services used by chat-hvac:
//! - Chat services (Slack, console)
//! - The HVAC device API
//! - The health endpoint
//!
//! Each service module defines both generic traits and concrete implementations,
//! allowing for extensibility and easy testing.

pub mod chat;
pub mod health;
pub mod hvac;
