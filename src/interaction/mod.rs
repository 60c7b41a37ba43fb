//! Event handling and user interactions for chat-hvac.
//!
//! This module provides functionality for handling chat mentions:
//! - Matching mention text against the ordered command table
//! - Running the matched command and replying through the chat client

pub mod dispatcher;
pub mod handlers;
