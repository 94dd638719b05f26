//! Service integrations for external APIs and clients.
//!
//! This module contains the outbound clients used by the relay:
//! - Chat services (e.g., Slack)
//! - Issue trackers (e.g., Jira)
//!
//! Each service module defines both a generic trait and a concrete implementation,
//! allowing for extensibility and easy testing.

pub mod chat;
pub mod tracker;
