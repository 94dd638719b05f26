//! Inbound webhook handling for the ticket relay.
//!
//! This module provides functionality for handling Slack callbacks:
//! - Parsing slash-command text into ticket drafts
//! - Opening the ticket modal, or filing the ticket directly
//! - Decoding and handling the modal submission
//! - The HTTP routes that map outcomes onto controlled status codes

pub mod command;
pub mod envelope;
pub mod parser;
pub mod routes;
pub mod submission;
