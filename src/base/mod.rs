//! Core components, types, and utilities for the ticket relay.
//!
//! This module contains fundamental building blocks used throughout the application:
//! - Configuration handling and environment variables.
//! - The error taxonomy shared by the clients and the handlers.
//! - Common types and result handling.

pub mod config;
pub mod error;
pub mod types;
