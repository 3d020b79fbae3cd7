//! Venue clients.
//!
//! This module contains:
//!
//! - [`rest`] - HTTP client for the depth snapshot endpoint
//! - [`websocket`] - Typed connection to the diff depth stream

pub mod rest;
pub mod websocket;

pub use rest::RestClient;
pub use websocket::{DepthStream, ReconnectConfig};
