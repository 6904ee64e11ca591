//! Wallet-Link Core - dapp-side logic for the wallet deep-link protocol.
//!
//! This crate implements:
//! - Connect request construction and the connect response state machine
//! - Sign-and-send request construction
//! - Session and ephemeral-keypair persistence over an injected store
//! - Deep-link assembly and callback parsing
//! - Configuration
//! - An in-process wallet counterparty for tests and demos

#![forbid(unsafe_code)]

// Handshake and signing flows
pub mod connect;
pub mod sign;

// Persistence
pub mod keys;
pub mod session;
pub mod store;

// Wire surface
pub mod deeplink;
pub mod messages;

// Supporting modules
pub mod config;
pub mod errors;
pub mod harness;
