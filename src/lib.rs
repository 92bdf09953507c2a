//! Assistant core: the AI session and command execution pipeline.
//!
//! This crate provides the command protocol exchanged between the UI, AI
//! providers and application services, and the session layer that records
//! each conversation turn durably and publishes it to observers.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain**: Pure data types with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for storage and dispatch
//! - **Adapters**: Concrete implementations of ports (in-memory, `PostgreSQL`)
//! - **Services**: Orchestration built on the ports
//!
//! # Modules
//!
//! - [`command`]: Command model, JSON parser and dispatch boundary
//! - [`session`]: Session messages, message repository and cost queries
//! - [`config`]: Storage settings and provider pricing

pub mod command;
pub mod config;
pub mod session;
