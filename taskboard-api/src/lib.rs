//! # Taskboard API Server Library
//!
//! This library provides the HTTP layer of the Taskboard service.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `middleware`: Response middleware
//! - `routes`: Resource handlers

pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
