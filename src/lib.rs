//! f5asm - F5 Application Security Manager adapter
//!
//! Runs one named command against an ASM device over iControl REST and
//! reports the result as a markdown table, a structured context object and
//! the raw server response.
//!
//! # Architecture
//!
//! - [`f5`] - Transport, login and the session-bound client
//! - [`resource`] - Name resolution and the per-resource operations
//! - [`render`] - Records, markdown tables and the reported output triple
//! - [`commands`] - The closed command table and its dispatcher
//! - [`config`] - Config file and connection settings

pub mod commands;
pub mod config;
pub mod f5;
pub mod render;
pub mod resource;
