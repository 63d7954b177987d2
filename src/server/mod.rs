//! Server application core modules.
//!
//! Contains the contract synchronization pipeline and everything it leans on:
//! database repositories, the ESI client, pricing reconciliation, webhook
//! notifications, background scheduling, and configuration.

pub mod config;
pub mod data;
pub mod error;
pub mod esi;
pub mod model;
pub mod scheduler;
pub mod service;
pub mod startup;
pub mod token;
pub mod util;
pub mod webhook;
