//! Shared helpers for unit tests: an in-memory SQLite database built from the
//! entities, a mock ESI server, and payload factories.

pub mod mock;
pub mod setup;

pub const TEST_USER_AGENT: &str = "freight-tests/0.1 (test@example.com)";
