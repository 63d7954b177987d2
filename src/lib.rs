//! Freight: a courier-contract service for an EVE Online alliance.
//!
//! A scheduled job pulls the organization's courier contracts from ESI, mirrors
//! them into the local database, matches them against configured pricing routes,
//! and posts webhook notifications for contracts that need attention.

pub mod server;
