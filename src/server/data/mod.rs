pub mod contract;
pub mod eve;
pub mod handler;
pub mod location;
pub mod pricing;
