pub mod calculator;
pub mod notification;
pub mod pricing;
pub mod resolver;
pub mod retry;
pub mod routes;
pub mod sync;
