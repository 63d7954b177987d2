pub mod contract;
pub mod contract_handler;
pub mod contract_notification;
pub mod eve_character;
pub mod eve_corporation;
pub mod location;
pub mod pricing;
pub mod prelude;
