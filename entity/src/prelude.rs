pub use super::contract::Entity as Contract;
pub use super::contract_handler::Entity as ContractHandler;
pub use super::contract_notification::Entity as ContractNotification;
pub use super::eve_character::Entity as EveCharacter;
pub use super::eve_corporation::Entity as EveCorporation;
pub use super::location::Entity as Location;
pub use super::pricing::Entity as Pricing;
