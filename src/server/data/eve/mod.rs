pub mod character;
pub mod corporation;
