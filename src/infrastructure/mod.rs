pub mod clients;
pub mod providers;
