pub mod catalog;
pub mod error;
pub mod family;
pub mod scenario;
pub mod table;
