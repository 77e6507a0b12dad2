pub mod jwt;
pub mod store;
