pub mod server;
pub mod gate;
pub mod info;
pub mod token;
pub mod currency;
pub mod files;
