pub mod settings;
pub mod loader;
