pub mod logging;
pub mod user_agent;
