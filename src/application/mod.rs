pub mod app_error;
pub mod jwt;
pub mod pipeline;
pub mod ports;
pub mod prompts;
pub mod use_cases;
pub mod validators;
