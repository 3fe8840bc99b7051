pub mod api_key;
pub mod credentials;
pub mod project;
pub mod scan;
pub mod user;
