pub mod api_key;
pub mod principal;
pub mod project;
pub mod scan_result;
pub mod user;
