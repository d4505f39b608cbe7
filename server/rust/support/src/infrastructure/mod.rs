pub mod cache;
pub mod clock;
pub mod config;
pub mod logger;
pub mod temp_upload;
