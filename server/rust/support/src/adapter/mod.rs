pub mod gateway;
pub mod handler;
pub mod repository;
