pub mod database;
pub mod dto;
pub mod error;
pub mod keys;
pub mod models;
pub mod repository;
pub mod services;
pub mod store;

pub use database::{CollectionNames, Database};
pub use store::FileStore;
