// userdeck-api: async client for a JSONPlaceholder-style user directory endpoint

pub mod client;
pub mod error;
pub mod models;
pub mod transport;

pub use client::DirectoryClient;
pub use error::Error;
pub use models::{Address, Company, Geo, User};
pub use transport::TransportConfig;
