pub mod decode;
pub mod loader;
pub mod provider;
pub mod resource;
pub mod store;
