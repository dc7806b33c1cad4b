/// Network adapters for the remote catalog service
mod tind_client;

pub use tind_client::{TindCatalogClient, DEFAULT_BASE_URL};
