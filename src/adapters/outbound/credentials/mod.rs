/// Credential store adapters
mod keyring_provider;

pub use keyring_provider::KeyringCredentialProvider;
