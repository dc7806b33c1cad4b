use thiserror::Error;

/// A username/password pair for the catalog service.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub user: String,
    pub password: String,
}

impl Credentials {
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self { user: user.into(), password: password.into() }
    }
}

// Manual Debug so passwords never leak into traces or error chains.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Where a credential pair came from. Determines persistence policy:
/// only prompted credentials are ever written back to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    /// Supplied on the command line.
    Explicit,
    /// Read from the credential store.
    Stored,
    /// Entered interactively this run.
    Prompt,
}

/// Credentials along with their provenance.
#[derive(Debug, Clone)]
pub struct ObtainedCredentials {
    pub credentials: Credentials,
    pub source: CredentialSource,
}

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("Cannot proceed with an empty log in name or password")]
    Empty,

    #[error("Failed to prompt for credentials: {0}")]
    Prompt(String),

    #[error("Credential store failure: {0}")]
    Store(String),
}

/// CredentialProvider port.
///
/// Precedence on `obtain`: explicit command-line values, then previously
/// stored values, then an interactive prompt. The provider itself never
/// persists anything at obtain time; the caller invokes `store_validated`
/// after the first successful authenticated operation, and the provider
/// persists only prompted credentials (write-after-success policy - never
/// persist unvalidated credentials).
pub trait CredentialProvider {
    fn obtain(&self) -> Result<ObtainedCredentials, CredentialError>;

    fn store_validated(&self, obtained: &ObtainedCredentials) -> Result<(), CredentialError>;
}
