use crate::ports::outbound::{
    CredentialError, CredentialProvider, CredentialSource, Credentials, ObtainedCredentials,
};
use std::io::{BufRead, Write};

/// Keyring service name under which catalog credentials are stored.
const KEYRING_SERVICE: &str = "org.shelfcheck.credentials";

/// Account key holding the stored user name; the password is stored under
/// the user name itself.
const USER_ACCOUNT: &str = "catalog-user";

/// KeyringCredentialProvider adapter.
///
/// Resolution order: explicit command-line values, then the system keyring,
/// then an interactive prompt on stderr/stdin. Nothing is persisted at
/// obtain time; `store_validated` writes prompted credentials to the
/// keyring only after the caller has confirmed them against the catalog.
pub struct KeyringCredentialProvider {
    explicit_user: Option<String>,
    explicit_password: Option<String>,
    use_keyring: bool,
}

impl KeyringCredentialProvider {
    pub fn new(
        explicit_user: Option<String>,
        explicit_password: Option<String>,
        use_keyring: bool,
    ) -> Self {
        Self {
            explicit_user,
            explicit_password,
            use_keyring,
        }
    }

    fn stored_user(&self) -> Option<String> {
        if !self.use_keyring {
            return None;
        }
        let entry = keyring::Entry::new(KEYRING_SERVICE, USER_ACCOUNT).ok()?;
        entry.get_password().ok()
    }

    fn stored_password(&self, user: &str) -> Option<String> {
        if !self.use_keyring {
            return None;
        }
        let entry = keyring::Entry::new(KEYRING_SERVICE, user).ok()?;
        entry.get_password().ok()
    }

    // Prompt on stderr, answer on stdin. Front-ends wanting masked entry
    // supply credentials explicitly instead.
    fn prompt(&self, label: &str) -> Result<String, CredentialError> {
        let mut stderr = std::io::stderr();
        write!(stderr, "{}", label).map_err(|e| CredentialError::Prompt(e.to_string()))?;
        stderr
            .flush()
            .map_err(|e| CredentialError::Prompt(e.to_string()))?;

        let mut line = String::new();
        std::io::stdin()
            .lock()
            .read_line(&mut line)
            .map_err(|e| CredentialError::Prompt(e.to_string()))?;
        Ok(line.trim().to_string())
    }
}

impl CredentialProvider for KeyringCredentialProvider {
    fn obtain(&self) -> Result<ObtainedCredentials, CredentialError> {
        let mut prompted = false;
        let mut from_store = false;

        let user = match &self.explicit_user {
            Some(user) => user.clone(),
            None => match self.stored_user() {
                Some(user) => {
                    from_store = true;
                    user
                }
                None => {
                    prompted = true;
                    self.prompt("Catalog user name: ")?
                }
            },
        };

        let password = match &self.explicit_password {
            Some(password) => password.clone(),
            None => match self.stored_password(&user) {
                Some(password) => {
                    from_store = true;
                    password
                }
                None => {
                    prompted = true;
                    self.prompt(&format!("Catalog password for {}: ", user))?
                }
            },
        };

        if user.is_empty() || password.is_empty() {
            return Err(CredentialError::Empty);
        }

        let source = if prompted {
            CredentialSource::Prompt
        } else if from_store {
            CredentialSource::Stored
        } else {
            CredentialSource::Explicit
        };
        tracing::debug!(?source, "credentials obtained");

        Ok(ObtainedCredentials {
            credentials: Credentials::new(user, password),
            source,
        })
    }

    fn store_validated(&self, obtained: &ObtainedCredentials) -> Result<(), CredentialError> {
        // Only prompted credentials are new information worth persisting;
        // explicit and stored values either were never meant for the
        // keyring or are already in it.
        if obtained.source != CredentialSource::Prompt || !self.use_keyring {
            return Ok(());
        }

        let creds = &obtained.credentials;
        keyring::Entry::new(KEYRING_SERVICE, USER_ACCOUNT)
            .and_then(|entry| entry.set_password(&creds.user))
            .map_err(|e| CredentialError::Store(e.to_string()))?;
        keyring::Entry::new(KEYRING_SERVICE, &creds.user)
            .and_then(|entry| entry.set_password(&creds.password))
            .map_err(|e| CredentialError::Store(e.to_string()))?;

        tracing::debug!(user = %creds.user, "validated credentials stored in keyring");
        Ok(())
    }
}
