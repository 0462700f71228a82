use std::fs;
use std::path::PathBuf;

use tracing::{debug, warn};

use super::credential::Credential;

/// File-backed store for the single local credential.
///
/// The record lives in one JSON file. Read failures of any kind mean
/// "not logged in" rather than an error, so a corrupt or missing file
/// never breaks the CLI; re-authentication is always the recovery path.
/// Writes go through a temp file and a rename so a concurrent reader
/// never observes a half-written record.
///
/// # Example
/// ```no_run
/// use zyra::auth::{Credential, CredentialStore};
///
/// let store = CredentialStore::new_default();
/// let credential = Credential::new("access".to_string(), None, None, Some(3600));
/// if !store.save(&credential) {
///     eprintln!("warning: could not persist credentials");
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Store at the default location, `~/.zyra/credentials.json`.
    pub fn new_default() -> Self {
        Self {
            path: default_zyra_dir().join("credentials.json"),
        }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Load the stored credential, or `None` if the file is missing,
    /// unreadable, or malformed.
    pub fn load(&self) -> Option<Credential> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(err) => {
                if err.kind() != std::io::ErrorKind::NotFound {
                    debug!(path = %self.path.display(), error = %err, "credential file unreadable");
                }
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(credential) => Some(credential),
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "credential file malformed, treating as logged out");
                None
            }
        }
    }

    /// Persist the credential, replacing any existing record.
    ///
    /// Returns `false` on I/O failure instead of erroring; the in-memory
    /// credential is still usable for the current process, so the caller
    /// can warn and continue.
    pub fn save(&self, credential: &Credential) -> bool {
        match self.write_atomic(credential) {
            Ok(()) => true,
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "failed to persist credential");
                false
            }
        }
    }

    /// Remove the stored credential. Idempotent: returns `true` when
    /// removed or already absent.
    pub fn clear(&self) -> bool {
        match fs::remove_file(&self.path) {
            Ok(()) => true,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => true,
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "failed to remove credential file");
                false
            }
        }
    }

    fn write_atomic(&self, credential: &Credential) -> std::io::Result<()> {
        let parent = self
            .path
            .parent()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        fs::create_dir_all(&parent)?;

        let serialized = serde_json::to_string_pretty(credential)
            .map_err(|err| std::io::Error::other(err.to_string()))?;

        // Temp file in the same directory so the rename stays on one filesystem.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serialized)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&tmp, fs::Permissions::from_mode(0o600))?;
        }
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

fn default_zyra_dir() -> PathBuf {
    directories::UserDirs::new()
        .map(|dirs| dirs.home_dir().join(".zyra"))
        .unwrap_or_else(|| PathBuf::from(".zyra"))
}
