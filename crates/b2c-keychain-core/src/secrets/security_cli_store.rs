//! macOS Keychain via the `security` command line tool

use std::io::ErrorKind;
use std::process::{Command, Stdio};

use tracing::debug;

use super::shell;
use super::traits::{SecretStore, SecretStoreError, SecretStoreResult};

/// Program run when no replacement is configured
pub const DEFAULT_PROGRAM: &str = "security";

/// Exit status `sh` uses when the command does not exist
const COMMAND_NOT_FOUND: i32 = 127;

/// Secret store that shells out to `security find-generic-password`
///
/// Generic passwords are looked up by service (`-s`) and account (`-a`),
/// and `-w` prints only the password. The command runs through `sh -c`,
/// so both values are quoted with [`shell::quote`] before they are placed
/// on the command line.
///
/// # Example
///
/// ```no_run
/// use b2c_keychain_core::secrets::{SecretStore, SecurityCliStore};
///
/// let store = SecurityCliStore::new();
/// let json = store.lookup("b2c-cli", "staging").unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct SecurityCliStore {
    program: String,
}

impl SecurityCliStore {
    /// Create a store that runs the system `security` tool
    pub fn new() -> Self {
        Self::with_program(DEFAULT_PROGRAM)
    }

    /// Create a store that runs `program` in place of `security`
    ///
    /// `program` is a trusted command prefix and is not quoted; the
    /// service and account arguments appended to it always are. A
    /// replacement program is taken to work on any platform.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// The shell command line used to look up an entry
    pub fn command_line(&self, service: &str, account: &str) -> String {
        format!(
            "{} find-generic-password -s {} -a {} -w",
            self.program,
            shell::quote(service),
            shell::quote(account),
        )
    }
}

impl Default for SecurityCliStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SecretStore for SecurityCliStore {
    fn name(&self) -> &str {
        "security"
    }

    fn is_available(&self) -> bool {
        cfg!(target_os = "macos") || self.program != DEFAULT_PROGRAM
    }

    fn lookup(&self, service: &str, account: &str) -> SecretStoreResult<Option<String>> {
        let command_line = self.command_line(service, account);
        debug!(service, account, "running security find-generic-password");

        let output = match Command::new("sh")
            .arg("-c")
            .arg(&command_line)
            .stdin(Stdio::null())
            .output()
        {
            Ok(output) => output,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(SecretStoreError::NotAvailable("sh is not installed".to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        if output.status.code() == Some(COMMAND_NOT_FOUND) {
            return Err(SecretStoreError::NotAvailable(format!("{} command not found", self.program)));
        }

        // Any other non-zero exit means the item could not be found
        if !output.status.success() {
            debug!(service, account, status = ?output.status, "no keychain item");
            return Ok(None);
        }

        let secret = String::from_utf8(output.stdout).map_err(|_| SecretStoreError::InvalidEncoding {
            service: service.to_string(),
            account: account.to_string(),
        })?;

        let secret = secret.trim();
        if secret.is_empty() {
            return Ok(None);
        }
        Ok(Some(secret.to_string()))
    }
}
