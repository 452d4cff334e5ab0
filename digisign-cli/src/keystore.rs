//! Key file persistence
//!
//! # Security notes
//!
//! Private keys are stored as **unencrypted** PEM text:
//! - `<name>.pem`: private key, mode `0o600` on Unix
//! - `<name>.pub`: public key, mode `0o644` on Unix
//!
//! Loading a key only reads its text. Whether it is really a key of the
//! expected role is decided by the validator in the signing core, never by
//! the file extension.

use crate::error::{CliError, Result};
use digisign::{KeyPair, KeyRole};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Paths of a saved key pair
#[derive(Debug, Clone)]
pub struct KeyFiles {
    pub private_path: PathBuf,
    pub public_path: PathBuf,
}

impl KeyFiles {
    pub fn locate(dir: &Path, private_name: &str, public_name: &str) -> Self {
        Self {
            private_path: dir.join(format!(
                "{}.{}",
                private_name,
                KeyRole::Private.file_extension()
            )),
            public_path: dir.join(format!("{}.{}", public_name, KeyRole::Public.file_extension())),
        }
    }

    /// `true` if either file is already present
    pub fn any_exists(&self) -> bool {
        self.private_path.exists() || self.public_path.exists()
    }
}

/// Write both halves of `pair` as PEM files under `dir`
///
/// # File operations
///
/// 1. Create the directory if needed
/// 2. Write `<private_name>.pem`, created owner-only (Unix)
/// 3. Write `<public_name>.pub`, world-readable (Unix)
pub fn save_key_pair(
    dir: &Path,
    private_name: &str,
    public_name: &str,
    pair: &KeyPair,
) -> Result<KeyFiles> {
    fs::create_dir_all(dir).map_err(|e| {
        CliError::Keystore(format!("Failed to create key directory {:?}: {}", dir, e))
    })?;

    let files = KeyFiles::locate(dir, private_name, public_name);

    write_key_file(&files.private_path, &pair.private.to_pem(), 0o600)?;
    info!("Private key saved to {:?}", files.private_path);

    write_key_file(&files.public_path, &pair.public.to_pem(), 0o644)?;
    info!("Public key saved to {:?}", files.public_path);

    Ok(files)
}

/// Read a key file as text
///
/// Warns when a `.pem` file is readable by anyone but its owner.
pub fn load_key_text(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(CliError::Keystore(format!("Key file not found: {:?}", path)));
    }

    let text = fs::read_to_string(path)
        .map_err(|e| CliError::Keystore(format!("Failed to read key from {:?}: {}", path, e)))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        let is_private = path
            .extension()
            .map_or(false, |ext| ext == KeyRole::Private.file_extension());
        if is_private {
            let mode = fs::metadata(path)?.permissions().mode() & 0o777;
            if mode & 0o077 != 0 {
                warn!(
                    "Private key file {:?} has insecure permissions: {:o} (should be 0o600)",
                    path, mode
                );
            }
        }
    }

    Ok(text)
}

/// Create (or truncate) `path` with `mode` already applied, then write
///
/// `set_mode` afterwards covers files that existed before with a looser
/// mode, since `OpenOptions::mode` only applies on creation.
fn write_key_file(path: &Path, contents: &str, mode: u32) -> Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(mode);
    }

    let mut file = options
        .open(path)
        .map_err(|e| CliError::Keystore(format!("Failed to create {:?}: {}", path, e)))?;
    set_mode(path, mode)?;
    file.write_all(contents.as_bytes())
        .map_err(|e| CliError::Keystore(format!("Failed to write key to {:?}: {}", path, e)))
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = fs::metadata(path)
        .map_err(|e| CliError::Keystore(format!("Failed to read metadata of {:?}: {}", path, e)))?
        .permissions();
    perms.set_mode(mode);
    fs::set_permissions(path, perms).map_err(|e| {
        CliError::Keystore(format!("Failed to set permissions on {:?}: {}", path, e))
    })
}

#[cfg(not(unix))]
fn set_mode(path: &Path, _mode: u32) -> Result<()> {
    warn!(
        "File permissions not set on {:?} (non-Unix system). Protect the private key manually!",
        path
    );
    Ok(())
}
