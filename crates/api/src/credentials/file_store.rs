use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
    sync::Mutex,
};

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chacha20poly1305::{
    aead::{Aead, KeyInit},
    ChaCha20Poly1305, Key, Nonce,
};
use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use super::CredentialStore;
use crate::error::{ApiError, Result};
use crate::types::User;

const FILE_VERSION: u32 = 1;
const KEY_LEN: usize = 32;
const NONCE_LEN: usize = 12;

/// Credential store persisted to a JSON file so the signed-in user survives
/// restarts. The user record is sealed with ChaCha20-Poly1305 when a key is
/// given.
#[derive(Debug)]
pub struct FileCredentialStore {
    path: PathBuf,
    key: Option<[u8; KEY_LEN]>,
    lock: Mutex<()>,
}

/// On-disk layout. Sealed files carry the encrypted user record in place of
/// the `user` field.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum CredentialFile {
    Sealed {
        version: u32,
        nonce: String,
        ciphertext: String,
    },
    Plain {
        version: u32,
        #[serde(default)]
        user: Option<User>,
    },
}

impl FileCredentialStore {
    /// Open a store at `path`. A non-blank `key` turns on encryption and must be
    /// base64 for 32 bytes or 32 ASCII characters.
    pub fn new(path: PathBuf, key: Option<&str>) -> Result<Self> {
        let key = match key {
            Some(value) if !value.trim().is_empty() => Some(decode_key(value)?),
            _ => None,
        };

        Ok(Self {
            path,
            key,
            lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persist `user` as the signed-in user.
    pub fn set_user(&self, user: User) -> Result<()> {
        let _guard = self.lock_file()?;
        self.write_user(Some(&user))
    }

    /// Forget the signed-in user. The file is kept, with no user in it.
    pub fn clear_user(&self) -> Result<()> {
        let _guard = self.lock_file()?;
        self.write_user(None)
    }

    fn lock_file(&self) -> Result<std::sync::MutexGuard<'_, ()>> {
        self.lock
            .lock()
            .map_err(|_| ApiError::credentials("Credential store lock poisoned"))
    }

    fn read_user(&self) -> Result<Option<User>> {
        let raw = match fs::read(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        if raw.is_empty() {
            return Ok(None);
        }

        let file: CredentialFile = serde_json::from_slice(&raw)?;
        match file {
            CredentialFile::Plain { user, .. } => Ok(user),
            CredentialFile::Sealed {
                nonce, ciphertext, ..
            } => {
                let key = self.key.as_ref().ok_or_else(|| {
                    ApiError::credentials(
                        "PORTANA_CREDENTIALS_KEY must be set to read an encrypted credentials file",
                    )
                })?;
                open_user(key, &nonce, &ciphertext)
            }
        }
    }

    fn write_user(&self, user: Option<&User>) -> Result<()> {
        let file = match &self.key {
            Some(key) => seal_user(key, user)?,
            None => CredentialFile::Plain {
                version: FILE_VERSION,
                user: user.cloned(),
            },
        };
        let json = serde_json::to_vec_pretty(&file)?;
        self.replace_file(&json)
    }

    /// Write to a sibling temp file and rename it over the target, so readers
    /// see either the old contents or the new ones.
    fn replace_file(&self, contents: &[u8]) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(contents)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

impl CredentialStore for FileCredentialStore {
    fn current_user(&self) -> Result<Option<User>> {
        let _guard = self.lock_file()?;
        self.read_user()
    }
}

fn seal_user(key: &[u8; KEY_LEN], user: Option<&User>) -> Result<CredentialFile> {
    let plaintext = serde_json::to_vec(&user)?;
    let mut nonce = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce);

    let ciphertext = ChaCha20Poly1305::new(Key::from_slice(key))
        .encrypt(Nonce::from_slice(&nonce), plaintext.as_ref())
        .map_err(|_| ApiError::credentials("Failed to encrypt credentials"))?;

    Ok(CredentialFile::Sealed {
        version: FILE_VERSION,
        nonce: BASE64.encode(nonce),
        ciphertext: BASE64.encode(ciphertext),
    })
}

fn open_user(key: &[u8; KEY_LEN], nonce: &str, ciphertext: &str) -> Result<Option<User>> {
    let nonce = BASE64
        .decode(nonce)
        .ok()
        .filter(|bytes| bytes.len() == NONCE_LEN)
        .ok_or_else(|| ApiError::credentials("Credentials file has a malformed nonce"))?;
    let ciphertext = BASE64
        .decode(ciphertext)
        .map_err(|e| ApiError::credentials(format!("Failed to decode ciphertext: {e}")))?;

    let plaintext = ChaCha20Poly1305::new(Key::from_slice(key))
        .decrypt(Nonce::from_slice(&nonce), ciphertext.as_ref())
        .map_err(|_| ApiError::credentials("Failed to decrypt credentials file"))?;
    Ok(serde_json::from_slice(&plaintext)?)
}

/// Base64 for 32 bytes wins; otherwise 32 characters are used as raw bytes.
fn decode_key(raw: &str) -> Result<[u8; KEY_LEN]> {
    let trimmed = raw.trim();
    let bytes = match BASE64.decode(trimmed) {
        Ok(decoded) if decoded.len() == KEY_LEN => decoded,
        _ if trimmed.len() == KEY_LEN => trimmed.as_bytes().to_vec(),
        _ => {
            return Err(ApiError::credentials(
                "PORTANA_CREDENTIALS_KEY must be base64 for 32 bytes or exactly 32 characters",
            ))
        }
    };

    let mut key = [0u8; KEY_LEN];
    key.copy_from_slice(&bytes);
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn signed_in() -> User {
        User {
            id: "42".to_string(),
            name: Some("Ada".to_string()),
            email: None,
            token: Some("abc".to_string()),
        }
    }

    #[test]
    fn missing_file_means_signed_out() {
        let dir = tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path().join("credentials.json"), None).unwrap();
        assert!(store.current_user().unwrap().is_none());
        assert!(store.current_token().unwrap().is_none());
    }

    #[test]
    fn persists_across_instances() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("nested").join("credentials.json");

        FileCredentialStore::new(file.clone(), None)
            .unwrap()
            .set_user(signed_in())
            .unwrap();

        let reopened = FileCredentialStore::new(file.clone(), None).unwrap();
        assert_eq!(reopened.current_user().unwrap(), Some(signed_in()));
        assert_eq!(reopened.current_token().unwrap().as_deref(), Some("abc"));

        reopened.clear_user().unwrap();
        assert!(reopened.current_user().unwrap().is_none());
        assert!(file.exists());
    }

    #[test]
    fn encrypted_file_hides_token() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("credentials.json");
        let key = BASE64.encode([7u8; 32]);
        let store = FileCredentialStore::new(file.clone(), Some(&key)).unwrap();

        store.set_user(signed_in()).unwrap();
        assert_eq!(store.current_token().unwrap().as_deref(), Some("abc"));

        let raw = fs::read_to_string(&file).unwrap();
        assert!(raw.contains("ciphertext"));
        assert!(!raw.contains("\"token\""));

        let without_key = FileCredentialStore::new(file, None).unwrap();
        assert!(matches!(
            without_key.current_user(),
            Err(ApiError::Credentials(_))
        ));
    }

    #[test]
    fn rejects_short_keys() {
        let dir = tempdir().unwrap();
        let err = FileCredentialStore::new(dir.path().join("c.json"), Some("short")).unwrap_err();
        assert!(matches!(err, ApiError::Credentials(_)));

        // Valid base64, but only 24 bytes and not 32 characters either
        let short_base64 = BASE64.encode([1u8; 24]);
        let err = FileCredentialStore::new(dir.path().join("c.json"), Some(&short_base64))
            .unwrap_err();
        assert!(matches!(err, ApiError::Credentials(_)));
    }

    #[test]
    fn accepts_plain_ascii_keys() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("credentials.json");
        // Every character is in the base64 alphabet, so it also decodes to 24 bytes
        let passphrase = "abcdefghijklmnopqrstuvwxyz012345";
        assert_eq!(decode_key(passphrase).unwrap(), *b"abcdefghijklmnopqrstuvwxyz012345");

        let store = FileCredentialStore::new(file.clone(), Some(passphrase)).unwrap();
        store.set_user(signed_in()).unwrap();

        let reopened = FileCredentialStore::new(file, Some(&format!("  {passphrase}\n"))).unwrap();
        assert_eq!(reopened.current_token().unwrap().as_deref(), Some("abc"));
    }

    #[test]
    fn base64_keys_decode_to_their_bytes() {
        assert_eq!(decode_key(&BASE64.encode([7u8; 32])).unwrap(), [7u8; 32]);
    }

    #[test]
    fn wrong_key_cannot_open_the_file() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("credentials.json");
        FileCredentialStore::new(file.clone(), Some(&BASE64.encode([7u8; 32])))
            .unwrap()
            .set_user(signed_in())
            .unwrap();

        let other = FileCredentialStore::new(file, Some(&BASE64.encode([8u8; 32]))).unwrap();
        assert!(matches!(other.current_user(), Err(ApiError::Credentials(_))));
    }

    #[test]
    fn writes_replace_the_file_without_leftovers() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("credentials.json");
        // A torn earlier write
        fs::write(&file, b"{\"version\": 1, \"us").unwrap();

        let store = FileCredentialStore::new(file.clone(), None).unwrap();
        assert!(store.current_user().is_err());

        store.set_user(signed_in()).unwrap();
        store.set_user(User::new("7").with_token("next")).unwrap();
        assert_eq!(store.current_user_id().unwrap().as_deref(), Some("7"));

        let entries: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("credentials.json")]);
    }
}
