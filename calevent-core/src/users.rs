//! User lookup by email.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CalEventError, CalEventResult};
use crate::event::User;

/// Finds the user account registered under an email address.
///
/// Matching is exact. Implementations backed by an external store report
/// their failures as errors; callers propagate them untouched.
pub trait UserLookup {
    fn find_by_email(&self, email: &str) -> CalEventResult<Option<User>>;
}

/// In-memory user directory keyed by email.
#[derive(Debug, Clone, Default)]
pub struct UserDirectory {
    users: HashMap<String, User>,
}

/// users.toml layout: a list of `[[users]]` tables
#[derive(Serialize, Deserialize, Default)]
struct UsersFile {
    #[serde(default)]
    users: Vec<User>,
}

impl UserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load users from a TOML file. A missing file yields an empty directory.
    pub fn load(path: &Path) -> CalEventResult<Self> {
        if !path.exists() {
            log::debug!("No user directory at {}", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let file: UsersFile = toml::from_str(&content).map_err(|e| {
            CalEventError::Config(format!("Failed to parse {}: {}", path.display(), e))
        })?;

        Ok(file.users.into_iter().collect())
    }

    /// Save users to a TOML file, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> CalEventResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut users: Vec<User> = self.users.values().cloned().collect();
        users.sort_by_key(|u| u.id);

        let content = toml::to_string_pretty(&UsersFile { users })
            .map_err(|e| CalEventError::Serialization(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Register a user, replacing any user with the same email.
    pub fn add(&mut self, user: User) {
        self.users.insert(user.email.clone(), user);
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl FromIterator<User> for UserDirectory {
    fn from_iter<I: IntoIterator<Item = User>>(iter: I) -> Self {
        let mut directory = UserDirectory::new();
        for user in iter {
            directory.add(user);
        }
        directory
    }
}

impl UserLookup for UserDirectory {
    fn find_by_email(&self, email: &str) -> CalEventResult<Option<User>> {
        Ok(self.users.get(email).cloned())
    }
}
