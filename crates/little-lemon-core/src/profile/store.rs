use std::path::PathBuf;

use tracing::{debug, warn};

use super::{Profile, ProfileChanges, ProfileError};

pub struct ProfileStore {
    path: PathBuf,
}

impl ProfileStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Load the saved profile, if any.
    pub fn load(&self) -> Result<Option<Profile>, ProfileError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&self.path)?;
        let profile: Profile = serde_json::from_str(&contents)?;
        Ok(Some(profile))
    }

    /// Validate and save `profile`, replacing any previous one.
    pub fn save(&self, profile: &Profile) -> Result<(), ProfileError> {
        profile.validate()?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(profile)?;
        std::fs::write(&self.path, contents)?;
        debug!(path = ?self.path, "Profile saved");
        Ok(())
    }

    /// Apply `changes` to the saved profile and save the result.
    pub fn update(&self, changes: ProfileChanges) -> Result<Profile, ProfileError> {
        let current = self.load()?.ok_or(ProfileError::NotOnboarded)?;
        let updated = current.with_changes(changes)?;
        self.save(&updated)?;
        Ok(updated)
    }

    /// Log out: forget everything about the user.
    pub fn clear(&self) -> Result<(), ProfileError> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        Ok(())
    }

    /// True when a valid onboarded profile is on disk. An unreadable file
    /// counts as not onboarded.
    pub fn is_onboarded(&self) -> bool {
        match self.load() {
            Ok(Some(profile)) => profile.is_onboarded(),
            Ok(None) => false,
            Err(e) => {
                warn!(error = %e, "Failed to read profile");
                false
            }
        }
    }
}
