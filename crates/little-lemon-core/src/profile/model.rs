use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::utils::{format_phone, mask_phone};

const EMAIL_PATTERN: &str = r"\S+@\S+\.\S+";

/// Names must be longer than this many characters.
const MIN_NAME_CHARS: usize = 2;

#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("First name must be at least 3 characters")]
    InvalidName,

    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    #[error("No profile yet, complete onboarding first")]
    NotOnboarded,

    #[error("Profile file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Profile file is corrupt: {0}")]
    Json(#[from] serde_json::Error),
}

fn email_regex() -> Option<&'static Regex> {
    static EMAIL_RE: OnceLock<Option<Regex>> = OnceLock::new();
    EMAIL_RE.get_or_init(|| Regex::new(EMAIL_PATTERN).ok()).as_ref()
}

pub fn is_valid_name(name: &str) -> bool {
    name.trim().chars().count() > MIN_NAME_CHARS
}

pub fn is_valid_email(email: &str) -> bool {
    email_regex().map(|re| re.is_match(email)).unwrap_or(false)
}

/// Email notification opt-ins. Everything is on until switched off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPrefs {
    pub order_statuses: bool,
    pub password_changes: bool,
    pub special_offers: bool,
    pub newsletter: bool,
}

/// One of the email notification opt-ins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    OrderStatuses,
    PasswordChanges,
    SpecialOffers,
    Newsletter,
}

impl NotificationKind {
    pub const ALL: [NotificationKind; 4] = [
        NotificationKind::OrderStatuses,
        NotificationKind::PasswordChanges,
        NotificationKind::SpecialOffers,
        NotificationKind::Newsletter,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            NotificationKind::OrderStatuses => "Order statuses",
            NotificationKind::PasswordChanges => "Password changes",
            NotificationKind::SpecialOffers => "Special offers",
            NotificationKind::Newsletter => "Newsletter",
        }
    }
}

impl FromStr for NotificationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "order-statuses" | "orders" => Ok(NotificationKind::OrderStatuses),
            "password-changes" | "password" => Ok(NotificationKind::PasswordChanges),
            "special-offers" | "offers" => Ok(NotificationKind::SpecialOffers),
            "newsletter" => Ok(NotificationKind::Newsletter),
            other => Err(format!("unknown notification: {}", other)),
        }
    }
}

impl NotificationPrefs {
    pub fn get(&self, kind: NotificationKind) -> bool {
        match kind {
            NotificationKind::OrderStatuses => self.order_statuses,
            NotificationKind::PasswordChanges => self.password_changes,
            NotificationKind::SpecialOffers => self.special_offers,
            NotificationKind::Newsletter => self.newsletter,
        }
    }

    pub fn set(&mut self, kind: NotificationKind, enabled: bool) {
        let flag = match kind {
            NotificationKind::OrderStatuses => &mut self.order_statuses,
            NotificationKind::PasswordChanges => &mut self.password_changes,
            NotificationKind::SpecialOffers => &mut self.special_offers,
            NotificationKind::Newsletter => &mut self.newsletter,
        };
        *flag = enabled;
    }

    pub fn toggle(&mut self, kind: NotificationKind) {
        self.set(kind, !self.get(kind));
    }
}

impl Default for NotificationPrefs {
    fn default() -> Self {
        Self {
            order_statuses: true,
            password_changes: true,
            special_offers: true,
            newsletter: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone_number: String,
    /// Local path or URI of the avatar picked by the user.
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub notifications: NotificationPrefs,
    #[serde(default)]
    pub onboarded_at: Option<DateTime<Utc>>,
}

/// Edits from the profile screen. `None` leaves a field as it is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    /// Raw input; stored in the `(999) 999-9999` mask.
    pub phone_number: Option<String>,
    /// `Some(None)` removes the avatar.
    pub image: Option<Option<String>>,
    pub notifications: Vec<(NotificationKind, bool)>,
}

impl Profile {
    /// Complete onboarding with the two required fields.
    pub fn onboard(first_name: &str, email: &str) -> Result<Self, ProfileError> {
        let profile = Self {
            first_name: first_name.trim().to_string(),
            email: email.trim().to_string(),
            onboarded_at: Some(Utc::now()),
            ..Self::default()
        };
        profile.validate()?;
        Ok(profile)
    }

    pub fn validate(&self) -> Result<(), ProfileError> {
        if !is_valid_name(&self.first_name) {
            return Err(ProfileError::InvalidName);
        }
        if !is_valid_email(&self.email) {
            return Err(ProfileError::InvalidEmail(self.email.clone()));
        }
        Ok(())
    }

    pub fn is_onboarded(&self) -> bool {
        self.onboarded_at.is_some()
    }

    /// A copy with `changes` applied, validated. `self` is untouched, so
    /// dropping the result discards the edit.
    pub fn with_changes(&self, changes: ProfileChanges) -> Result<Profile, ProfileError> {
        let mut updated = self.clone();

        if let Some(first_name) = changes.first_name {
            updated.first_name = first_name.trim().to_string();
        }
        if let Some(last_name) = changes.last_name {
            updated.last_name = last_name.trim().to_string();
        }
        if let Some(email) = changes.email {
            updated.email = email.trim().to_string();
        }
        if let Some(phone) = changes.phone_number {
            updated.phone_number = mask_phone(&phone);
        }
        if let Some(image) = changes.image {
            updated.image = image
                .map(|path| path.trim().to_string())
                .filter(|path| !path.is_empty());
        }
        for (kind, enabled) in changes.notifications {
            updated.notifications.set(kind, enabled);
        }

        updated.validate()?;
        Ok(updated)
    }

    pub fn full_name(&self) -> String {
        if self.last_name.is_empty() {
            self.first_name.clone()
        } else {
            format!("{} {}", self.first_name, self.last_name)
        }
    }

    /// Two-letter placeholder shown when no avatar is set.
    pub fn initials(&self) -> String {
        [&self.first_name, &self.last_name]
            .iter()
            .filter_map(|part| part.chars().next())
            .flat_map(|c| c.to_uppercase())
            .collect()
    }

    pub fn display_phone(&self) -> String {
        format_phone(&self.phone_number)
    }
}
