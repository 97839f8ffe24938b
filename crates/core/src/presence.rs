//! Presence status vocabularies and status-update validation.
//!
//! A deployment runs exactly one [`StatusProfile`]. Status values are stored
//! as plain text; every write is checked against the active profile so the
//! two vocabularies never mix in one database.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Status constants
// ---------------------------------------------------------------------------

/// Working at the office.
pub const STATUS_ON_SITE: &str = "on-site";
/// Working remotely.
pub const STATUS_REMOTE: &str = "remote";
/// Out of the office on business.
pub const STATUS_OUT: &str = "out";
/// Absent for the day.
pub const STATUS_ABSENT: &str = "absent";
/// Off duty.
pub const STATUS_OFF: &str = "off";
/// Travelling straight to a client site without passing the office.
pub const STATUS_DIRECT_COMMUTE: &str = "direct-commute";
/// Going straight home from a client site.
pub const STATUS_DIRECT_RETURN: &str = "direct-return";
/// Clocked out.
pub const STATUS_OFFLINE: &str = "offline";

const SELF_REPORT_STATUSES: &[&str] = &[
    STATUS_ON_SITE,
    STATUS_REMOTE,
    STATUS_OUT,
    STATUS_ABSENT,
    STATUS_OFF,
];

const CLOCK_STATUSES: &[&str] = &[
    STATUS_ON_SITE,
    STATUS_REMOTE,
    STATUS_DIRECT_COMMUTE,
    STATUS_DIRECT_RETURN,
    STATUS_OFFLINE,
];

/// Maximum status comment length, counted in UTF-16 code units to match the
/// character counter shown by the clients.
pub const MAX_COMMENT_LENGTH: usize = 20;

// ---------------------------------------------------------------------------
// StatusProfile
// ---------------------------------------------------------------------------

/// The closed set of presence statuses a deployment accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatusProfile {
    /// Comment-driven self reporting: on-site, remote, out, absent, off.
    #[default]
    SelfReport,
    /// Clock-in/out driven: on-site, remote, direct-commute, direct-return,
    /// offline.
    Clock,
}

impl StatusProfile {
    /// Every status value valid under this profile.
    pub fn statuses(self) -> &'static [&'static str] {
        match self {
            Self::SelfReport => SELF_REPORT_STATUSES,
            Self::Clock => CLOCK_STATUSES,
        }
    }

    /// Status applied to an employee when they clock out.
    pub fn off_duty_status(self) -> &'static str {
        match self {
            Self::SelfReport => STATUS_OFF,
            Self::Clock => STATUS_OFFLINE,
        }
    }

    /// Validate that `status` belongs to this profile.
    pub fn validate_status(self, status: &str) -> Result<(), CoreError> {
        if self.statuses().contains(&status) {
            Ok(())
        } else {
            Err(CoreError::Validation(format!(
                "Invalid status '{status}'. Must be one of: {}",
                self.statuses().join(", ")
            )))
        }
    }
}

impl fmt::Display for StatusProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SelfReport => f.write_str("self-report"),
            Self::Clock => f.write_str("clock"),
        }
    }
}

impl FromStr for StatusProfile {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "self-report" => Ok(Self::SelfReport),
            "clock" => Ok(Self::Clock),
            other => Err(CoreError::Validation(format!(
                "Unknown status profile '{other}'. Must be one of: self-report, clock"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Comment validation
// ---------------------------------------------------------------------------

/// Validate the optional status comment length.
pub fn validate_comment(comment: Option<&str>) -> Result<(), CoreError> {
    let Some(comment) = comment else {
        return Ok(());
    };
    let length = comment.encode_utf16().count();
    if length > MAX_COMMENT_LENGTH {
        return Err(CoreError::Validation(format!(
            "Comment exceeds maximum length of {MAX_COMMENT_LENGTH} characters (got {length})"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn self_report_profile_accepts_its_statuses() {
        for s in StatusProfile::SelfReport.statuses() {
            assert!(StatusProfile::SelfReport.validate_status(s).is_ok());
        }
    }

    #[test]
    fn profiles_do_not_mix() {
        assert!(StatusProfile::SelfReport
            .validate_status(STATUS_OFFLINE)
            .is_err());
        assert!(StatusProfile::Clock.validate_status(STATUS_ABSENT).is_err());
        assert!(StatusProfile::Clock
            .validate_status(STATUS_DIRECT_COMMUTE)
            .is_ok());
    }

    #[test]
    fn unknown_status_names_the_allowed_set() {
        let err = StatusProfile::SelfReport
            .validate_status("vacation")
            .unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) if msg.contains("on-site, remote"));
    }

    #[test]
    fn off_duty_status_belongs_to_profile() {
        for profile in [StatusProfile::SelfReport, StatusProfile::Clock] {
            assert!(profile.validate_status(profile.off_duty_status()).is_ok());
        }
    }

    #[test]
    fn profile_parses_from_config_names() {
        assert_eq!("self-report".parse::<StatusProfile>().unwrap(), StatusProfile::SelfReport);
        assert_eq!("clock".parse::<StatusProfile>().unwrap(), StatusProfile::Clock);
        assert!("both".parse::<StatusProfile>().is_err());
        assert_eq!(StatusProfile::Clock.to_string(), "clock");
    }

    #[test]
    fn comment_at_limit_is_valid() {
        let comment = "a".repeat(MAX_COMMENT_LENGTH);
        assert!(validate_comment(Some(&comment)).is_ok());
        assert!(validate_comment(None).is_ok());
    }

    #[test]
    fn comment_over_limit_is_invalid() {
        let comment = "a".repeat(MAX_COMMENT_LENGTH + 1);
        assert_matches!(validate_comment(Some(&comment)), Err(CoreError::Validation(_)));
    }

    #[test]
    fn comment_length_counts_utf16_units() {
        // Twenty kana fit; each is one UTF-16 unit but three UTF-8 bytes.
        let kana = "あ".repeat(20);
        assert!(validate_comment(Some(&kana)).is_ok());

        // An astral-plane emoji is two UTF-16 units.
        let emoji = "😀".repeat(11);
        assert!(validate_comment(Some(&emoji)).is_err());
    }
}
