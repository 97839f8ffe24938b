//! Deployment-wide presence settings shared by the engines and exporter.

use chrono_tz::Tz;

use crate::error::CoreError;
use crate::export::ExportLocale;
use crate::presence::StatusProfile;

/// Time zone used for day buckets when none is configured.
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::Asia::Tokyo;

/// Settings that shape presence and attendance behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresenceSettings {
    /// Zone whose calendar days are the attendance day buckets.
    pub timezone: Tz,
    /// The status vocabulary this deployment accepts.
    pub profile: StatusProfile,
    /// Formatting of CSV exports.
    pub export_locale: ExportLocale,
}

impl Default for PresenceSettings {
    fn default() -> Self {
        Self {
            timezone: DEFAULT_TIMEZONE,
            profile: StatusProfile::default(),
            export_locale: ExportLocale::default(),
        }
    }
}

/// Parse an IANA time zone name such as `Asia/Tokyo`.
pub fn parse_timezone(name: &str) -> Result<Tz, CoreError> {
    name.parse::<Tz>()
        .map_err(|_| CoreError::Validation(format!("Unknown time zone '{name}'")))
}
