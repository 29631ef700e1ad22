use chrono_tz::Tz;

/// Process configuration. The owner timezone is the single zone every
/// availability rule and policy window is authored in — the business's
/// home zone, independent of any visitor's.
#[derive(Debug, Clone)]
pub struct BookingConfig {
    pub owner_timezone: Tz,
    pub metrics_port: Option<u16>,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            owner_timezone: chrono_tz::Europe::Paris,
            metrics_port: None,
        }
    }
}

impl BookingConfig {
    /// Read `CRENEAU_OWNER_TZ` (IANA name) and `CRENEAU_METRICS_PORT`.
    /// Unset or unparseable values fall back to defaults.
    pub fn from_env() -> Self {
        let owner_timezone = std::env::var("CRENEAU_OWNER_TZ")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(chrono_tz::Europe::Paris);
        let metrics_port = std::env::var("CRENEAU_METRICS_PORT")
            .ok()
            .and_then(|s| s.parse().ok());
        Self {
            owner_timezone,
            metrics_port,
        }
    }

    pub fn with_timezone(owner_timezone: Tz) -> Self {
        Self {
            owner_timezone,
            metrics_port: None,
        }
    }
}
