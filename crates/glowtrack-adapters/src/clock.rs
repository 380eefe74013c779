//! System wall clock.

use glowtrack_core::Clock;
use time::OffsetDateTime;
use tracing::debug;

/// Fallback when the OS timezone cannot be resolved.
const FALLBACK_TIMEZONE: &str = "UTC";

/// `Clock` reading the system time in UTC and the OS timezone name.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }

    fn timezone(&self) -> String {
        iana_time_zone::get_timezone().unwrap_or_else(|e| {
            debug!("Timezone lookup failed, using {FALLBACK_TIMEZONE}: {e}");
            FALLBACK_TIMEZONE.to_string()
        })
    }
}
