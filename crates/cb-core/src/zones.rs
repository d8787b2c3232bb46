//! Renders one instant in the fixed set of team time zones.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

/// Display format used for every zone.
const ZONE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const SEPARATOR: &str = " | ";

/// Short code and IANA zone, in display order.
pub const ZONES: [(&str, Tz); 4] = [
    ("UTC", Tz::UTC),
    ("NYC", Tz::America__New_York),
    ("IST", Tz::Asia__Kolkata),
    ("NPT", Tz::Asia__Kathmandu),
];

/// Renders `instant` as `UTC … | NYC … | IST … | NPT …`.
pub fn render(instant: DateTime<Utc>) -> String {
    ZONES
        .iter()
        .map(|(code, tz)| {
            format!(
                "{code} {}",
                instant.with_timezone(tz).format(ZONE_FORMAT)
            )
        })
        .collect::<Vec<_>>()
        .join(SEPARATOR)
}
