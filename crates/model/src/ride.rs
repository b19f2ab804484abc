use chrono::{Local, TimeZone, Timelike};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A single departure at a stop, taken from the live feed at query time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Ride {
    /// Scheduled departure, unix time in seconds.
    pub departure_unix: i64,
    pub delay_seconds: i64,
    pub line: String,
    pub destination: String,
}

impl Ride {
    /// Departure as wall clock time, e.g. "9:04 Uhr".
    pub fn departure_text(&self) -> Option<String> {
        self.departure_text_in(&Local)
    }

    pub fn departure_text_in<Tz: TimeZone>(&self, timezone: &Tz) -> Option<String> {
        let time = timezone.timestamp_opt(self.departure_unix, 0).single()?;
        Some(format!("{}:{:02} Uhr", time.hour(), time.minute()))
    }

    /// Delay in whole minutes, e.g. "1 Minute" or "4 Minuten".
    pub fn delay_text(&self) -> String {
        let minutes = (self.delay_seconds as f64 / 60.0 + 0.5).floor() as i64;
        if minutes == 1 {
            "1 Minute".to_owned()
        } else {
            format!("{} Minuten", minutes)
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, Utc};

    use super::*;

    fn ride(departure_unix: i64, delay_seconds: i64) -> Ride {
        Ride {
            departure_unix,
            delay_seconds,
            line: "9".to_owned(),
            destination: "Von-Humboldt-Straße".to_owned(),
        }
    }

    #[test]
    fn formats_departure_times() {
        // 2020-05-07T11:39:00Z
        let afternoon = ride(1588851540, 0);
        assert_eq!(afternoon.departure_text_in(&Utc).unwrap(), "11:39 Uhr");
        let cest = FixedOffset::east_opt(2 * 3600).unwrap();
        assert_eq!(afternoon.departure_text_in(&cest).unwrap(), "13:39 Uhr");
        // 2020-05-07T09:04:00Z, hours are not padded
        let morning = ride(1588842240, 0);
        assert_eq!(morning.departure_text_in(&Utc).unwrap(), "9:04 Uhr");
    }

    #[test]
    fn formats_delays() {
        assert_eq!(ride(0, 8).delay_text(), "0 Minuten");
        assert_eq!(ride(0, 30).delay_text(), "1 Minute");
        assert_eq!(ride(0, 89).delay_text(), "1 Minute");
        assert_eq!(ride(0, 90).delay_text(), "2 Minuten");
        assert_eq!(ride(0, 240).delay_text(), "4 Minuten");
    }
}
