//! Location report model and validation.
//!
//! Payloads arrive as untrusted JSON from the client page. The only hard
//! requirement is that `lat` and `lng` are numeric; every other field is
//! optional and tolerated in any shape (wrong-typed values are treated as
//! absent rather than rejected, since the report is already accepted once
//! the coordinates check out).

use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::error::Error;

/// Placeholder rendered for any metadata field the client did not send.
pub const NOT_AVAILABLE: &str = "Not available";

/// A validated geolocation report.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationReport {
    pub lat: f64,
    pub lng: f64,
    /// Client-supplied capture time, epoch milliseconds.
    pub timestamp: Option<i64>,
    /// Position accuracy in meters.
    pub accuracy: Option<f64>,
    /// Device descriptor (user agent or similar).
    pub device: Option<String>,
    pub public_ipv4: Option<String>,
    pub local_ipv4: Option<String>,
    pub public_ipv6: Option<String>,
    pub local_ipv6: Option<String>,
    pub is_vpn: Option<bool>,
    pub vpn_provider: Option<String>,
    pub vpn_server_location: Option<String>,
}

impl LocationReport {
    /// Validate and extract a report from an untrusted JSON object.
    ///
    /// `lat` and `lng` must both be numbers; a missing or wrong-typed
    /// coordinate is a terminal validation failure naming the offending
    /// field(s). No other field can fail validation.
    pub fn from_value(value: &Value) -> Result<Self, Error> {
        let lat = value.get("lat").and_then(Value::as_f64);
        let lng = value.get("lng").and_then(Value::as_f64);

        let (lat, lng) = match (lat, lng) {
            (Some(lat), Some(lng)) => (lat, lng),
            (lat, lng) => {
                let mut fields = Vec::new();
                if lat.is_none() {
                    fields.push("lat".to_string());
                }
                if lng.is_none() {
                    fields.push("lng".to_string());
                }
                return Err(Error::InvalidReport { fields });
            }
        };

        Ok(LocationReport {
            lat,
            lng,
            timestamp: value.get("timestamp").and_then(Value::as_i64),
            accuracy: value.get("accuracy").and_then(Value::as_f64),
            device: get_string(value, "device"),
            public_ipv4: get_string(value, "publicIPv4"),
            local_ipv4: get_string(value, "localIPv4"),
            public_ipv6: get_string(value, "publicIPv6"),
            local_ipv6: get_string(value, "localIPv6"),
            is_vpn: value.get("isVPN").and_then(Value::as_bool),
            vpn_provider: get_string(value, "vpnProvider"),
            vpn_server_location: get_string(value, "vpnServerLocation"),
        })
    }

    /// Map service URL for the reported position.
    ///
    /// Coordinates are rendered at fixed 6-decimal precision so the link is
    /// stable across float formatting quirks and leaks no excess precision.
    pub fn map_link(&self) -> String {
        format!(
            "https://www.google.com/maps?q={:.6},{:.6}",
            self.lat, self.lng
        )
    }

    /// Capture time: the client timestamp when present, otherwise now.
    pub fn captured_at(&self) -> DateTime<Utc> {
        self.timestamp
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
            .unwrap_or_else(Utc::now)
    }

    /// Human-readable capture time for the notification body and log line.
    pub fn formatted_time(&self) -> String {
        self.captured_at().to_rfc2822()
    }

    pub fn vpn_detected(&self) -> bool {
        self.is_vpn.unwrap_or(false)
    }
}

fn get_string(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_string)
}
