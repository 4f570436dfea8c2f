use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for restroom codes printed on QR labels
    /// - Valid: "B-A1-H1", "lobby_2", "P3.W"
    /// - Invalid: "-B1", "B 1", ""
    pub static ref RESTROOM_ID_REGEX: Regex =
        Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_.\-]*$").unwrap();

    /// Regex for fixed-offset zone identifiers, with an optional UTC/GMT prefix
    /// - Valid: "UTC-6", "gmt+5:30", "UTC+05:30", "-06:00", "+0530"
    /// - Invalid: "UTC-", "UTC+5:3", "America/Mexico_City"
    pub static ref OFFSET_ZONE_REGEX: Regex =
        Regex::new(r"^(?i:utc|gmt)?\s*([+-])(\d{1,2})(?::?(\d{2}))?$").unwrap();
}
