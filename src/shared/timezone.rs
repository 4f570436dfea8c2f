//! Time zone resolution for "UTC-stored, local-displayed" timestamps.
//!
//! Requests may carry a `tz` identifier. [`TimeZoneResolver::resolve`] walks an
//! ordered list of candidates and returns the first one that builds a usable
//! zone, so rendering a local timestamp never fails.

use chrono::{
    DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc,
};
use chrono_tz::Tz;

use crate::core::config::TimeZoneConfig;
use crate::shared::validation::OFFSET_ZONE_REGEX;

/// A concrete zone: either an IANA zone with DST rules or a fixed offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ZoneHandle {
    Named(Tz),
    Fixed(FixedOffset),
}

impl ZoneHandle {
    pub fn utc() -> Self {
        ZoneHandle::Fixed(Utc.fix())
    }

    /// Parse an IANA name (`America/Mexico_City`) or a fixed offset
    /// (`UTC-6`, `GMT+5:30`, `-06:00`, `Z`). Returns `None` for anything else.
    pub fn parse(identifier: &str) -> Option<Self> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return None;
        }

        if identifier.eq_ignore_ascii_case("z") {
            return Some(Self::utc());
        }

        if let Ok(tz) = identifier.parse::<Tz>() {
            return Some(ZoneHandle::Named(tz));
        }

        Self::parse_offset(identifier)
    }

    fn parse_offset(identifier: &str) -> Option<Self> {
        let caps = OFFSET_ZONE_REGEX.captures(identifier)?;
        let hours: i32 = caps.get(2)?.as_str().parse().ok()?;
        let minutes: i32 = match caps.get(3) {
            Some(m) => m.as_str().parse().ok()?,
            None => 0,
        };
        if minutes >= 60 {
            return None;
        }

        let seconds = hours * 3600 + minutes * 60;
        let offset = match caps.get(1)?.as_str() {
            "-" => FixedOffset::west_opt(seconds)?,
            _ => FixedOffset::east_opt(seconds)?,
        };
        Some(ZoneHandle::Fixed(offset))
    }

    /// Identifier as rendered back to clients
    pub fn name(&self) -> String {
        match self {
            ZoneHandle::Named(tz) => tz.name().to_string(),
            ZoneHandle::Fixed(offset) => offset.to_string(),
        }
    }

    /// The same instant expressed with this zone's offset
    pub fn to_local(&self, instant: DateTime<Utc>) -> DateTime<FixedOffset> {
        match self {
            ZoneHandle::Named(tz) => instant.with_timezone(tz).fixed_offset(),
            ZoneHandle::Fixed(offset) => instant.with_timezone(offset),
        }
    }

    /// Calendar date of `instant` in this zone
    pub fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        self.to_local(instant).date_naive()
    }

    /// First instant of the local calendar day `date`, in UTC.
    ///
    /// When midnight falls inside a DST gap the first wall-clock time that
    /// exists after it is used.
    pub fn start_of_day(&self, date: NaiveDate) -> DateTime<Utc> {
        let midnight = date.and_time(NaiveTime::MIN);
        match self {
            ZoneHandle::Named(tz) => first_valid_instant(tz, midnight),
            ZoneHandle::Fixed(offset) => first_valid_instant(offset, midnight),
        }
    }
}

fn first_valid_instant<Z: TimeZone>(zone: &Z, local: NaiveDateTime) -> DateTime<Utc> {
    // Gaps are at most a couple of hours and aligned to quarter hours
    for step in 0..=16 {
        let candidate = local + Duration::minutes(15 * step);
        if let Some(dt) = zone.from_local_datetime(&candidate).earliest() {
            return dt.with_timezone(&Utc);
        }
    }
    local.and_utc()
}

/// One step of the fallback chain.
#[derive(Debug, Clone, PartialEq)]
pub enum ZoneCandidate {
    /// A zone identifier (requested, configured default or regional fallback)
    Identifier(String),
    Utc,
    /// Offset east of UTC in seconds
    FixedOffset(i32),
}

impl ZoneCandidate {
    pub fn try_resolve(&self) -> Option<ZoneHandle> {
        match self {
            ZoneCandidate::Identifier(id) => ZoneHandle::parse(id),
            ZoneCandidate::Utc => Some(ZoneHandle::Named(Tz::UTC)),
            ZoneCandidate::FixedOffset(seconds) => {
                FixedOffset::east_opt(*seconds).map(ZoneHandle::Fixed)
            }
        }
    }
}

/// Resolves caller supplied zone identifiers with an ordered fallback chain.
#[derive(Debug, Clone)]
pub struct TimeZoneResolver {
    default_zone: String,
}

impl TimeZoneResolver {
    /// Regional zone tried when the configured default does not parse
    pub const REGIONAL_FALLBACK: &'static str = TimeZoneConfig::FALLBACK_ZONE;

    /// Last resort offset (UTC-6) in seconds east of UTC
    pub const LAST_RESORT_OFFSET_SECS: i32 = -6 * 3600;

    pub fn new(config: &TimeZoneConfig) -> Self {
        Self {
            default_zone: config.default_zone.clone(),
        }
    }

    /// Candidates in the order they are tried
    pub fn candidates(&self, requested: Option<&str>) -> Vec<ZoneCandidate> {
        let mut candidates = Vec::with_capacity(5);
        if let Some(requested) = requested.map(str::trim).filter(|s| !s.is_empty()) {
            candidates.push(ZoneCandidate::Identifier(requested.to_string()));
        }
        candidates.push(ZoneCandidate::Identifier(self.default_zone.clone()));
        candidates.push(ZoneCandidate::Identifier(Self::REGIONAL_FALLBACK.to_string()));
        candidates.push(ZoneCandidate::Utc);
        candidates.push(ZoneCandidate::FixedOffset(Self::LAST_RESORT_OFFSET_SECS));
        candidates
    }

    /// Never fails; degrades down to UTC or a fixed offset.
    pub fn resolve(&self, requested: Option<&str>) -> ZoneHandle {
        for candidate in self.candidates(requested) {
            if let Some(zone) = candidate.try_resolve() {
                return zone;
            }
            tracing::debug!("Time zone candidate {:?} rejected, trying next", candidate);
        }
        ZoneHandle::utc()
    }

    pub fn default_zone(&self) -> ZoneHandle {
        self.resolve(None)
    }
}
