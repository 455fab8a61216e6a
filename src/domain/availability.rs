//! Restaurant availability resolution.
//!
//! A restaurant's operational status is a pure function of its weekly
//! schedule, its manual override, and the current local wall-clock time, so
//! it can be evaluated on every listing render and before every placement
//! without extra round trips.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Operational status of a restaurant at an instant in time. Independent of
/// the admin-controlled approval status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationalStatus {
    Open,
    Busy,
    Closed,
}

impl OperationalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationalStatus::Open => "OPEN",
            OperationalStatus::Busy => "BUSY",
            OperationalStatus::Closed => "CLOSED",
        }
    }
}

impl std::fmt::Display for OperationalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Owner-settable escape hatch that bypasses the weekly schedule, e.g. to
/// signal a kitchen slowdown or an early closure without editing the hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManualOverride {
    Auto,
    Open,
    Busy,
    Closed,
}

impl ManualOverride {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "auto" => Some(ManualOverride::Auto),
            "open" => Some(ManualOverride::Open),
            "busy" => Some(ManualOverride::Busy),
            "closed" => Some(ManualOverride::Closed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ManualOverride::Auto => "auto",
            ManualOverride::Open => "open",
            ManualOverride::Busy => "busy",
            ManualOverride::Closed => "closed",
        }
    }
}

/// Opening window for one weekday.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct DaySchedule {
    pub enabled: bool,
    /// "HH:MM", 24-hour clock.
    pub open: String,
    /// "HH:MM", must be later than `open` on the same calendar day.
    pub close: String,
}

/// Weekly schedule keyed by lowercase weekday name ("monday" .. "sunday").
pub type OpeningHours = HashMap<String, DaySchedule>;

/// Resolves a restaurant's operational status at `now` (local wall-clock).
///
/// A manual override other than `auto` short-circuits the schedule entirely;
/// an unrecognized override value resolves fail-safe to `Closed`. In `auto`
/// mode the weekday's window is compared as "HH:MM" strings, inclusive on
/// both bounds.
///
/// Known limitation: a close time past midnight cannot be expressed. The
/// string comparison assumes `open < close` within a single calendar day, so
/// an overnight window such as 18:00-02:00 resolves to `Closed` for the whole
/// evening.
pub fn resolve_status(
    hours: &OpeningHours,
    manual_override: &str,
    now: NaiveDateTime,
) -> OperationalStatus {
    match ManualOverride::parse(manual_override) {
        Some(ManualOverride::Open) => return OperationalStatus::Open,
        Some(ManualOverride::Busy) => return OperationalStatus::Busy,
        Some(ManualOverride::Closed) => return OperationalStatus::Closed,
        Some(ManualOverride::Auto) => {}
        None => return OperationalStatus::Closed,
    }

    let weekday = now.format("%A").to_string().to_lowercase();
    let Some(day) = hours.get(&weekday) else {
        return OperationalStatus::Closed;
    };
    if !day.enabled {
        return OperationalStatus::Closed;
    }

    let time = now.format("%H:%M").to_string();
    if day.open.as_str() <= time.as_str() && time.as_str() <= day.close.as_str() {
        OperationalStatus::Open
    } else {
        OperationalStatus::Closed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn monday_at(hour: u32, minute: u32) -> NaiveDateTime {
        // 2025-07-07 is a Monday.
        NaiveDate::from_ymd_opt(2025, 7, 7)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn weekday_hours(open: &str, close: &str, enabled: bool) -> OpeningHours {
        let mut hours = OpeningHours::new();
        hours.insert(
            "monday".to_string(),
            DaySchedule {
                enabled,
                open: open.to_string(),
                close: close.to_string(),
            },
        );
        hours
    }

    #[test]
    fn override_short_circuits_the_schedule() {
        // Schedule says wide open; override wins anyway.
        let hours = weekday_hours("00:00", "23:59", true);
        assert_eq!(
            resolve_status(&hours, "closed", monday_at(10, 0)),
            OperationalStatus::Closed
        );
        assert_eq!(
            resolve_status(&hours, "busy", monday_at(10, 0)),
            OperationalStatus::Busy
        );

        // And "open" overrides a schedule that would be closed.
        let closed_hours = weekday_hours("09:00", "17:00", false);
        assert_eq!(
            resolve_status(&closed_hours, "open", monday_at(3, 0)),
            OperationalStatus::Open
        );
    }

    #[test]
    fn unrecognized_override_fails_safe_to_closed() {
        let hours = weekday_hours("00:00", "23:59", true);
        assert_eq!(
            resolve_status(&hours, "maybe", monday_at(10, 0)),
            OperationalStatus::Closed
        );
        assert_eq!(
            resolve_status(&hours, "", monday_at(10, 0)),
            OperationalStatus::Closed
        );
    }

    #[test]
    fn auto_resolves_from_the_weekday_window() {
        let hours = weekday_hours("09:00", "17:00", true);
        assert_eq!(
            resolve_status(&hours, "auto", monday_at(10, 0)),
            OperationalStatus::Open
        );
        assert_eq!(
            resolve_status(&hours, "auto", monday_at(18, 0)),
            OperationalStatus::Closed
        );
        assert_eq!(
            resolve_status(&hours, "auto", monday_at(8, 59)),
            OperationalStatus::Closed
        );
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let hours = weekday_hours("09:00", "17:00", true);
        assert_eq!(
            resolve_status(&hours, "auto", monday_at(9, 0)),
            OperationalStatus::Open
        );
        assert_eq!(
            resolve_status(&hours, "auto", monday_at(17, 0)),
            OperationalStatus::Open
        );
        assert_eq!(
            resolve_status(&hours, "auto", monday_at(17, 1)),
            OperationalStatus::Closed
        );
    }

    #[test]
    fn disabled_day_is_closed() {
        let hours = weekday_hours("09:00", "17:00", false);
        assert_eq!(
            resolve_status(&hours, "auto", monday_at(10, 0)),
            OperationalStatus::Closed
        );
    }

    #[test]
    fn missing_day_is_closed() {
        let hours = OpeningHours::new();
        assert_eq!(
            resolve_status(&hours, "auto", monday_at(10, 0)),
            OperationalStatus::Closed
        );

        // Schedule exists but only for another weekday.
        let mut tuesday_only = OpeningHours::new();
        tuesday_only.insert(
            "tuesday".to_string(),
            DaySchedule {
                enabled: true,
                open: "09:00".to_string(),
                close: "17:00".to_string(),
            },
        );
        assert_eq!(
            resolve_status(&tuesday_only, "auto", monday_at(10, 0)),
            OperationalStatus::Closed
        );
    }

    #[test]
    fn overnight_windows_resolve_closed() {
        // Documented limitation: close past midnight cannot be expressed.
        let hours = weekday_hours("18:00", "02:00", true);
        assert_eq!(
            resolve_status(&hours, "auto", monday_at(20, 0)),
            OperationalStatus::Closed
        );
    }
}
