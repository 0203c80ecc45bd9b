//! Human-readable distance and duration formatting.

use chrono::{DateTime, Duration, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt;

const METERS_PER_KILOMETER: f64 = 1000.0;
const SECONDS_PER_MINUTE: f64 = 60.0;
const SECONDS_PER_HOUR: f64 = 3600.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricUnit {
    #[serde(rename = "m")]
    Meters,
    #[serde(rename = "km")]
    Kilometers,
    Minutes,
    Hours,
}

impl MetricUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricUnit::Meters => "m",
            MetricUnit::Kilometers => "km",
            MetricUnit::Minutes => "minutes",
            MetricUnit::Hours => "hours",
        }
    }
}

impl fmt::Display for MetricUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A magnitude scaled to a single display unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayMetric {
    pub value: f64,
    pub unit: MetricUnit,
}

impl DisplayMetric {
    /// Shown for duration while no route has been received.
    pub const DURATION_FALLBACK: DisplayMetric = DisplayMetric {
        value: 0.0,
        unit: MetricUnit::Minutes,
    };
}

impl fmt::Display for DisplayMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.unit)
    }
}

/// Kilometres with one decimal from 1000 m upward, whole metres below.
pub fn format_distance(distance_meters: f64) -> DisplayMetric {
    if distance_meters >= METERS_PER_KILOMETER {
        DisplayMetric {
            value: round_to_tenths(distance_meters / METERS_PER_KILOMETER),
            unit: MetricUnit::Kilometers,
        }
    } else {
        DisplayMetric {
            value: round_half_up(distance_meters),
            unit: MetricUnit::Meters,
        }
    }
}

/// Minutes (rounded up) below one hour, whole hours (rounded up) above.
pub fn format_duration(duration_seconds: f64) -> DisplayMetric {
    if duration_seconds < SECONDS_PER_HOUR {
        DisplayMetric {
            value: (duration_seconds / SECONDS_PER_MINUTE).ceil(),
            unit: MetricUnit::Minutes,
        }
    } else {
        DisplayMetric {
            value: (duration_seconds / SECONDS_PER_HOUR).ceil(),
            unit: MetricUnit::Hours,
        }
    }
}

/// Duration metric with the documented fallback when no route exists.
pub fn duration_or_fallback(duration_seconds: Option<f64>) -> DisplayMetric {
    duration_seconds
        .map(format_duration)
        .unwrap_or(DisplayMetric::DURATION_FALLBACK)
}

/// Wall-clock arrival if the rider leaves at `departure`.
pub fn estimated_arrival<Tz: TimeZone>(
    departure: DateTime<Tz>,
    duration_seconds: f64,
) -> Option<DateTime<Tz>> {
    if !duration_seconds.is_finite() || duration_seconds < 0.0 {
        return None;
    }
    let millis = (duration_seconds * 1000.0).round() as i64;
    departure.checked_add_signed(Duration::milliseconds(millis))
}

/// Nearest integer, ties toward positive infinity.
fn round_half_up(value: f64) -> f64 {
    let floor = value.floor();
    if value - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

/// One-decimal rounding decided on the exact decimal expansion of `value`,
/// ties going up. Scaling by ten first would misround values such as 1.25.
fn round_to_tenths(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    // Any f64 below 2^53 has at most 52 fractional decimal digits.
    let exact = format!("{:.64}", value.abs());
    let Some((whole, fraction)) = exact.split_once('.') else {
        return value;
    };
    let Ok(whole) = whole.parse::<u64>() else {
        return (value * 10.0).round() / 10.0;
    };

    let mut digits = fraction.bytes().map(|digit| u64::from(digit - b'0'));
    let tenths = digits.next().unwrap_or(0);
    let round_up = digits.next().is_some_and(|digit| digit >= 5);

    let scaled = whole * 10 + tenths + u64::from(round_up);
    (scaled as f64 / 10.0).copysign(value)
}
