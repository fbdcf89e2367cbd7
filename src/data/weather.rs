//! Temperature history and its aggregation to daily means.

use std::collections::BTreeMap;

use time::{Date, PrimitiveDateTime};

/// One temperature observation in degrees Fahrenheit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperatureSample {
    pub timestamp: PrimitiveDateTime,
    pub temp_f: f64,
}

/// Temperature observations from a single station, ordered by time.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherHistory {
    /// Station or source identifier (e.g. a USAF id or zipcode lookup).
    pub station: String,
    pub samples: Vec<TemperatureSample>,
}

impl WeatherHistory {
    pub fn new(station: impl Into<String>, samples: Vec<TemperatureSample>) -> Self {
        Self {
            station: station.into(),
            samples,
        }
    }

    /// Builds a history with one midnight sample per `(date, temp_f)` pair.
    pub fn from_daily(station: impl Into<String>, days: impl IntoIterator<Item = (Date, f64)>) -> Self {
        let samples = days
            .into_iter()
            .map(|(date, temp_f)| TemperatureSample {
                timestamp: date.midnight(),
                temp_f,
            })
            .collect();
        Self::new(station, samples)
    }

    /// Checks that timestamps strictly increase and temperatures are finite.
    ///
    /// # Errors
    ///
    /// Returns a description of the first violation.
    pub fn check_invariants(&self) -> Result<(), String> {
        if self.samples.is_empty() {
            return Err(format!("weather station {} has no samples", self.station));
        }
        if let Some(bad) = self.samples.iter().find(|s| !s.temp_f.is_finite()) {
            return Err(format!(
                "weather station {} has a non-finite temperature at {}",
                self.station, bad.timestamp
            ));
        }
        if let Some(i) = self
            .samples
            .windows(2)
            .position(|w| w[1].timestamp <= w[0].timestamp)
        {
            return Err(format!(
                "weather station {} timestamps not increasing at sample {}",
                self.station,
                i + 1
            ));
        }
        Ok(())
    }

    /// Averages samples per calendar date.
    pub fn daily_temperatures(&self) -> DailyTemperatures {
        let mut acc: BTreeMap<Date, (f64, usize)> = BTreeMap::new();
        for s in &self.samples {
            let slot = acc.entry(s.timestamp.date()).or_insert((0.0, 0));
            slot.0 += s.temp_f;
            slot.1 += 1;
        }
        DailyTemperatures {
            by_date: acc
                .into_iter()
                .map(|(date, (sum, n))| (date, sum / n as f64))
                .collect(),
        }
    }
}

/// Daily mean temperatures keyed by date.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DailyTemperatures {
    by_date: BTreeMap<Date, f64>,
}

impl DailyTemperatures {
    pub fn from_days(days: impl IntoIterator<Item = (Date, f64)>) -> Self {
        Self {
            by_date: days.into_iter().collect(),
        }
    }

    pub fn get(&self, date: Date) -> Option<f64> {
        self.by_date.get(&date).copied()
    }

    /// Mean temperatures for every covered day in `[start, end)`.
    pub fn between(&self, start: Date, end: Date) -> Vec<f64> {
        if start >= end {
            return Vec::new();
        }
        self.by_date.range(start..end).map(|(_, t)| *t).collect()
    }

    /// All daily means in date order.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.by_date.values().copied()
    }

    pub fn len(&self) -> usize {
        self.by_date.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_date.is_empty()
    }
}
