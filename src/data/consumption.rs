use time::Date;

use super::types::{FuelType, UsageUnit};

/// One metered interval: `[start, end)` with its total usage.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsumptionRecord {
    /// First day of the interval (inclusive).
    pub start: Date,
    /// Day after the last day of the interval (exclusive).
    pub end: Date,
    /// Total usage over the interval, in the history's unit.
    pub usage: f64,
}

impl ConsumptionRecord {
    pub fn new(start: Date, end: Date, usage: f64) -> Self {
        Self { start, end, usage }
    }

    /// Number of whole days covered by the record.
    pub fn days(&self) -> usize {
        (self.end - self.start).whole_days().max(0) as usize
    }

    /// Average usage per day, or `None` for an empty interval.
    pub fn usage_per_day(&self) -> Option<f64> {
        match self.days() {
            0 => None,
            d => Some(self.usage / d as f64),
        }
    }
}

/// Ordered consumption records for a single fuel.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsumptionHistory {
    pub fuel: FuelType,
    pub unit: UsageUnit,
    pub records: Vec<ConsumptionRecord>,
}

impl ConsumptionHistory {
    /// Creates a history using the fuel's conventional unit.
    pub fn new(fuel: FuelType, records: Vec<ConsumptionRecord>) -> Self {
        Self {
            fuel,
            unit: UsageUnit::for_fuel(fuel),
            records,
        }
    }

    /// Keeps the records matching `keep`, preserving order.
    pub fn filtered(&self, mut keep: impl FnMut(&ConsumptionRecord) -> bool) -> Self {
        Self {
            fuel: self.fuel,
            unit: self.unit,
            records: self.records.iter().filter(|r| keep(r)).cloned().collect(),
        }
    }

    pub fn total_usage(&self) -> f64 {
        self.records.iter().map(|r| r.usage).sum()
    }

    /// Days between the first record's start and the last record's end.
    pub fn time_span_days(&self) -> usize {
        match (self.records.first(), self.records.last()) {
            (Some(first), Some(last)) => (last.end - first.start).whole_days().max(0) as usize,
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Checks ordering, overlap, and sign invariants.
    ///
    /// # Errors
    ///
    /// Returns a description of the first violated invariant.
    pub fn check_invariants(&self) -> Result<(), String> {
        for (i, r) in self.records.iter().enumerate() {
            if r.start >= r.end {
                return Err(format!(
                    "{} record {i} starts on {} but ends on {}",
                    self.fuel, r.start, r.end
                ));
            }
            if !r.usage.is_finite() || r.usage < 0.0 {
                return Err(format!(
                    "{} record {i} has invalid usage {}",
                    self.fuel, r.usage
                ));
            }
        }
        for (i, pair) in self.records.windows(2).enumerate() {
            if pair[1].start < pair[0].end {
                return Err(format!(
                    "{} records {i} and {} overlap or are out of order",
                    self.fuel,
                    i + 1
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn history(records: Vec<ConsumptionRecord>) -> ConsumptionHistory {
        ConsumptionHistory::new(FuelType::Electricity, records)
    }

    #[test]
    fn record_days_and_rate() {
        let r = ConsumptionRecord::new(date!(2012 - 01 - 01), date!(2012 - 02 - 01), 310.0);
        assert_eq!(r.days(), 31);
        assert_eq!(r.usage_per_day(), Some(10.0));
    }

    #[test]
    fn span_and_total() {
        let h = history(vec![
            ConsumptionRecord::new(date!(2012 - 01 - 01), date!(2012 - 01 - 11), 10.0),
            ConsumptionRecord::new(date!(2012 - 01 - 11), date!(2012 - 01 - 21), 15.0),
        ]);
        assert_eq!(h.time_span_days(), 20);
        assert_eq!(h.total_usage(), 25.0);
        assert_eq!(h.unit, UsageUnit::KilowattHours);
    }

    #[test]
    fn overlapping_records_rejected() {
        let h = history(vec![
            ConsumptionRecord::new(date!(2012 - 01 - 01), date!(2012 - 01 - 15), 10.0),
            ConsumptionRecord::new(date!(2012 - 01 - 10), date!(2012 - 01 - 20), 10.0),
        ]);
        let err = h.check_invariants();
        assert!(err.is_err());
        assert!(err.unwrap_err().contains("overlap"));
    }

    #[test]
    fn negative_usage_rejected() {
        let h = history(vec![ConsumptionRecord::new(
            date!(2012 - 01 - 01),
            date!(2012 - 01 - 15),
            -1.0,
        )]);
        assert!(h.check_invariants().is_err());
    }

    #[test]
    fn inverted_record_rejected() {
        let h = history(vec![ConsumptionRecord::new(
            date!(2012 - 01 - 15),
            date!(2012 - 01 - 01),
            1.0,
        )]);
        assert!(h.check_invariants().is_err());
    }
}
