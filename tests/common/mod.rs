//! Shared test fixtures for integration tests.
#![allow(dead_code)]

use std::f64::consts::TAU;

use eemeter::data::{
    ConsumptionHistory, ConsumptionRecord, FuelType, Project, ProjectPeriods, WeatherHistory,
};
use time::macros::date;
use time::{Date, Duration, Month};

/// First day of the synthetic weather record.
pub const WEATHER_START: Date = date!(2012 - 01 - 01);

/// Installs a fmt subscriber honoring `RUST_LOG`; safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Seasonal daily mean (°F) with a 9-day weather wiggle.
pub fn daily_temp(date: Date) -> f64 {
    let doy = date.ordinal() as f64;
    let d = (date - WEATHER_START).whole_days() as f64;
    58.0 + 22.0 * (TAU * (doy - 110.0) / 365.25).sin() + 5.0 * (TAU * d / 9.0).sin()
}

/// Two years of daily weather, 2012 and 2013.
pub fn weather() -> WeatherHistory {
    WeatherHistory::from_daily(
        "724945",
        (0..731).map(|d| {
            let date = WEATHER_START + Duration::days(d);
            (date, daily_temp(date))
        }),
    )
}

/// Smooth normal year (2015, 365 days).
pub fn normals() -> WeatherHistory {
    let start = date!(2015 - 01 - 01);
    WeatherHistory::from_daily(
        "normals",
        (0..365).map(|d| {
            let date = start + Duration::days(d);
            let doy = date.ordinal() as f64;
            (date, 58.0 + 22.0 * (TAU * (doy - 110.0) / 365.25).sin())
        }),
    )
}

/// Intervention window: baseline through 2012, reporting from February 2013.
pub fn periods() -> ProjectPeriods {
    ProjectPeriods::new(date!(2013 - 01 - 01), date!(2013 - 02 - 01))
}

/// Electricity use per day (kWh): `15 + 0.5·HDD60 + 1.2·CDD72`.
pub fn electricity_per_day(temp_f: f64) -> f64 {
    15.0 + 0.5 * (60.0 - temp_f).max(0.0) + 1.2 * (temp_f - 72.0).max(0.0)
}

/// Gas use per day (therms): `1.2 + 0.2·HDD65`.
pub fn gas_per_day(temp_f: f64) -> f64 {
    1.2 + 0.2 * (65.0 - temp_f).max(0.0)
}

/// Calendar-month records from `first` for `months` months.
///
/// Usage is `per_day` summed over each day's temperature, scaled by
/// `reporting_scale` for records in the reporting period.
pub fn monthly_history(
    fuel: FuelType,
    first: Date,
    months: usize,
    reporting_scale: f64,
    per_day: impl Fn(f64) -> f64,
) -> ConsumptionHistory {
    let periods = periods();
    let mut records = Vec::with_capacity(months);
    let mut start = first;
    for _ in 0..months {
        let end = next_month(start);
        let mut usage: f64 = (0..(end - start).whole_days())
            .map(|d| per_day(daily_temp(start + Duration::days(d))))
            .sum();
        if start >= periods.reporting_start {
            usage *= reporting_scale;
        }
        records.push(ConsumptionRecord::new(start, end, usage));
        start = end;
    }
    ConsumptionHistory::new(fuel, records)
}

fn next_month(date: Date) -> Date {
    let (year, month) = match date.month() {
        Month::December => (date.year() + 1, Month::January),
        m => (date.year(), m.next()),
    };
    Date::from_calendar_date(year, month, 1).expect("first of month")
}

/// Project "94087": both fuels halve their usage after the intervention.
pub fn example_project() -> Project {
    Project::new(
        "94087",
        vec![
            monthly_history(
                FuelType::Electricity,
                WEATHER_START,
                24,
                0.5,
                electricity_per_day,
            ),
            monthly_history(FuelType::NaturalGas, WEATHER_START, 24, 0.5, gas_per_day),
        ],
        weather(),
        periods(),
    )
}

/// Electricity-only variant of the example project.
pub fn electricity_only_project() -> Project {
    Project::new(
        "94087-elec",
        vec![monthly_history(
            FuelType::Electricity,
            WEATHER_START,
            24,
            0.5,
            electricity_per_day,
        )],
        weather(),
        periods(),
    )
}

/// Gas history starting November 2012: two baseline records only.
pub fn short_gas_project() -> Project {
    Project::new(
        "94087-short-gas",
        vec![
            monthly_history(
                FuelType::Electricity,
                WEATHER_START,
                24,
                0.5,
                electricity_per_day,
            ),
            monthly_history(
                FuelType::NaturalGas,
                date!(2012 - 11 - 01),
                14,
                0.5,
                gas_per_day,
            ),
        ],
        weather(),
        periods(),
    )
}

/// Gas history that never records any usage.
pub fn zero_gas_project() -> Project {
    Project::new(
        "94087-zero-gas",
        vec![
            monthly_history(
                FuelType::Electricity,
                WEATHER_START,
                24,
                0.5,
                electricity_per_day,
            ),
            monthly_history(FuelType::NaturalGas, WEATHER_START, 24, 1.0, |_| 0.0),
        ],
        weather(),
        periods(),
    )
}
