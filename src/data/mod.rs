//! Project, consumption, and weather value objects consumed by the core.

pub mod consumption;
pub mod project;
pub mod types;
/// Temperature history and daily aggregation.
pub mod weather;

pub use consumption::{ConsumptionHistory, ConsumptionRecord};
pub use project::{Project, ProjectPeriods};
pub use types::{FuelType, Period, UsageUnit};
pub use weather::{DailyTemperatures, TemperatureSample, WeatherHistory};
