//! Degree-day arithmetic on daily mean temperatures (°F).

/// Heating degree days for one day: `max(0, base − T)`.
pub fn heating_degree_days(temp_f: f64, base_f: f64) -> f64 {
    (base_f - temp_f).max(0.0)
}

/// Cooling degree days for one day: `max(0, T − base)`.
pub fn cooling_degree_days(temp_f: f64, base_f: f64) -> f64 {
    (temp_f - base_f).max(0.0)
}

/// Average heating degree days per day over `temps`; `0.0` when empty.
pub fn mean_hdd(temps: &[f64], base_f: f64) -> f64 {
    mean(temps.iter().map(|&t| heating_degree_days(t, base_f)), temps.len())
}

/// Average cooling degree days per day over `temps`; `0.0` when empty.
pub fn mean_cdd(temps: &[f64], base_f: f64) -> f64 {
    mean(temps.iter().map(|&t| cooling_degree_days(t, base_f)), temps.len())
}

fn mean(values: impl Iterator<Item = f64>, n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    values.sum::<f64>() / n as f64
}

/// Evenly spaced candidate base temperatures from `min_f` to `max_f` inclusive.
///
/// Each candidate is computed as `min_f + i * step_f` so the grid is
/// identical across runs. Returns an empty grid for a non-positive step.
pub fn candidate_bases(min_f: f64, max_f: f64, step_f: f64) -> Vec<f64> {
    if !(step_f > 0.0) || min_f > max_f {
        return Vec::new();
    }
    let n = ((max_f - min_f) / step_f + 1e-9).floor() as usize;
    (0..=n).map(|i| min_f + i as f64 * step_f).collect()
}
