// Pure metric calculators: CPU %, network rate, unit conversion and humanised strings.

mod format;
mod stats;

pub use format::{format_duration, human_file_size, relative_time, relative_time_from_unix, truncate_id};
pub use stats::{
    NetworkRate, NetworkSample, cpu_percent, cpu_percent_from_stats, network_rate,
    network_rate_from_stats,
};

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Bytes to MiB, 1 decimal.
pub fn bytes_to_mb(bytes: u64) -> f64 {
    round_to(bytes as f64 / 1024.0 / 1024.0, 1)
}

/// Bytes to GiB, 2 decimals.
pub fn bytes_to_gb(bytes: u64) -> f64 {
    round_to(bytes as f64 / 1024.0 / 1024.0 / 1024.0, 2)
}
