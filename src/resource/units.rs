//! Human-readable sizes and frequencies.

const SI_BYTES: &[&str] = &["B", "kB", "MB", "GB", "TB", "PB", "EB"];
const BINARY_BYTES: &[&str] = &["B", "KiB", "MiB", "GiB", "TiB", "PiB", "EiB"];
const FREQUENCY: &[&str] = &["Hz", "kHz", "MHz", "GHz", "THz", "PHz", "EHz"];

/// "1500" => "1.5 kB".
pub fn bytes_si(bytes: u64) -> String {
    scaled(bytes, 1000, SI_BYTES)
}

/// "1500" => "1.46 KiB".
pub fn bytes_binary(bytes: u64) -> String {
    scaled(bytes, 1024, BINARY_BYTES)
}

/// "1800000000" => "1.8 GHz".
pub fn frequency(hz: u64) -> String {
    scaled(hz, 1000, FREQUENCY)
}

/// Pick the largest unit the value reaches and format with at most two decimals.
fn scaled(value: u64, base: u64, units: &[&str]) -> String {
    let mut divider = 1u64;
    let mut unit = units[0];
    for name in &units[1..] {
        match divider.checked_mul(base) {
            Some(next) if value >= next => {
                divider = next;
                unit = name;
            }
            _ => break,
        }
    }
    format!("{} {}", two_decimals(value as f64 / divider as f64), unit)
}

/// Format like "#.##": up to two decimals, no trailing zeros.
pub fn two_decimals(v: f64) -> String {
    let s = format!("{:.2}", v);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_string() } else { s.to_string() }
}
