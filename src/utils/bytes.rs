const UNIT: f64 = 1024.0;
const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// Formats a byte count as a human-readable magnitude, base 1024.
///
/// Zero is the literal `"0 Bytes"`. Anything else is scaled to the largest
/// unit up to GB and printed with two decimals. `u64` rules out negative input.
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= UNIT && unit < UNITS.len() - 1 {
        value /= UNIT;
        unit += 1;
    }

    format!("{:.2} {}", value, UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero() {
        assert_eq!(format_bytes(0), "0 Bytes");
    }

    #[test]
    fn test_unit_boundaries() {
        assert_eq!(format_bytes(1), "1.00 Bytes");
        assert_eq!(format_bytes(1023), "1023.00 Bytes");
        assert_eq!(format_bytes(1024), "1.00 KB");
        assert_eq!(format_bytes(1536), "1.50 KB");
        assert_eq!(format_bytes(1024 * 1024), "1.00 MB");
        assert_eq!(format_bytes(5 * 1024 * 1024 * 1024), "5.00 GB");
    }

    #[test]
    fn test_gb_is_the_largest_unit() {
        assert_eq!(format_bytes(2048 * 1024 * 1024 * 1024), "2048.00 GB");
    }
}
