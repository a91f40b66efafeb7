//! Human-readable rate formatting. Pure functions, no I/O, so both the
//! terminal renderer and tests can exercise them directly.

const BYTE_UNITS: [&str; 5] = ["B", "K", "M", "G", "T"];
const PACKET_UNITS: [&str; 5] = ["", "K", "M", "G", "T"];

/// Format a byte rate scaling by 1024 per step: `B, K, M, G, T`.
pub fn format_byte_rate(bytes_per_sec: f64) -> String {
    scale(bytes_per_sec, 1024.0, &BYTE_UNITS)
}

/// Format a packet rate scaling by 1000 per step: `"", K, M, G, T`.
pub fn format_packet_rate(packets_per_sec: f64) -> String {
    scale(packets_per_sec, 1000.0, &PACKET_UNITS)
}

fn scale(value: f64, step: f64, units: &[&str; 5]) -> String {
    let mut size = value;
    let mut unit_index = 0;
    while size >= step && unit_index < units.len() - 1 {
        size /= step;
        unit_index += 1;
    }
    format!("{:.1}{}", size, units[unit_index])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_rate_stays_in_bytes_below_1024() {
        assert_eq!(format_byte_rate(0.0), "0.0B");
        assert_eq!(format_byte_rate(512.0), "512.0B");
    }

    #[test]
    fn byte_rate_scales_through_units() {
        assert_eq!(format_byte_rate(1024.0), "1.0K");
        assert_eq!(format_byte_rate(1536.0), "1.5K");
        assert_eq!(format_byte_rate(1024.0 * 1024.0), "1.0M");
        assert_eq!(format_byte_rate(1024.0f64.powi(4)), "1.0T");
    }

    #[test]
    fn byte_rate_caps_at_terabytes() {
        assert_eq!(format_byte_rate(1024.0f64.powi(6)), "1048576.0T");
    }

    #[test]
    fn packet_rate_stays_bare_below_1000() {
        assert_eq!(format_packet_rate(0.0), "0.0");
        assert_eq!(format_packet_rate(999.0), "999.0");
    }

    #[test]
    fn packet_rate_scales_through_units() {
        assert_eq!(format_packet_rate(1000.0), "1.0K");
        assert_eq!(format_packet_rate(2_500_000.0), "2.5M");
    }
}
