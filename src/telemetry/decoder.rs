use tracing::debug;

use super::DecodedFrame;
use crate::vitals::Vital;

/// Decode one telemetry line such as `TEMP:36.9,HR:132,SPO2:98`.
///
/// Pairs that don't split into a non-empty key and value, whose value is not
/// a finite number, or whose key is unknown are skipped.
pub fn decode_frame(line: &str) -> DecodedFrame {
    let mut frame = DecodedFrame::new();

    for pair in line.trim().split(',') {
        if let Some((vital, value)) = decode_pair(pair) {
            frame.push(vital, value);
        }
    }

    frame
}

/// Decode a raw line as received from the transport. Invalid UTF-8 is
/// replaced, so only the affected pairs are lost.
pub fn decode_bytes(line: &[u8]) -> DecodedFrame {
    decode_frame(&String::from_utf8_lossy(line))
}

fn decode_pair(pair: &str) -> Option<(Vital, f64)> {
    let Some((key, value)) = pair.split_once(':') else {
        debug!(pair, "Skipping telemetry pair without separator");
        return None;
    };

    let (key, value) = (key.trim(), value.trim());
    if key.is_empty() || value.is_empty() {
        debug!(pair, "Skipping telemetry pair with empty key or value");
        return None;
    }

    let Some(vital) = Vital::from_key(key) else {
        debug!(key, "Ignoring unknown telemetry key");
        return None;
    };

    match value.parse::<f64>() {
        Ok(parsed) if parsed.is_finite() => Some((vital, parsed)),
        _ => {
            debug!(key, value, "Skipping unparsable telemetry value");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_full_frame() {
        let frame = decode_frame("TEMP:36.9,HR:132,SPO2:98,BPSYS:72,BPDIA:44");
        assert_eq!(
            frame.fields(),
            &[
                (Vital::Temperature, 36.9),
                (Vital::HeartRate, 132.0),
                (Vital::Spo2, 98.0),
                (Vital::Systolic, 72.0),
                (Vital::Diastolic, 44.0),
            ]
        );
    }

    #[test]
    fn test_partial_frame() {
        let frame = decode_frame("TEMP:37.2");
        assert_eq!(frame.fields(), &[(Vital::Temperature, 37.2)]);
    }

    #[test]
    fn test_keys_are_case_insensitive() {
        let frame = decode_frame("temp:36.8,Hr:120,spo2:97");
        assert_eq!(frame.get(Vital::Temperature), Some(36.8));
        assert_eq!(frame.get(Vital::HeartRate), Some(120.0));
        assert_eq!(frame.get(Vital::Spo2), Some(97.0));
    }

    #[test]
    fn test_non_numeric_value_is_skipped() {
        assert!(decode_frame("TEMP:abc").is_empty());
    }

    #[test]
    fn test_unknown_key_is_skipped() {
        let frame = decode_frame("FOO:1,HR:140");
        assert_eq!(frame.fields(), &[(Vital::HeartRate, 140.0)]);
    }

    #[test]
    fn test_malformed_pairs_do_not_abort_frame() {
        let frame = decode_frame("TEMP,:5,HR:,SPO2:96,BPSYS:1:2,,BPDIA:40");
        assert_eq!(frame.fields(), &[(Vital::Spo2, 96.0), (Vital::Diastolic, 40.0)]);
    }

    #[test]
    fn test_non_finite_values_are_skipped() {
        let frame = decode_frame("TEMP:NaN,HR:inf,SPO2:-infinity,BPSYS:75");
        assert_eq!(frame.fields(), &[(Vital::Systolic, 75.0)]);
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        let frame = decode_frame("  TEMP: 36.7 , HR :128\r\n");
        assert_eq!(frame.fields(), &[(Vital::Temperature, 36.7), (Vital::HeartRate, 128.0)]);
    }

    #[test]
    fn test_duplicate_keys_keep_order() {
        let frame = decode_frame("HR:120,HR:125");
        assert_eq!(frame.len(), 2);
        assert_eq!(frame.get(Vital::HeartRate), Some(125.0));
    }

    #[test]
    fn test_invalid_utf8_only_drops_affected_pair() {
        let frame = decode_bytes(b"HR:\xff140,SPO2:96");
        assert_eq!(frame.fields(), &[(Vital::Spo2, 96.0)]);

        let frame = decode_bytes(b"\xfe\xff:1,TEMP:36.6\n");
        assert_eq!(frame.fields(), &[(Vital::Temperature, 36.6)]);
    }

    #[test]
    fn test_empty_line() {
        assert!(decode_frame("").is_empty());
        assert!(decode_frame("   ").is_empty());
    }
}
