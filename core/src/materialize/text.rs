use crate::telemetry::TelemetryCounters;

/// Decode UTF-8, replacing invalid sequences with U+FFFD.
///
/// Valid input is adopted without a second copy.
pub(crate) fn decode_lossy(buf: Vec<u8>, counters: &mut TelemetryCounters) -> String {
    counters.texts_decoded += 1;
    match String::from_utf8(buf) {
        Ok(text) => text,
        Err(e) => {
            counters.lossy_decodes += 1;
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_utf8_passes_through() {
        let mut c = TelemetryCounters::default();
        assert_eq!(decode_lossy("héllo".as_bytes().to_vec(), &mut c), "héllo");
        assert_eq!(c.lossy_decodes, 0);
    }

    #[test]
    fn invalid_sequences_are_replaced() {
        let mut c = TelemetryCounters::default();
        let text = decode_lossy(vec![b'a', 0xff, b'b', 0xe2, 0x82], &mut c);
        assert_eq!(text, "a\u{FFFD}b\u{FFFD}");
        assert_eq!(c.lossy_decodes, 1);
    }
}
