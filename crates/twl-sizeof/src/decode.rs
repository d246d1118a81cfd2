//! Type-map section decode.
//!
//! The record layout must match the probe's packed C struct byte for
//! byte: a NUL-padded name field of `name_width` bytes, a 1-byte `[` tag,
//! a 4-byte little-endian unsigned length, a 1-byte `]` tag. The probe is
//! compiled for a little-endian target with no inter-field padding.

/// Decode all records from the raw section bytes.
///
/// Decoding stops at the empty-name terminator record or when the
/// remaining bytes cannot hold a full record.
#[must_use]
pub fn decode_type_map(data: &[u8], name_width: usize) -> Vec<(String, u32)> {
    let record_size = name_width + 6;
    let mut decoded = Vec::new();
    let mut offset = 0;

    while offset + record_size <= data.len() {
        let name_field = &data[offset..offset + name_width];
        let end = name_field
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(name_width);
        if end == 0 {
            break;
        }
        let name: String = name_field[..end].iter().map(|&b| b as char).collect();

        // Skip the '[' tag, read the length, skip the ']' tag.
        let len_at = offset + name_width + 1;
        let size = u32::from_le_bytes([
            data[len_at],
            data[len_at + 1],
            data[len_at + 2],
            data[len_at + 3],
        ]);

        decoded.push((name, size));
        offset += record_size;
    }

    decoded
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, size: u32, width: usize) -> Vec<u8> {
        let mut r = vec![0u8; width];
        r[..name.len()].copy_from_slice(name.as_bytes());
        r.push(b'[');
        r.extend_from_slice(&size.to_le_bytes());
        r.push(b']');
        r
    }

    #[test]
    fn test_decode_records() {
        let width = 7;
        let mut data = Vec::new();
        data.extend(record("int", 4, width));
        data.extend(record("double", 8, width));
        data.extend(record("", 0, width));

        let decoded = decode_type_map(&data, width);
        assert_eq!(
            decoded,
            vec![("int".to_string(), 4), ("double".to_string(), 8)]
        );
    }

    #[test]
    fn test_decode_stops_at_sentinel() {
        let width = 5;
        let mut data = Vec::new();
        data.extend(record("int", 4, width));
        data.extend(record("", 0, width));
        data.extend(record("char", 1, width));

        let decoded = decode_type_map(&data, width);
        assert_eq!(decoded, vec![("int".to_string(), 4)]);
    }

    #[test]
    fn test_decode_truncated_section() {
        let width = 5;
        let mut data = record("int", 4, width);
        data.extend(record("char", 1, width));
        data.truncate(data.len() - 3);

        let decoded = decode_type_map(&data, width);
        assert_eq!(decoded, vec![("int".to_string(), 4)]);
    }

    #[test]
    fn test_decode_little_endian_length() {
        let width = 3;
        let mut data = vec![b'x', 0, 0];
        data.push(b'[');
        data.extend_from_slice(&[0x01, 0x02, 0x00, 0x00]);
        data.push(b']');

        let decoded = decode_type_map(&data, width);
        assert_eq!(decoded, vec![("x".to_string(), 0x0201)]);
    }

    #[test]
    fn test_decode_empty_section() {
        assert!(decode_type_map(&[], 8).is_empty());
    }
}
