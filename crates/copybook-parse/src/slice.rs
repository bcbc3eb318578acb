//! Fixed-width field extraction.

/// Extract a fixed-width slice of exactly `length` characters.
///
/// Positions are byte offsets; input is assumed to be single-byte or
/// UTF-8 text whose column positions equal code-unit offsets. A start
/// past the end of the line yields all spaces, and a line shorter than
/// `start + length` is right-padded with spaces, so downstream parsers
/// can assume every slice has its declared width.
pub fn slice(line: &str, start: usize, length: usize) -> String {
    if length == 0 {
        return String::new();
    }
    let bytes = line.as_bytes();
    if start >= bytes.len() {
        return " ".repeat(length);
    }
    let end = (start + length).min(bytes.len());
    let mut out = String::from_utf8_lossy(&bytes[start..end]).into_owned();
    // Pad in characters, not bytes, so lossy replacement cannot shrink
    // the declared width.
    let have = out.chars().count();
    if have < length {
        out.extend(std::iter::repeat(' ').take(length - have));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_within_line() {
        assert_eq!(slice("ABCDEFGH", 2, 3), "CDE");
    }

    #[test]
    fn test_slice_pads_short_line() {
        assert_eq!(slice("ABC", 1, 5), "BC   ");
    }

    #[test]
    fn test_slice_past_end_is_all_spaces() {
        assert_eq!(slice("ABC", 10, 4), "    ");
        assert_eq!(slice("", 0, 3), "   ");
    }

    #[test]
    fn test_slice_zero_length_is_empty() {
        assert_eq!(slice("ABC", 1, 0), "");
    }

    #[test]
    fn test_slice_width_invariant() {
        // Width is always exactly the declared length.
        for start in 0..12 {
            for length in 0..12 {
                assert_eq!(slice("SHORT", start, length).chars().count(), length);
            }
        }
    }
}
