/// Formats bytes as uppercase hexadecimal pairs separated by spaces.
pub(crate) fn format_hex(bytes: &[u8]) -> String {
    if bytes.is_empty() {
        return "<empty>".to_string();
    }

    let encoded = hex::encode_upper(bytes);
    let mut rendered = String::with_capacity(bytes.len().saturating_mul(3));
    for (index, pair) in encoded.as_bytes().chunks(2).enumerate() {
        if index > 0 {
            rendered.push(' ');
        }
        rendered.extend(pair.iter().map(|&digit| char::from(digit)));
    }
    rendered
}

/// Parses a hexadecimal byte string, ignoring spaces between pairs.
pub(crate) fn parse_hex(value: &str) -> Result<Vec<u8>, hex::FromHexError> {
    let compact: String = value.chars().filter(|character| !character.is_whitespace()).collect();
    hex::decode(compact)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn format_hex_handles_empty_payload() {
        assert_eq!("<empty>", format_hex(&[]));
    }

    #[test]
    fn format_hex_formats_uppercase_pairs() {
        assert_eq!("A5 68 AA 0E AE", format_hex(&[0xA5, 0x68, 0xAA, 0x0E, 0xAE]));
    }

    #[test]
    fn parse_hex_accepts_spaced_pairs() {
        assert_eq!(Ok(vec![0x01, 0xAA, 0xFF]), parse_hex("01 aa FF"));
        assert!(parse_hex("0").is_err());
    }
}
