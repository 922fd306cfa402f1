use crate::exit::{CliError, CliResult};

/// Parse hex digits into bytes.
///
/// Accepts `ff5501`, `ff 55 01`, `0xff,0x55,0x01` and any mix; separators
/// are whitespace, `,` and `:`.
pub fn parse_hex(input: &str) -> CliResult<Vec<u8>> {
    let digits: String = input
        .split(|c: char| c.is_whitespace() || c == ',' || c == ':')
        .map(|token| {
            token
                .strip_prefix("0x")
                .or_else(|| token.strip_prefix("0X"))
                .unwrap_or(token)
        })
        .collect();

    hex::decode(&digits)
        .map_err(|err| CliError::usage(format!("invalid hex {input:?}: {err}")))
}

/// Space-separated lowercase hex.
pub fn format_hex(bytes: &[u8]) -> String {
    let encoded = hex::encode(bytes);
    let mut out = String::with_capacity(bytes.len() * 3);
    for (i, pair) in encoded.as_bytes().chunks(2).enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.extend(pair.iter().map(|&b| char::from(b)));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exit::USAGE;

    #[test]
    fn parses_common_spellings() {
        let expected = vec![0xFF, 0x55, 0x01];
        assert_eq!(parse_hex("ff5501").unwrap(), expected);
        assert_eq!(parse_hex("FF 55 01").unwrap(), expected);
        assert_eq!(parse_hex("0xff,0x55,0x01").unwrap(), expected);
        assert_eq!(parse_hex("ff:55:01").unwrap(), expected);
        assert!(parse_hex("").unwrap().is_empty());
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(parse_hex("f").is_err());
        assert!(parse_hex("zz").is_err());
        assert!(parse_hex("ff 5").is_err());
        assert!(parse_hex("+f").is_err());
    }

    #[test]
    fn malformed_input_is_a_usage_error_naming_the_cause() {
        let err = parse_hex("ff 5").unwrap_err();
        assert_eq!(err.code, USAGE);
        assert!(err.message.contains("Odd number of digits"), "{}", err.message);

        let err = parse_hex("zz").unwrap_err();
        assert!(err.message.contains("Invalid character"), "{}", err.message);
    }

    #[test]
    fn formats_wire_bytes() {
        assert_eq!(
            format_hex(&[0xFF, 0x55, 0x01, 0x41, 0x0D, 0x0A]),
            "ff 55 01 41 0d 0a"
        );
        assert_eq!(format_hex(&[]), "");
    }
}
