use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Address of the peer on a serial link.
///
/// A serial line has exactly one peer, so the address carries no
/// information: every value is equal, it renders as the empty string, and
/// any string parses to it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SerialAddress;

impl fmt::Display for SerialAddress {
    fn fmt(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Ok(())
    }
}

impl FromStr for SerialAddress {
    type Err = Infallible;

    fn from_str(_s: &str) -> Result<Self, Self::Err> {
        Ok(SerialAddress)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_empty() {
        assert_eq!(SerialAddress.to_string(), "");
    }

    #[test]
    fn any_string_parses() {
        assert_eq!("".parse::<SerialAddress>(), Ok(SerialAddress));
        assert_eq!(
            "239.255.0.1:7447".parse::<SerialAddress>(),
            Ok(SerialAddress)
        );
    }

    #[test]
    fn all_addresses_equal() {
        assert_eq!(SerialAddress, SerialAddress::default());
    }
}
