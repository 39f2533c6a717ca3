//! Converting octet sequences into hex strings.

use std::fmt;


/// Displays an octet sequence as upper case hex digits.
///
/// If `sep` is given, it is placed between each pair of digits.
#[derive(Clone, Copy, Debug)]
pub struct Hex<'a> {
    octets: &'a [u8],
    sep: Option<char>,
}

impl<'a> Hex<'a> {
    pub fn new(octets: &'a [u8]) -> Self {
        Hex { octets, sep: None }
    }

    pub fn with_separator(octets: &'a [u8], sep: char) -> Self {
        Hex { octets, sep: Some(sep) }
    }
}

impl fmt::Display for Hex<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut first = true;
        for &ch in self.octets {
            if !first {
                if let Some(sep) = self.sep {
                    write!(f, "{}", sep)?;
                }
            }
            first = false;
            let [hi, lo] = encode_u8(ch);
            write!(f, "{}{}", char::from(hi), char::from(lo))?;
        }
        Ok(())
    }
}


/// Encodes an octet sequence as a hex string.
pub fn encode(src: &[u8]) -> String {
    Hex::new(src).to_string()
}

pub fn encode_u8(ch: u8) -> [u8; 2] {
    [DIGITS[usize::from(ch >> 4)], DIGITS[usize::from(ch & 0x0F)]]
}

const DIGITS: &[u8] = b"0123456789ABCDEF";


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(encode(b"\x00\x1a\xff"), "001AFF");
        assert_eq!(
            Hex::with_separator(b"\x0c\xff\xee", ':').to_string(),
            "0C:FF:EE"
        );
        assert_eq!(encode(b""), "");
    }
}
