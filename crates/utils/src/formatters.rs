// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use core::fmt;

// Custom formatter function for hex display
pub fn hexf(data: &[u8], f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{}", truncate(::hex::encode(data)))
}

/// Wraps a byte slice so it can be passed to tracing fields and `{:?}` without dumping
/// megabytes of ciphertext into the logs
pub struct Hexf<'a>(pub &'a [u8]);

impl fmt::Debug for Hexf<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        hexf(self.0, f)
    }
}

impl fmt::Display for Hexf<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        hexf(self.0, f)
    }
}

/// truncate a string
fn truncate(s: String) -> String {
    let threshold = 100;
    let limit = 50;
    let cutoff = limit / 2;
    if s.len() <= threshold {
        format!("0x{}", s)
    } else {
        let start = &s[..cutoff];
        let end = &s[s.len() - (limit - cutoff)..];
        format!("<bytes({}):0x{}..{}>", s.len() / 2, start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::Hexf;

    #[test]
    fn short_values_are_printed_in_full() {
        assert_eq!(format!("{}", Hexf(&[0xde, 0xad])), "0xdead");
    }

    #[test]
    fn long_values_are_truncated() {
        let data = vec![0xab; 200];
        let out = format!("{:?}", Hexf(&data));
        assert!(out.starts_with("<bytes(200):0xabab"));
        assert!(out.len() < 80);
    }
}
