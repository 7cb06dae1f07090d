//! Formatting helpers used by generated `Debug` impls.

use std::fmt;

/// Longest string slot rendered verbatim in a message's debug output.
pub const MAX_REPR_CHARS: usize = 10_000;
/// Longest bytes slot rendered verbatim in a message's debug output.
pub const MAX_REPR_BYTES: usize = 100;

/// String slot wrapper: values beyond [`MAX_REPR_CHARS`] collapse to
/// `(N chars)`.
pub struct TruncatedStr<'a>(pub &'a str);

impl fmt::Debug for TruncatedStr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let chars = self.0.chars().count();
        if chars > MAX_REPR_CHARS {
            write!(f, "({chars} chars)")
        } else {
            fmt::Debug::fmt(self.0, f)
        }
    }
}

/// Bytes slot wrapper: values beyond [`MAX_REPR_BYTES`] collapse to
/// `(N bytes)`.
pub struct TruncatedBytes<'a>(pub &'a [u8]);

impl fmt::Debug for TruncatedBytes<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.len() > MAX_REPR_BYTES {
            write!(f, "({} bytes)", self.0.len())
        } else {
            f.write_str("b\"")?;
            for byte in self.0 {
                write!(f, "\\x{byte:02x}")?;
            }
            f.write_str("\"")
        }
    }
}
