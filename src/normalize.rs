//! ASCII normalization of internationalized rules.
//!
//! PSL rules are published in Unicode (`рф`, `公司.cn`). Hostnames usually
//! arrive in their ASCII-compatible form (`xn--p1ai`), so every non-ASCII
//! rule is stored twice: once as written and once normalized.

use crate::error::NormalizeError;

/// Converts a Unicode domain string to its ASCII (punycode) form.
pub trait AsciiNormalizer: Send + Sync {
    /// Convert `input` to ASCII.
    fn to_ascii(&self, input: &str) -> Result<String, NormalizeError>;
}

impl<F> AsciiNormalizer for F
where
    F: Fn(&str) -> Result<String, NormalizeError> + Send + Sync,
{
    fn to_ascii(&self, input: &str) -> Result<String, NormalizeError> {
        self(input)
    }
}

/// UTS #46 normalizer backed by the `idna` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct Idna;

impl AsciiNormalizer for Idna {
    fn to_ascii(&self, input: &str) -> Result<String, NormalizeError> {
        idna::domain_to_ascii(input).map_err(|e| NormalizeError::Idna(format!("{:?}", e)))
    }
}

/// Convert raw rule bytes, rejecting invalid UTF-8.
pub(crate) fn to_ascii_bytes(
    normalizer: &dyn AsciiNormalizer,
    rule: &[u8],
) -> Result<String, NormalizeError> {
    let text = std::str::from_utf8(rule).map_err(|_| NormalizeError::InvalidUtf8)?;
    normalizer.to_ascii(text)
}
