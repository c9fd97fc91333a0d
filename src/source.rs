//! Public Suffix List text scanner.
//!
//! Turns raw list text into rule lines tagged with the section they were
//! declared in. Everything between the ICANN markers is ICANN, everything
//! else is private:
//!
//! ```text
//! // ===BEGIN ICANN DOMAINS===
//! com
//! *.ck
//! !www.ck
//! // ===END ICANN DOMAINS===
//! // ===BEGIN PRIVATE DOMAINS===
//! blogspot.com
//! ```

use std::io::{self, BufRead};

/// Line opening the ICANN section.
pub const BEGIN_ICANN: &[u8] = b"// ===BEGIN ICANN DOMAINS===";

/// Line closing the ICANN section.
pub const END_ICANN: &[u8] = b"// ===END ICANN DOMAINS===";

/// A rule line ready for ingestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleLine {
    /// Rule text, markers (`*.`, `!`) still attached
    pub text: Vec<u8>,
    /// Declared inside the ICANN section
    pub icann: bool,
}

/// Iterator over the rule lines of a list.
pub struct RuleLines<R> {
    reader: R,
    icann: bool,
    buf: Vec<u8>,
}

impl<R: BufRead> RuleLines<R> {
    /// Scan `reader`, starting outside the ICANN section.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            icann: false,
            buf: Vec::new(),
        }
    }
}

impl<R: BufRead> Iterator for RuleLines<R> {
    type Item = io::Result<RuleLine>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            match self.reader.read_until(b'\n', &mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => return Some(Err(e)),
            }

            let line = trim(&self.buf);
            if line == BEGIN_ICANN {
                self.icann = true;
                continue;
            }
            if line == END_ICANN {
                self.icann = false;
                continue;
            }
            if must_skip(line) {
                continue;
            }

            // A rule ends at the first whitespace.
            let end = line
                .iter()
                .position(|b| b.is_ascii_whitespace())
                .unwrap_or(line.len());
            return Some(Ok(RuleLine {
                text: line[..end].to_vec(),
                icann: self.icann,
            }));
        }
    }
}

fn trim(line: &[u8]) -> &[u8] {
    let start = line
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(line.len());
    let end = line
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(start, |i| i + 1);
    &line[start..end]
}

/// Blank and comment lines carry no rule.
fn must_skip(line: &[u8]) -> bool {
    matches!(line.first(), None | Some(b'/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(text: &str) -> Vec<(String, bool)> {
        RuleLines::new(text.as_bytes())
            .map(|line| {
                let line = line.unwrap();
                (String::from_utf8(line.text).unwrap(), line.icann)
            })
            .collect()
    }

    #[test]
    fn test_sections() {
        let text = "\
// leading comment
before
// ===BEGIN ICANN DOMAINS===
com
  *.ck
!www.ck
// ===END ICANN DOMAINS===
// ===BEGIN PRIVATE DOMAINS===
dyndns.org
";
        assert_eq!(
            scan(text),
            vec![
                ("before".to_string(), false),
                ("com".to_string(), true),
                ("*.ck".to_string(), true),
                ("!www.ck".to_string(), true),
                ("dyndns.org".to_string(), false),
            ]
        );
    }

    #[test]
    fn test_whitespace_and_crlf() {
        let text = "// ===BEGIN ICANN DOMAINS===\r\n\t co.uk  trailing words\r\n\r\n   \nuk\r\n";
        assert_eq!(
            scan(text),
            vec![("co.uk".to_string(), true), ("uk".to_string(), true)]
        );
    }

    #[test]
    fn test_indented_marker() {
        let text = "   // ===BEGIN ICANN DOMAINS===\njp\n  // ===END ICANN DOMAINS===\nfoo.jp\n";
        assert_eq!(
            scan(text),
            vec![("jp".to_string(), true), ("foo.jp".to_string(), false)]
        );
    }

    #[test]
    fn test_non_utf8_passthrough() {
        let text: &[u8] = b"ok\n\xff\xfe.bad\n";
        let lines: Vec<RuleLine> = RuleLines::new(text).map(Result::unwrap).collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].text, b"\xff\xfe.bad".to_vec());
    }

    #[test]
    fn test_no_trailing_newline() {
        assert_eq!(
            scan("com\norg"),
            vec![("com".to_string(), false), ("org".to_string(), false)]
        );
    }
}
