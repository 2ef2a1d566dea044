#![forbid(unsafe_code)]

//! Empty-element expansion.
//!
//! A single left-to-right scan that rewrites `<Tag .../>` as
//! `<Tag ...></Tag>` and passes every other byte through. The output is
//! streamed to a writer (normally a digest) in chunks; no second copy of the
//! input is built.
//!
//! Name capture starts at `<` and stops at the first space, `/` or `>`.
//! Stopping at `>` means an ordinary open or close tag, and the captured
//! name is dropped. A later `/>` with a captured name emits `></` plus the
//! name in place of the `/`; the `>` then passes through as usual.

use permart_core::Error;
use std::io::Write;

/// Longest tag name the canonicalizer accepts. The schema's longest name is
/// `CanonicalizationMethod`.
pub const MAX_TAG_NAME: usize = 64;

/// Scan state for one canonicalization pass.
#[derive(Debug, Default)]
struct Cursor {
    /// Bare name of the element whose start tag is open, if any.
    name: Vec<u8>,
}

impl Cursor {
    fn capture(&mut self, input: &[u8], start: usize) -> Result<usize, Error> {
        self.name.clear();
        let mut pos = start;
        while pos < input.len() {
            match input[pos] {
                b' ' | b'/' => return Ok(pos),
                b'>' => {
                    self.name.clear();
                    return Ok(pos);
                }
                b => {
                    if self.name.len() == MAX_TAG_NAME {
                        return Err(Error::ParseFailed(format!(
                            "tag name at offset {} exceeds {MAX_TAG_NAME} bytes",
                            start - 1
                        )));
                    }
                    self.name.push(b);
                }
            }
            pos += 1;
        }
        Ok(pos)
    }
}

/// Canonicalize `input` into `out`, returning the number of bytes written.
///
/// `input` must be exactly the range the caller wants digested; the scan
/// never looks past its end.
pub fn canonicalize<W: Write + ?Sized>(input: &[u8], out: &mut W) -> Result<usize, Error> {
    let mut cursor = Cursor::default();
    let mut written = 0;
    // Start of the pending passthrough run.
    let mut run = 0;
    let mut pos = 0;

    while pos < input.len() {
        match input[pos] {
            b'<' => {
                pos = cursor.capture(input, pos + 1)?;
            }
            b'/' if !cursor.name.is_empty() && input.get(pos + 1) == Some(&b'>') => {
                written += emit(out, &input[run..pos])?;
                written += emit(out, b"></")?;
                written += emit(out, &cursor.name)?;
                cursor.name.clear();
                pos += 1;
                run = pos;
            }
            _ => pos += 1,
        }
    }
    written += emit(out, &input[run..])?;
    Ok(written)
}

fn emit<W: Write + ?Sized>(out: &mut W, bytes: &[u8]) -> Result<usize, Error> {
    out.write_all(bytes)?;
    Ok(bytes.len())
}
