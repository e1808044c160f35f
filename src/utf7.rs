//! UTF-7 codec (RFC 2152)
//!
//! Characters from Set D and whitespace are written directly. `+` is
//! written as `+-`. Everything else goes into a shifted sequence
//! `+<base64 of UTF-16BE>-`.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;

/// Unpadded standard alphabet; shifted sequences may end on partial bits
const UTF7_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_allow_trailing_bits(true)
        .with_decode_padding_mode(DecodePaddingMode::RequireNone),
);

const SHIFT_IN: u8 = b'+';
const SHIFT_OUT: u8 = b'-';

fn is_direct(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || "'(),-./:? \t\r\n".contains(ch)
}

fn is_base64_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'+' || b == b'/'
}

/// Encode `text` as UTF-7, appending to `out`
pub fn encode_into(text: &str, out: &mut Vec<u8>) {
    let mut pending: Vec<u16> = Vec::new();

    for ch in text.chars() {
        if is_direct(ch) {
            flush_shifted(&mut pending, out);
            out.push(ch as u8);
        } else if ch == '+' {
            flush_shifted(&mut pending, out);
            out.extend_from_slice(b"+-");
        } else {
            let mut units = [0u16; 2];
            pending.extend_from_slice(ch.encode_utf16(&mut units));
        }
    }

    flush_shifted(&mut pending, out);
}

fn flush_shifted(pending: &mut Vec<u16>, out: &mut Vec<u8>) {
    if pending.is_empty() {
        return;
    }

    let bytes: Vec<u8> = pending.iter().flat_map(|unit| unit.to_be_bytes()).collect();
    out.push(SHIFT_IN);
    out.extend_from_slice(UTF7_BASE64.encode(&bytes).as_bytes());
    // Always terminate explicitly so the next direct byte is never taken as base64
    out.push(SHIFT_OUT);
    pending.clear();
}

/// Incremental UTF-7 decoder
///
/// Input may be fed in arbitrary slices; a shifted sequence split across
/// two calls is buffered until its terminator arrives.
#[derive(Debug, Default)]
pub struct Utf7Decoder {
    shifted: bool,
    just_shifted: bool,
    segment: Vec<u8>,
}

impl Utf7Decoder {
    /// Create a decoder in the direct (unshifted) state
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode `bytes`, appending complete characters to `out`
    pub fn decode(&mut self, bytes: &[u8], out: &mut String) {
        for &b in bytes {
            if self.shifted {
                if is_base64_byte(b) {
                    self.segment.push(b);
                    self.just_shifted = false;
                    continue;
                }

                let literal_plus = self.just_shifted && b == SHIFT_OUT;
                self.shifted = false;
                self.just_shifted = false;

                if literal_plus {
                    out.push('+');
                    continue;
                }

                self.flush_segment(out);
                if b == SHIFT_OUT {
                    continue;
                }
            }

            if b == SHIFT_IN {
                self.shifted = true;
                self.just_shifted = true;
            } else if b.is_ascii() {
                out.push(b as char);
            } else {
                out.push(char::REPLACEMENT_CHARACTER);
            }
        }
    }

    /// Flush any shifted sequence left open at end of input
    pub fn finish(&mut self, out: &mut String) {
        if self.shifted {
            self.flush_segment(out);
        }
        self.shifted = false;
        self.just_shifted = false;
    }

    fn flush_segment(&mut self, out: &mut String) {
        if self.segment.is_empty() {
            return;
        }

        match UTF7_BASE64.decode(&self.segment) {
            Ok(bytes) => {
                // An odd trailing byte is leftover padding bits
                let units = bytes
                    .chunks_exact(2)
                    .map(|pair| u16::from_be_bytes([pair[0], pair[1]]));
                out.extend(
                    char::decode_utf16(units).map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER)),
                );
            }
            Err(_) => out.push(char::REPLACEMENT_CHARACTER),
        }

        self.segment.clear();
    }
}
