//! Text encodings understood by the splitter

use std::fmt;
use std::str::FromStr;

use encoding_rs::{CoderResult, UTF_16BE, UTF_16LE, UTF_8};

use crate::error::SplitError;
use crate::utf7::{self, Utf7Decoder};

/// A named text encoding
///
/// The names follow the classic framework set: `Default` is the platform
/// encoding (UTF-8 without signature), `Unicode` is UTF-16 little-endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextEncoding {
    Default,
    Ascii,
    Utf7,
    Utf8,
    Unicode,
    Utf32,
    BigEndianUnicode,
}

impl TextEncoding {
    /// Every encoding, in the order they are listed to users
    pub const ALL: [TextEncoding; 7] = [
        TextEncoding::Default,
        TextEncoding::Ascii,
        TextEncoding::Utf7,
        TextEncoding::Utf8,
        TextEncoding::Unicode,
        TextEncoding::Utf32,
        TextEncoding::BigEndianUnicode,
    ];

    /// Canonical display name
    pub fn name(self) -> &'static str {
        match self {
            TextEncoding::Default => "Default",
            TextEncoding::Ascii => "ASCII",
            TextEncoding::Utf7 => "UTF7",
            TextEncoding::Utf8 => "UTF8",
            TextEncoding::Unicode => "Unicode",
            TextEncoding::Utf32 => "UTF32",
            TextEncoding::BigEndianUnicode => "BigEndianUnicode",
        }
    }

    /// Signature bytes written at the start of every output file
    pub fn preamble(self) -> &'static [u8] {
        match self {
            TextEncoding::Utf8 => &[0xEF, 0xBB, 0xBF],
            TextEncoding::Unicode => &[0xFF, 0xFE],
            TextEncoding::BigEndianUnicode => &[0xFE, 0xFF],
            TextEncoding::Utf32 => &[0xFF, 0xFE, 0x00, 0x00],
            TextEncoding::Default | TextEncoding::Ascii | TextEncoding::Utf7 => &[],
        }
    }

    /// Encode `text` in this encoding, appending to `out`
    pub fn encode_into(self, text: &str, out: &mut Vec<u8>) {
        match self {
            TextEncoding::Default | TextEncoding::Utf8 => out.extend_from_slice(text.as_bytes()),
            TextEncoding::Ascii => {
                out.extend(text.chars().map(|c| if c.is_ascii() { c as u8 } else { b'?' }));
            }
            TextEncoding::Utf7 => utf7::encode_into(text, out),
            TextEncoding::Unicode => {
                out.extend(text.encode_utf16().flat_map(u16::to_le_bytes));
            }
            TextEncoding::BigEndianUnicode => {
                out.extend(text.encode_utf16().flat_map(u16::to_be_bytes));
            }
            TextEncoding::Utf32 => {
                out.extend(text.chars().flat_map(|c| (c as u32).to_le_bytes()));
            }
        }
    }

    /// Create an incremental decoder for this encoding
    pub fn new_decoder(self) -> TextDecoder {
        let inner = match self {
            TextEncoding::Default | TextEncoding::Utf8 => {
                DecoderKind::Standard(UTF_8.new_decoder_without_bom_handling())
            }
            TextEncoding::Unicode => {
                DecoderKind::Standard(UTF_16LE.new_decoder_without_bom_handling())
            }
            TextEncoding::BigEndianUnicode => {
                DecoderKind::Standard(UTF_16BE.new_decoder_without_bom_handling())
            }
            TextEncoding::Ascii => DecoderKind::Ascii,
            TextEncoding::Utf7 => DecoderKind::Utf7(Utf7Decoder::new()),
            TextEncoding::Utf32 => DecoderKind::Utf32(Utf32Decoder::default()),
        };
        TextDecoder { inner }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TextEncoding {
    type Err = SplitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let encoding = match s.trim().to_ascii_lowercase().as_str() {
            "default" => TextEncoding::Default,
            "ascii" | "us-ascii" => TextEncoding::Ascii,
            "utf7" | "utf-7" => TextEncoding::Utf7,
            "utf8" | "utf-8" => TextEncoding::Utf8,
            "unicode" | "utf-16" | "utf-16le" => TextEncoding::Unicode,
            "utf32" | "utf-32" => TextEncoding::Utf32,
            "bigendianunicode" | "utf-16be" => TextEncoding::BigEndianUnicode,
            _ => return Err(SplitError::UnknownEncoding(s.to_string())),
        };
        Ok(encoding)
    }
}

/// Incremental decoder producing UTF-8 text
///
/// Malformed input is replaced with U+FFFD. A byte-order mark is decoded
/// as U+FEFF and left for the caller to strip.
pub struct TextDecoder {
    inner: DecoderKind,
}

enum DecoderKind {
    Standard(encoding_rs::Decoder),
    Ascii,
    Utf7(Utf7Decoder),
    Utf32(Utf32Decoder),
}

impl TextDecoder {
    /// Decode `bytes`, appending complete characters to `out`
    pub fn decode(&mut self, bytes: &[u8], out: &mut String) {
        self.decode_inner(bytes, out, false);
    }

    /// Flush state held back waiting for more input
    pub fn finish(&mut self, out: &mut String) {
        self.decode_inner(&[], out, true);
    }

    fn decode_inner(&mut self, bytes: &[u8], out: &mut String, last: bool) {
        match &mut self.inner {
            DecoderKind::Standard(decoder) => {
                let mut input = bytes;
                loop {
                    let needed = decoder
                        .max_utf8_buffer_length(input.len())
                        .unwrap_or(input.len() * 3 + 16);
                    out.reserve(needed);

                    let (result, read, _had_errors) = decoder.decode_to_string(input, out, last);
                    input = &input[read..];
                    if let CoderResult::InputEmpty = result {
                        break;
                    }
                }
            }
            DecoderKind::Ascii => {
                out.extend(bytes.iter().map(|&b| if b.is_ascii() { b as char } else { '?' }));
            }
            DecoderKind::Utf7(decoder) => {
                decoder.decode(bytes, out);
                if last {
                    decoder.finish(out);
                }
            }
            DecoderKind::Utf32(decoder) => {
                decoder.decode(bytes, out);
                if last {
                    decoder.finish(out);
                }
            }
        }
    }
}

impl fmt::Debug for TextDecoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match &self.inner {
            DecoderKind::Standard(decoder) => decoder.encoding().name(),
            DecoderKind::Ascii => "ascii",
            DecoderKind::Utf7(_) => "utf-7",
            DecoderKind::Utf32(_) => "utf-32",
        };
        f.debug_struct("TextDecoder").field("kind", &kind).finish()
    }
}

/// UTF-32 decoder, little-endian unless the input opens with a big-endian BOM
#[derive(Debug, Default)]
struct Utf32Decoder {
    carry: Vec<u8>,
    big_endian: Option<bool>,
}

impl Utf32Decoder {
    fn decode(&mut self, bytes: &[u8], out: &mut String) {
        self.carry.extend_from_slice(bytes);

        if self.big_endian.is_none() {
            if self.carry.len() < 4 {
                return;
            }
            self.big_endian = Some(self.carry[..4] == [0x00, 0x00, 0xFE, 0xFF]);
        }
        let big_endian = self.big_endian == Some(true);

        let whole = self.carry.len() - self.carry.len() % 4;
        for unit in self.carry[..whole].chunks_exact(4) {
            let unit = [unit[0], unit[1], unit[2], unit[3]];
            let value = if big_endian {
                u32::from_be_bytes(unit)
            } else {
                u32::from_le_bytes(unit)
            };
            out.push(char::from_u32(value).unwrap_or(char::REPLACEMENT_CHARACTER));
        }
        self.carry.drain(..whole);
    }

    fn finish(&mut self, out: &mut String) {
        if !self.carry.is_empty() {
            out.push(char::REPLACEMENT_CHARACTER);
            self.carry.clear();
        }
    }
}
