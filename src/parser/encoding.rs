//! Byte decoding for exported files

use std::borrow::Cow;

use encoding_rs::{UTF_8, WINDOWS_1252};

const UTF8_BOM: &str = "\u{feff}";

/// Decode file bytes to text.
///
/// Strict UTF-8 is tried first; anything that is not valid UTF-8 is read as
/// Windows-1252, which is what spreadsheet tools on Windows usually write.
/// A leading byte-order mark is removed. Returns the text and the name of the
/// encoding used.
pub fn decode(bytes: &[u8]) -> (Cow<'_, str>, &'static str) {
    let (text, encoding) = match UTF_8.decode_without_bom_handling_and_without_replacement(bytes) {
        Some(text) => (text, UTF_8.name()),
        None => {
            let (text, _had_errors) = WINDOWS_1252.decode_without_bom_handling(bytes);
            (text, WINDOWS_1252.name())
        }
    };

    let text = match text {
        Cow::Borrowed(s) => Cow::Borrowed(s.strip_prefix(UTF8_BOM).unwrap_or(s)),
        Cow::Owned(s) if s.starts_with(UTF8_BOM) => Cow::Owned(s[UTF8_BOM.len()..].to_string()),
        owned => owned,
    };

    (text, encoding)
}
