/// Decode bytes as UTF-8, dropping every invalid sequence instead of replacing it.
pub fn decode_lenient(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        out.push_str(chunk.valid());
    }
    out
}

/// Rewrite text so that every line ends in `\n` and carries no trailing whitespace.
///
/// `\r\n`, lone `\r` and `\n` all terminate a line. A final line without a
/// terminator gets one; empty input stays empty.
pub fn normalize_text(text: &str) -> String {
    let unified = text.replace("\r\n", "\n").replace('\r', "\n");
    let mut out = String::with_capacity(unified.len());
    for line in unified.lines() {
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}
