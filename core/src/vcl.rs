//! VCL table serialization
//!
//! Renders the named table literals the edge runtime parses. Quoting and
//! escaping rules live here, decoupled from directory traversal: values
//! must already be percent-encoded, and keys get any character that would
//! break the quoting (`"`, `\`, controls) percent-encoded on render.

use percent_encoding::{percent_encode, AsciiSet, CONTROLS, NON_ALPHANUMERIC};

/// Characters left unencoded in table values: URL-safe printable ASCII.
/// Everything else (control characters, quotes, backslashes, non-ASCII
/// bytes) is percent-encoded.
const KEEP: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'!')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Characters escaped in table keys. Keys stay readable path strings;
/// only what would terminate or corrupt the quoted literal is encoded.
const KEY_ESCAPE: &AsciiSet = &CONTROLS.add(b'"').add(b'\\');

/// Percent-encodes raw content bytes for embedding as a table value.
///
/// Operates on bytes, not text, so binary input is encoded
/// deterministically and percent-decoding recovers the original bytes
/// exactly.
pub fn encode_content(content: &[u8]) -> String {
    percent_encode(content, KEEP).to_string()
}

/// Renders one named VCL table literal.
///
/// Each entry becomes a `"key": "value"` line, comma-separated. An empty
/// entry list renders a syntactically valid empty table.
pub fn render_table<'a, I>(name: &str, entries: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut out = format!("table {name} {{\n");
    let mut first = true;
    for (key, value) in entries {
        if !first {
            out.push_str(",\n");
        }
        let key = percent_encode(key.as_bytes(), KEY_ESCAPE);
        out.push_str(&format!("  \"{key}\": \"{value}\""));
        first = false;
    }
    if !first {
        out.push('\n');
    }
    out.push('}');
    out
}
