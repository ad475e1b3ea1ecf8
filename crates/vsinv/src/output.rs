//! Output formatting.
//!
//! Everything on stdout is JSON, pretty-printed with a four-space indent.
//! Logs and diagnostics go to stderr.

use std::io::{self, Write};

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

/// Pretty-print `data` as JSON with a four-space indent.
pub fn render_json<T: Serialize + ?Sized>(data: &T) -> Result<String, serde_json::Error> {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    data.serialize(&mut ser)?;
    // serde_json only ever writes valid UTF-8.
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Write rendered output to stdout followed by a newline.
pub fn print_output(output: &str) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{output}")?;
    stdout.flush()
}
