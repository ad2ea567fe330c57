//! Reading inputs and writing JSON for the CLI.

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::commands::CliError;

const INDENT: &[u8] = b"    ";

/// Read a whole file, or stdin when `path` is `-`.
pub fn read_input(path: &Path) -> Result<String, CliError> {
    let read_error = |source| CliError::Read { path: path.display().to_string(), source };
    if path.as_os_str() == "-" {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text).map_err(read_error)?;
        Ok(text)
    } else {
        fs::read_to_string(path).map_err(read_error)
    }
}

/// Serialise with four-space indentation, the layout dialog files are kept in.
pub fn render_json<T: Serialize>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    let mut out = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(INDENT));
    value.serialize(&mut serializer)?;
    out.push(b'\n');
    Ok(out)
}

pub fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let rendered = render_json(value)?;
    let mut stdout = io::stdout().lock();
    stdout.write_all(&rendered).map_err(CliError::Write)?;
    stdout.flush().map_err(CliError::Write)
}
