//! `json_array` document framer.
//!
//! Wraps the ordered fragments in a JSON array: `[` on its own line, every
//! fragment line indented by four spaces, a `,` after each fragment except
//! the last, and `]` on its own line. An empty fragment still takes a blank
//! line, with its separator on the following line.

use std::io::{self, Write};

use textgraph_core::DocumentFramer;

use crate::JSON_ARRAY;

const INDENT: &str = "    ";

#[derive(Debug, Default, Clone, Copy)]
pub struct JsonArrayFramer;

impl DocumentFramer for JsonArrayFramer {
    fn id(&self) -> &str {
        JSON_ARRAY
    }

    fn begin(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "[")
    }

    fn write_fragment(&self, out: &mut dyn Write, fragment: &str, is_last: bool) -> io::Result<()> {
        if fragment.is_empty() {
            writeln!(out)?;
            if !is_last {
                writeln!(out, ",")?;
            }
            return Ok(());
        }

        let mut lines = fragment.lines().peekable();
        while let Some(line) = lines.next() {
            write!(out, "{INDENT}{line}")?;
            if lines.peek().is_none() && !is_last {
                write!(out, ",")?;
            }
            writeln!(out)?;
        }
        Ok(())
    }

    fn end(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "]")
    }
}
