//! Input collaborator for the READ instruction.
//!
//! The engine never touches stdin directly; it reads through this trait so
//! tests (and the CLI's `--input FILE` flag) can substitute any source.

use std::io::BufRead;

use ipp_common::Value;

/// Typed line-oriented input source.
///
/// Each method consumes one unit of input. `None` means end of input or an
/// unparsable value; READ maps both to nil rather than failing.
pub trait InputSource {
    fn read_int(&mut self) -> Option<Value>;
    fn read_bool(&mut self) -> Option<Value>;
    fn read_string(&mut self) -> Option<Value>;
}

/// Reads one line per value from any buffered reader.
pub struct LineInput<R> {
    reader: R,
}

impl<R: BufRead> LineInput<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    /// Next line with the trailing newline stripped, or `None` at end of
    /// input. Read failures are treated as end of input.
    fn next_line(&mut self) -> Option<String> {
        let mut line = String::new();
        match self.reader.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => {
                if line.ends_with('\n') {
                    line.pop();
                    if line.ends_with('\r') {
                        line.pop();
                    }
                }
                Some(line)
            }
        }
    }
}

impl<R: BufRead> InputSource for LineInput<R> {
    fn read_int(&mut self) -> Option<Value> {
        let line = self.next_line()?;
        line.trim().parse::<i64>().ok().map(Value::Int)
    }

    fn read_bool(&mut self) -> Option<Value> {
        let line = self.next_line()?;
        Some(Value::Bool(line.trim().eq_ignore_ascii_case("true")))
    }

    fn read_string(&mut self) -> Option<Value> {
        self.next_line().map(Value::Str)
    }
}
