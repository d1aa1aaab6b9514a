//! Console collaborators used by the controller.
//!
//! The controller talks to the operator through these two traits so the
//! interactive loop can be driven from a script in tests.

use crate::{Error, Result};
use std::io::{self, BufRead, Write};

/// Line-oriented input
pub trait InputSource {
    /// Read one line without its terminator
    ///
    /// End of input is reported as an `UnexpectedEof` IO error and a line
    /// that is not UTF-8 as `Error::InputFormat`.
    fn read_line(&mut self) -> Result<String>;

    /// Read one line and parse it as an integer
    fn read_int(&mut self) -> Result<i64> {
        let line = self.read_line()?;
        let trimmed = line.trim();
        trimmed
            .parse::<i64>()
            .map_err(|_| Error::InputFormat(format!("'{}' is not a number", trimmed)))
    }
}

/// Line-oriented output
pub trait OutputSink {
    fn write_line(&mut self, line: &str) -> Result<()>;
}

/// `InputSource` over any buffered reader (stdin in the binary)
pub struct ConsoleInput<R> {
    reader: R,
}

impl<R: BufRead> ConsoleInput<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> InputSource for ConsoleInput<R> {
    fn read_line(&mut self) -> Result<String> {
        let mut line = String::new();
        let read = self.reader.read_line(&mut line).map_err(|e| match e.kind() {
            io::ErrorKind::InvalidData => Error::InputFormat("input is not valid UTF-8".into()),
            _ => Error::Io(e),
        })?;
        if read == 0 {
            return Err(Error::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed",
            )));
        }
        while line.ends_with('\n') || line.ends_with('\r') {
            line.pop();
        }
        Ok(line)
    }
}

/// `OutputSink` over any writer (stdout in the binary)
pub struct ConsoleOutput<W> {
    writer: W,
}

impl<W: Write> ConsoleOutput<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Consume the sink and hand back the writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> OutputSink for ConsoleOutput<W> {
    fn write_line(&mut self, line: &str) -> Result<()> {
        writeln!(self.writer, "{}", line)?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_read_line_strips_terminators() {
        let mut input = ConsoleInput::new(Cursor::new("Dune\r\nWired\n"));
        assert_eq!(input.read_line().unwrap(), "Dune");
        assert_eq!(input.read_line().unwrap(), "Wired");
    }

    #[test]
    fn test_read_line_reports_eof() {
        let mut input = ConsoleInput::new(Cursor::new(""));
        assert!(input.read_line().unwrap_err().is_end_of_input());
    }

    #[test]
    fn test_invalid_utf8_line_is_input_format_error() {
        let mut input = ConsoleInput::new(Cursor::new(b"\xff\xfe\n0\n".to_vec()));
        assert!(matches!(input.read_line(), Err(Error::InputFormat(_))));
        assert_eq!(input.read_line().unwrap(), "0");
    }

    #[test]
    fn test_read_int() {
        let mut input = ConsoleInput::new(Cursor::new(" 42 \nabc\n"));
        assert_eq!(input.read_int().unwrap(), 42);
        assert!(matches!(input.read_int(), Err(Error::InputFormat(_))));
    }

    #[test]
    fn test_write_line() {
        let mut output = ConsoleOutput::new(Vec::new());
        output.write_line("hello").unwrap();
        output.write_line("world").unwrap();
        assert_eq!(output.into_inner(), b"hello\nworld\n");
    }
}
