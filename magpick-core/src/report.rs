//! Report output: one chosen link per line, grouped into batches.
//!
//! Layout for a run:
//! ```text
//! jufd 948:
//!
//! magnet:?xt=...        <- one line per chosen link
//! ...                   <- after every 20th link, 4 blank lines
//!
//! mism091:              <- one blank line closes each query
//! ```
//! The batch counter runs across the whole report, not per term.

use std::io::{self, Write};

/// Links per batch.
pub const BATCH_SIZE: usize = 20;

/// Blank lines written after each full batch.
pub const SEPARATOR_LINES: usize = 4;

/// Append-only report writer that owns the batch counter.
#[derive(Debug)]
pub struct ReportWriter<W: Write> {
    out: W,
    batch_count: usize,
    lines_written: usize,
}

impl<W: Write> ReportWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            batch_count: 0,
            lines_written: 0,
        }
    }

    /// Write the `term:` heading that opens a request term's section.
    pub fn write_heading(&mut self, term: &str) -> io::Result<()> {
        writeln!(self.out, "{}:", term)?;
        writeln!(self.out)
    }

    /// Write one chosen link, closing the batch when it fills up.
    pub fn write_link(&mut self, link: &str) -> io::Result<()> {
        writeln!(self.out, "{}", link)?;
        self.lines_written += 1;
        self.batch_count += 1;
        if self.batch_count == BATCH_SIZE {
            for _ in 0..SEPARATOR_LINES {
                writeln!(self.out)?;
            }
            self.batch_count = 0;
        }
        Ok(())
    }

    /// Close the output for one query.
    pub fn end_query(&mut self) -> io::Result<()> {
        writeln!(self.out)
    }

    /// Links written since the last batch separator.
    pub fn batch_count(&self) -> usize {
        self.batch_count
    }

    /// Links written over the writer's lifetime.
    pub fn lines_written(&self) -> usize {
        self.lines_written
    }

    /// Flush and hand back the underlying writer.
    pub fn finish(mut self) -> io::Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(writer: ReportWriter<Vec<u8>>) -> String {
        String::from_utf8(writer.finish().unwrap()).unwrap()
    }

    #[test]
    fn heading_and_query_end() {
        let mut w = ReportWriter::new(Vec::new());
        w.write_heading("mism091").unwrap();
        w.write_link("link-a").unwrap();
        w.end_query().unwrap();
        assert_eq!(w.lines_written(), 1);
        assert_eq!(output(w), "mism091:\n\nlink-a\n\n");
    }

    #[test]
    fn separator_after_twenty_links() {
        let mut w = ReportWriter::new(Vec::new());
        for _ in 0..21 {
            w.write_link("x").unwrap();
        }
        assert_eq!(w.batch_count(), 1);
        assert_eq!(w.lines_written(), 21);

        let expected = format!("{}\n\n\n\nx\n", "x\n".repeat(20));
        assert_eq!(output(w), expected);
    }

    #[test]
    fn counter_resets_after_separator() {
        let mut w = ReportWriter::new(Vec::new());
        for _ in 0..40 {
            w.write_link("x").unwrap();
        }
        assert_eq!(w.batch_count(), 0);
        let text = output(w);
        assert_eq!(text.matches("x\n\n\n\n\n").count(), 2);
    }

    #[test]
    fn counter_spans_queries() {
        let mut w = ReportWriter::new(Vec::new());
        for _ in 0..15 {
            w.write_link("a").unwrap();
        }
        w.end_query().unwrap();
        for _ in 0..5 {
            w.write_link("b").unwrap();
        }
        assert_eq!(w.batch_count(), 0);
        assert!(output(w).ends_with("b\n\n\n\n\n"));
    }
}
