use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Fans printed bytes out to every configured sink, typically the console
/// and/or an output file. With no sinks output is discarded.
#[derive(Default)]
pub struct Output {
    sinks: Vec<Box<dyn Write>>,
}

impl std::fmt::Debug for Output {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Output")
            .field("sinks", &self.sinks.len())
            .finish()
    }
}

impl Output {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sink: impl Write + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    pub fn console(self) -> Self {
        self.with(io::stdout())
    }

    /// Creates (or truncates) `path` and adds it as a buffered sink.
    pub fn file(self, path: &Path) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(self.with(BufWriter::new(file)))
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        for sink in &mut self.sinks {
            sink.write_all(buf)?;
        }
        Ok(buf.len())
    }

    /// Flushes every sink even if an earlier one fails, reporting the first
    /// failure.
    fn flush(&mut self) -> io::Result<()> {
        let mut result = Ok(());
        for sink in &mut self.sinks {
            if let Err(e) = sink.flush() {
                result = result.and(Err(e));
            }
        }
        result
    }
}
