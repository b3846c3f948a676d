use crate::error::{ProcessingError, Result};
use crate::models::ObservationSet;
use crate::readers::RecordParser;
use crate::utils::constants::{DEFAULT_BUFFER_SIZE, PROGRESS_UPDATE_INTERVAL};
use crate::utils::progress::ProgressReporter;
use memmap2::Mmap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info, warn};

/// Reads an observation dataset into the filtered temperature and month buffers.
///
/// Malformed lines are skipped with a warning and counted; only I/O failures
/// abort the read.
pub struct ObservationReader {
    parser: RecordParser,
    use_mmap: bool,
}

impl ObservationReader {
    pub fn new(parser: RecordParser) -> Self {
        Self {
            parser,
            use_mmap: false,
        }
    }

    pub fn with_mmap(mut self, use_mmap: bool) -> Self {
        self.use_mmap = use_mmap;
        self
    }

    /// Read a dataset file.
    pub fn read_path(&self, path: &Path, progress: Option<&ProgressReporter>) -> Result<ObservationSet> {
        debug!(path = %path.display(), mmap = self.use_mmap, "reading observations");

        let set = if self.use_mmap {
            self.read_mmap(path, progress)?
        } else {
            let file = File::open(path)?;
            let reader = BufReader::with_capacity(DEFAULT_BUFFER_SIZE, file);
            self.read_buffered(reader, progress)?
        };

        info!(
            path = %path.display(),
            lines = set.stats.lines_read,
            matched = set.stats.records_matched,
            skipped = set.stats.lines_skipped,
            "finished reading observations"
        );
        Ok(set)
    }

    /// Read observations from any buffered source.
    ///
    /// Lines are split on raw bytes so that one line of invalid UTF-8 is
    /// skipped like any other malformed record.
    pub fn read_buffered<R: BufRead>(
        &self,
        mut reader: R,
        progress: Option<&ProgressReporter>,
    ) -> Result<ObservationSet> {
        let mut set = ObservationSet::new();
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            let raw = buf.strip_suffix(b"\n").unwrap_or(&buf);
            self.ingest_raw(&mut set, raw, progress);
        }
        Ok(set)
    }

    /// Read observations from lines already in memory.
    pub fn read_lines<I, S>(&self, lines: I) -> ObservationSet
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = ObservationSet::new();
        for line in lines {
            self.ingest(&mut set, line.as_ref(), None);
        }
        set
    }

    fn read_mmap(&self, path: &Path, progress: Option<&ProgressReporter>) -> Result<ObservationSet> {
        let file = File::open(path)?;
        let mmap = unsafe { Mmap::map(&file)? };

        let mut set = ObservationSet::new();
        if mmap.is_empty() {
            return Ok(set);
        }

        let content: &[u8] = &mmap;
        let content = content.strip_suffix(b"\n").unwrap_or(content);
        for raw in content.split(|b| *b == b'\n') {
            self.ingest_raw(&mut set, raw, progress);
        }
        Ok(set)
    }

    fn ingest_raw(&self, set: &mut ObservationSet, raw: &[u8], progress: Option<&ProgressReporter>) {
        match std::str::from_utf8(raw) {
            Ok(line) => self.ingest(set, line, progress),
            Err(e) => {
                set.stats.lines_read += 1;
                let error = ProcessingError::Parse {
                    line: set.stats.lines_read,
                    message: format!("invalid UTF-8: {}", e),
                };
                warn!(error = %error, "skipping line");
                set.stats.record_error(&error);
            }
        }
    }

    fn ingest(&self, set: &mut ObservationSet, line: &str, progress: Option<&ProgressReporter>) {
        set.stats.lines_read += 1;
        let line_number = set.stats.lines_read;

        if let Some(p) = progress {
            if line_number % PROGRESS_UPDATE_INTERVAL == 0 {
                p.set_message(&format!(
                    "Read {} lines ({} matched)",
                    line_number, set.stats.records_matched
                ));
            }
        }

        if line.trim().is_empty() {
            set.stats.blank_lines += 1;
            return;
        }

        match self.parser.parse_line(line, line_number) {
            Ok(Some(observation)) => set.push(&observation),
            Ok(None) => set.stats.records_filtered += 1,
            Err(e) => {
                warn!(error = %e, "skipping line");
                set.stats.record_error(&e);
            }
        }
    }
}

impl Default for ObservationReader {
    fn default() -> Self {
        Self::new(RecordParser::default())
    }
}
