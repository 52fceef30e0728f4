//! Line-delimited JSON sink

use super::{Sink, SinkResult};
use crate::model::Job;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

const JOBS_PER_FILE: usize = 10_000;

/// Writes records as JSONL batches, at most 10,000 per file.
///
/// Files are named `jobs_0.jsonl`, `jobs_1.jsonl`, ... inside the target
/// directory; absent fields are omitted from the serialized objects.
pub struct JsonlSink {
    directory: PathBuf,
    per_file: usize,
    file_index: usize,
    written_in_file: usize,
    current: Option<BufWriter<File>>,
}

impl JsonlSink {
    pub fn new(directory: impl Into<PathBuf>) -> SinkResult<Self> {
        Self::with_batch_size(directory, JOBS_PER_FILE)
    }

    /// Sink with a custom batch size per file.
    pub fn with_batch_size(directory: impl Into<PathBuf>, per_file: usize) -> SinkResult<Self> {
        let directory = directory.into();
        fs::create_dir_all(&directory)?;
        Ok(Self {
            directory,
            per_file: per_file.max(1),
            file_index: 0,
            written_in_file: 0,
            current: None,
        })
    }

    fn writer(&mut self) -> SinkResult<&mut BufWriter<File>> {
        if self.current.is_none() || self.written_in_file >= self.per_file {
            if let Some(mut old) = self.current.take() {
                old.flush()?;
            }
            let path = self
                .directory
                .join(format!("jobs_{}.jsonl", self.file_index));
            self.file_index += 1;
            self.written_in_file = 0;
            self.current = Some(BufWriter::new(File::create(path)?));
        }
        Ok(self.current.as_mut().expect("writer was just created"))
    }
}

impl Sink for JsonlSink {
    fn write(&mut self, job: &Job) -> SinkResult<()> {
        let line = serde_json::to_string(job)?;
        let writer = self.writer()?;
        writeln!(writer, "{line}")?;
        self.written_in_file += 1;
        Ok(())
    }

    fn finish(&mut self) -> SinkResult<()> {
        if let Some(mut writer) = self.current.take() {
            writer.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Company, Location};
    use tempfile::tempdir;

    fn job(index: usize) -> Job {
        Job {
            url: format!("https://jobs.example/view/{index}"),
            title: format!("Job {index}"),
            company: Company {
                name: "Acme".to_string(),
                url: None,
                logo: None,
                actively_hiring: None,
            },
            location: Location::new("Munich"),
            posted_time: None,
            description: None,
            tags: Default::default(),
            criteria: Default::default(),
        }
    }

    #[test]
    fn writes_one_record_per_line() {
        let dir = tempdir().unwrap();
        let mut sink = JsonlSink::new(dir.path()).unwrap();
        for i in 0..3 {
            sink.write(&job(i)).unwrap();
        }
        sink.finish().unwrap();

        let content = fs::read_to_string(dir.path().join("jobs_0.jsonl")).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);

        let first: Job = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first, job(0));
        // absent fields are omitted entirely
        assert!(!lines[0].contains("\"logo\""));
    }

    #[test]
    fn rolls_over_to_a_new_file_per_batch() {
        let dir = tempdir().unwrap();
        let mut sink = JsonlSink::with_batch_size(dir.path(), 2).unwrap();
        for i in 0..5 {
            sink.write(&job(i)).unwrap();
        }
        sink.finish().unwrap();

        let count = |name: &str| {
            fs::read_to_string(dir.path().join(name))
                .unwrap()
                .lines()
                .count()
        };
        assert_eq!(count("jobs_0.jsonl"), 2);
        assert_eq!(count("jobs_1.jsonl"), 2);
        assert_eq!(count("jobs_2.jsonl"), 1);
    }
}
