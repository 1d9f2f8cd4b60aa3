use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use csv::WriterBuilder;

use super::Sink;
use crate::project;
use crate::tweet::CanonicalTweet;

/// Append-only CSV writer, one file per output name, language and run
/// date.
///
/// Every row goes through a fresh open-append-close cycle; a crash loses
/// at most the in-flight row.
pub struct CsvSink {
    path: PathBuf,
    attributes: Vec<String>,
}

impl CsvSink {
    /// Creates the output file and writes the header row of attribute
    /// names.
    pub fn create(
        dir: &Path,
        name: &str,
        lang: &str,
        run_date: &str,
        attributes: Vec<String>,
    ) -> Result<Self> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create output directory {}", dir.display()))?;
        let path = dir.join(format!("{}_{}_{}.csv", name, lang, run_date));

        let mut writer = WriterBuilder::new()
            .from_path(&path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        writer.write_record(&attributes)?;
        writer.flush()?;

        Ok(Self { path, attributes })
    }
}

#[async_trait]
impl Sink for CsvSink {
    async fn persist(&mut self, tweet: &CanonicalTweet) -> Result<()> {
        let file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .with_context(|| format!("failed to open {}", self.path.display()))?;
        let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
        writer.write_record(project::project_row(tweet, &self.attributes))?;
        writer.flush()?;

        Ok(())
    }
}
