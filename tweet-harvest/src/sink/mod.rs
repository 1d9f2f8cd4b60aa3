use anyhow::{anyhow, Result};
use async_trait::async_trait;

use crate::config::{Config, OutputConfig};
use crate::tweet::CanonicalTweet;

mod file;
mod store;

pub use file::CsvSink;
pub use store::{collection_name, MongoSink};

/// Where collected tweets end up. Implementations only append or upsert;
/// nothing is rewritten or deleted.
#[async_trait]
pub trait Sink {
    async fn persist(&mut self, tweet: &CanonicalTweet) -> Result<()>;
}

/// Selects and opens the configured sink once per run.
pub async fn build(config: &Config, lang: &str, run_date: &str) -> Result<Box<dyn Sink + Send>> {
    let attributes = config.parameters.tweet_attributes.clone();
    match &config.parameters.output {
        OutputConfig::Csv { name } => Ok(Box::new(CsvSink::create(
            &config.parameters.file_path,
            name,
            lang,
            run_date,
            attributes,
        )?)),
        OutputConfig::Mongo => {
            let database = config
                .database
                .as_ref()
                .ok_or_else(|| anyhow!("store output requires a [database] section"))?;
            Ok(Box::new(MongoSink::connect(database, lang, attributes).await?))
        }
    }
}
