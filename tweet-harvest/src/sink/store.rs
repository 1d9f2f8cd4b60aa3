use anyhow::{Context, Result};
use async_trait::async_trait;
use mongodb::bson::{doc, Document};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::{Client, Collection};

use super::Sink;
use crate::config::DatabaseConfig;
use crate::project;
use crate::tweet::CanonicalTweet;

static COLLECTION_PREFIX: &str = "twitter_";
const DUPLICATE_KEY: i32 = 11000;

/// Upsert-keyed document writer, one collection per language.
///
/// Owns the connection handle for the whole run; it is resolved once here
/// and dropped with the sink at process exit.
pub struct MongoSink {
    collection: Collection<Document>,
    attributes: Vec<String>,
}

impl MongoSink {
    pub async fn connect(
        config: &DatabaseConfig,
        lang: &str,
        attributes: Vec<String>,
    ) -> Result<Self> {
        let uri = format!("mongodb://{}:{}/", config.server, config.port);
        let client = Client::with_uri_str(&uri)
            .await
            .with_context(|| format!("failed to connect to mongodb at {}", uri))?;
        let collection = client
            .database(&config.database)
            .collection(&collection_name(lang));

        Ok(Self {
            collection,
            attributes,
        })
    }
}

#[async_trait]
impl Sink for MongoSink {
    async fn persist(&mut self, tweet: &CanonicalTweet) -> Result<()> {
        let mut document =
            mongodb::bson::to_document(&project::project_document(tweet, &self.attributes))
                .context("projected record is not a valid document")?;

        match self.collection.insert_one(&document).await {
            Ok(_) => Ok(()),
            Err(err) if is_duplicate_key(&err) => {
                // Re-crawling the same window converges the stored
                // document to the latest projection.
                document.remove("_id");
                self.collection
                    .update_one(
                        doc! { "id_str": tweet.id_str.clone() },
                        doc! { "$set": document },
                    )
                    .upsert(true)
                    .await
                    .context("upsert after duplicate key failed")?;
                Ok(())
            }
            Err(err) => Err(err).context("mongodb insert failed"),
        }
    }
}

pub fn collection_name(lang: &str) -> String {
    format!("{}{}", COLLECTION_PREFIX, lang)
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        &*err.kind,
        ErrorKind::Write(WriteFailure::WriteError(write_error))
            if write_error.code == DUPLICATE_KEY
    )
}
