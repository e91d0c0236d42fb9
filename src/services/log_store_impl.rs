//! `MongoDB` implementation of the `LogStore` trait.
//!
//! One append-only collection holds a document per search:
//! `{timestamp, date, search_type, search_text, params, results_count}`.
//! Popularity and recency are computed server-side with aggregation pipelines.

use crate::models::{
    PopularSearchSummary, RecentSearchSummary, SearchEvent, SearchKind, SearchParams,
};
use crate::services::log_store::{LogError, LogStore};
use async_trait::async_trait;
use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use futures::TryStreamExt;
use mongodb::bson::{self, Bson, Document, doc};
use mongodb::{Client, Collection, Database};
use tracing::{debug, info, warn};

const DATE_FORMAT: &str = "%Y-%m-%d";

pub struct MongoLogStore {
    client: Client,
    database: Database,
    collection: Collection<Document>,
}

impl MongoLogStore {
    /// Builds the client without contacting the server.
    ///
    /// Only a malformed URI fails here; an unreachable server surfaces on the
    /// first operation as [`LogError::Unavailable`].
    pub async fn connect(uri: &str, database: &str, collection: &str) -> Result<Self, LogError> {
        let client = Client::with_uri_str(uri).await?;
        info!(database, collection, "Log store client ready");
        Ok(Self::from_client(client, database, collection))
    }

    #[must_use]
    pub fn from_client(client: Client, database: &str, collection: &str) -> Self {
        let database = client.database(database);
        let collection = database.collection::<Document>(collection);
        Self {
            client,
            database,
            collection,
        }
    }

    pub async fn close(self) {
        self.client.shutdown().await;
        info!("Log store connection closed");
    }

    async fn aggregate(&self, pipeline: Vec<Document>) -> Result<Vec<Document>, LogError> {
        let cursor = self.collection.aggregate(pipeline).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn find_events(
        &self,
        filter: Document,
        limit: Option<usize>,
    ) -> Result<Vec<SearchEvent>, LogError> {
        let mut find = self.collection.find(filter).sort(doc! { "timestamp": -1 });
        if let Some(limit) = limit {
            find = find.limit(as_i64(limit));
        }
        let documents: Vec<Document> = find.await?.try_collect().await?;

        Ok(documents
            .iter()
            .filter_map(|d| match event_from_document(d) {
                Ok(event) => Some(event),
                Err(e) => {
                    warn!(error = %e, "Skipping unreadable search log record");
                    None
                }
            })
            .collect())
    }
}

#[async_trait]
impl LogStore for MongoLogStore {
    async fn record_search(
        &self,
        params: &SearchParams,
        results_count: u64,
    ) -> Result<String, LogError> {
        let results_count = i64::try_from(results_count).unwrap_or(i64::MAX);
        let event = SearchEvent::new(params.clone(), results_count, Utc::now());

        let result = self.collection.insert_one(event_document(&event)?).await?;
        let id = match result.inserted_id {
            Bson::ObjectId(oid) => oid.to_hex(),
            other => other.to_string(),
        };

        debug!(id = %id, search_text = %event.search_text, results_count, "Search recorded");
        Ok(id)
    }

    async fn popular_searches(
        &self,
        limit: usize,
    ) -> Result<Vec<PopularSearchSummary>, LogError> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        self.aggregate(popular_pipeline(limit))
            .await?
            .iter()
            .map(popular_from_document)
            .collect()
    }

    async fn recent_searches(&self, limit: usize) -> Result<Vec<RecentSearchSummary>, LogError> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        self.aggregate(recent_pipeline(limit))
            .await?
            .iter()
            .map(recent_from_document)
            .collect()
    }

    async fn count_total(&self) -> Result<u64, LogError> {
        Ok(self.collection.count_documents(doc! {}).await?)
    }

    async fn count_empty_results(&self) -> Result<u64, LogError> {
        Ok(self
            .collection
            .count_documents(doc! { "results_count": 0 })
            .await?)
    }

    async fn count_by_kind(&self, kind: SearchKind) -> Result<u64, LogError> {
        Ok(self
            .collection
            .count_documents(doc! { "search_type": kind.as_str() })
            .await?)
    }

    async fn events_by_date(&self, date: NaiveDate) -> Result<Vec<SearchEvent>, LogError> {
        self.find_events(date_filter(date), None).await
    }

    async fn events_by_kind(
        &self,
        kind: SearchKind,
        limit: usize,
    ) -> Result<Vec<SearchEvent>, LogError> {
        // A zero limit means "no limit" to the server.
        if limit == 0 {
            return Ok(Vec::new());
        }
        self.find_events(doc! { "search_type": kind.as_str() }, Some(limit))
            .await
    }

    async fn purge_before(&self, cutoff: DateTime<Utc>) -> Result<u64, LogError> {
        let result = self
            .collection
            .delete_many(doc! { "timestamp": { "$lt": to_bson_datetime(cutoff) } })
            .await?;
        info!(deleted = result.deleted_count, %cutoff, "Search log purged");
        Ok(result.deleted_count)
    }

    async fn ping(&self) -> Result<(), LogError> {
        self.database.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}

fn as_i64(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn to_bson_datetime(ts: DateTime<Utc>) -> bson::DateTime {
    bson::DateTime::from_millis(ts.timestamp_millis())
}

/// Matches one UTC day by `timestamp`, so records without a `date` field are
/// included.
pub(crate) fn date_filter(date: NaiveDate) -> Document {
    let start = date.and_time(NaiveTime::MIN).and_utc();
    let mut range = doc! { "$gte": to_bson_datetime(start) };
    if let Some(next) = date.checked_add_days(Days::new(1)) {
        range.insert("$lt", to_bson_datetime(next.and_time(NaiveTime::MIN).and_utc()));
    }
    doc! { "timestamp": range }
}

fn non_empty_text_stage() -> Document {
    doc! { "$match": { "search_text": { "$nin": ["", null] } } }
}

pub(crate) fn popular_pipeline(limit: usize) -> Vec<Document> {
    vec![
        non_empty_text_stage(),
        // Oldest first so `$first` picks the earliest occurrence's kind.
        doc! { "$sort": { "timestamp": 1 } },
        doc! {
            "$group": {
                "_id": "$search_text",
                "count": { "$sum": 1 },
                "search_type": { "$first": "$search_type" },
                "total_results": { "$sum": "$results_count" },
                "last_search": { "$max": "$timestamp" },
            }
        },
        doc! { "$match": { "count": { "$gt": 0 } } },
        doc! { "$sort": { "count": -1, "last_search": -1, "_id": 1 } },
        doc! { "$limit": as_i64(limit) },
    ]
}

pub(crate) fn recent_pipeline(limit: usize) -> Vec<Document> {
    vec![
        non_empty_text_stage(),
        doc! { "$sort": { "timestamp": -1 } },
        doc! {
            "$group": {
                "_id": "$search_text",
                "timestamp": { "$first": "$timestamp" },
                "search_type": { "$first": "$search_type" },
                "params": { "$first": "$params" },
                "results_count": { "$first": "$results_count" },
            }
        },
        doc! { "$sort": { "timestamp": -1, "_id": 1 } },
        doc! { "$limit": as_i64(limit) },
    ]
}

pub(crate) fn event_document(event: &SearchEvent) -> Result<Document, LogError> {
    let params = match &event.params {
        Some(params) => {
            bson::to_bson(params).map_err(|e| LogError::Malformed(e.to_string()))?
        }
        None => Bson::Null,
    };

    Ok(doc! {
        "timestamp": to_bson_datetime(event.timestamp),
        "date": event.date.format(DATE_FORMAT).to_string(),
        "search_type": event.kind.as_str(),
        "search_text": event.search_text.as_str(),
        "params": params,
        "results_count": event.results_count,
    })
}

/// Reads a stored event, tolerating records written by older clients
/// (32-bit counts, no `date` field, null `search_text`).
pub(crate) fn event_from_document(document: &Document) -> Result<SearchEvent, LogError> {
    let timestamp = read_timestamp(document, "timestamp")?;
    let date = document
        .get_str("date")
        .ok()
        .and_then(|d| NaiveDate::parse_from_str(d, DATE_FORMAT).ok())
        .unwrap_or_else(|| timestamp.date_naive());

    Ok(SearchEvent {
        id: document.get_object_id("_id").ok().map(|oid| oid.to_hex()),
        timestamp,
        date,
        kind: read_kind(document)?,
        search_text: document.get_str("search_text").unwrap_or_default().to_string(),
        params: read_params(document),
        results_count: read_count(document, "results_count"),
    })
}

fn popular_from_document(document: &Document) -> Result<PopularSearchSummary, LogError> {
    Ok(PopularSearchSummary {
        search_text: read_group_key(document)?,
        count: read_count(document, "count"),
        last_search: read_timestamp(document, "last_search")?,
        total_results: read_count(document, "total_results"),
        kind: read_kind(document)?,
    })
}

fn recent_from_document(document: &Document) -> Result<RecentSearchSummary, LogError> {
    Ok(RecentSearchSummary {
        search_text: read_group_key(document)?,
        timestamp: read_timestamp(document, "timestamp")?,
        kind: read_kind(document)?,
        params: read_params(document),
        results_count: read_count(document, "results_count"),
    })
}

fn read_group_key(document: &Document) -> Result<String, LogError> {
    document
        .get_str("_id")
        .map(str::to_string)
        .map_err(|e| LogError::Malformed(format!("group key: {e}")))
}

fn read_kind(document: &Document) -> Result<SearchKind, LogError> {
    document
        .get_str("search_type")
        .map_err(|e| LogError::Malformed(format!("search_type: {e}")))?
        .parse()
        .map_err(LogError::Malformed)
}

fn read_params(document: &Document) -> Option<SearchParams> {
    let params = document.get_document("params").ok()?;
    bson::from_document(params.clone()).ok()
}

fn read_timestamp(document: &Document, key: &str) -> Result<DateTime<Utc>, LogError> {
    match document.get(key) {
        Some(Bson::DateTime(dt)) => DateTime::from_timestamp_millis(dt.timestamp_millis())
            .ok_or_else(|| LogError::Malformed(format!("{key}: out of range"))),
        other => Err(LogError::Malformed(format!(
            "{key}: expected a date, found {other:?}"
        ))),
    }
}

#[allow(clippy::cast_possible_truncation)]
fn read_count(document: &Document, key: &str) -> i64 {
    match document.get(key) {
        Some(Bson::Int32(v)) => i64::from(*v),
        Some(Bson::Int64(v)) => *v,
        Some(Bson::Double(v)) => *v as i64,
        _ => 0,
    }
}
