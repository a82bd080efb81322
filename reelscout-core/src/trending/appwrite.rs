//! Appwrite-backed trend store.
//!
//! Counters live as documents in one collection with the attributes
//! `searchTerm`, `count`, `movie_id` and `poster_url`. Queries use the
//! JSON query syntax accepted by the documents endpoint.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;

use super::{NewTrendEntry, TrendEntry, TrendStore, TrendStoreError};
use crate::config::TrendStoreConfig;

/// Trend store talking to an Appwrite databases REST endpoint.
#[derive(Debug, Clone)]
pub struct AppwriteTrendStore {
    client: reqwest::Client,
    documents_url: String,
}

/// Document list returned by queries.
#[derive(Debug, Deserialize)]
struct DocumentList {
    documents: Vec<CounterDocument>,
}

/// A single search counter document.
#[derive(Debug, Deserialize)]
struct CounterDocument {
    #[serde(rename = "$id")]
    id: String,
    #[serde(rename = "$updatedAt")]
    updated_at: DateTime<Utc>,
    #[serde(rename = "searchTerm")]
    search_term: String,
    count: u64,
    movie_id: u64,
    #[serde(default)]
    poster_url: Option<String>,
}

impl From<CounterDocument> for TrendEntry {
    fn from(document: CounterDocument) -> Self {
        Self {
            id: document.id,
            search_term: document.search_term,
            count: document.count,
            movie_id: document.movie_id,
            poster_url: document.poster_url.unwrap_or_default(),
            updated_at: document.updated_at,
        }
    }
}

impl AppwriteTrendStore {
    /// Creates a store for the configured project, database and collection.
    ///
    /// Missing identifiers are not validated; requests fail at runtime.
    ///
    /// # Errors
    /// - `TrendStoreError::Request` - Credentials are not valid header values
    ///   or the HTTP client cannot be built
    pub fn new(config: &TrendStoreConfig) -> Result<Self, TrendStoreError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-appwrite-project",
            header_value(&config.project_id, "project id")?,
        );
        if let Some(api_key) = &config.api_key {
            headers.insert("x-appwrite-key", header_value(api_key, "api key")?);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| TrendStoreError::Request {
                reason: format!("Failed to build HTTP client: {e}"),
            })?;

        let documents_url = format!(
            "{}/databases/{}/collections/{}/documents",
            config.endpoint.trim_end_matches('/'),
            config.database_id,
            config.collection_id
        );

        Ok(Self {
            client,
            documents_url,
        })
    }

    async fn query_documents(&self, queries: &[String]) -> Result<DocumentList, TrendStoreError> {
        let params: Vec<(&str, &str)> = queries.iter().map(|q| ("queries[]", q.as_str())).collect();

        let response = self
            .client
            .get(&self.documents_url)
            .query(&params)
            .send()
            .await
            .map_err(request_error)?;

        decode_response(response).await
    }
}

#[async_trait]
impl TrendStore for AppwriteTrendStore {
    async fn find_by_term(&self, search_term: &str) -> Result<Option<TrendEntry>, TrendStoreError> {
        let queries = [
            json!({"method": "equal", "attribute": "searchTerm", "values": [search_term]})
                .to_string(),
        ];
        let list = self.query_documents(&queries).await?;

        Ok(list.documents.into_iter().next().map(TrendEntry::from))
    }

    async fn create(&self, entry: NewTrendEntry) -> Result<TrendEntry, TrendStoreError> {
        let body = json!({
            "documentId": "unique()",
            "data": {
                "searchTerm": entry.search_term,
                "count": 1,
                "movie_id": entry.movie_id,
                "poster_url": entry.poster_url,
            }
        });

        let response = self
            .client
            .post(&self.documents_url)
            .json(&body)
            .send()
            .await
            .map_err(request_error)?;

        if response.status() == reqwest::StatusCode::CONFLICT {
            return Err(TrendStoreError::Conflict {
                search_term: entry.search_term,
            });
        }

        decode_response::<CounterDocument>(response)
            .await
            .map(TrendEntry::from)
    }

    async fn increment(&self, entry: &TrendEntry) -> Result<TrendEntry, TrendStoreError> {
        let body = json!({ "data": { "count": entry.count + 1 } });

        let response = self
            .client
            .patch(format!("{}/{}", self.documents_url, entry.id))
            .json(&body)
            .send()
            .await
            .map_err(request_error)?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(TrendStoreError::NotFound {
                id: entry.id.clone(),
            });
        }

        decode_response::<CounterDocument>(response)
            .await
            .map(TrendEntry::from)
    }

    async fn list_top(&self, limit: usize) -> Result<Vec<TrendEntry>, TrendStoreError> {
        let queries = [
            json!({"method": "orderDesc", "attribute": "count"}).to_string(),
            json!({"method": "orderDesc", "attribute": "$updatedAt"}).to_string(),
            json!({"method": "limit", "values": [limit]}).to_string(),
        ];
        let list = self.query_documents(&queries).await?;

        Ok(list.documents.into_iter().map(TrendEntry::from).collect())
    }
}

fn header_value(value: &str, what: &str) -> Result<HeaderValue, TrendStoreError> {
    HeaderValue::from_str(value).map_err(|e| TrendStoreError::Request {
        reason: format!("Invalid {what}: {e}"),
    })
}

fn request_error(error: reqwest::Error) -> TrendStoreError {
    TrendStoreError::Request {
        reason: error.to_string(),
    }
}

async fn decode_response<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, TrendStoreError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(TrendStoreError::Status {
            status: status.as_u16(),
            body,
        });
    }

    response.json().await.map_err(|e| TrendStoreError::Decode {
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;
    use std::sync::Arc;

    use axum::extract::{Path, Query, State};
    use axum::http::{HeaderMap as AxumHeaders, StatusCode};
    use axum::routing::{get, patch};
    use axum::{Json, Router};
    use parking_lot::Mutex;
    use serde_json::Value;

    use super::*;
    use crate::movie::MovieSummary;
    use crate::trending::record_hit;

    /// Minimal stand-in for the documents endpoint.
    #[derive(Default)]
    struct FakeCollection {
        documents: Vec<Value>,
        next_id: u64,
        clock: u32,
        seen_projects: Vec<String>,
    }

    type Shared = Arc<Mutex<FakeCollection>>;

    fn stamp(clock: u32) -> String {
        format!("2024-05-01T12:00:{:02}.000+00:00", clock % 60)
    }

    async fn list_documents(
        State(shared): State<Shared>,
        headers: AxumHeaders,
        Query(params): Query<Vec<(String, String)>>,
    ) -> Json<Value> {
        let mut collection = shared.lock();
        if let Some(project) = headers.get("x-appwrite-project") {
            collection
                .seen_projects
                .push(project.to_str().unwrap_or_default().to_string());
        }

        let mut documents = collection.documents.clone();
        let mut limit = None;
        let mut order_by_count = false;

        for (key, raw) in params {
            assert_eq!(key, "queries[]");
            let query: Value = serde_json::from_str(&raw).unwrap();
            match query["method"].as_str().unwrap() {
                "equal" => {
                    let wanted = query["values"][0].clone();
                    documents.retain(|doc| doc["searchTerm"] == wanted);
                }
                "orderDesc" if query["attribute"] == "count" => order_by_count = true,
                "orderDesc" => {}
                "limit" => limit = query["values"][0].as_u64(),
                other => panic!("unexpected query method {other}"),
            }
        }

        if order_by_count {
            documents.sort_by(|a, b| {
                b["count"]
                    .as_u64()
                    .cmp(&a["count"].as_u64())
                    .then_with(|| b["$updatedAt"].as_str().cmp(&a["$updatedAt"].as_str()))
            });
        }
        if let Some(limit) = limit {
            documents.truncate(limit as usize);
        }

        Json(json!({ "total": documents.len(), "documents": documents }))
    }

    async fn create_document(State(shared): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
        let mut collection = shared.lock();
        assert_eq!(body["documentId"], "unique()");

        collection.next_id += 1;
        collection.clock += 1;
        let mut document = body["data"].clone();
        document["$id"] = json!(format!("doc{}", collection.next_id));
        document["$updatedAt"] = json!(stamp(collection.clock));
        collection.documents.push(document.clone());
        Json(document)
    }

    async fn update_document(
        State(shared): State<Shared>,
        Path((_database, _collection, id)): Path<(String, String, String)>,
        Json(body): Json<Value>,
    ) -> Result<Json<Value>, StatusCode> {
        let mut collection = shared.lock();
        collection.clock += 1;
        let clock = collection.clock;

        let document = collection
            .documents
            .iter_mut()
            .find(|doc| doc["$id"] == id.as_str())
            .ok_or(StatusCode::NOT_FOUND)?;
        document["count"] = body["data"]["count"].clone();
        document["$updatedAt"] = json!(stamp(clock));
        Ok(Json(document.clone()))
    }

    async fn spawn_fake_appwrite() -> (SocketAddr, Shared) {
        let shared = Shared::default();
        let app = Router::new()
            .route(
                "/v1/databases/{db}/collections/{coll}/documents",
                get(list_documents).post(create_document),
            )
            .route(
                "/v1/databases/{db}/collections/{coll}/documents/{id}",
                patch(update_document),
            )
            .with_state(shared.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (addr, shared)
    }

    fn store_for(addr: SocketAddr) -> AppwriteTrendStore {
        AppwriteTrendStore::new(&TrendStoreConfig {
            endpoint: format!("http://{addr}/v1"),
            project_id: "reelscout-test".to_string(),
            database_id: "main".to_string(),
            collection_id: "metrics".to_string(),
            api_key: None,
        })
        .unwrap()
    }

    fn movie(id: u64) -> MovieSummary {
        MovieSummary {
            id,
            title: format!("Movie {id}"),
            poster_path: Some(format!("/{id}.jpg")),
            popularity: 10.0,
            vote_average: None,
            release_date: None,
            original_language: None,
        }
    }

    #[test]
    fn test_documents_url_layout() {
        let store = AppwriteTrendStore::new(&TrendStoreConfig {
            endpoint: "https://cloud.appwrite.io/v1/".to_string(),
            project_id: "p".to_string(),
            database_id: "db".to_string(),
            collection_id: "metrics".to_string(),
            api_key: Some("key".to_string()),
        })
        .unwrap();

        assert_eq!(
            store.documents_url,
            "https://cloud.appwrite.io/v1/databases/db/collections/metrics/documents"
        );
    }

    #[tokio::test]
    async fn test_record_hit_creates_then_increments() {
        let (addr, shared) = spawn_fake_appwrite().await;
        let store = store_for(addr);
        let image_base = "https://image.tmdb.org/t/p/w500";

        let first = record_hit(&store, "Batman", &movie(268), image_base)
            .await
            .unwrap();
        assert_eq!(first.count, 1);
        assert_eq!(first.search_term, "batman");
        assert_eq!(first.poster_url, "https://image.tmdb.org/t/p/w500/268.jpg");

        let second = record_hit(&store, "batman ", &movie(999), image_base)
            .await
            .unwrap();
        assert_eq!(second.id, first.id);
        assert_eq!(second.count, 2);
        // Poster captured at creation time is kept
        assert_eq!(second.movie_id, 268);

        let collection = shared.lock();
        assert_eq!(collection.documents.len(), 1);
        assert!(collection.seen_projects.iter().all(|p| p == "reelscout-test"));
    }

    #[tokio::test]
    async fn test_list_top_orders_by_count() {
        let (addr, _shared) = spawn_fake_appwrite().await;
        let store = store_for(addr);
        let image_base = "https://image.tmdb.org/t/p/w500";

        for query in ["alien", "dune", "dune", "heat", "dune", "heat"] {
            record_hit(&store, query, &movie(1), image_base).await.unwrap();
        }

        let top = store.list_top(2).await.unwrap();
        let terms: Vec<&str> = top.iter().map(|e| e.search_term.as_str()).collect();
        assert_eq!(terms, vec!["dune", "heat"]);
        assert_eq!(top[0].count, 3);
    }

    #[tokio::test]
    async fn test_unreachable_store_reports_request_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let store = store_for(addr);
        let result = store.find_by_term("batman").await;
        assert!(matches!(result, Err(TrendStoreError::Request { .. })));
    }

    #[tokio::test]
    async fn test_increment_missing_document_is_not_found() {
        let (addr, _shared) = spawn_fake_appwrite().await;
        let store = store_for(addr);
        let ghost = TrendEntry {
            id: "missing".to_string(),
            search_term: "ghost".to_string(),
            count: 4,
            movie_id: 1,
            poster_url: String::new(),
            updated_at: Utc::now(),
        };

        let result = store.increment(&ghost).await;
        assert!(matches!(result, Err(TrendStoreError::NotFound { .. })));
    }
}
