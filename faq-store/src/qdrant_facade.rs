//! Thin adapter around `qdrant-client` for the FAQ collection.
//!
//! Keeps the builder-heavy client API in one place. The collection is created on the
//! first write, sized from the first embedding, with cosine distance.

use std::collections::HashMap;

use qdrant_client::Qdrant;
use qdrant_client::qdrant::{
    Condition, CountPointsBuilder, CreateCollectionBuilder, Distance, FieldCondition, Filter,
    Match, PointId, PointStruct, ScrollPointsBuilder, SearchPointsBuilder, UpsertPointsBuilder,
    Value as QValue, Vector, VectorParamsBuilder, Vectors, condition::ConditionOneOf,
    r#match::MatchValue, value, vectors,
};
use tracing::{debug, info};

use crate::{
    config::StoreConfig,
    errors::FaqStoreError,
    record::{EmbeddedFaq, FaqHit, FaqRecord},
};

const KEY_ID: &str = "id";
const KEY_QUESTION: &str = "question";
const KEY_ANSWER: &str = "answer";
const KEY_TEXT: &str = "text";
const KEY_QUESTION_KEY: &str = "question_key";

/// Scroll page size used by [`QdrantFacade::list`].
const SCROLL_PAGE: u32 = 256;

pub struct QdrantFacade {
    client: Qdrant,
    collection: String,
}

impl QdrantFacade {
    /// Builds the gRPC client; does not touch any collection.
    pub fn new(cfg: &StoreConfig) -> Result<Self, FaqStoreError> {
        let mut builder = Qdrant::from_url(&cfg.qdrant_url);
        if let Some(key) = &cfg.qdrant_api_key {
            builder = builder.api_key(key.clone());
        }
        let client = builder.build().map_err(qerr)?;

        debug!(url = %cfg.qdrant_url, collection = %cfg.collection, "Qdrant client built");
        Ok(Self {
            client,
            collection: cfg.collection.clone(),
        })
    }

    pub async fn exists(&self) -> Result<bool, FaqStoreError> {
        self.client
            .collection_exists(&self.collection)
            .await
            .map_err(qerr)
    }

    async fn ensure_collection(&self, size: usize) -> Result<(), FaqStoreError> {
        if self.exists().await? {
            return Ok(());
        }
        info!(collection = %self.collection, size, "creating Qdrant collection");
        self.client
            .create_collection(
                CreateCollectionBuilder::new(&self.collection)
                    .vectors_config(VectorParamsBuilder::new(size as u64, Distance::Cosine)),
            )
            .await
            .map_err(qerr)?;
        Ok(())
    }

    /// Upserts all items in one request; ids are deterministic, so repeats overwrite.
    pub async fn add(&self, items: &[EmbeddedFaq]) -> Result<usize, FaqStoreError> {
        let Some(first) = items.first() else {
            return Ok(0);
        };
        let size = first.embedding.len();
        if let Some(bad) = items.iter().find(|e| e.embedding.len() != size) {
            return Err(FaqStoreError::VectorSizeMismatch {
                got: bad.embedding.len(),
                want: size,
            });
        }
        self.ensure_collection(size).await?;

        let points = items.iter().map(to_point).collect::<Result<Vec<_>, _>>()?;
        self.client
            .upsert_points(UpsertPointsBuilder::new(&self.collection, points).wait(true))
            .await
            .map_err(qerr)?;

        info!(collection = %self.collection, upserted = items.len(), "points upserted");
        Ok(items.len())
    }

    /// k-NN search; an absent collection yields no hits.
    pub async fn search(&self, vector: Vec<f32>, k: usize) -> Result<Vec<FaqHit>, FaqStoreError> {
        if !self.exists().await? {
            return Ok(Vec::new());
        }
        let res = self
            .client
            .search_points(
                SearchPointsBuilder::new(&self.collection, vector, k as u64).with_payload(true),
            )
            .await
            .map_err(qerr)?;

        Ok(res
            .result
            .into_iter()
            .map(|sp| FaqHit {
                record: payload_to_record(sp.id, sp.payload),
                score: sp.score,
            })
            .collect())
    }

    pub async fn find_by_question_key(&self, key: &str) -> Result<Option<FaqRecord>, FaqStoreError> {
        if !self.exists().await? {
            return Ok(None);
        }
        let res = self
            .client
            .scroll(
                ScrollPointsBuilder::new(&self.collection)
                    .filter(question_key_filter(key))
                    .limit(1)
                    .with_payload(true),
            )
            .await
            .map_err(qerr)?;

        Ok(res
            .result
            .into_iter()
            .next()
            .map(|p| payload_to_record(p.id, p.payload)))
    }

    /// Enumerates stored records with paged scroll, at most `limit`.
    pub async fn list(&self, limit: usize) -> Result<Vec<FaqRecord>, FaqStoreError> {
        if !self.exists().await? {
            return Ok(Vec::new());
        }
        let mut out = Vec::new();
        let mut offset: Option<PointId> = None;

        while out.len() < limit {
            let page = SCROLL_PAGE.min((limit - out.len()).min(u32::MAX as usize) as u32);
            let mut builder = ScrollPointsBuilder::new(&self.collection)
                .limit(page)
                .with_payload(true);
            if let Some(o) = offset.take() {
                builder = builder.offset(o);
            }
            let res = self.client.scroll(builder).await.map_err(qerr)?;

            out.extend(
                res.result
                    .into_iter()
                    .map(|p| payload_to_record(p.id, p.payload)),
            );
            match res.next_page_offset {
                Some(next) => offset = Some(next),
                None => break,
            }
        }
        out.truncate(limit);
        Ok(out)
    }

    pub async fn count(&self) -> Result<usize, FaqStoreError> {
        if !self.exists().await? {
            return Ok(0);
        }
        let res = self
            .client
            .count(CountPointsBuilder::new(&self.collection).exact(true))
            .await
            .map_err(qerr)?;
        Ok(res.result.map(|c| c.count as usize).unwrap_or(0))
    }

    /// Drops the collection; a missing collection is already reset.
    pub async fn reset(&self) -> Result<(), FaqStoreError> {
        if !self.exists().await? {
            debug!(collection = %self.collection, "collection already absent");
            return Ok(());
        }
        self.client
            .delete_collection(&self.collection)
            .await
            .map_err(qerr)?;
        info!(collection = %self.collection, "collection deleted");
        Ok(())
    }
}

fn qerr(e: impl std::fmt::Display) -> FaqStoreError {
    FaqStoreError::Qdrant(e.to_string())
}

fn to_point(e: &EmbeddedFaq) -> Result<PointStruct, FaqStoreError> {
    let mut payload: HashMap<String, QValue> = HashMap::new();
    payload.insert(KEY_ID.into(), qstring(&e.record.id));
    payload.insert(KEY_QUESTION.into(), qstring(&e.record.question));
    payload.insert(KEY_ANSWER.into(), qstring(&e.record.answer));
    payload.insert(KEY_TEXT.into(), qstring(&e.text));
    payload.insert(KEY_QUESTION_KEY.into(), qstring(&e.record.question_key()));

    // Qdrant only accepts integer or UUID point ids.
    if e.record.id.len() != 36 {
        return Err(FaqStoreError::Qdrant(format!(
            "record id is not a UUID: {}",
            e.record.id
        )));
    }
    let pid: PointId = e.record.id.clone().into();

    let vectors = Vectors {
        vectors_options: Some(vectors::VectorsOptions::Vector(Vector {
            data: e.embedding.clone(),
            indices: None,
            vectors_count: None,
            vector: None,
        })),
    };

    Ok(PointStruct {
        id: Some(pid),
        payload,
        vectors: Some(vectors),
        ..Default::default()
    })
}

fn question_key_filter(key: &str) -> Filter {
    Filter {
        must: vec![Condition {
            condition_one_of: Some(ConditionOneOf::Field(FieldCondition {
                key: KEY_QUESTION_KEY.into(),
                r#match: Some(Match {
                    match_value: Some(MatchValue::Keyword(key.to_string())),
                }),
                ..Default::default()
            })),
        }],
        ..Default::default()
    }
}

fn qstring(s: &str) -> QValue {
    QValue {
        kind: Some(value::Kind::StringValue(s.to_string())),
    }
}

fn payload_str(payload: &HashMap<String, QValue>, key: &str) -> String {
    match payload.get(key).and_then(|v| v.kind.as_ref()) {
        Some(value::Kind::StringValue(s)) => s.clone(),
        _ => String::new(),
    }
}

fn payload_to_record(id: Option<PointId>, payload: HashMap<String, QValue>) -> FaqRecord {
    use qdrant_client::qdrant::point_id::PointIdOptions;

    let mut rec_id = payload_str(&payload, KEY_ID);
    if rec_id.is_empty() {
        rec_id = match id.and_then(|p| p.point_id_options) {
            Some(PointIdOptions::Uuid(s)) => s,
            Some(PointIdOptions::Num(n)) => n.to_string(),
            None => String::new(),
        };
    }
    FaqRecord {
        id: rec_id,
        question: payload_str(&payload, KEY_QUESTION),
        answer: payload_str(&payload, KEY_ANSWER),
    }
}
