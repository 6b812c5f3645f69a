use std::fmt;
use std::path::Path;
use std::sync::Arc;

use readly_core::model::{KnowledgeMap, MasteryPolicy, QuizQuestion, Subtopic};
use readly_core::quiz::QuizResults;
use readly_core::roadmap::Roadmap;
use storage::repository::{KNOWLEDGE_MAPS_KEY, KeyValueRepository};

use crate::backend::{BackendClient, UploadResponse};
use crate::error::KnowledgeMapServiceError;

/// One entry of the persisted collection.
///
/// Entries that fail to parse are kept verbatim so a later write never drops them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredMap {
    Parsed { raw: String, map: KnowledgeMap },
    Malformed { raw: String },
}

impl StoredMap {
    fn from_raw(index: usize, raw: String) -> Self {
        match KnowledgeMap::parse(&raw) {
            Ok(map) => StoredMap::Parsed { raw, map },
            Err(error) => {
                tracing::warn!(index, %error, "skipping malformed knowledge map");
                StoredMap::Malformed { raw }
            }
        }
    }

    #[must_use]
    pub fn map(&self) -> Option<&KnowledgeMap> {
        match self {
            StoredMap::Parsed { map, .. } => Some(map),
            StoredMap::Malformed { .. } => None,
        }
    }

    #[must_use]
    pub fn raw(&self) -> &str {
        match self {
            StoredMap::Parsed { raw, .. } | StoredMap::Malformed { raw } => raw,
        }
    }
}

/// Outcome of importing a PDF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    pub maps: Vec<StoredMap>,
    pub message: String,
    pub chunks_processed: u32,
}

/// Reads and writes the knowledge map collection.
///
/// All maps live under one key as a JSON array of map documents and every
/// update rewrites the whole array.
#[derive(Clone)]
pub struct KnowledgeMapService {
    kv: Arc<dyn KeyValueRepository>,
    backend: Arc<BackendClient>,
    policy: MasteryPolicy,
}

impl KnowledgeMapService {
    #[must_use]
    pub fn new(kv: Arc<dyn KeyValueRepository>, backend: Arc<BackendClient>) -> Self {
        Self {
            kv,
            backend,
            policy: MasteryPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_policy(mut self, policy: MasteryPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn policy(&self) -> MasteryPolicy {
        self.policy
    }

    /// Load every stored map, keeping malformed entries as raw strings.
    ///
    /// # Errors
    ///
    /// Returns `KnowledgeMapServiceError::CorruptCollection` if the stored value is
    /// not a JSON array of strings, or storage errors.
    pub async fn load(&self) -> Result<Vec<StoredMap>, KnowledgeMapServiceError> {
        let Some(raw) = self.kv.get_value(KNOWLEDGE_MAPS_KEY).await? else {
            return Ok(Vec::new());
        };
        let documents: Vec<String> = serde_json::from_str(&raw).map_err(|err| {
            tracing::warn!(error = %err, "stored knowledge map collection is unreadable");
            KnowledgeMapServiceError::CorruptCollection(err.to_string())
        })?;
        Ok(documents
            .into_iter()
            .enumerate()
            .map(|(index, raw)| StoredMap::from_raw(index, raw))
            .collect())
    }

    /// Only the maps that parsed.
    ///
    /// # Errors
    ///
    /// See [`KnowledgeMapService::load`].
    pub async fn maps(&self) -> Result<Vec<KnowledgeMap>, KnowledgeMapServiceError> {
        Ok(self
            .load()
            .await?
            .into_iter()
            .filter_map(|entry| match entry {
                StoredMap::Parsed { map, .. } => Some(map),
                StoredMap::Malformed { .. } => None,
            })
            .collect())
    }

    /// Replace the whole collection with freshly generated documents.
    ///
    /// # Errors
    ///
    /// Returns storage errors if the collection cannot be written.
    pub async fn replace_all(
        &self,
        documents: Vec<String>,
    ) -> Result<Vec<StoredMap>, KnowledgeMapServiceError> {
        self.persist_documents(&documents).await?;
        tracing::info!(count = documents.len(), "replaced knowledge maps");
        Ok(documents
            .into_iter()
            .enumerate()
            .map(|(index, raw)| StoredMap::from_raw(index, raw))
            .collect())
    }

    /// Send a PDF to the backend and store the maps it returns.
    ///
    /// Existing maps stay untouched when reading or uploading fails.
    ///
    /// # Errors
    ///
    /// Returns `KnowledgeMapServiceError::ReadFile`, backend errors, or storage
    /// errors.
    pub async fn import_pdf(&self, path: &Path) -> Result<ImportSummary, KnowledgeMapServiceError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| KnowledgeMapServiceError::ReadFile {
                path: path.to_path_buf(),
                source,
            })?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        let UploadResponse {
            maps,
            message,
            chunks_processed,
        } = self.backend.upload_pdf(&file_name, bytes).await.map_err(|err| {
            tracing::warn!(error = %err, file = %file_name, "upload failed");
            err
        })?;

        let maps = self.replace_all(maps).await?;
        Ok(ImportSummary {
            maps,
            message,
            chunks_processed,
        })
    }

    /// First subtopic with this title across all maps.
    ///
    /// # Errors
    ///
    /// Returns `KnowledgeMapServiceError::SubtopicNotFound` if no map has it.
    pub async fn subtopic(&self, title: &str) -> Result<Subtopic, KnowledgeMapServiceError> {
        self.maps()
            .await?
            .iter()
            .find_map(|map| map.subtopic(title).cloned())
            .ok_or_else(|| KnowledgeMapServiceError::SubtopicNotFound {
                title: title.to_string(),
            })
    }

    /// Replace every subtopic titled like `updated` in every map and persist.
    /// Returns how many subtopics were replaced.
    ///
    /// # Errors
    ///
    /// Returns serialization or storage errors.
    pub async fn save_subtopic(&self, updated: &Subtopic) -> Result<usize, KnowledgeMapServiceError> {
        self.update_maps(|map| map.replace_subtopic(updated)).await
    }

    /// Add generated questions to every subtopic with this title and persist.
    ///
    /// # Errors
    ///
    /// Returns `KnowledgeMapServiceError::SubtopicNotFound` when no subtopic
    /// matches, or serialization and storage errors.
    pub async fn append_questions(
        &self,
        title: &str,
        questions: &[QuizQuestion],
    ) -> Result<usize, KnowledgeMapServiceError> {
        let touched = self
            .update_maps(|map| {
                let mut appended = 0;
                for sub in map.subtopics.iter_mut().filter(|sub| sub.title == title) {
                    sub.append_questions(questions.iter().cloned());
                    appended += 1;
                }
                appended
            })
            .await?;
        if touched == 0 {
            return Err(KnowledgeMapServiceError::SubtopicNotFound {
                title: title.to_string(),
            });
        }
        Ok(touched)
    }

    /// Fold a finished quiz into the subtopic's totals and persist it.
    ///
    /// `subtopic` is the working copy used for the quiz, including any
    /// questions appended while it ran.
    ///
    /// # Errors
    ///
    /// Returns `KnowledgeMapServiceError::KnowledgeMap` for an impossible tally,
    /// or serialization and storage errors.
    pub async fn complete_quiz(
        &self,
        mut subtopic: Subtopic,
        results: &QuizResults,
    ) -> Result<Subtopic, KnowledgeMapServiceError> {
        let status = subtopic.record_quiz(results.answered, results.correct, &self.policy)?;
        let replaced = self.save_subtopic(&subtopic).await?;
        tracing::info!(
            title = %subtopic.title,
            answered = results.answered,
            correct = results.correct,
            status = status.as_str(),
            replaced,
            "quiz result saved"
        );
        Ok(subtopic)
    }

    /// Lessons derived from the stored maps.
    ///
    /// # Errors
    ///
    /// See [`KnowledgeMapService::load`].
    pub async fn roadmap(&self) -> Result<Roadmap, KnowledgeMapServiceError> {
        Ok(Roadmap::from_knowledge_maps(&self.maps().await?))
    }

    async fn update_maps<F>(&self, mut apply: F) -> Result<usize, KnowledgeMapServiceError>
    where
        F: FnMut(&mut KnowledgeMap) -> usize,
    {
        let entries = self.load().await?;
        let mut touched = 0;
        let mut documents = Vec::with_capacity(entries.len());
        for entry in entries {
            match entry {
                StoredMap::Parsed { raw, mut map } => {
                    let changed = apply(&mut map);
                    if changed > 0 {
                        touched += changed;
                        documents.push(map.to_json()?);
                    } else {
                        documents.push(raw);
                    }
                }
                StoredMap::Malformed { raw } => documents.push(raw),
            }
        }
        if touched > 0 {
            self.persist_documents(&documents).await?;
        }
        Ok(touched)
    }

    async fn persist_documents(&self, documents: &[String]) -> Result<(), KnowledgeMapServiceError> {
        let value = serde_json::to_string(documents)
            .map_err(|err| KnowledgeMapServiceError::CorruptCollection(err.to_string()))?;
        self.kv.put_value(KNOWLEDGE_MAPS_KEY, &value).await?;
        Ok(())
    }
}

impl fmt::Debug for KnowledgeMapService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KnowledgeMapService")
            .field("kv", &"<key value repository>")
            .field("backend", &self.backend.config().base_url)
            .field("policy", &self.policy)
            .finish()
    }
}
