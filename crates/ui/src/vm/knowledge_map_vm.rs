use readly_core::model::{KnowledgeMap, Subtopic};
use services::{ImportSummary, KnowledgeMapServiceError, StoredMap};

use crate::views::ViewError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubtopicCardVm {
    pub title: String,
    pub description: String,
    pub key_concepts: String,
    pub status_label: &'static str,
    pub mastery_percent: u32,
    pub answered: u32,
    pub question_count: usize,
    pub mastered: bool,
}

impl From<&Subtopic> for SubtopicCardVm {
    fn from(subtopic: &Subtopic) -> Self {
        Self {
            title: subtopic.title.clone(),
            description: subtopic.description.clone(),
            key_concepts: subtopic.key_concepts.join(", "),
            status_label: subtopic.status.as_str(),
            mastery_percent: subtopic.mastery_percent(),
            answered: subtopic.answered,
            question_count: subtopic.quiz.len(),
            mastered: subtopic.is_mastered(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KnowledgeMapCardVm {
    pub topic: String,
    pub mastered: usize,
    pub subtopics: Vec<SubtopicCardVm>,
}

impl From<&KnowledgeMap> for KnowledgeMapCardVm {
    fn from(map: &KnowledgeMap) -> Self {
        Self {
            topic: map.topic.clone(),
            mastered: map.mastered_count(),
            subtopics: map.subtopics.iter().map(SubtopicCardVm::from).collect(),
        }
    }
}

/// Everything the library page shows about stored maps.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LibraryVm {
    pub maps: Vec<KnowledgeMapCardVm>,
    /// Stored documents that could not be parsed; kept in storage, not shown.
    pub skipped: usize,
}

impl LibraryVm {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }
}

#[must_use]
pub fn map_library(stored: &[StoredMap]) -> LibraryVm {
    let maps: Vec<KnowledgeMapCardVm> = stored
        .iter()
        .filter_map(StoredMap::map)
        .map(KnowledgeMapCardVm::from)
        .collect();
    let skipped = stored.len() - maps.len();
    LibraryVm { maps, skipped }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportResultVm {
    pub message: String,
    pub chunks_processed: u32,
    pub loaded: usize,
    pub skipped: usize,
}

impl From<&ImportSummary> for ImportResultVm {
    fn from(summary: &ImportSummary) -> Self {
        let library = map_library(&summary.maps);
        Self {
            message: summary.message.clone(),
            chunks_processed: summary.chunks_processed,
            loaded: library.maps.len(),
            skipped: library.skipped,
        }
    }
}

#[must_use]
pub fn map_knowledge_map_error(err: &KnowledgeMapServiceError) -> ViewError {
    match err {
        KnowledgeMapServiceError::SubtopicNotFound { .. } => ViewError::NotFound,
        KnowledgeMapServiceError::ReadFile { .. } => ViewError::FileUnreadable,
        KnowledgeMapServiceError::Backend(services::BackendError::NotPdf { .. }) => {
            ViewError::NotPdf
        }
        KnowledgeMapServiceError::Backend(_) => ViewError::Backend,
        _ => ViewError::Unknown,
    }
}

/// Load every stored map for display.
///
/// # Errors
///
/// Returns `ViewError::Unknown` when storage fails.
pub async fn load_library(
    maps: &services::KnowledgeMapService,
) -> Result<LibraryVm, ViewError> {
    let stored = maps.load().await.map_err(|err| {
        tracing::warn!(error = %err, "failed to load knowledge maps");
        map_knowledge_map_error(&err)
    })?;
    Ok(map_library(&stored))
}

/// Upload a PDF from disk and replace the stored maps.
///
/// # Errors
///
/// Returns `ViewError::NotPdf`, `ViewError::FileUnreadable` or `ViewError::Backend`
/// depending on where the import failed.
pub async fn import_pdf(
    maps: &services::KnowledgeMapService,
    path: &str,
) -> Result<ImportResultVm, ViewError> {
    let path = path.trim();
    if path.is_empty() {
        return Err(ViewError::FileUnreadable);
    }
    let summary = maps
        .import_pdf(std::path::Path::new(path))
        .await
        .map_err(|err| {
            tracing::warn!(error = %err, path, "pdf import failed");
            map_knowledge_map_error(&err)
        })?;
    Ok(ImportResultVm::from(&summary))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAP: &str = r#"{"topic":"Plants","subtopics":[
        {"title":"Roots","description":"How roots work.","key_concepts":["soil","water"],
         "status":"unmastered","answered":4,"correct":3,"quiz":[]}
    ]}"#;

    #[test]
    fn library_counts_skipped_documents() {
        let stored = vec![
            StoredMap::Parsed {
                raw: MAP.to_string(),
                map: KnowledgeMap::parse(MAP).unwrap(),
            },
            StoredMap::Malformed {
                raw: "{nope".to_string(),
            },
        ];
        let library = map_library(&stored);
        assert_eq!(library.maps.len(), 1);
        assert_eq!(library.skipped, 1);

        let card = &library.maps[0].subtopics[0];
        assert_eq!(card.key_concepts, "soil, water");
        assert_eq!(card.mastery_percent, 75);
        assert!(!card.mastered);
    }

    #[test]
    fn not_pdf_maps_to_its_own_error() {
        let err = KnowledgeMapServiceError::Backend(services::BackendError::NotPdf {
            file_name: "notes.txt".to_string(),
        });
        assert_eq!(map_knowledge_map_error(&err), ViewError::NotPdf);
    }
}
