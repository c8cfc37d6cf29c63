//! Saved reading positions, keyed by book title and mode

use super::{KeyValueStore, StorageResult};
use crate::error::StorageError;
use crate::types::{ReadingMode, ReadingPosition};
use std::sync::Arc;

/// Key recording the title of the most recently read book
pub const LAST_BOOK_KEY: &str = "last-book";

/// Storage key of a book's position in one mode
pub fn position_key(title: &str, mode: ReadingMode) -> String {
    match mode {
        ReadingMode::Paged => format!("reading-position-{}", title),
        ReadingMode::Flow => format!("flow-position-{}", title),
    }
}

fn encode(position: &ReadingPosition) -> StorageResult<String> {
    serde_json::to_string(position).map_err(|e| StorageError::Serialization(e.to_string()))
}

fn decode(raw: &str) -> StorageResult<ReadingPosition> {
    serde_json::from_str(raw).map_err(|e| StorageError::Serialization(e.to_string()))
}

/// Best-effort persistence of reading positions.
///
/// Nothing here returns an error: failed writes are logged and dropped,
/// unreadable values read back as `None`.
#[derive(Clone)]
pub struct PositionStore {
    store: Arc<dyn KeyValueStore>,
}

impl PositionStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Save the position of `title` in `mode` and mark it the last book
    pub async fn save(&self, title: &str, mode: ReadingMode, position: &ReadingPosition) {
        let value = match encode(position) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Could not save {} position for '{}': {}", mode.as_str(), title, e);
                return;
            }
        };

        if let Err(e) = self.store.set(&position_key(title, mode), &value).await {
            tracing::warn!("Could not save {} position for '{}': {}", mode.as_str(), title, e);
            return;
        }
        if let Err(e) = self.store.set(LAST_BOOK_KEY, title).await {
            tracing::warn!("Could not record last book '{}': {}", title, e);
        }
    }

    /// Load the saved position of `title` in `mode`.
    ///
    /// A flow position without a word index starts at the first word; a paged
    /// position never carries one.
    pub async fn load(&self, title: &str, mode: ReadingMode) -> Option<ReadingPosition> {
        let raw = match self.store.get(&position_key(title, mode)).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!("Could not read {} position for '{}': {}", mode.as_str(), title, e);
                return None;
            }
        };

        let mut position = match decode(&raw) {
            Ok(position) => position,
            Err(e) => {
                tracing::warn!("Ignoring malformed {} position for '{}': {}", mode.as_str(), title, e);
                return None;
            }
        };

        match mode {
            ReadingMode::Paged => position.word_index = None,
            ReadingMode::Flow => position.word_index = Some(position.word_index.unwrap_or(0)),
        }
        Some(position)
    }

    /// Title of the most recently saved book
    pub async fn last_book_title(&self) -> Option<String> {
        match self.store.get(LAST_BOOK_KEY).await {
            Ok(title) => title.filter(|t| !t.is_empty()),
            Err(e) => {
                tracing::warn!("Could not read last book: {}", e);
                None
            }
        }
    }

    /// Forget both saved positions of `title`
    pub async fn clear(&self, title: &str) {
        for mode in [ReadingMode::Paged, ReadingMode::Flow] {
            if let Err(e) = self.store.delete(&position_key(title, mode)).await {
                tracing::warn!("Could not clear {} position for '{}': {}", mode.as_str(), title, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{LocalStore, MemoryStore};

    fn positions() -> (Arc<MemoryStore>, PositionStore) {
        let store = Arc::new(MemoryStore::new());
        (store.clone(), PositionStore::new(store))
    }

    #[tokio::test]
    async fn test_modes_are_independent() {
        let (_, positions) = positions();
        positions
            .save("Dune", ReadingMode::Paged, &ReadingPosition::page(1, 2))
            .await;
        positions
            .save("Dune", ReadingMode::Flow, &ReadingPosition::word(3, 4, 5))
            .await;

        assert_eq!(
            positions.load("Dune", ReadingMode::Paged).await,
            Some(ReadingPosition::page(1, 2))
        );
        assert_eq!(
            positions.load("Dune", ReadingMode::Flow).await,
            Some(ReadingPosition::word(3, 4, 5))
        );
        assert_eq!(positions.load("Emma", ReadingMode::Paged).await, None);
    }

    #[tokio::test]
    async fn test_save_records_last_book() {
        let (_, positions) = positions();
        assert_eq!(positions.last_book_title().await, None);
        positions
            .save("Dune", ReadingMode::Paged, &ReadingPosition::page(0, 0))
            .await;
        assert_eq!(positions.last_book_title().await, Some("Dune".to_string()));
    }

    #[tokio::test]
    async fn test_stored_shape() {
        let (store, positions) = positions();
        positions
            .save("Dune", ReadingMode::Flow, &ReadingPosition::word(0, 1, 2))
            .await;
        let raw = store.get("flow-position-Dune").await.unwrap().unwrap();
        assert_eq!(raw, r#"{"chapterIndex":0,"pageIndex":1,"wordIndex":2}"#);
    }

    #[tokio::test]
    async fn test_malformed_values_read_as_absent() {
        let (store, positions) = positions();
        for raw in [
            "not json",
            r#"{"chapterIndex":-1,"pageIndex":0}"#,
            r#"{"chapterIndex":1.5,"pageIndex":0}"#,
            r#"{"pageIndex":0}"#,
            "[]",
        ] {
            store.set("reading-position-Dune", raw).await.unwrap();
            assert_eq!(positions.load("Dune", ReadingMode::Paged).await, None, "{}", raw);
        }
    }

    #[tokio::test]
    async fn test_word_index_normalized_by_mode() {
        let (store, positions) = positions();
        store
            .set("reading-position-Dune", r#"{"chapterIndex":1,"pageIndex":2,"wordIndex":3}"#)
            .await
            .unwrap();
        store
            .set("flow-position-Dune", r#"{"chapterIndex":1,"pageIndex":2}"#)
            .await
            .unwrap();

        assert_eq!(
            positions.load("Dune", ReadingMode::Paged).await,
            Some(ReadingPosition::page(1, 2))
        );
        assert_eq!(
            positions.load("Dune", ReadingMode::Flow).await,
            Some(ReadingPosition::word(1, 2, 0))
        );
    }

    #[tokio::test]
    async fn test_clear() {
        let (_, positions) = positions();
        positions
            .save("Dune", ReadingMode::Paged, &ReadingPosition::page(1, 2))
            .await;
        positions.clear("Dune").await;
        assert_eq!(positions.load("Dune", ReadingMode::Paged).await, None);
    }

    #[tokio::test]
    async fn test_long_title_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let positions = PositionStore::new(Arc::new(LocalStore::new(dir.path())));
        let title = "Война и мир. Том первый. Часть первая, вторая и третья (издание)";

        positions
            .save(title, ReadingMode::Paged, &ReadingPosition::page(3, 4))
            .await;
        assert_eq!(
            positions.load(title, ReadingMode::Paged).await,
            Some(ReadingPosition::page(3, 4))
        );
        assert_eq!(positions.last_book_title().await, Some(title.to_string()));
    }
}
