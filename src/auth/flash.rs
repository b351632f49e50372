//! One-shot session values: written on one request, consumed by the next
//! read and gone afterwards.

use tower_sessions::{session, Session};

pub const GREETING: &str = "flash.greeting";
pub const STATUS: &str = "flash.status";

pub async fn put(session: &Session, key: &str, value: &str) -> Result<(), session::Error> {
    session.insert(key, value.to_string()).await
}

/// Read and clear in one step; returns `None` when nothing was flashed.
pub async fn take(session: &Session, key: &str) -> Option<String> {
    session.remove::<String>(key).await.ok().flatten()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tower_sessions::MemoryStore;

    #[tokio::test]
    async fn flash_is_read_once() {
        let store = std::sync::Arc::new(MemoryStore::default());
        let session = Session::new(None, store, None);

        put(&session, GREETING, "Hello, Ada").await.unwrap();
        assert_eq!(take(&session, GREETING).await.as_deref(), Some("Hello, Ada"));
        assert_eq!(take(&session, GREETING).await, None);
    }

    #[tokio::test]
    async fn missing_flash_is_none() {
        let store = std::sync::Arc::new(MemoryStore::default());
        let session = Session::new(None, store, None);
        assert_eq!(take(&session, STATUS).await, None);
    }
}
