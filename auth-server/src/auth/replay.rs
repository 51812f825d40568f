use super::jwt::CLOCK_SKEW_LEEWAY;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::Mutex;

type NonceString = String;

/// Nonces of tokens that already produced a session, kept until the token
/// itself would no longer be accepted.
#[derive(Debug, Clone, Default)]
pub struct SpentNonces(Arc<Mutex<HashMap<NonceString, u64>>>);

impl SpentNonces {
    /// Records `nonce` as spent. Returns `false` if it was spent before.
    pub async fn consume(&self, nonce: &str, expires_at: u64) -> bool {
        let now = chrono::Utc::now().timestamp().max(0) as u64;
        let mut spent = self.0.lock().await;
        spent.retain(|_, exp| exp.saturating_add(CLOCK_SKEW_LEEWAY) >= now);
        if spent.contains_key(nonce) {
            return false;
        }
        spent.insert(nonce.to_string(), expires_at);
        true
    }

    #[cfg(test)]
    pub(crate) async fn len(&self) -> usize {
        self.0.lock().await.len()
    }

    #[cfg(test)]
    pub(crate) async fn is_empty(&self) -> bool {
        self.0.lock().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn in_future(seconds: i64) -> u64 {
        (chrono::Utc::now().timestamp() + seconds) as u64
    }

    #[tokio::test]
    async fn test_second_use_is_rejected() {
        let spent = SpentNonces::default();
        assert!(spent.consume("0x01", in_future(300)).await);
        assert!(!spent.consume("0x01", in_future(300)).await);
        assert!(spent.consume("0x02", in_future(300)).await);
        assert_eq!(spent.len().await, 2);
    }

    #[tokio::test]
    async fn test_expired_entries_are_pruned() {
        let spent = SpentNonces::default();
        assert!(spent.consume("0x01", in_future(-600)).await);
        // the stale entry is dropped on the next call
        assert!(spent.consume("0x02", in_future(300)).await);
        assert_eq!(spent.len().await, 1);
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let spent = SpentNonces::default();
        let clone = spent.clone();
        assert!(spent.is_empty().await);
        assert!(clone.consume("0x01", in_future(300)).await);
        assert!(!spent.consume("0x01", in_future(300)).await);
    }
}
