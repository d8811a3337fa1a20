//! Accumulates resume pages on the consumer side.

use crate::services::resume::{ResumeEntry, ResumePage};
use async_trait::async_trait;

/// Where pages come from.
#[async_trait]
pub trait PageSource: Send + Sync {
    type Error: std::fmt::Display + Send;

    async fn fetch_page(&self, token: Option<&str>) -> Result<ResumePage, Self::Error>;
}

/// Entries shown so far and the token for the next request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PagerState {
    pub entries: Vec<ResumeEntry>,
    pub token: Option<String>,
}

impl PagerState {
    /// State after the first page has been received.
    pub fn first(page: ResumePage) -> Self {
        let token = page.next_token().map(str::to_string);
        Self {
            entries: page.entries,
            token,
        }
    }

    /// Appends an older page after the accumulated entries and takes its token.
    pub fn append(&self, page: ResumePage) -> Self {
        let token = page.next_token().map(str::to_string);
        let mut entries = Vec::with_capacity(self.entries.len() + page.entries.len());
        entries.extend(self.entries.iter().cloned());
        entries.extend(page.entries);
        Self { entries, token }
    }

    pub fn has_more(&self) -> bool {
        self.token.is_some()
    }
}

/// Drives pagination against a [`PageSource`].
pub struct ResumePager<S> {
    source: S,
    state: PagerState,
}

impl<S: PageSource> ResumePager<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            state: PagerState::default(),
        }
    }

    pub fn state(&self) -> &PagerState {
        &self.state
    }

    pub fn entries(&self) -> &[ResumeEntry] {
        &self.state.entries
    }

    /// Loads the first page, replacing anything accumulated.
    pub async fn load_first(&mut self) -> Result<(), S::Error> {
        let page = self.source.fetch_page(None).await.inspect_err(|e| {
            tracing::warn!("Failed to load transactions: {}", e);
        })?;
        self.state = PagerState::first(page);
        Ok(())
    }

    /// Requests the next page with the stored token.
    ///
    /// Returns `false` without a request once the history is exhausted. On
    /// error the accumulated entries and token are kept.
    pub async fn show_more(&mut self) -> Result<bool, S::Error> {
        let Some(token) = self.state.token.clone() else {
            return Ok(false);
        };

        let page = self
            .source
            .fetch_page(Some(token.as_str()))
            .await
            .inspect_err(|e| tracing::warn!("Failed to load more transactions: {}", e))?;
        self.state = self.state.append(page);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::resume::InvoiceEntry;
    use crate::utils::{CustomInvoice, InvoiceStatus, unix_to_datetime};
    use std::collections::HashMap;
    use std::sync::Mutex;

    fn entry(id: &str, secs: i64) -> ResumeEntry {
        ResumeEntry::Invoice(InvoiceEntry::new(CustomInvoice {
            id: id.to_string(),
            memo: String::new(),
            value_sat: 1,
            received_sat: 0,
            payment_request: String::new(),
            state: InvoiceStatus::Open,
            created_at: unix_to_datetime(secs).unwrap(),
            confirmed_at: None,
        }))
    }

    fn page(ids: &[(&str, i64)], token: &str) -> ResumePage {
        ResumePage {
            token: token.to_string(),
            entries: ids.iter().map(|(id, secs)| entry(id, *secs)).collect(),
        }
    }

    #[test]
    fn append_keeps_order_and_replaces_token() {
        let state = PagerState::first(page(&[("c", 30), ("b", 20)], "t1"));
        let next = state.append(page(&[("a", 10)], ""));

        assert_eq!(next.entries, vec![entry("c", 30), entry("b", 20), entry("a", 10)]);
        assert_eq!(next.token, None);
        // the previous state is untouched
        assert_eq!(state.entries.len(), 2);
        assert_eq!(state.token.as_deref(), Some("t1"));
    }

    /// Serves canned pages by token and fails for unknown ones.
    struct CannedPages {
        pages: HashMap<Option<String>, ResumePage>,
        requests: Mutex<Vec<Option<String>>>,
    }

    #[async_trait]
    impl PageSource for CannedPages {
        type Error = String;

        async fn fetch_page(&self, token: Option<&str>) -> Result<ResumePage, String> {
            let key = token.map(str::to_string);
            self.requests.lock().unwrap().push(key.clone());
            self.pages
                .get(&key)
                .cloned()
                .ok_or_else(|| format!("no page for {key:?}"))
        }
    }

    #[tokio::test]
    async fn walks_pages_until_exhausted() {
        let mut pages = HashMap::new();
        pages.insert(None, page(&[("c", 30)], "t1"));
        pages.insert(Some("t1".to_string()), page(&[("b", 20)], "t2"));
        pages.insert(Some("t2".to_string()), page(&[("a", 10)], ""));
        let mut pager = ResumePager::new(CannedPages {
            pages,
            requests: Mutex::new(Vec::new()),
        });

        pager.load_first().await.unwrap();
        assert!(pager.show_more().await.unwrap());
        assert!(pager.show_more().await.unwrap());
        assert!(!pager.show_more().await.unwrap());

        assert_eq!(
            pager.entries(),
            &[entry("c", 30), entry("b", 20), entry("a", 10)]
        );
        assert_eq!(
            *pager.source.requests.lock().unwrap(),
            vec![None, Some("t1".to_string()), Some("t2".to_string())]
        );
    }

    #[tokio::test]
    async fn failed_request_keeps_entries_and_token() {
        let mut pages = HashMap::new();
        pages.insert(None, page(&[("c", 30)], "missing"));
        let mut pager = ResumePager::new(CannedPages {
            pages,
            requests: Mutex::new(Vec::new()),
        });

        pager.load_first().await.unwrap();
        let before = pager.state().clone();
        assert!(pager.show_more().await.is_err());
        assert_eq!(pager.state(), &before);
    }
}
