//! Transaction history ("resume") paginator.
//!
//! Payments come from the node as one full list while invoices are paged by a
//! continuation token. A resume page is built around one invoice page:
//!
//! 1. the invoice page fixes a date window, from its oldest invoice to its
//!    newest one;
//! 2. payments are kept when they fall inside that window. The first page has
//!    no upper bound, later pages stop strictly below the newest invoice so a
//!    payment is never delivered twice;
//! 3. invoices and kept payments are merged newest first.
//!
//! The token of the invoice page is handed back unchanged as the token of the
//! resume page.

use crate::errors::LightningError;
use crate::services::feed_fetcher::{Feeds, fetch_feeds};
use crate::services::node_manager::LightningClient;
use crate::utils::{CustomInvoice, PaymentSummary};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Invoices per page when no continuation token is supplied.
pub const DEFAULT_PAGE_SIZE: u64 = 25;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentEntry {
    /// Destination alias, or a key prefix when the peer could not be resolved
    pub alias: Option<String>,
    pub date: DateTime<Utc>,
    #[serde(flatten)]
    pub payment: PaymentSummary,
}

impl PaymentEntry {
    pub fn new(payment: PaymentSummary, alias: Option<String>) -> Self {
        Self {
            alias,
            date: payment.created_at,
            payment,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceEntry {
    pub date: DateTime<Utc>,
    #[serde(flatten)]
    pub invoice: CustomInvoice,
}

impl InvoiceEntry {
    pub fn new(invoice: CustomInvoice) -> Self {
        Self {
            date: invoice.effective_date(),
            invoice,
        }
    }
}

/// One row of the transaction history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResumeEntry {
    Payment(PaymentEntry),
    Invoice(InvoiceEntry),
}

impl ResumeEntry {
    pub fn date(&self) -> DateTime<Utc> {
        match self {
            ResumeEntry::Payment(entry) => entry.date,
            ResumeEntry::Invoice(entry) => entry.date,
        }
    }

    pub fn is_payment(&self) -> bool {
        matches!(self, ResumeEntry::Payment(_))
    }
}

/// A page of the merged history as returned to clients.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResumePage {
    /// Token for the next page; empty when the history is exhausted
    #[serde(default)]
    pub token: String,
    pub entries: Vec<ResumeEntry>,
}

impl ResumePage {
    pub fn next_token(&self) -> Option<&str> {
        Some(self.token.as_str()).filter(|t| !t.is_empty())
    }
}

/// Date range a page's payments must fall in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// Date of the oldest invoice on the page (exclusive lower bound)
    pub oldest: DateTime<Utc>,
    /// Date of the newest invoice on the page
    pub newest: DateTime<Utc>,
    /// The first page is open-ended towards the present
    pub first_page: bool,
}

impl PageWindow {
    /// Window spanned by an invoice page ordered newest first, or `None` for
    /// an empty page.
    pub fn from_invoices(invoices: &[InvoiceEntry], first_page: bool) -> Option<Self> {
        let newest = invoices.first()?.date;
        let oldest = invoices.last()?.date;
        Some(Self {
            oldest,
            newest,
            first_page,
        })
    }

    pub fn admits(&self, date: DateTime<Utc>) -> bool {
        let above_lower = date > self.oldest;
        let below_upper = self.first_page || date < self.newest;
        above_lower && below_upper
    }
}

/// Selects the payments that belong on a page.
///
/// With no invoices on the page there is no window. On the first page that
/// means the node has no invoices at all and every payment is shown; on later
/// pages every payment has already been bounded by an earlier window, so none
/// are repeated.
pub fn select_payments(
    payments: Vec<PaymentEntry>,
    window: Option<PageWindow>,
    first_page: bool,
) -> Vec<PaymentEntry> {
    match window {
        Some(window) => payments
            .into_iter()
            .filter(|payment| window.admits(payment.date))
            .collect(),
        None if first_page => payments,
        None => Vec::new(),
    }
}

/// Builds one resume page from fetched feeds.
///
/// Entries are ordered by date descending. Equal dates keep their
/// concatenation order: invoices (in page order) before payments.
pub fn merge_resume(feeds: Feeds, first_page: bool) -> ResumePage {
    let Feeds {
        payments,
        invoices,
        next,
    } = feeds;

    let window = PageWindow::from_invoices(&invoices, first_page);
    let payments = select_payments(payments, window, first_page);

    let mut entries: Vec<ResumeEntry> = invoices
        .into_iter()
        .map(ResumeEntry::Invoice)
        .chain(payments.into_iter().map(ResumeEntry::Payment))
        .collect();
    entries.sort_by(|a, b| b.date().cmp(&a.date()));

    ResumePage {
        token: next.unwrap_or_default(),
        entries,
    }
}

/// Produces resume pages for a node.
#[derive(Debug, Clone, Copy)]
pub struct ResumeService {
    page_size: u64,
}

impl Default for ResumeService {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl ResumeService {
    pub fn new(page_size: u64) -> Self {
        Self {
            page_size: page_size.max(1),
        }
    }

    /// Returns the page addressed by `token`, or the first page.
    /// An empty token is treated as no token.
    pub async fn get_resume(
        &self,
        node: &dyn LightningClient,
        token: Option<&str>,
    ) -> Result<ResumePage, LightningError> {
        let token = token.filter(|t| !t.is_empty());
        let feeds = fetch_feeds(node, token, self.page_size).await?;

        tracing::debug!(
            "Merging {} payments with {} invoices (first page: {})",
            feeds.payments.len(),
            feeds.invoices.len(),
            token.is_none()
        );

        Ok(merge_resume(feeds, token.is_none()))
    }
}
