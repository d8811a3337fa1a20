//! Shared node-facing data types and helpers.

pub mod handlers_common;
pub mod invoice_token;
pub mod jwt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A completed outgoing payment as reported by the node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentSummary {
    /// Payment hash, hex encoded
    pub id: String,
    /// Public key of the final hop, when the route is known
    pub destination: Option<String>,
    pub amount_sat: u64,
    pub fee_sat: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_request: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Lifecycle state of an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Open,
    Settled,
    Canceled,
    Accepted,
    Unknown,
}

impl From<i32> for InvoiceStatus {
    fn from(state: i32) -> Self {
        match state {
            0 => InvoiceStatus::Open,
            1 => InvoiceStatus::Settled,
            2 => InvoiceStatus::Canceled,
            3 => InvoiceStatus::Accepted,
            _ => InvoiceStatus::Unknown,
        }
    }
}

/// An invoice created by the node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomInvoice {
    /// Payment hash, hex encoded
    pub id: String,
    pub memo: String,
    pub value_sat: u64,
    pub received_sat: u64,
    pub payment_request: String,
    pub state: InvoiceStatus,
    pub created_at: DateTime<Utc>,
    /// Settlement time, present only once the invoice is paid
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmed_at: Option<DateTime<Utc>>,
}

impl CustomInvoice {
    /// The date an invoice sorts by: when it was paid, or when it was created.
    pub fn effective_date(&self) -> DateTime<Utc> {
        self.confirmed_at.unwrap_or(self.created_at)
    }
}

/// Which page of invoices to read from the node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvoicePageRequest {
    /// The newest `limit` invoices.
    Latest { limit: u64 },
    /// The page addressed by a continuation token from a previous page.
    Continue { token: String },
}

impl InvoicePageRequest {
    pub fn new(token: Option<&str>, limit: u64) -> Self {
        match token {
            Some(token) => InvoicePageRequest::Continue {
                token: token.to_string(),
            },
            None => InvoicePageRequest::Latest { limit },
        }
    }
}

/// One page of invoices, newest first.
#[derive(Debug, Clone, Default)]
pub struct InvoicePage {
    pub invoices: Vec<CustomInvoice>,
    /// Token addressing the next (older) page; absent when exhausted
    pub next: Option<String>,
}

/// Converts unix seconds into a UTC timestamp.
pub fn unix_to_datetime(secs: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0)
}

/// Converts unix nanoseconds into a UTC timestamp.
pub fn unix_nanos_to_datetime(nanos: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(
        nanos.div_euclid(1_000_000_000),
        nanos.rem_euclid(1_000_000_000) as u32,
    )
}
