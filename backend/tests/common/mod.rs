#![allow(dead_code)]

use async_trait::async_trait;
use bitcoin::secp256k1::PublicKey;
use chrono::{DateTime, Utc};
use lnresume::errors::LightningError;
use lnresume::server::AppState;
use lnresume::services::node_manager::{LightningClient, NodeRegistry};
use lnresume::services::resume::ResumeService;
use lnresume::utils::jwt::{Claims, issue_token};
use lnresume::utils::{
    CustomInvoice, InvoicePage, InvoicePageRequest, InvoiceStatus, PaymentSummary,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

pub const SECRET: &str = "test-secret";

/// Valid compressed secp256k1 keys (G, 2G, 3G).
pub const ALICE: &str = "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798";
pub const BOB: &str = "02c6047f9441ed7d6d3045406e95c07cd85c778e4b8cef3ca7abac09b95c709ee5";
pub const CAROL: &str = "02f9308a019258c31049344f85f89d5229b531c845836f99b08601f113bce036f9";

pub fn date(s: &str) -> DateTime<Utc> {
    format!("{s}T00:00:00Z").parse().unwrap()
}

pub fn payment(id: &str, destination: &str, day: &str) -> PaymentSummary {
    PaymentSummary {
        id: id.to_string(),
        destination: Some(destination.to_string()),
        amount_sat: 1_000,
        fee_sat: 1,
        payment_request: None,
        created_at: date(day),
    }
}

pub fn invoice(id: &str, day: &str) -> CustomInvoice {
    CustomInvoice {
        id: id.to_string(),
        memo: format!("invoice {id}"),
        value_sat: 500,
        received_sat: 0,
        payment_request: format!("lnbc{id}"),
        state: InvoiceStatus::Open,
        created_at: date(day),
        confirmed_at: None,
    }
}

/// In-memory node. Invoices are kept newest first and paged with `tok<offset>`
/// tokens; continuation pages use `page_size`.
pub struct MockNode {
    pub payments: Vec<PaymentSummary>,
    pub invoices: Vec<CustomInvoice>,
    pub aliases: HashMap<String, String>,
    pub page_size: u64,
    pub fail_payments: bool,
    pub fail_invoices: bool,
    pub alias_lookups: AtomicUsize,
}

impl MockNode {
    pub fn new() -> Self {
        Self {
            payments: Vec::new(),
            invoices: Vec::new(),
            aliases: HashMap::new(),
            page_size: 25,
            fail_payments: false,
            fail_invoices: false,
            alias_lookups: AtomicUsize::new(0),
        }
    }

    pub fn with_payments(mut self, payments: Vec<PaymentSummary>) -> Self {
        self.payments = payments;
        self
    }

    pub fn with_invoices(mut self, invoices: Vec<CustomInvoice>) -> Self {
        self.invoices = invoices;
        self
    }

    pub fn with_alias(mut self, public_key: &str, alias: &str) -> Self {
        self.aliases.insert(public_key.to_string(), alias.to_string());
        self
    }

    pub fn with_page_size(mut self, page_size: u64) -> Self {
        self.page_size = page_size;
        self
    }
}

#[async_trait]
impl LightningClient for MockNode {
    async fn list_payments(&self) -> Result<Vec<PaymentSummary>, LightningError> {
        if self.fail_payments {
            return Err(LightningError::RpcError("payments unavailable".into()));
        }
        Ok(self.payments.clone())
    }

    async fn list_invoices(
        &self,
        request: InvoicePageRequest,
    ) -> Result<InvoicePage, LightningError> {
        if self.fail_invoices {
            return Err(LightningError::RpcError("invoices unavailable".into()));
        }

        let (offset, limit) = match request {
            InvoicePageRequest::Latest { limit } => (0, limit as usize),
            InvoicePageRequest::Continue { token } => {
                let offset = token
                    .strip_prefix("tok")
                    .and_then(|n| n.parse::<usize>().ok())
                    .ok_or_else(|| LightningError::InvalidToken(token.clone()))?;
                (offset, self.page_size as usize)
            }
        };

        let end = (offset + limit).min(self.invoices.len());
        let invoices = self.invoices.get(offset..end).unwrap_or_default().to_vec();
        let next = (end < self.invoices.len()).then(|| format!("tok{end}"));
        Ok(InvoicePage { invoices, next })
    }

    async fn get_node_alias(&self, public_key: &PublicKey) -> Result<String, LightningError> {
        self.alias_lookups.fetch_add(1, Ordering::SeqCst);
        self.aliases
            .get(&public_key.to_string())
            .cloned()
            .ok_or_else(|| LightningError::NodeLookup(public_key.to_string()))
    }
}

pub fn state_with(node: MockNode, page_size: u64, rate_limit_per_minute: u32) -> AppState {
    let nodes = NodeRegistry::new().register("default", Arc::new(node));
    AppState::new(
        nodes,
        ResumeService::new(page_size),
        SECRET,
        rate_limit_per_minute,
    )
}

pub fn bearer(node_id: &str) -> String {
    issue_token(&Claims::new("alice", node_id, 3600), SECRET).unwrap()
}
