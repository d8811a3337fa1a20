//! Lightning node abstraction and the LND implementation.
//!
//! The resume feed only needs three reads from a node: the full list of
//! completed payments, one page of invoices, and a node alias lookup. They are
//! expressed by the [`LightningClient`] trait so the services can run against
//! any backend, including in-memory doubles in tests.

use crate::errors::LightningError;
use crate::utils::invoice_token::InvoiceCursor;
use crate::utils::{
    CustomInvoice, InvoicePage, InvoicePageRequest, InvoiceStatus, PaymentSummary,
    unix_nanos_to_datetime, unix_to_datetime,
};
use async_trait::async_trait;
use bitcoin::secp256k1::PublicKey;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tonic_lnd::lnrpc;

const HTLC_SUCCEEDED: i32 = 1;

/// Read access to a Lightning node.
#[async_trait]
pub trait LightningClient: Send + Sync {
    /// Every completed outgoing payment known to the node.
    async fn list_payments(&self) -> Result<Vec<PaymentSummary>, LightningError>;

    /// One page of invoices, newest first.
    async fn list_invoices(
        &self,
        request: InvoicePageRequest,
    ) -> Result<InvoicePage, LightningError>;

    /// Human-readable alias announced by a peer.
    async fn get_node_alias(&self, public_key: &PublicKey) -> Result<String, LightningError>;
}

/// Connection details for an LND node.
#[derive(Debug, Clone)]
pub struct LndConnection {
    /// gRPC endpoint, e.g. `https://127.0.0.1:10009`
    pub address: String,
    pub macaroon: PathBuf,
    pub cert: PathBuf,
}

pub struct LndNode {
    client: Mutex<tonic_lnd::Client>,
}

impl LndNode {
    pub async fn new(connection: LndConnection) -> Result<Self, LightningError> {
        let client = tonic_lnd::connect(
            connection.address.clone(),
            connection.cert.clone(),
            connection.macaroon.clone(),
        )
        .await
        .map_err(|e| LightningError::ConnectionError(e.to_string()))?;

        tracing::info!("Connected to LND node at {}", connection.address);
        Ok(Self {
            client: Mutex::new(client),
        })
    }

    /// Clones the lightning service handle so calls don't serialize on the lock.
    async fn lightning(&self) -> tonic_lnd::LightningClient {
        self.client.lock().await.lightning().clone()
    }
}

#[async_trait]
impl LightningClient for LndNode {
    async fn list_payments(&self) -> Result<Vec<PaymentSummary>, LightningError> {
        let response = self
            .lightning()
            .await
            .list_payments(lnrpc::ListPaymentsRequest {
                include_incomplete: false,
                ..Default::default()
            })
            .await?
            .into_inner();

        response.payments.into_iter().map(payment_from_lnd).collect()
    }

    async fn list_invoices(
        &self,
        request: InvoicePageRequest,
    ) -> Result<InvoicePage, LightningError> {
        let (index_offset, limit) = match request {
            InvoicePageRequest::Latest { limit } => (0, limit),
            InvoicePageRequest::Continue { token } => {
                let cursor = InvoiceCursor::decode(&token)?;
                (cursor.offset, cursor.limit)
            }
        };

        let response = self
            .lightning()
            .await
            .list_invoices(lnrpc::ListInvoiceRequest {
                index_offset,
                num_max_invoices: limit,
                reversed: true,
                ..Default::default()
            })
            .await?
            .into_inner();

        // LND returns the page in add-index order; the feed wants newest first.
        let invoices = response
            .invoices
            .into_iter()
            .rev()
            .map(invoice_from_lnd)
            .collect::<Result<Vec<_>, _>>()?;

        let next = if invoices.is_empty() {
            None
        } else {
            InvoiceCursor::next_page(response.first_index_offset, limit).map(|c| c.encode())
        };

        Ok(InvoicePage { invoices, next })
    }

    async fn get_node_alias(&self, public_key: &PublicKey) -> Result<String, LightningError> {
        let info = self
            .lightning()
            .await
            .get_node_info(lnrpc::NodeInfoRequest {
                pub_key: public_key.to_string(),
                include_channels: false,
                ..Default::default()
            })
            .await?
            .into_inner();

        info.node
            .map(|node| node.alias)
            .filter(|alias| !alias.is_empty())
            .ok_or_else(|| LightningError::NodeLookup(public_key.to_string()))
    }
}

fn payment_from_lnd(payment: lnrpc::Payment) -> Result<PaymentSummary, LightningError> {
    // seconds field, only filled alone by older nodes
    #[allow(deprecated)]
    let creation_secs = payment.creation_date;

    let created_at = if payment.creation_time_ns > 0 {
        unix_nanos_to_datetime(payment.creation_time_ns)
    } else {
        unix_to_datetime(creation_secs)
    }
    .ok_or_else(|| {
        LightningError::Parse(format!(
            "invalid creation time for payment {}",
            payment.payment_hash
        ))
    })?;

    let destination = payment
        .htlcs
        .iter()
        .filter(|htlc| htlc.status == HTLC_SUCCEEDED)
        .find_map(|htlc| htlc.route.as_ref()?.hops.last().map(|hop| hop.pub_key.clone()));

    Ok(PaymentSummary {
        id: payment.payment_hash,
        destination,
        amount_sat: payment.value_sat.max(0) as u64,
        fee_sat: payment.fee_sat.max(0) as u64,
        payment_request: Some(payment.payment_request).filter(|r| !r.is_empty()),
        created_at,
    })
}

fn invoice_from_lnd(invoice: lnrpc::Invoice) -> Result<CustomInvoice, LightningError> {
    let id = hex::encode(&invoice.r_hash);
    let created_at = unix_to_datetime(invoice.creation_date)
        .ok_or_else(|| LightningError::Parse(format!("invalid creation date for invoice {}", id)))?;
    let state = InvoiceStatus::from(invoice.state);
    let confirmed_at = if state == InvoiceStatus::Settled && invoice.settle_date > 0 {
        unix_to_datetime(invoice.settle_date)
    } else {
        None
    };

    Ok(CustomInvoice {
        id,
        memo: invoice.memo,
        value_sat: invoice.value.max(0) as u64,
        received_sat: invoice.amt_paid_sat.max(0) as u64,
        payment_request: invoice.payment_request,
        state,
        created_at,
        confirmed_at,
    })
}

/// Nodes the server can serve, keyed by the id carried in request claims.
#[derive(Clone, Default)]
pub struct NodeRegistry {
    nodes: HashMap<String, Arc<dyn LightningClient>>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, node_id: impl Into<String>, node: Arc<dyn LightningClient>) -> Self {
        self.nodes.insert(node_id.into(), node);
        self
    }

    pub fn get(&self, node_id: &str) -> Option<Arc<dyn LightningClient>> {
        self.nodes.get(node_id).cloned()
    }
}
