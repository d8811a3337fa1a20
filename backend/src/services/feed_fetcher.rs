//! Reads the two upstream feeds that make up a resume page.

use crate::errors::LightningError;
use crate::services::node_manager::LightningClient;
use crate::services::resume::{InvoiceEntry, PaymentEntry};
use crate::utils::{InvoicePageRequest, PaymentSummary};
use bitcoin::secp256k1::PublicKey;
use futures::future::join_all;
use std::str::FromStr;

/// Characters of the destination key used when no alias can be resolved.
pub const FALLBACK_ALIAS_LEN: usize = 6;

/// Raw material for one resume page.
#[derive(Debug, Clone, Default)]
pub struct Feeds {
    /// Every payment, alias-annotated
    pub payments: Vec<PaymentEntry>,
    /// One invoice page, newest first
    pub invoices: Vec<InvoiceEntry>,
    pub next: Option<String>,
}

/// Fetches all payments and one invoice page.
///
/// Any failure reading either list fails the whole fetch. Alias lookups never
/// do: a peer that cannot be resolved gets the first few characters of its key.
pub async fn fetch_feeds(
    node: &dyn LightningClient,
    token: Option<&str>,
    page_size: u64,
) -> Result<Feeds, LightningError> {
    let payments = async {
        let payments = node.list_payments().await.inspect_err(|e| {
            tracing::error!("Error getting payments: {}", e);
        })?;
        Ok::<_, LightningError>(annotate_payments(node, payments).await)
    };

    let invoices = async {
        node.list_invoices(InvoicePageRequest::new(token, page_size))
            .await
            .inspect_err(|e| tracing::error!("Error getting invoices: {}", e))
    };

    let (payments, page) = tokio::try_join!(payments, invoices)?;

    Ok(Feeds {
        payments,
        invoices: page.invoices.into_iter().map(InvoiceEntry::new).collect(),
        next: page.next,
    })
}

/// Resolves every payment's destination alias concurrently.
pub async fn annotate_payments(
    node: &dyn LightningClient,
    payments: Vec<PaymentSummary>,
) -> Vec<PaymentEntry> {
    join_all(payments.into_iter().map(|payment| async move {
        let alias = resolve_alias(node, payment.destination.as_deref()).await;
        PaymentEntry::new(payment, alias)
    }))
    .await
}

async fn resolve_alias(node: &dyn LightningClient, destination: Option<&str>) -> Option<String> {
    let destination = destination?;

    let lookup = match PublicKey::from_str(destination) {
        Ok(public_key) => node.get_node_alias(&public_key).await,
        Err(e) => Err(LightningError::Parse(e.to_string())),
    };

    match lookup {
        Ok(alias) => Some(alias),
        Err(e) => {
            tracing::debug!("Alias lookup failed for {}: {}", destination, e);
            Some(fallback_alias(destination))
        }
    }
}

pub fn fallback_alias(destination: &str) -> String {
    destination.chars().take(FALLBACK_ALIAS_LEN).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_alias_is_key_prefix() {
        assert_eq!(fallback_alias("03abcdef0123456789"), "03abcd");
        assert_eq!(fallback_alias("02ab"), "02ab");
    }
}
