//! Continuation tokens for the invoice feed.
//!
//! LND pages invoices by index offset. The cursor handed to clients wraps the
//! offset and page size as URL-safe base64 JSON so it stays opaque on the wire.

use crate::errors::LightningError;
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceCursor {
    /// Index offset to read backwards from (exclusive)
    pub offset: u64,
    pub limit: u64,
}

impl InvoiceCursor {
    /// Cursor for the page preceding one whose oldest invoice sits at
    /// `first_index_offset`. Returns `None` when nothing older remains.
    pub fn next_page(first_index_offset: u64, limit: u64) -> Option<Self> {
        if first_index_offset > 1 {
            Some(Self {
                offset: first_index_offset,
                limit,
            })
        } else {
            None
        }
    }

    pub fn encode(&self) -> String {
        // serializing two integers cannot fail
        let json = serde_json::to_vec(self).unwrap_or_default();
        URL_SAFE_NO_PAD.encode(json)
    }

    pub fn decode(token: &str) -> Result<Self, LightningError> {
        let bytes = URL_SAFE_NO_PAD
            .decode(token.trim())
            .map_err(|e| LightningError::InvalidToken(e.to_string()))?;
        let cursor: InvoiceCursor = serde_json::from_slice(&bytes)
            .map_err(|e| LightningError::InvalidToken(e.to_string()))?;

        if cursor.limit == 0 {
            return Err(LightningError::InvalidToken("limit must be positive".into()));
        }
        Ok(cursor)
    }
}
