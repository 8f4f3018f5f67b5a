use docsync_types::Node;

use crate::error::{StoreError, StoreResult};
use crate::traits::DocumentCodec;

/// JSON codec. Mapping key order is preserved in both directions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonCodec {
    pretty: bool,
}

impl JsonCodec {
    /// Compact output.
    pub const fn new() -> Self {
        Self { pretty: false }
    }

    /// Indented output.
    pub const fn pretty() -> Self {
        Self { pretty: true }
    }

    pub fn is_pretty(&self) -> bool {
        self.pretty
    }
}

impl DocumentCodec for JsonCodec {
    fn parse(&self, text: &str) -> StoreResult<Node> {
        serde_json::from_str(text).map_err(|e| StoreError::Codec(e.to_string()))
    }

    fn serialize(&self, document: &Node) -> StoreResult<String> {
        let rendered = if self.pretty {
            serde_json::to_string_pretty(document)
        } else {
            serde_json::to_string(document)
        };
        rendered.map_err(|e| StoreError::Codec(e.to_string()))
    }
}
