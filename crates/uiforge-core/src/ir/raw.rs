//! Provisional IR shape, exactly as received from an oracle

use crate::error::IrError;
use crate::text::extract_json_object;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Untrusted IR.
///
/// Every top-level field is kept as an untyped JSON value so that a wrong
/// type in one field is reported by [`validate_ir`](super::validate_ir)
/// together with every other violation instead of aborting the parse.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawComponentIr {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_name: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semantic_tag: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lucide_icons: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interactions: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style_system: Option<Value>,
}

/// Parse oracle output into the provisional shape.
///
/// Prose and code fences around the JSON object are tolerated. Only text that
/// is not a JSON object at all is an [`IrError::Parse`]; field types are
/// checked by validation.
pub fn parse_raw_ir(text: &str) -> Result<RawComponentIr, IrError> {
    let json = extract_json_object(text);
    if json.is_empty() {
        return Err(IrError::Parse("empty input".to_string()));
    }
    serde_json::from_str(&json).map_err(|e| IrError::Parse(e.to_string()))
}
