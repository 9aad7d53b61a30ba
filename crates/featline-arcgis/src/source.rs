//! Ways to locate the layer to extract

use featline_core::ExtractError;
use serde::Deserialize;

use crate::service::{FeatureService, ServiceError};
use crate::token::Token;

/// Where the features live
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeatureSource {
    /// Portal item id; `layer` selects the sub-layer of its feature service
    ItemId { id: String, layer: u32 },
    /// Feature layer URL given directly
    Url(String),
}

impl FeatureSource {
    /// Resolve to the layer's `query` endpoint.
    ///
    /// Item ids cost one lookup call; URLs need none.
    pub fn query_endpoint<S: FeatureService + ?Sized>(
        &self,
        service: &S,
        token: &Token,
    ) -> Result<String, ExtractError> {
        let layer = match self {
            Self::ItemId { id, layer } => layer_url(&service.item_url(id, token)?, *layer),
            Self::Url(url) => url.clone(),
        };
        Ok(query_endpoint(&layer))
    }

    /// Short label for logs
    pub fn label(&self) -> String {
        match self {
            Self::ItemId { id, layer } => format!("item {id} (layer {layer})"),
            Self::Url(url) => url.clone(),
        }
    }
}

/// Append `layer` unless the URL already names a numbered layer.
fn layer_url(service_url: &str, layer: u32) -> String {
    let base = service_url.trim_end_matches('/');
    let last = base.rsplit('/').next().unwrap_or_default();
    if !last.is_empty() && last.chars().all(|c| c.is_ascii_digit()) {
        base.to_string()
    } else {
        format!("{base}/{layer}")
    }
}

/// Layer URL → its `query` endpoint
pub fn query_endpoint(layer_url: &str) -> String {
    let base = layer_url.trim_end_matches('/');
    if base.ends_with("/query") {
        base.to_string()
    } else {
        format!("{base}/query")
    }
}

/// Item metadata response body (subset)
#[derive(Debug, Deserialize)]
struct ItemResponse {
    url: Option<String>,
    #[serde(rename = "type")]
    item_type: Option<String>,
    error: Option<ServiceError>,
}

/// Extract the service URL from an item metadata response body.
pub fn parse_item_response(item_id: &str, body: &str) -> Result<String, ExtractError> {
    let resp: ItemResponse = serde_json::from_str(body)
        .map_err(|e| ExtractError::lookup(format!("item {item_id}: malformed response: {e}")))?;
    if let Some(err) = resp.error {
        return Err(ExtractError::lookup(format!("item {item_id}: {err}")));
    }
    let item_type = resp.item_type.unwrap_or_default();
    let url = resp
        .url
        .filter(|u| !u.is_empty())
        .ok_or_else(|| {
            ExtractError::lookup(format!("item {item_id} ({item_type}) has no service url"))
        })?;
    log::debug!("Item {item_id} is a {item_type} at {url}");
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_endpoint_appends() {
        assert_eq!(
            query_endpoint("https://svc.example.com/arcgis/rest/services/Parcels/FeatureServer/0"),
            "https://svc.example.com/arcgis/rest/services/Parcels/FeatureServer/0/query"
        );
    }

    #[test]
    fn query_endpoint_idempotent() {
        let url = "https://svc.example.com/FeatureServer/0/query";
        assert_eq!(query_endpoint(url), url);
        assert_eq!(query_endpoint(&format!("{url}/")), url);
    }

    #[test]
    fn layer_url_appends_index() {
        assert_eq!(
            layer_url("https://svc.example.com/FeatureServer/", 0),
            "https://svc.example.com/FeatureServer/0"
        );
        assert_eq!(
            layer_url("https://svc.example.com/FeatureServer", 3),
            "https://svc.example.com/FeatureServer/3"
        );
    }

    #[test]
    fn layer_url_keeps_existing_layer() {
        assert_eq!(
            layer_url("https://svc.example.com/FeatureServer/2", 0),
            "https://svc.example.com/FeatureServer/2"
        );
    }

    #[test]
    fn parse_item_url() {
        let body = r#"{"id":"abc","type":"Feature Service","url":"https://svc.example.com/FeatureServer"}"#;
        assert_eq!(
            parse_item_response("abc", body).unwrap(),
            "https://svc.example.com/FeatureServer"
        );
    }

    #[test]
    fn parse_item_without_url() {
        let err = parse_item_response("abc", r#"{"id":"abc","type":"Web Map"}"#).unwrap_err();
        assert!(matches!(err, ExtractError::Retrieval { offset: None, .. }));
        assert!(format!("{err}").contains("Web Map"));
    }

    #[test]
    fn parse_item_service_error() {
        let body = r#"{"error":{"code":400,"message":"Item does not exist or is inaccessible.","details":[]}}"#;
        let err = parse_item_response("abc", body).unwrap_err();
        assert!(format!("{err}").contains("does not exist"));
    }

    #[test]
    fn labels() {
        let item = FeatureSource::ItemId {
            id: "abc".to_string(),
            layer: 0,
        };
        assert_eq!(item.label(), "item abc (layer 0)");
        assert_eq!(FeatureSource::Url("u".to_string()).label(), "u");
    }
}
