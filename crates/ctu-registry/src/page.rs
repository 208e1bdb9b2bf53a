use serde::Deserialize;
use serde_json::Value;

/// One page of the registry's search response.
///
/// Studies stay as raw JSON objects; field extraction happens downstream.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage {
    #[serde(default)]
    pub studies: Vec<Value>,

    #[serde(default)]
    pub total_count: Option<u64>,

    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_registry_page() {
        let page: SearchPage = serde_json::from_str(
            r#"{
                "totalCount": 2,
                "studies": [{"protocolSection": {}}, {"protocolSection": {}}],
                "nextPageToken": "abc123"
            }"#,
        )
        .unwrap();
        assert_eq!(page.total_count, Some(2));
        assert_eq!(page.studies.len(), 2);
        assert_eq!(page.next_page_token.as_deref(), Some("abc123"));
    }

    #[test]
    fn missing_fields_default() {
        let page: SearchPage = serde_json::from_str("{}").unwrap();
        assert!(page.studies.is_empty());
        assert!(page.total_count.is_none());
        assert!(page.next_page_token.is_none());
    }
}
