use serde::{Deserialize, Serialize};

// objkt.com GraphQL request/response structures

#[derive(Debug, Clone, Serialize)]
pub struct GraphqlRequest {
    pub query: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphqlResponse {
    #[serde(default)]
    pub data: Option<FaData>,
    #[serde(default)]
    pub errors: Option<Vec<GraphqlError>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphqlError {
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FaData {
    #[serde(default)]
    pub fa: Vec<FaCollection>,
}

/// One `fa` (token contract) row from the objkt collection lookup.
#[derive(Debug, Clone, Deserialize)]
pub struct FaCollection {
    pub contract: String,
    #[serde(default)]
    pub collection_id: Option<String>,
    #[serde(default)]
    pub collection_type: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub editions: Option<u64>,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub metadata: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_collection_rows() {
        let raw = r#"{
            "data": {
                "fa": [{
                    "contract": "KT1VoZeuBMJF6vxtLqEFMoc4no5VDG789D7z",
                    "collection_id": "obj-123",
                    "collection_type": "granular",
                    "editions": 500,
                    "logo": "ipfs://QmLogo",
                    "name": "Window Still Life"
                }]
            }
        }"#;
        let response: GraphqlResponse = serde_json::from_str(raw).unwrap();
        let fa = &response.data.unwrap().fa;
        assert_eq!(fa.len(), 1);
        assert_eq!(fa[0].name.as_deref(), Some("Window Still Life"));
        assert_eq!(fa[0].logo.as_deref(), Some("ipfs://QmLogo"));
        assert!(response.errors.is_none());
    }

    #[test]
    fn deserializes_error_payload() {
        let raw = r#"{ "errors": [{ "message": "query too deep" }] }"#;
        let response: GraphqlResponse = serde_json::from_str(raw).unwrap();
        assert!(response.data.is_none());
        assert_eq!(response.errors.unwrap()[0].message, "query too deep");
    }
}
