use serde::Deserialize;
use serde_json::Value;

/// Body of a replace-all save. Records are wire-shaped JSON objects; the
/// schema descriptor decides which fields survive into the table.
#[derive(Debug, Deserialize)]
pub struct SaveRequest {
    #[serde(default)]
    pub records: Vec<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn records_default_to_empty() {
        let req: SaveRequest = serde_json::from_str("{}").unwrap();
        assert!(req.records.is_empty());
    }

    #[test]
    fn records_pass_through_untyped() {
        let req: SaveRequest = serde_json::from_value(json!({
            "records": [{"sno": "1", "contractor": "Acme", "unknownField": "ignored"}]
        }))
        .unwrap();
        assert_eq!(req.records.len(), 1);
        assert_eq!(req.records[0]["contractor"], "Acme");
    }
}
