//! Usage report wire format returned by the remote amount service.

use serde::{Deserialize, Serialize};

/// A single quota line for a backing service instance.
///
/// `used` is always present; the remaining fields are optional and omitted
/// from the serialized form when empty.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UsageItem {
    /// Quota name (e.g. "RegionsQuota")
    pub name: String,
    /// Amount currently consumed
    pub used: String,
    /// Total quota size
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    /// Amount still available
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available: Option<String>,
    /// Free-form description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
}

/// Ordered list of quota lines.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UsageReport {
    #[serde(default)]
    pub items: Vec<UsageItem>,
}

impl UsageReport {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up a quota line by name.
    pub fn item(&self, name: &str) -> Option<&UsageItem> {
        self.items.iter().find(|item| item.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_items_with_optional_fields() {
        let payload = json!({
            "items": [
                {"name": "RegionsQuota", "used": "300", "size": "500"},
                {"name": "TablesQuota", "used": "20", "desc": "tables in namespace"}
            ]
        });
        let report: UsageReport = serde_json::from_value(payload).expect("report parses");
        assert_eq!(report.items.len(), 2);
        assert_eq!(report.items[0].size.as_deref(), Some("500"));
        assert_eq!(report.items[0].available, None);
        assert_eq!(report.item("TablesQuota").and_then(|i| i.desc.as_deref()), Some("tables in namespace"));
    }

    #[test]
    fn omits_absent_optional_fields_when_serializing() {
        let report = UsageReport {
            items: vec![UsageItem {
                name: "space".into(),
                used: "10".into(),
                ..UsageItem::default()
            }],
        };
        let value = serde_json::to_value(&report).expect("serializes");
        assert_eq!(value, json!({"items": [{"name": "space", "used": "10"}]}));
    }

    #[test]
    fn missing_items_key_yields_empty_report() {
        let report: UsageReport = serde_json::from_str("{}").expect("empty object parses");
        assert!(report.is_empty());
    }
}
