//! Reference data: departments, field tags and paginated lists.

use serde::{Deserialize, Serialize};

/// A department that steps can be assigned to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Department {
    pub id: u64,
    pub name: String,
}

/// Department object nested inside fetched steps.
pub type DepartmentRef = Department;

/// An entry of the field-tag catalog offered for `checkFields`.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FieldTag {
    /// Value stored in a step's `checkFields`
    pub value: &'static str,
    /// Label shown to the operator
    pub label: &'static str,
    /// Enumerated name used by the backend
    pub enum_value: &'static str,
}

const FIELD_TAGS: [FieldTag; 8] = [
    FieldTag {
        value: "quantity",
        label: "Quantity",
        enum_value: "QUANTITY",
    },
    FieldTag {
        value: "unitPrice",
        label: "Unit price",
        enum_value: "UNIT_PRICE",
    },
    FieldTag {
        value: "deliveryDate",
        label: "Delivery date",
        enum_value: "DELIVERY_DATE",
    },
    FieldTag {
        value: "customerNote",
        label: "Customer note",
        enum_value: "CUSTOMER_NOTE",
    },
    FieldTag {
        value: "attachments",
        label: "Attachments",
        enum_value: "ATTACHMENTS",
    },
    FieldTag {
        value: "sampleCode",
        label: "Sample code",
        enum_value: "SAMPLE_CODE",
    },
    FieldTag {
        value: "specification",
        label: "Specification",
        enum_value: "SPECIFICATION",
    },
    FieldTag {
        value: "materialCode",
        label: "Material code",
        enum_value: "MATERIAL_CODE",
    },
];

impl FieldTag {
    /// The full catalog.
    pub fn catalog() -> &'static [FieldTag] {
        &FIELD_TAGS
    }

    /// Look up a catalog entry by its stored value.
    pub fn find(value: &str) -> Option<&'static FieldTag> {
        FIELD_TAGS.iter().find(|tag| tag.value == value)
    }
}

/// One page of a listing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Page<T> {
    #[serde(alias = "data")]
    pub items: Vec<T>,
    #[serde(default)]
    pub total: Option<u64>,
}

impl<T> Page<T> {
    /// Wrap items whose total is their count.
    pub fn complete(items: Vec<T>) -> Self {
        let total = Some(items.len() as u64);
        Self { items, total }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_values_are_unique() {
        let catalog = FieldTag::catalog();
        for (i, tag) in catalog.iter().enumerate() {
            assert!(catalog[i + 1..].iter().all(|other| other.value != tag.value));
        }
    }

    #[test]
    fn test_find_tag() {
        assert_eq!(FieldTag::find("unitPrice").map(|t| t.label), Some("Unit price"));
        assert!(FieldTag::find("UNIT_PRICE").is_none());
    }

    #[test]
    fn test_page_accepts_data_alias() {
        let page: Page<Department> =
            serde_json::from_str(r#"{"data":[{"id":1,"name":"Sales"}],"total":7}"#).unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.total, Some(7));

        let page: Page<Department> = serde_json::from_str(r#"{"items":[]}"#).unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total, None);
    }
}
