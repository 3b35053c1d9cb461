//! Static schema descriptors for the three replace-on-save datasets. One
//! generic handler/repo pair serves them all; adding a dataset means adding
//! a descriptor here and a table in the migrations.

/// Maps a camelCase wire field to its snake_case column.
#[derive(Debug, Clone, Copy)]
pub struct Field {
    pub wire: &'static str,
    pub column: &'static str,
}

const fn f(wire: &'static str, column: &'static str) -> Field {
    Field { wire, column }
}

#[derive(Debug, Clone, Copy)]
pub struct DatasetSchema {
    pub table: &'static str,
    pub fields: &'static [Field],
}

const CONTRACTOR_LIST: DatasetSchema = DatasetSchema {
    table: "contractor_list",
    fields: &[
        f("sno", "sno"),
        f("efile", "efile"),
        f("contractor", "contractor"),
        f("description", "description"),
        f("value", "value"),
        f("startDate", "start_date"),
        f("endDate", "end_date"),
        f("duration", "duration"),
        f("fileName", "file_name"),
        f("fileBase64", "file_base64"),
        f("fileType", "file_type"),
    ],
};

const BILL_TRACKER: DatasetSchema = DatasetSchema {
    table: "bill_tracker",
    fields: &[
        f("sno", "sno"),
        f("efile", "efile"),
        f("contractor", "contractor"),
        f("approvedDate", "approved_date"),
        f("approvedAmount", "approved_amount"),
        f("billFrequency", "bill_frequency"),
        f("billDate", "bill_date"),
        f("billDueDate", "bill_due_date"),
        f("billPaidDate", "bill_paid_date"),
        f("paidAmount", "paid_amount"),
        f("fileName", "file_name"),
        f("fileBase64", "file_base64"),
        f("fileType", "file_type"),
    ],
};

const EPBG: DatasetSchema = DatasetSchema {
    table: "epbg",
    fields: &[
        f("sno", "sno"),
        f("contractor", "contractor"),
        f("poNo", "po_no"),
        f("bgNo", "bg_no"),
        f("bgDate", "bg_date"),
        f("bgAmount", "bg_amount"),
        f("bgValidity", "bg_validity"),
        f("gemBid", "gem_bid"),
        f("refEfile", "ref_efile"),
        f("fileName", "file_name"),
        f("fileBase64", "file_base64"),
        f("fileType", "file_type"),
    ],
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetKind {
    ContractorList,
    BillTracker,
    Epbg,
}

impl DatasetKind {
    pub const ALL: [DatasetKind; 3] = [
        DatasetKind::ContractorList,
        DatasetKind::BillTracker,
        DatasetKind::Epbg,
    ];

    /// Resolve the URL path segment to a dataset.
    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug {
            "contractor-list" => Some(Self::ContractorList),
            "bill-tracker" => Some(Self::BillTracker),
            "epbg" => Some(Self::Epbg),
            _ => None,
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            Self::ContractorList => "contractor-list",
            Self::BillTracker => "bill-tracker",
            Self::Epbg => "epbg",
        }
    }

    pub fn schema(self) -> &'static DatasetSchema {
        match self {
            Self::ContractorList => &CONTRACTOR_LIST,
            Self::BillTracker => &BILL_TRACKER,
            Self::Epbg => &EPBG,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_resolution_roundtrip() {
        for kind in DatasetKind::ALL {
            assert_eq!(DatasetKind::from_slug(kind.slug()), Some(kind));
        }
        assert_eq!(DatasetKind::from_slug("users"), None);
        assert_eq!(DatasetKind::from_slug(""), None);
    }

    #[test]
    fn schemas_are_exhaustive() {
        assert_eq!(DatasetKind::ContractorList.schema().fields.len(), 11);
        assert_eq!(DatasetKind::BillTracker.schema().fields.len(), 13);
        assert_eq!(DatasetKind::Epbg.schema().fields.len(), 12);
    }

    #[test]
    fn every_schema_carries_the_attachment_triple() {
        for kind in DatasetKind::ALL {
            let wires: Vec<_> = kind.schema().fields.iter().map(|f| f.wire).collect();
            assert!(wires.contains(&"fileName"), "{:?}", kind);
            assert!(wires.contains(&"fileBase64"), "{:?}", kind);
            assert!(wires.contains(&"fileType"), "{:?}", kind);
        }
    }

    #[test]
    fn columns_are_snake_case_and_unique() {
        for kind in DatasetKind::ALL {
            let schema = kind.schema();
            let mut seen = std::collections::HashSet::new();
            for field in schema.fields {
                assert!(seen.insert(field.column), "duplicate column {}", field.column);
                assert!(!field.column.contains(char::is_uppercase));
            }
        }
    }
}
