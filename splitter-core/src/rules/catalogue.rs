// Report-type descriptor table.
//
// Every report type is described here once: the file-name keywords the
// classifier looks for, an optional derived column, an optional projection
// and the ordered segment rules. The classifier and the rule engine both
// read from this table and nothing else.

use super::condition::{Condition, DerivedColumn};
use crate::types::ReportType;

pub const BRAND_NAME: &str = "Brand Name";
pub const WAREHOUSE: &str = "Warehouse";
pub const TO_WAREHOUSE: &str = "To Warehouse";
pub const STOCK_LOCATION: &str = "Stock Location";
pub const SOH: &str = "SOH";
pub const BO_QTY: &str = "BO QTY";
pub const INBOUND_QTY: &str = "Inbound QTY";
pub const PENDING_QTY: &str = "Pending QTY";
pub const TOTAL: &str = "Total";

const BRAND: &str = "MG";
const NORMAL_LOCATION: &str = "Normal";

const CEVA_QLD: &str = "CEVA QLD";
const CEVA_VIC: &str = "CEVA VIC";
const CEVA_OFFSITE: &str = "CEVA OFFSITE";
const CEVA_AUC: &str = "CEVA AUC";

const IS_MG: Condition = Condition::Equals {
    column: BRAND_NAME,
    value: BRAND,
};
const IN_NORMAL_LOCATION: Condition = Condition::Equals {
    column: STOCK_LOCATION,
    value: NORMAL_LOCATION,
};
const HAS_STOCK: Condition = Condition::Positive { column: SOH };
const HAS_BACKORDER: Condition = Condition::Positive { column: BO_QTY };
const HAS_INBOUND: Condition = Condition::Positive { column: TOTAL };

const fn warehouse(value: &'static str) -> Condition {
    Condition::Equals {
        column: WAREHOUSE,
        value,
    }
}

const fn warehouse_in(values: &'static [&'static str]) -> Condition {
    Condition::OneOf {
        column: WAREHOUSE,
        values,
    }
}

const fn to_warehouse(value: &'static str) -> Condition {
    Condition::Equals {
        column: TO_WAREHOUSE,
        value,
    }
}

/// One output sheet: every condition must hold for a row to be kept.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentRule {
    pub sheet: &'static str,
    pub conditions: &'static [Condition],
}

impl SegmentRule {
    pub fn matches(&self, row: &crate::types::Row) -> bool {
        self.conditions.iter().all(|condition| condition.matches(row))
    }

    pub fn describe(&self) -> String {
        let conditions: Vec<String> = self.conditions.iter().map(Condition::describe).collect();
        format!("{}: {}", self.sheet, conditions.join(" AND "))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReportDescriptor {
    pub report_type: ReportType,
    pub description: &'static str,
    /// All must appear in the file name (case-insensitive, any order)
    pub keywords: &'static [&'static str],
    pub derived: Option<DerivedColumn>,
    pub projection: Option<&'static [&'static str]>,
    pub rules: &'static [SegmentRule],
}

const PURCHASE_TOTAL: DerivedColumn = DerivedColumn {
    name: TOTAL,
    sum_of: &[INBOUND_QTY, PENDING_QTY],
};

const PURCHASE_COLUMNS: &[&str] = &[
    BRAND_NAME,
    "Order #",
    "Purchase Group",
    "Processed Part #",
    INBOUND_QTY,
    PENDING_QTY,
    TOTAL,
    "Shipment Mode",
    TO_WAREHOUSE,
];

const SALES_COLUMNS: &[&str] = &[
    BRAND_NAME,
    "Processed Part #",
    "Submitted Time",
    WAREHOUSE,
    BO_QTY,
];

pub static DESCRIPTORS: [ReportDescriptor; 6] = [
    ReportDescriptor {
        report_type: ReportType::InventoryAu,
        description: "AU inventory enquiry",
        keywords: &["Inventory", "Enquiry", "AU"],
        derived: None,
        projection: None,
        rules: &[
            SegmentRule {
                sheet: "QLD",
                conditions: &[IS_MG, warehouse(CEVA_QLD), IN_NORMAL_LOCATION, HAS_STOCK],
            },
            SegmentRule {
                sheet: "VIC&OFF",
                conditions: &[
                    IS_MG,
                    warehouse_in(&[CEVA_OFFSITE, CEVA_VIC]),
                    IN_NORMAL_LOCATION,
                    HAS_STOCK,
                ],
            },
            SegmentRule {
                sheet: "VIC",
                conditions: &[IS_MG, warehouse(CEVA_VIC), IN_NORMAL_LOCATION, HAS_STOCK],
            },
            SegmentRule {
                sheet: "OFF",
                conditions: &[IS_MG, warehouse(CEVA_OFFSITE), IN_NORMAL_LOCATION, HAS_STOCK],
            },
        ],
    },
    ReportDescriptor {
        report_type: ReportType::InventoryNz,
        description: "NZ inventory enquiry",
        keywords: &["Inventory", "Enquiry", "NZ"],
        derived: None,
        projection: None,
        rules: &[SegmentRule {
            sheet: "NZ",
            conditions: &[IS_MG, warehouse(CEVA_AUC), IN_NORMAL_LOCATION, HAS_STOCK],
        }],
    },
    ReportDescriptor {
        report_type: ReportType::PurchaseAu,
        description: "AU in-transit purchase items",
        keywords: &["Purchase", "Item", "AU"],
        derived: Some(PURCHASE_TOTAL),
        projection: Some(PURCHASE_COLUMNS),
        rules: &[
            SegmentRule {
                sheet: "QLD",
                conditions: &[IS_MG, HAS_INBOUND, to_warehouse(CEVA_QLD)],
            },
            SegmentRule {
                sheet: "VIC",
                conditions: &[IS_MG, HAS_INBOUND, to_warehouse(CEVA_VIC)],
            },
        ],
    },
    ReportDescriptor {
        report_type: ReportType::PurchaseNz,
        description: "NZ in-transit purchase items",
        keywords: &["Purchase", "Item", "NZ"],
        derived: Some(PURCHASE_TOTAL),
        projection: Some(PURCHASE_COLUMNS),
        rules: &[SegmentRule {
            sheet: "NZ",
            conditions: &[IS_MG, HAS_INBOUND, to_warehouse(CEVA_AUC)],
        }],
    },
    ReportDescriptor {
        report_type: ReportType::SalesAu,
        description: "AU back-ordered sales items",
        keywords: &["Sales", "Item", "AU"],
        derived: None,
        projection: Some(SALES_COLUMNS),
        rules: &[
            SegmentRule {
                sheet: "QLD",
                conditions: &[IS_MG, HAS_BACKORDER, warehouse(CEVA_QLD)],
            },
            SegmentRule {
                sheet: "VIC",
                conditions: &[IS_MG, HAS_BACKORDER, warehouse_in(&[CEVA_VIC, CEVA_OFFSITE])],
            },
        ],
    },
    ReportDescriptor {
        report_type: ReportType::SalesNz,
        description: "NZ back-ordered sales items",
        keywords: &["Sales", "Item", "NZ"],
        derived: None,
        projection: Some(SALES_COLUMNS),
        rules: &[SegmentRule {
            sheet: "NZ",
            conditions: &[IS_MG, HAS_BACKORDER, warehouse(CEVA_AUC)],
        }],
    },
];

impl ReportType {
    pub fn descriptor(&self) -> &'static ReportDescriptor {
        let index = match self {
            ReportType::InventoryAu => 0,
            ReportType::InventoryNz => 1,
            ReportType::PurchaseAu => 2,
            ReportType::PurchaseNz => 3,
            ReportType::SalesAu => 4,
            ReportType::SalesNz => 5,
        };
        &DESCRIPTORS[index]
    }
}
