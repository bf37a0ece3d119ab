//! Segment rule behaviour for all six report types.
//!
//! Everything here runs against in-memory rows; no workbook I/O involved.

use splitter_core::{
    CellValue, Classification, ReportClassifier, ReportType, Row, RuleEngine, TableSet,
};

// ============================================================================
// Row builders
// ============================================================================

fn inventory(part: &str, brand: &str, warehouse: &str, location: &str, soh: Option<f64>) -> Row {
    let mut row = Row::from_pairs([
        ("Processed Part #", CellValue::from(part)),
        ("Brand Name", CellValue::from(brand)),
        ("Warehouse", CellValue::from(warehouse)),
        ("Stock Location", CellValue::from(location)),
    ]);
    if let Some(soh) = soh {
        row.insert("SOH", soh);
    }
    row
}

fn purchase(order: &str, to: &str, inbound: Option<f64>, pending: Option<f64>) -> Row {
    let mut row = Row::from_pairs([
        ("Brand Name", CellValue::from("MG")),
        ("Order #", CellValue::from(order)),
        ("Purchase Group", CellValue::from("PG1")),
        ("Processed Part #", CellValue::from("10001234")),
        ("Shipment Mode", CellValue::from("SEA")),
        ("To Warehouse", CellValue::from(to)),
        ("Supplier", CellValue::from("SAIC")),
    ]);
    if let Some(inbound) = inbound {
        row.insert("Inbound QTY", inbound);
    }
    if let Some(pending) = pending {
        row.insert("Pending QTY", pending);
    }
    row
}

fn sales(part: &str, brand: &str, warehouse: &str, bo_qty: f64) -> Row {
    Row::from_pairs([
        ("Order Number", CellValue::from("SO-1")),
        ("Brand Name", CellValue::from(brand)),
        ("Processed Part #", CellValue::from(part)),
        ("Submitted Time", CellValue::from("2024-06-01 09:30")),
        ("Warehouse", CellValue::from(warehouse)),
        ("BO QTY", CellValue::from(bo_qty)),
        ("Customer", CellValue::from("Dealer 7")),
    ])
}

fn parts(rows: &[Row]) -> Vec<&str> {
    rows.iter()
        .map(|row| row.text("Processed Part #").unwrap_or(""))
        .collect()
}

fn counts(engine: &RuleEngine, report_type: ReportType, rows: &[Row]) -> Vec<(String, usize)> {
    engine
        .process(report_type, rows)
        .segments
        .into_iter()
        .map(|s| (s.name, s.rows))
        .collect()
}

// ============================================================================
// Worked examples
// ============================================================================

mod examples {
    use super::*;

    #[test]
    fn inventory_au_two_rows() {
        let rows = vec![
            inventory("P1", "MG", "CEVA QLD", "Normal", Some(5.0)),
            inventory("P2", "MG", "CEVA VIC", "Normal", Some(0.0)),
        ];
        let outcome = RuleEngine::new().process(ReportType::InventoryAu, &rows);

        assert_eq!(outcome.original_rows, 2);
        assert_eq!(outcome.table_set.rows("QLD"), &rows[..1]);
        assert!(outcome.table_set.rows("VIC").is_empty());
        assert!(outcome.table_set.rows("OFF").is_empty());
        assert!(outcome.table_set.rows("VIC&OFF").is_empty());
        assert_eq!(
            counts(&RuleEngine::new(), ReportType::InventoryAu, &rows),
            vec![
                ("QLD".to_string(), 1),
                ("VIC&OFF".to_string(), 0),
                ("VIC".to_string(), 0),
                ("OFF".to_string(), 0),
            ]
        );
    }

    #[test]
    fn purchase_total_from_inbound_only() {
        let rows = vec![purchase("PO-1", "CEVA QLD", Some(3.0), None)];
        let outcome = RuleEngine::new().process(ReportType::PurchaseAu, &rows);

        let qld = outcome.table_set.rows("QLD");
        assert_eq!(qld.len(), 1);
        assert_eq!(qld[0].get("Total"), Some(&CellValue::Number(3.0)));
        assert_eq!(qld[0].get("Pending QTY"), Some(&CellValue::Empty));
        assert!(outcome.table_set.rows("VIC").is_empty());
    }

    #[test]
    fn unrecognized_file_name_never_reaches_engine() {
        let classifier = ReportClassifier::new().unwrap();
        assert_eq!(classifier.classify("report.xlsx"), Classification::Unrecognized);
        assert!(classifier.classify_or_reject("report.xlsx").is_err());
    }

    #[test]
    fn classifier_ignores_case_and_separators() {
        let classifier = ReportClassifier::new().unwrap();
        for name in ["INVENTORY enquiry au 2024.xlsx", "inventory_Enquiry_AU.xlsx"] {
            assert_eq!(
                classifier.classify(name),
                Classification::Recognized(ReportType::InventoryAu),
                "{name}"
            );
        }
    }
}

// ============================================================================
// Inventory
// ============================================================================

mod inventory_rules {
    use super::*;

    fn mixed_au_rows() -> Vec<Row> {
        vec![
            inventory("A", "MG", "CEVA VIC", "Normal", Some(2.0)),
            inventory("B", "MG", "CEVA OFFSITE", "Normal", Some(1.0)),
            inventory("C", "MG", "CEVA QLD", "Normal", Some(8.0)),
            inventory("D", "MG", "CEVA VIC ", "Normal", Some(4.0)), // trailing space
            inventory("E", "MG", "ceva offsite", "Normal", Some(4.0)), // wrong case
            inventory("F", "MG", "CEVA OFFSITE/VIC", "Normal", Some(4.0)),
            inventory("G", "LDV", "CEVA VIC", "Normal", Some(3.0)),
            inventory("H", "MG", "CEVA VIC", "Damaged", Some(3.0)),
            inventory("I", "MG", "CEVA OFFSITE", "Normal", Some(-2.0)),
            inventory("J", "MG", "CEVA VIC", "Normal", None),
            inventory("K", "MG", "CEVA OFFSITE", "Normal", Some(6.0)),
            inventory("L", "MG", "CEVA VIC", "Normal", Some(0.5)),
        ]
    }

    #[test]
    fn vic_and_off_union_equals_vic_off() {
        let outcome = RuleEngine::new().process(ReportType::InventoryAu, &mixed_au_rows());
        let set = &outcome.table_set;

        let vic = parts(set.rows("VIC"));
        let off = parts(set.rows("OFF"));
        let vic_off = parts(set.rows("VIC&OFF"));

        assert_eq!(vic, vec!["A", "L"]);
        assert_eq!(off, vec!["B", "K"]);
        assert_eq!(vic_off, vec!["A", "B", "K", "L"]);

        // Every VIC&OFF row is in exactly one of VIC / OFF, and vice versa
        for part in &vic_off {
            assert!(vic.contains(part) ^ off.contains(part), "{part}");
        }
        assert_eq!(vic.len() + off.len(), vic_off.len());
    }

    #[test]
    fn segments_overlap_rather_than_partition() {
        let rows = mixed_au_rows();
        let outcome = RuleEngine::new().process(ReportType::InventoryAu, &rows);
        let total: usize = outcome.segments.iter().map(|s| s.rows).sum();
        // QLD(1) + VIC&OFF(4) + VIC(2) + OFF(2): VIC&OFF rows are counted twice
        assert_eq!(total, 9);
        assert_eq!(outcome.original_rows, rows.len());
    }

    #[test]
    fn missing_soh_excluded_everywhere() {
        let rows = vec![
            inventory("AU-Q", "MG", "CEVA QLD", "Normal", None),
            inventory("AU-V", "MG", "CEVA VIC", "Normal", None),
            inventory("AU-O", "MG", "CEVA OFFSITE", "Normal", None),
            inventory("NZ", "MG", "CEVA AUC", "Normal", None),
        ];
        let engine = RuleEngine::new();
        for report_type in [ReportType::InventoryAu, ReportType::InventoryNz] {
            let outcome = engine.process(report_type, &rows);
            for segment in &outcome.segments {
                assert_eq!(segment.rows, 0, "{report_type} {}", segment.name);
            }
        }
    }

    #[test]
    fn blank_or_text_soh_counts_as_zero() {
        let mut blank = inventory("X", "MG", "CEVA AUC", "Normal", None);
        blank.insert("SOH", "");
        let mut numeric_text = inventory("Y", "MG", "CEVA AUC", "Normal", None);
        numeric_text.insert("SOH", "7");

        let outcome = RuleEngine::new().process(ReportType::InventoryNz, &[blank, numeric_text]);
        assert_eq!(parts(outcome.table_set.rows("NZ")), vec!["Y"]);
    }

    #[test]
    fn nz_ignores_au_warehouses() {
        let rows = mixed_au_rows();
        let outcome = RuleEngine::new().process(ReportType::InventoryNz, &rows);
        assert_eq!(outcome.table_set.sheet_names(), vec!["NZ"]);
        assert!(outcome.table_set.rows("NZ").is_empty());
    }
}

// ============================================================================
// Purchase
// ============================================================================

mod purchase_rules {
    use super::*;

    const PURCHASE_HEADER: [&str; 9] = [
        "Brand Name",
        "Order #",
        "Purchase Group",
        "Processed Part #",
        "Inbound QTY",
        "Pending QTY",
        "Total",
        "Shipment Mode",
        "To Warehouse",
    ];

    #[test]
    fn projection_keeps_fixed_columns_in_order() {
        let rows = vec![purchase("PO-1", "CEVA VIC", Some(1.0), Some(2.0))];
        let outcome = RuleEngine::new().process(ReportType::PurchaseAu, &rows);

        let sheet = outcome.table_set.get("VIC").unwrap();
        assert_eq!(sheet.columns, PURCHASE_HEADER.to_vec());
        assert_eq!(sheet.rows[0].get("Total"), Some(&CellValue::Number(3.0)));
        assert!(!sheet.rows[0].contains("Supplier"));
    }

    #[test]
    fn zero_total_is_excluded() {
        let rows = vec![
            purchase("PO-1", "CEVA QLD", None, None),
            purchase("PO-2", "CEVA QLD", Some(0.0), Some(0.0)),
            purchase("PO-3", "CEVA QLD", None, Some(4.0)),
        ];
        let outcome = RuleEngine::new().process(ReportType::PurchaseAu, &rows);
        let orders: Vec<_> = outcome
            .table_set
            .rows("QLD")
            .iter()
            .map(|r| r.text("Order #").unwrap())
            .collect();
        assert_eq!(orders, vec!["PO-3"]);
    }

    #[test]
    fn filters_on_to_warehouse_not_warehouse() {
        let mut row = purchase("PO-1", "CEVA AUC", Some(5.0), None);
        row.insert("Warehouse", "CEVA QLD");
        let engine = RuleEngine::new();

        assert_eq!(
            counts(&engine, ReportType::PurchaseAu, &[row.clone()]),
            vec![("QLD".to_string(), 0), ("VIC".to_string(), 0)]
        );
        assert_eq!(
            counts(&engine, ReportType::PurchaseNz, &[row]),
            vec![("NZ".to_string(), 1)]
        );
    }

    #[test]
    fn other_brands_are_dropped() {
        let mut row = purchase("PO-1", "CEVA AUC", Some(5.0), None);
        row.insert("Brand Name", "MAXUS");
        let outcome = RuleEngine::new().process(ReportType::PurchaseNz, &[row]);
        assert!(outcome.table_set.rows("NZ").is_empty());
    }
}

// ============================================================================
// Sales
// ============================================================================

mod sales_rules {
    use super::*;

    #[test]
    fn vic_segment_includes_offsite() {
        let rows = vec![
            sales("S1", "MG", "CEVA VIC", 1.0),
            sales("S2", "MG", "CEVA QLD", 2.0),
            sales("S3", "MG", "CEVA OFFSITE", 3.0),
            sales("S4", "MG", "CEVA OFFSITE", 0.0),
            sales("S5", "LDV", "CEVA VIC", 3.0),
        ];
        let outcome = RuleEngine::new().process(ReportType::SalesAu, &rows);
        assert_eq!(parts(outcome.table_set.rows("QLD")), vec!["S2"]);
        assert_eq!(parts(outcome.table_set.rows("VIC")), vec!["S1", "S3"]);
    }

    #[test]
    fn projection_drops_unlisted_columns() {
        let rows = vec![sales("S1", "MG", "CEVA AUC", 2.0)];
        let outcome = RuleEngine::new().process(ReportType::SalesNz, &rows);
        let sheet = outcome.table_set.get("NZ").unwrap();
        assert_eq!(
            sheet.columns,
            vec!["Brand Name", "Processed Part #", "Submitted Time", "Warehouse", "BO QTY"]
        );
        assert!(!sheet.rows[0].contains("Customer"));
        assert!(!sheet.rows[0].contains("Order Number"));
    }
}

// ============================================================================
// Properties shared by every report type
// ============================================================================

mod properties {
    use super::*;

    fn everything() -> Vec<Row> {
        let mut rows = Vec::new();
        for (i, warehouse) in ["CEVA QLD", "CEVA VIC", "CEVA OFFSITE", "CEVA AUC"]
            .iter()
            .cycle()
            .take(24)
            .enumerate()
        {
            let part = format!("P{i:02}");
            let mut row = inventory(&part, "MG", warehouse, "Normal", Some((i % 3) as f64));
            row.insert("To Warehouse", *warehouse);
            row.insert("Inbound QTY", (i % 2) as f64);
            row.insert("BO QTY", (i % 4) as f64);
            rows.push(row);
        }
        rows
    }

    #[test]
    fn segment_rows_keep_input_order() {
        let rows = everything();
        let input_order = parts(&rows);
        let engine = RuleEngine::new();

        for report_type in ReportType::ALL {
            let outcome = engine.process(report_type, &rows);
            for (name, sheet) in outcome.table_set.iter() {
                let positions: Vec<usize> = parts(&sheet.rows)
                    .iter()
                    .map(|part| input_order.iter().position(|p| p == part).unwrap())
                    .collect();
                assert!(
                    positions.windows(2).all(|w| w[0] < w[1]),
                    "{report_type} {name} out of order: {positions:?}"
                );
            }
        }
    }

    #[test]
    fn processing_is_idempotent() {
        let rows = everything();
        let engine = RuleEngine::new();
        for report_type in ReportType::ALL {
            let first = engine.process(report_type, &rows);
            let second = engine.process(report_type, &rows);
            assert_eq!(first, second, "{report_type}");
        }
    }

    #[test]
    fn input_rows_are_untouched() {
        let rows = everything();
        let before = rows.clone();
        RuleEngine::new().process(ReportType::PurchaseAu, &rows);
        assert_eq!(rows, before);
        assert!(!rows[0].contains("Total"));
    }

    #[test]
    fn empty_table_still_produces_every_sheet() {
        let engine = RuleEngine::new();
        for report_type in ReportType::ALL {
            let outcome = engine.process(report_type, &[]);
            assert_eq!(outcome.original_rows, 0);
            assert_eq!(outcome.table_set.len(), report_type.descriptor().rules.len());
            assert!(outcome.segments.iter().all(|s| s.rows == 0));
        }
    }

    #[test]
    fn engine_can_be_shared_across_threads() {
        let rows = everything();
        let engine = RuleEngine::new();
        let expected = engine.process(ReportType::SalesAu, &rows).table_set;

        let results: Vec<TableSet> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| scope.spawn(|| engine.process(ReportType::SalesAu, &rows).table_set))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        for result in results {
            assert_eq!(result, expected);
        }
    }
}
