use stockpilot_engine::engine::analyze_csv;
use stockpilot_engine::error::EngineError;
use stockpilot_engine::risk::StockStatus;

// ---------------------------------------------------------------------------
// Test data fixtures
// ---------------------------------------------------------------------------

/// One product, Indonesian headers, constant daily sales of 10, stock
/// decreasing by `step` per day from `start`.
fn indonesian_csv(days: u32, start: i64, step: i64) -> String {
    let mut csv_data = String::from("Tanggal,Produk,Terjual,Sisa Stok\n");
    for i in 0..days {
        let date = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
            + chrono::Duration::days(i as i64);
        let stock = start - step * i as i64;
        csv_data.push_str(&format!("{date},Beras,10,{stock}\n"));
    }
    csv_data
}

/// Many products on one day each plus a long single-product history so the
/// row floor is comfortably met.
fn many_products_csv(products: u32) -> String {
    let mut csv_data = String::from("date,product,sales,stock\n");
    for i in 0..products {
        // Stock proportional to index → days_left strictly increasing.
        csv_data.push_str(&format!("2024-01-{:02},P{:02},10,{}\n", (i % 28) + 1, i, 10 * (i + 1)));
    }
    csv_data
}

// ---------------------------------------------------------------------------
// End-to-end scenarios
// ---------------------------------------------------------------------------

#[test]
fn critical_product_gets_order_now() {
    // Stock drains by 1/day from 34, ending at 5 after 30 days. With an
    // average of 10/day: reorder_point = floor(30) + floor(15) = 45, and
    // 0 < 5 < 45 → CRITICAL.
    let report = analyze_csv(indonesian_csv(30, 34, 1).as_bytes(), 14).unwrap();

    assert_eq!(report.stock_alerts.len(), 1);
    let alert = &report.stock_alerts[0];
    assert_eq!(alert.product, "Beras");
    assert_eq!(alert.status, StockStatus::Critical);
    assert_eq!(alert.action, "Order Now");
    assert_eq!(alert.current_stock, 5);
    assert_eq!(alert.reorder_point, 45);
    // 5 remaining / 10 per day, rounded.
    assert_eq!(alert.days_left, 1.0);

    assert_eq!(report.summary.stockout_count, 1); // CRITICAL counts
    assert_eq!(report.forecast_chart.len(), 14);
}

#[test]
fn depleted_product_is_stockout_regardless_of_reorder_point() {
    // Stock drains by 10/day from 15 and is deeply negative by day 30.
    // STOCKOUT outranks every other classification.
    let report = analyze_csv(indonesian_csv(30, 15, 10).as_bytes(), 7).unwrap();

    let alert = &report.stock_alerts[0];
    assert_eq!(alert.status, StockStatus::Stockout);
    assert_eq!(alert.action, "Urgent Restock");
    assert!(alert.current_stock <= 0);
}

#[test]
fn zero_stock_is_stockout() {
    // Exactly zero on the last day: still STOCKOUT, never CRITICAL.
    let report = analyze_csv(indonesian_csv(30, 290, 10).as_bytes(), 7).unwrap();
    let alert = &report.stock_alerts[0];
    assert_eq!(alert.current_stock, 0);
    assert_eq!(alert.status, StockStatus::Stockout);
}

#[test]
fn no_product_column_degrades_to_forecast_only() {
    let mut csv_data = String::from("date,sales\n");
    for i in 1..=20 {
        csv_data.push_str(&format!("2024-01-{i:02},{}\n", 10 + i % 4));
    }

    let report = analyze_csv(csv_data.as_bytes(), 30).unwrap();
    assert!(report.best_sellers.is_empty());
    assert!(report.worst_sellers.is_empty());
    assert!(report.stock_alerts.is_empty());
    assert_eq!(report.summary.total_stock, 0);
    assert_eq!(report.summary.stockout_count, 0);
    assert_eq!(report.forecast_chart.len(), 30);
}

#[test]
fn stock_alerts_are_bounded_and_sorted_by_urgency() {
    let report = analyze_csv(many_products_csv(25).as_bytes(), 7).unwrap();

    assert_eq!(report.stock_alerts.len(), 10);
    for pair in report.stock_alerts.windows(2) {
        assert!(
            pair[0].days_left <= pair[1].days_left,
            "alerts must be ascending by days_left: {} > {}",
            pair[0].days_left,
            pair[1].days_left
        );
    }
    // The thinnest runway leads the list.
    assert_eq!(report.stock_alerts[0].product, "P00");
}

#[test]
fn identical_input_yields_identical_report() {
    let csv_data = indonesian_csv(30, 100, 2);
    let a = analyze_csv(csv_data.as_bytes(), 30).unwrap();
    let b = analyze_csv(csv_data.as_bytes(), 30).unwrap();
    assert_eq!(a, b);
}

#[test]
fn report_serializes_without_nan_or_infinity() {
    let report = analyze_csv(indonesian_csv(30, 100, 2).as_bytes(), 30).unwrap();
    let json = serde_json::to_string(&report).unwrap();
    assert!(!json.contains("null"), "no numeric field may degrade to null: {json}");
    assert!(!json.contains("NaN"));
    assert!(!json.contains("inf"));
}

// ---------------------------------------------------------------------------
// Failure paths
// ---------------------------------------------------------------------------

#[test]
fn missing_quantity_column_fails_with_schema_error() {
    let csv_data = "Tanggal,Produk\n2024-01-01,Beras\n";
    let err = analyze_csv(csv_data.as_bytes(), 7).unwrap_err();
    match err {
        EngineError::Schema { field, .. } => assert_eq!(field, "quantity"),
        other => panic!("expected Schema, got {other:?}"),
    }
    assert!(err.is_client_error());
}

#[test]
fn nine_valid_rows_fail_ten_proceed() {
    let nine = indonesian_csv(9, 100, 1);
    match analyze_csv(nine.as_bytes(), 7).unwrap_err() {
        EngineError::InsufficientData { rows, min } => {
            assert_eq!(rows, 9);
            assert_eq!(min, 10);
        }
        other => panic!("expected InsufficientData, got {other:?}"),
    }

    let ten = indonesian_csv(10, 100, 1);
    assert!(analyze_csv(ten.as_bytes(), 7).is_ok());
}

#[test]
fn unparsable_rows_count_against_the_floor() {
    // 12 raw rows, but 3 have garbage dates → 9 valid → too short.
    let mut csv_data = indonesian_csv(9, 100, 1);
    csv_data.push_str("not-a-date,Beras,10,50\n");
    csv_data.push_str("also bad,Beras,10,50\n");
    csv_data.push_str("??,Beras,10,50\n");

    assert!(matches!(
        analyze_csv(csv_data.as_bytes(), 7),
        Err(EngineError::InsufficientData { rows: 9, .. })
    ));
}

#[test]
fn degenerate_series_surfaces_as_analysis_error() {
    // Ten valid rows, all on the same calendar date.
    let mut csv_data = String::from("date,product,sales,stock\n");
    for i in 0..10 {
        csv_data.push_str(&format!("2024-01-01,P{i},5,10\n"));
    }

    let err = analyze_csv(csv_data.as_bytes(), 7).unwrap_err();
    assert!(matches!(err, EngineError::Analysis(_)));
    assert!(!err.is_client_error());
}
