//! Per-product sales statistics.
//!
//! Groups cleaned rows by exact product name and ranks products by total
//! quantity sold. Ties keep first-encounter order (stable sorts throughout),
//! so re-running on identical input yields an identical ranking.

use std::collections::HashMap;

use crate::cleaner::CanonicalRow;
use crate::report::ProductSales;

/// How many products make the best/worst seller lists.
const RANKING_SIZE: usize = 3;

/// Aggregated demand for one product.
#[derive(Clone, Debug, PartialEq)]
pub struct ProductStats {
    pub product: String,
    pub total_quantity: f64,
    pub mean_quantity: f64,
    pub observation_count: usize,
}

/// Compute per-product statistics, sorted descending by total quantity.
///
/// Rows without a product name are skipped; when no row carries one the
/// result is empty and the engine degrades to forecast-only mode.
pub fn compute(rows: &[CanonicalRow]) -> Vec<ProductStats> {
    let mut order: Vec<String> = Vec::new();
    let mut sums: HashMap<String, (f64, usize)> = HashMap::new();

    for row in rows {
        let Some(product) = &row.product else { continue };
        let entry = sums.entry(product.clone()).or_insert_with(|| {
            order.push(product.clone());
            (0.0, 0)
        });
        entry.0 += row.quantity;
        entry.1 += 1;
    }

    let mut stats: Vec<ProductStats> = order
        .into_iter()
        .map(|product| {
            let (total, count) = sums[&product];
            ProductStats {
                total_quantity: total,
                mean_quantity: total / count as f64,
                observation_count: count,
                product,
            }
        })
        .collect();

    stats.sort_by(|a, b| {
        b.total_quantity
            .partial_cmp(&a.total_quantity)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    stats
}

/// Top 3 products by total quantity, strongest first.
pub fn best_sellers(stats: &[ProductStats]) -> Vec<ProductSales> {
    stats.iter().take(RANKING_SIZE).map(to_sales).collect()
}

/// Bottom 3 products by total quantity, weakest first (dead-stock candidates).
pub fn worst_sellers(stats: &[ProductStats]) -> Vec<ProductSales> {
    let tail_start = stats.len().saturating_sub(RANKING_SIZE);
    let mut tail: Vec<ProductSales> = stats[tail_start..].iter().map(to_sales).collect();
    tail.reverse();
    tail
}

fn to_sales(s: &ProductStats) -> ProductSales {
    ProductSales {
        product: s.product.clone(),
        total: s.total_quantity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn row(product: &str, quantity: f64) -> CanonicalRow {
        CanonicalRow {
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            quantity,
            product: Some(product.to_string()),
            stock: None,
        }
    }

    #[test]
    fn aggregates_sum_mean_count() {
        let rows = vec![row("Beras", 10.0), row("Beras", 20.0), row("Gula", 5.0)];
        let stats = compute(&rows);
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].product, "Beras");
        assert_eq!(stats[0].total_quantity, 30.0);
        assert_eq!(stats[0].mean_quantity, 15.0);
        assert_eq!(stats[0].observation_count, 2);
        assert_eq!(stats[1].product, "Gula");
    }

    #[test]
    fn rows_without_product_are_skipped() {
        let mut rows = vec![row("Beras", 10.0)];
        rows.push(CanonicalRow {
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            quantity: 99.0,
            product: None,
            stock: None,
        });
        let stats = compute(&rows);
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].total_quantity, 10.0);
    }

    #[test]
    fn best_sellers_take_top_three() {
        let rows = vec![
            row("A", 1.0),
            row("B", 4.0),
            row("C", 3.0),
            row("D", 2.0),
        ];
        let best = best_sellers(&compute(&rows));
        let names: Vec<&str> = best.iter().map(|p| p.product.as_str()).collect();
        assert_eq!(names, vec!["B", "C", "D"]);
    }

    #[test]
    fn worst_sellers_are_bottom_three_ascending() {
        let rows = vec![
            row("A", 1.0),
            row("B", 4.0),
            row("C", 3.0),
            row("D", 2.0),
        ];
        let worst = worst_sellers(&compute(&rows));
        let names: Vec<&str> = worst.iter().map(|p| p.product.as_str()).collect();
        // Bottom three by sum are C, D, A; the worst of the worst leads.
        assert_eq!(names, vec!["A", "D", "C"]);
    }

    #[test]
    fn fewer_products_than_ranking_size_is_fine() {
        let rows = vec![row("Solo", 7.0)];
        let stats = compute(&rows);
        assert_eq!(best_sellers(&stats).len(), 1);
        assert_eq!(worst_sellers(&stats).len(), 1);
    }

    #[test]
    fn ties_keep_first_encounter_order() {
        let rows = vec![row("X", 5.0), row("Y", 5.0), row("Z", 5.0)];
        let stats = compute(&rows);
        let names: Vec<&str> = stats.iter().map(|s| s.product.as_str()).collect();
        assert_eq!(names, vec!["X", "Y", "Z"]);
    }
}
