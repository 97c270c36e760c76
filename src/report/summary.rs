use crate::model::{CarModel, SweepResult};
use crate::utils::{format_production_date, format_won};

/// One ranked line of the nationwide summary table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRow {
    pub sido: String,
    pub sigun: String,
    pub count: usize,
    pub min_price: i64,
    pub max_price: i64,
}

/// Flattens the non-empty buckets into rows sorted descending by count.
/// Price bounds run over the coerced final amounts.
pub fn summary_rows(result: &SweepResult) -> Vec<SummaryRow> {
    let mut rows: Vec<SummaryRow> = result
        .non_empty_buckets()
        .into_iter()
        .map(|(sido, sigun, cars)| {
            let prices: Vec<i64> = cars.iter().map(|c| c.final_amount_won()).collect();
            SummaryRow {
                sido: sido.to_string(),
                sigun: sigun.to_string(),
                count: cars.len(),
                min_price: prices.iter().copied().min().unwrap_or(0),
                max_price: prices.iter().copied().max().unwrap_or(0),
            }
        })
        .collect();
    rows.sort_by(|a, b| b.count.cmp(&a.count));
    rows
}

/// Per-siDo totals, descending; siDos without stock are omitted.
pub fn sido_totals(result: &SweepResult) -> Vec<(String, usize)> {
    let mut totals: Vec<(String, usize)> = result
        .sidos
        .iter()
        .filter(|s| s.total() > 0)
        .map(|s| (s.name.clone(), s.total()))
        .collect();
    totals.sort_by(|a, b| b.1.cmp(&a.1));
    totals
}

pub fn print_summary(result: &SweepResult, model: CarModel) {
    println!("\n{}", "=".repeat(80));
    println!("[특별기획전] 전국 재고 요약 - {}", model.display_name());
    println!("{}", "=".repeat(80));

    let rows = summary_rows(result);
    if rows.is_empty() {
        println!("\n전국에 재고가 없습니다.");
        return;
    }

    println!(
        "\n{:<8} {:<20} {:<8} {:<15} {:<15}",
        "시도", "시군구", "재고", "최저가", "최고가"
    );
    println!("{}", "-".repeat(80));
    for row in &rows {
        println!(
            "{:<8} {:<20} {:<8} {:>12}원 {:>12}원",
            row.sido,
            row.sigun,
            row.count,
            format_won(row.min_price),
            format_won(row.max_price)
        );
    }

    println!("{}", "-".repeat(80));
    println!("\n시도별 합계:");
    println!("{}", "-".repeat(80));
    for (sido, total) in sido_totals(result) {
        println!("  {:<10} {:>3}대", sido, total);
    }

    println!("{}", "-".repeat(80));
    println!("  {:<10} {:>3}대", "전국 합계", result.total_count());
    println!("{}", "=".repeat(80));
}

/// Per-region detail listing, capped at `max_per_region` records per
/// bucket with a truncation note past the cap.
pub fn print_detail(result: &SweepResult, max_per_region: usize) {
    println!("\n{}", "=".repeat(80));
    println!(
        "[특별기획전] 지역별 상세 정보 (각 시군구 최대 {}대)",
        max_per_region
    );
    println!("{}", "=".repeat(80));

    for sido in &result.sidos {
        let sido_total = sido.total();
        if sido_total == 0 {
            continue;
        }

        println!("\n{}", "=".repeat(80));
        println!(">> {} - 총 {}대", sido.name, sido_total);
        println!("{}", "=".repeat(80));

        for bucket in &sido.buckets {
            if bucket.cars.is_empty() {
                continue;
            }
            println!("\n  [{}] - {}대", bucket.name, bucket.cars.len());
            println!("  {}", "-".repeat(76));
            for (i, car) in bucket.cars.iter().take(max_per_region).enumerate() {
                println!(
                    "  {}. {:<15} | {:<12} | {:>12}원 | 할인 {:>10}원",
                    i + 1,
                    car.exterior(),
                    car.trim(),
                    format_won(car.final_amount_won()),
                    format_won(car.discount_won())
                );
                match &car.prdn_dt {
                    Some(stamp) if !stamp.is_empty() => println!(
                        "     출고: {} | 생산: {}",
                        car.delivery_center(),
                        format_production_date(stamp)
                    ),
                    _ => println!("     출고: {}", car.delivery_center()),
                }
            }
            if bucket.cars.len() > max_per_region {
                println!("     ... 외 {}대", bucket.cars.len() - max_per_region);
            }
        }
    }
}

/// Nationwide per-model stock overview, from the quick count endpoint.
pub fn print_overview(counts: &[(CarModel, u64)]) {
    println!("\n전체 모델 재고 현황:");
    println!("{}", "-".repeat(70));
    let mut total = 0u64;
    for (model, count) in counts {
        let status = if *count > 0 { "O" } else { "X" };
        println!(
            "[{}] {:<25} | 재고: {:>3}대 | 코드: {}",
            status,
            model.display_name(),
            count,
            model.car_code()
        );
        total += count;
    }
    println!("{}", "-".repeat(70));
    println!("총 재고: {}대", total);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{SidoStock, SweepResult, VehicleRecord};

    fn car(final_amount: i64) -> VehicleRecord {
        VehicleRecord {
            final_amount: Some(format!("{}.0", final_amount)),
            ..Default::default()
        }
    }

    #[test]
    fn single_bucket_row_carries_count_and_price_bounds() {
        let mut seoul = SidoStock::new("서울");
        seoul.push_bucket("강남구", vec![car(1000), car(2000), car(3000)]);
        let result = SweepResult { sidos: vec![seoul] };

        let rows = summary_rows(&result);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].sido, "서울");
        assert_eq!(rows[0].sigun, "강남구");
        assert_eq!(rows[0].count, 3);
        assert_eq!(rows[0].min_price, 1000);
        assert_eq!(rows[0].max_price, 3000);
        assert_eq!(result.total_count(), 3);
    }

    #[test]
    fn empty_buckets_are_excluded_from_rows_but_kept_in_sido_totals() {
        let mut gyeongbuk = SidoStock::new("경북");
        gyeongbuk.push_bucket("포항시", vec![car(1500), car(1600)]);
        gyeongbuk.push_bucket("경주시", Vec::new());
        let result = SweepResult {
            sidos: vec![gyeongbuk],
        };

        let rows = summary_rows(&result);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].sigun, "포항시");
        assert_eq!(sido_totals(&result), vec![("경북".to_string(), 2)]);
    }

    #[test]
    fn rows_rank_descending_by_count() {
        let mut seoul = SidoStock::new("서울");
        seoul.push_bucket("강남구", vec![car(1000)]);
        let mut gyeongbuk = SidoStock::new("경북");
        gyeongbuk.push_bucket("포항시", vec![car(2000), car(2100), car(2200)]);
        gyeongbuk.push_bucket("구미시", vec![car(3000), car(3100)]);
        let result = SweepResult {
            sidos: vec![seoul, gyeongbuk],
        };

        let counts: Vec<usize> = summary_rows(&result).iter().map(|r| r.count).collect();
        assert_eq!(counts, vec![3, 2, 1]);
    }

    #[test]
    fn totals_are_consistent_at_every_level() {
        let mut seoul = SidoStock::new("서울");
        seoul.push_bucket("강남구", vec![car(1000), car(2000)]);
        seoul.push_bucket("서초구", vec![car(3000)]);
        let mut gyeongbuk = SidoStock::new("경북");
        gyeongbuk.push_bucket("포항시", vec![car(4000)]);
        let empty = SidoStock::new("세종");
        let result = SweepResult {
            sidos: vec![seoul, gyeongbuk, empty],
        };

        let row_sum: usize = summary_rows(&result).iter().map(|r| r.count).sum();
        let sido_sum: usize = sido_totals(&result).iter().map(|(_, n)| n).sum();
        assert_eq!(result.total_count(), 4);
        assert_eq!(row_sum, result.total_count());
        assert_eq!(sido_sum, result.total_count());
    }
}
