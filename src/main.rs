mod client;
mod model;
mod regions;
mod report;
mod sweep;
mod utils;

use client::{CasperClient, InventoryClient, SessionConfig};
use model::{CarModel, SweepResult};
use regions::JsonRegionDirectory;
use report::Snapshot;
use sweep::{SweepPacing, Sweeper};
use std::io::{self, Write};
use std::sync::Arc;
use tokio::time::{sleep, Duration};
use tracing::{error, info, warn};

/// Written by the separate region-fetch step.
const REGION_FILE: &str = "regions.json";
const DETAIL_CAP: usize = 3;
const ALL_MODEL_DETAIL_CAP: usize = 2;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("panic: {:?}", panic_info);
    }));

    let session = SessionConfig::default();

    println!("{}", "=".repeat(70));
    println!("캐스퍼 특별기획전 전국 재고 검색");
    println!("기획전 번호: {}", session.exhibition_no);
    println!("{}", "=".repeat(70));

    let directory = match JsonRegionDirectory::load(REGION_FILE) {
        Ok(d) => Arc::new(d),
        Err(e) => {
            error!(error = %e, "region directory unavailable");
            eprintln!("\n지역 데이터가 없습니다: {}", e);
            eprintln!("먼저 지역 수집 단계를 실행하세요.");
            return;
        }
    };

    let client: Arc<dyn InventoryClient> =
        Arc::new(CasperClient::new(session.clone(), directory.clone()));
    let sweeper = Sweeper::new(client.clone(), directory, SweepPacing::default());

    let model_count = CarModel::ALL.len();
    println!("\n모델을 선택하세요:");
    for (i, model) in CarModel::ALL.iter().enumerate() {
        println!("{}. {}", i + 1, model.display_name());
    }
    println!("{}. 모든 모델 (전체 검색)", model_count + 1);
    println!("{}. 재고 현황만 확인", model_count + 2);

    let Some(choice) = prompt(&format!("\n번호 선택 (1-{}): ", model_count + 2)) else {
        println!("\n중단됨");
        return;
    };
    let choice: usize = match choice.parse() {
        Ok(n) => n,
        Err(_) => {
            println!("잘못된 선택입니다.");
            return;
        }
    };

    if choice >= 1 && choice <= model_count {
        run_single_model(&sweeper, &session, CarModel::ALL[choice - 1]).await;
    } else if choice == model_count + 1 {
        run_all_models(&sweeper, &session).await;
    } else if choice == model_count + 2 {
        run_overview(client.as_ref()).await;
    } else {
        println!("잘못된 선택입니다.");
    }
}

/// Quick nationwide stock counts without a regional sweep.
async fn run_overview(client: &dyn InventoryClient) {
    let mut counts = Vec::with_capacity(CarModel::ALL.len());
    for model in CarModel::ALL {
        let count = match client.count(model).await {
            Ok(n) => n,
            Err(e) => {
                warn!(model = model.display_name(), error = %e, "count failed");
                0
            }
        };
        counts.push((model, count));
    }
    report::print_overview(&counts);
}

async fn run_single_model(sweeper: &Sweeper, session: &SessionConfig, model: CarModel) {
    let results = match sweeper.run(model).await {
        Ok(r) => r,
        Err(e) => {
            error!(error = %e, "sweep aborted");
            eprintln!("{}", e);
            return;
        }
    };

    report::print_summary(&results, model);

    if confirm("\n상세 정보를 보시겠습니까? (y/n): ") {
        report::print_detail(&results, DETAIL_CAP);
    }
    if confirm("\n결과를 저장하시겠습니까? (y/n): ") {
        save_snapshot(&results, model, &session.exhibition_no);
    }
}

async fn run_all_models(sweeper: &Sweeper, session: &SessionConfig) {
    println!("\n{}", "=".repeat(70));
    println!("[특별기획전] 모든 모델 전국 재고 검색");
    println!("{}", "=".repeat(70));

    let mut all: Vec<(CarModel, SweepResult)> = Vec::with_capacity(CarModel::ALL.len());
    for (i, model) in CarModel::ALL.iter().enumerate() {
        println!("\n{}", "=".repeat(70));
        println!("모델: {}", model.display_name());
        println!("{}", "=".repeat(70));

        match sweeper.run(*model).await {
            Ok(results) => {
                report::print_summary(&results, *model);
                all.push((*model, results));
            }
            Err(e) => {
                // The only error a sweep surfaces is the missing
                // prerequisite; no point trying the remaining models.
                error!(error = %e, "sweep aborted");
                eprintln!("{}", e);
                return;
            }
        }

        if i + 1 < CarModel::ALL.len() {
            sleep(Duration::from_secs(1)).await;
        }
    }

    println!("\n{}", "=".repeat(80));
    println!("[특별기획전] 전체 모델 재고 요약");
    println!("{}", "=".repeat(80));
    for (model, results) in &all {
        println!("\n{}", model.display_name());
        println!("  전국 재고: {}대", results.total_count());
        println!("  재고 있는 시군구: {}개", results.stocked_bucket_count());
    }

    if confirm("\n각 모델의 상세 정보를 보시겠습니까? (y/n): ") {
        for (model, results) in &all {
            println!("\n{}", "=".repeat(70));
            println!("{} 상세", model.display_name());
            println!("{}", "=".repeat(70));
            report::print_detail(results, ALL_MODEL_DETAIL_CAP);
        }
    }
    if confirm("\n결과를 저장하시겠습니까? (y/n): ") {
        for (model, results) in &all {
            save_snapshot(results, *model, &session.exhibition_no);
        }
    }
}

fn save_snapshot(results: &SweepResult, model: CarModel, exhibition_no: &str) {
    let snapshot = Snapshot::from_sweep(results, model, exhibition_no);
    let filename = Snapshot::default_filename(model);
    match snapshot.save(&filename) {
        Ok(()) => {
            info!(file = %filename, "snapshot written");
            println!("\n결과 저장: {}", filename);
        }
        Err(e) => {
            warn!(error = %e, "snapshot save failed");
            eprintln!("저장 실패: {}", e);
        }
    }
}

/// Reads one trimmed line from stdin; `None` on EOF or read error,
/// which callers treat as a clean user interruption.
fn prompt(message: &str) -> Option<String> {
    print!("{}", message);
    io::stdout().flush().ok()?;
    let mut line = String::new();
    match io::stdin().read_line(&mut line) {
        Ok(0) => None,
        Ok(_) => Some(line.trim().to_string()),
        Err(_) => None,
    }
}

fn confirm(message: &str) -> bool {
    prompt(message)
        .map(|answer| answer.eq_ignore_ascii_case("y"))
        .unwrap_or(false)
}
