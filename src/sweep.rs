// Regional sweep: full nationwide traversal for one model.
use crate::client::InventoryClient;
use crate::model::{CarModel, SidoStock, SweepError, SweepResult};
use crate::regions::RegionDirectory;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

/// Fixed inter-call pacing. The upstream is rate-sensitive per
/// fine-grained query, so consecutive calls are separated by short,
/// non-adaptive delays; there is no backoff on failure.
#[derive(Debug, Clone, Copy)]
pub struct SweepPacing {
    pub sigun_delay: Duration,
    pub sido_delay: Duration,
}

impl Default for SweepPacing {
    fn default() -> Self {
        Self {
            sigun_delay: Duration::from_millis(100),
            sido_delay: Duration::from_millis(200),
        }
    }
}

impl SweepPacing {
    pub fn none() -> Self {
        Self {
            sigun_delay: Duration::ZERO,
            sido_delay: Duration::ZERO,
        }
    }
}

async fn pause(delay: Duration) {
    if !delay.is_zero() {
        sleep(delay).await;
    }
}

pub struct Sweeper {
    client: Arc<dyn InventoryClient>,
    directory: Arc<dyn RegionDirectory>,
    pacing: SweepPacing,
}

impl Sweeper {
    pub fn new(
        client: Arc<dyn InventoryClient>,
        directory: Arc<dyn RegionDirectory>,
        pacing: SweepPacing,
    ) -> Self {
        Self {
            client,
            directory,
            pacing,
        }
    }

    /// Visits every siDo in directory order and returns the accumulated
    /// result, printing per-region progress as it goes.
    ///
    /// The single fatal condition is an unpopulated directory, checked
    /// before any call goes out. Every per-region failure is absorbed as
    /// an empty bucket, so once started the sweep always traverses the
    /// whole country. A failed region is indistinguishable from a
    /// genuinely empty one afterward; that tradeoff is deliberate.
    pub async fn run(&self, model: CarModel) -> Result<SweepResult, SweepError> {
        if !self.directory.is_available() {
            return Err(SweepError::PrerequisiteMissing(
                "no region data loaded".to_string(),
            ));
        }

        let sidos = self.directory.sido_names();
        let mut result = SweepResult::default();

        println!(
            "\n[특별기획전] 전국 재고 검색 중... (모델: {})",
            model.display_name()
        );
        println!("{}", "=".repeat(80));

        for (i, sido) in sidos.iter().enumerate() {
            println!("\n[{:2}/{}] {}", i + 1, sidos.len(), sido);
            println!("{}", "-".repeat(70));

            let siguns = self.directory.sigun_names(sido);
            let mut stock = SidoStock::new(sido.clone());

            if siguns.len() > 1 {
                for sigun in &siguns {
                    match self.client.search_region(model, sido, Some(sigun)).await {
                        Ok(cars) if !cars.is_empty() => {
                            println!("  [O] {:<20} {:>3}대", sigun, cars.len());
                            stock.push_bucket(sigun.clone(), cars);
                        }
                        Ok(_) => {}
                        Err(e) => {
                            // Absorbed: one bad sub-region must never
                            // void the nationwide run.
                            warn!(%sido, %sigun, error = %e, "region search failed");
                        }
                    }
                    pause(self.pacing.sigun_delay).await;
                }
                if stock.total() == 0 {
                    println!("  [X] 재고 없음");
                }
            } else {
                // One call at siDo level; stock keys under the lone
                // siGun's name when there is one.
                let bucket_name = siguns.first().cloned().unwrap_or_else(|| sido.clone());
                match self.client.search_region(model, sido, None).await {
                    Ok(cars) if !cars.is_empty() => {
                        println!("  [O] {:<20} {:>3}대", bucket_name, cars.len());
                        stock.push_bucket(bucket_name, cars);
                    }
                    Ok(_) => println!("  [X] 재고 없음"),
                    Err(e) => {
                        warn!(%sido, error = %e, "region search failed");
                        println!("  [!] 오류");
                    }
                }
            }

            let sido_total = stock.total();
            if sido_total > 0 {
                println!("  {}", "─".repeat(70));
                println!("  >> {} 합계: {}대", sido, sido_total);
            }
            result.sidos.push(stock);
            pause(self.pacing.sido_delay).await;
        }

        info!(
            model = model.display_name(),
            total = result.total_count(),
            "sweep complete"
        );
        println!("\n{}", "=".repeat(80));
        println!("[완료] 전국 총 재고: {}대\n", result.total_count());
        Ok(result)
    }
}
