use crate::model::{CarModel, ClientError, VehicleRecord};

#[async_trait::async_trait]
pub trait InventoryClient: Send + Sync {
    /// One upstream search scoped to an area/local-area code pair.
    /// Records come back in upstream order, never re-sorted.
    async fn search(
        &self,
        model: CarModel,
        area_code: &str,
        local_area_code: &str,
    ) -> Result<Vec<VehicleRecord>, ClientError>;

    /// Search addressed by region names, resolved through the region
    /// directory before hitting the network.
    async fn search_region(
        &self,
        model: CarModel,
        sido: &str,
        sigun: Option<&str>,
    ) -> Result<Vec<VehicleRecord>, ClientError>;

    /// Nationwide stock count for one model, taken from the response's
    /// total-count field rather than the (page-capped) record list.
    async fn count(&self, model: CarModel) -> Result<u64, ClientError>;
}
