use crate::client::traits::InventoryClient;
use crate::model::{CarModel, ClientError, VehicleRecord};
use crate::regions::RegionDirectory;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Default nationwide area pair used when no region is given.
const NATIONWIDE_AREA: (&str, &str) = ("H", "H0");

/// Process-wide session configuration: exhibition scope plus the header
/// identity the gateway expects. Built once, injected into the client,
/// never mutated.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub exhibition_no: String,
    pub origin: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            exhibition_no: "E20260133".to_string(),
            origin: "https://casper.hyundai.com".to_string(),
        }
    }
}

impl SessionConfig {
    pub fn search_url(&self) -> String {
        format!(
            "{}/gw/wp/product/v2/product/exhibition/cars/{}",
            self.origin, self.exhibition_no
        )
    }

    fn menu_path(&self) -> String {
        format!("/vehicles/car-list/promotion?exhbNo={}", self.exhibition_no)
    }

    /// Static header set the gateway requires on every call. Values are
    /// known-ASCII, so conversion cannot fail at runtime.
    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            "accept",
            HeaderValue::from_static("application/json, text/plain, */*"),
        );
        headers.insert(
            "accept-language",
            HeaderValue::from_static("ko,en-US;q=0.9,en;q=0.8,ja;q=0.7"),
        );
        headers.insert(
            "content-type",
            HeaderValue::from_static("application/json;charset=UTF-8"),
        );
        headers.insert(
            "origin",
            HeaderValue::from_str(&self.origin).expect("origin header"),
        );
        headers.insert(
            "referer",
            HeaderValue::from_str(&format!("{}{}", self.origin, self.menu_path()))
                .expect("referer header"),
        );
        headers.insert(
            "sec-ch-ua",
            HeaderValue::from_static(
                "\"Google Chrome\";v=\"143\", \"Chromium\";v=\"143\", \"Not A(Brand\";v=\"24\"",
            ),
        );
        headers.insert("sec-ch-ua-mobile", HeaderValue::from_static("?0"));
        headers.insert("sec-ch-ua-platform", HeaderValue::from_static("\"macOS\""));
        headers.insert("sec-fetch-dest", HeaderValue::from_static("empty"));
        headers.insert("sec-fetch-mode", HeaderValue::from_static("cors"));
        headers.insert("sec-fetch-site", HeaderValue::from_static("same-origin"));
        headers.insert(
            "user-agent",
            HeaderValue::from_static(
                "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
                 (KHTML, like Gecko) Chrome/143.0.0.0 Safari/537.36",
            ),
        );
        headers.insert("ep-channel", HeaderValue::from_static("wpc"));
        headers.insert("ep-ip", HeaderValue::from_static("127.0.0.1"));
        headers.insert("ep-jsessionid", HeaderValue::from_static(""));
        headers.insert(
            "ep-menu-id",
            HeaderValue::from_str(&self.menu_path()).expect("ep-menu-id header"),
        );
        headers.insert("ep-version", HeaderValue::from_static("v2"));
        headers.insert("service-type", HeaderValue::from_static("product"));
        headers.insert(
            "url",
            HeaderValue::from_str(&self.menu_path()).expect("url header"),
        );
        headers.insert("x-b3-sampled", HeaderValue::from_static("1"));
        headers
    }
}

/// Search request body. Model filters are fixed per catalog entry; every
/// other filterable field stays at "no filter". Only page 1 is ever
/// requested: inventories past PAGE_SIZE records undercount silently,
/// a known limitation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchBody {
    pub car_code: String,
    pub subsidy_region: String,
    pub exhb_no: String,
    pub sort_code: String,
    pub delivery_area_code: String,
    pub delivery_local_area_code: String,
    pub car_body_code: String,
    pub car_engine_code: String,
    pub car_trim_code: String,
    pub exterior_color_code: String,
    pub interior_color_code: Vec<String>,
    pub delivery_center_code: String,
    pub wpa_scn_cd: String,
    pub option_filter: String,
    pub min_sale_price: String,
    pub max_sale_price: String,
    pub choice_opt_yn: String,
    pub page_no: u32,
    pub page_size: u32,
}

impl SearchBody {
    pub const PAGE_SIZE: u32 = 100;

    pub fn for_model(
        model: CarModel,
        exhibition_no: &str,
        area_code: &str,
        local_area_code: &str,
    ) -> Self {
        Self {
            car_code: model.car_code().to_string(),
            subsidy_region: model.subsidy_region().to_string(),
            exhb_no: exhibition_no.to_string(),
            sort_code: "10".to_string(),
            delivery_area_code: area_code.to_string(),
            delivery_local_area_code: local_area_code.to_string(),
            car_body_code: String::new(),
            car_engine_code: String::new(),
            car_trim_code: String::new(),
            exterior_color_code: String::new(),
            interior_color_code: Vec::new(),
            delivery_center_code: String::new(),
            wpa_scn_cd: String::new(),
            option_filter: String::new(),
            min_sale_price: model.min_sale_price().to_string(),
            max_sale_price: model.max_sale_price().to_string(),
            choice_opt_yn: "Y".to_string(),
            page_no: 1,
            page_size: Self::PAGE_SIZE,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ApiEnvelope {
    data: Option<ApiData>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ApiData {
    #[serde(rename = "totalCount")]
    total_count: Option<u64>,
    discountsearchcars: Vec<VehicleRecord>,
}

/// Inventory client for the exhibition gateway. One POST per call, a
/// fixed 10 s timeout, no caching, no retry.
pub struct CasperClient {
    client: Client,
    config: SessionConfig,
    directory: Arc<dyn RegionDirectory>,
}

impl CasperClient {
    pub fn new(config: SessionConfig, directory: Arc<dyn RegionDirectory>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .default_headers(config.headers())
            .build()
            .expect("failed to build HTTP client");
        Self {
            client,
            config,
            directory,
        }
    }

    async fn post_search(&self, body: &SearchBody) -> Result<ApiData, ClientError> {
        debug!(
            area = %body.delivery_area_code,
            local = %body.delivery_local_area_code,
            car = %body.car_code,
            "inventory search"
        );
        let response = self
            .client
            .post(self.config.search_url())
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ClientError::Transport("request timed out".to_string())
                } else {
                    ClientError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Transport(format!("HTTP {}", status)));
        }

        let envelope: ApiEnvelope = response
            .json()
            .await
            .map_err(|e| ClientError::Malformed(e.to_string()))?;
        Ok(envelope.data.unwrap_or_default())
    }
}

#[async_trait::async_trait]
impl InventoryClient for CasperClient {
    async fn search(
        &self,
        model: CarModel,
        area_code: &str,
        local_area_code: &str,
    ) -> Result<Vec<VehicleRecord>, ClientError> {
        let body =
            SearchBody::for_model(model, &self.config.exhibition_no, area_code, local_area_code);
        Ok(self.post_search(&body).await?.discountsearchcars)
    }

    async fn search_region(
        &self,
        model: CarModel,
        sido: &str,
        sigun: Option<&str>,
    ) -> Result<Vec<VehicleRecord>, ClientError> {
        let (area_code, local_area_code) = self.directory.resolve(sido, sigun)?;
        self.search(model, &area_code, &local_area_code).await
    }

    async fn count(&self, model: CarModel) -> Result<u64, ClientError> {
        let body = SearchBody::for_model(
            model,
            &self.config.exhibition_no,
            NATIONWIDE_AREA.0,
            NATIONWIDE_AREA.1,
        );
        Ok(self.post_search(&body).await?.total_count.unwrap_or(0))
    }
}
