use serde::{Deserialize, Serialize};

/// Raw `?page=&limit=` query values. Kept as strings so that absent and
/// non-numeric values both fall back to the defaults instead of rejecting
/// the request.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl PageParams {
    pub fn page(&self) -> i64 {
        self.page
            .as_deref()
            .and_then(|v| v.parse::<i64>().ok())
            .filter(|p| *p >= 1)
            .unwrap_or(1)
    }

    pub fn limit(&self) -> i64 {
        self.limit
            .as_deref()
            .and_then(|v| v.parse::<i64>().ok())
            .filter(|l| *l >= 1)
            .unwrap_or(10)
    }

    pub fn offset(&self) -> i64 {
        // saturate so absurd page/limit values clamp instead of overflowing
        self.page().saturating_sub(1).saturating_mul(self.limit())
    }
}

/// Pagination envelope returned by every list endpoint.
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub page: i64,
    pub limit: i64,
    #[serde(rename = "totalPages")]
    pub total_pages: i64,
    #[serde(rename = "totalResults")]
    pub total_results: i64,
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, params: &PageParams, total_results: i64) -> Self {
        let limit = params.limit();
        Self {
            data,
            page: params.page(),
            limit,
            total_pages: total_pages(total_results, limit),
            total_results,
        }
    }
}

fn total_pages(total_results: i64, limit: i64) -> i64 {
    (total_results + limit - 1) / limit
}
