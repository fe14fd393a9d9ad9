use serde::Deserialize;

/// Body for POST /recent-searches.
#[derive(Debug, Deserialize)]
pub struct AddSearchRequest {
    pub term: Option<String>,
}
