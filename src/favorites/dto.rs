use serde::Deserialize;

/// Body for POST /favorites. `imageId` and `title` are required; the rest
/// is descriptive metadata passed through from the external image service.
#[derive(Debug, Deserialize)]
pub struct AddFavoriteRequest {
    #[serde(rename = "imageId")]
    pub image_id: Option<String>,
    pub title: Option<String>,
    pub url_s: Option<String>,
    pub url_m: Option<String>,
    pub source: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_payload() {
        let req: AddFavoriteRequest = serde_json::from_str(
            r#"{"imageId":"f1","title":"Sunset","url_s":"s","url_m":"m","source":"flickr"}"#,
        )
        .unwrap();
        assert_eq!(req.image_id.as_deref(), Some("f1"));
        assert_eq!(req.title.as_deref(), Some("Sunset"));
        assert_eq!(req.source.as_deref(), Some("flickr"));
    }

    #[test]
    fn missing_fields_parse_as_none() {
        let req: AddFavoriteRequest = serde_json::from_str(r#"{"title":"Sunset"}"#).unwrap();
        assert!(req.image_id.is_none());
        assert!(req.url_s.is_none());
    }
}
