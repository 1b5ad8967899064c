//! Saving generated wireframes.

use chrono::{DateTime, TimeZone};
use std::fmt::Display;

use crate::error::{WireframeError, WireframeResult};
use crate::model::Website;

pub const DEFAULT_PREFIX: &str = "wireframe";

/// The model as 2-space indented JSON. Parsing the output yields an equal [`Website`].
pub fn to_json_pretty(website: &Website) -> WireframeResult<String> {
    serde_json::to_string_pretty(website).map_err(|e| WireframeError::Export(e.to_string()))
}

/// `<prefix>_YYYYmmdd_HHMMSS.<ext>`
pub fn file_name<Tz>(prefix: &str, ext: &str, timestamp: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    format!(
        "{}_{}.{}",
        prefix,
        timestamp.format("%Y%m%d_%H%M%S"),
        ext.trim_start_matches('.')
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ElementKind, LayoutElement, Page};
    use crate::validator::parse_website;
    use chrono::Utc;

    #[test]
    fn test_file_name() {
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(file_name(DEFAULT_PREFIX, "json", &at), "wireframe_20240309_070501.json");
        assert_eq!(file_name("shop", ".html", &at), "shop_20240309_070501.html");
    }

    #[test]
    fn test_pretty_json_reparses() {
        let website = Website {
            website_title: "Shop".to_string(),
            global_header: None,
            global_footer: None,
            pages: vec![Page {
                page_id: "home".to_string(),
                page_title: "Home".to_string(),
                background_color: None,
                layout: vec![LayoutElement::new(ElementKind::Button, 10.0, 20.0, 30.0, 40.0)
                    .with_content("Buy")],
            }],
        };
        let json = to_json_pretty(&website).unwrap();
        assert!(json.contains("\n  \"websiteTitle\": \"Shop\""));
        assert_eq!(parse_website(&json).unwrap(), website);
    }
}
