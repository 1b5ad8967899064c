use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

use crate::style::StyleOverrides;

pub const DEFAULT_WEBSITE_TITLE: &str = "Website";

/// A whole generated website: optional global header/footer and an ordered list of pages.
/// Page order is tab order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Website {
    #[serde(default = "default_website_title")]
    pub website_title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_header: Option<ElementGroup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_footer: Option<ElementGroup>,
    pub pages: Vec<Page>,
}

fn default_website_title() -> String {
    DEFAULT_WEBSITE_TITLE.to_string()
}

impl Website {
    pub fn page(&self, page_id: &str) -> Option<&Page> {
        self.pages.iter().find(|p| p.page_id == page_id)
    }

    pub fn header_elements(&self) -> &[LayoutElement] {
        self.global_header
            .as_ref()
            .map(|g| g.layout.as_slice())
            .unwrap_or(&[])
    }

    pub fn footer_elements(&self) -> &[LayoutElement] {
        self.global_footer
            .as_ref()
            .map(|g| g.layout.as_slice())
            .unwrap_or(&[])
    }
}

/// Elements shared by every page (global header or footer)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementGroup {
    #[serde(default)]
    pub layout: Vec<LayoutElement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    /// Normalised to `page-<n>` when the source omits it.
    #[serde(default)]
    pub page_id: String,
    /// Normalised to the page id when the source omits it.
    #[serde(default)]
    pub page_title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    pub layout: Vec<LayoutElement>,
}

/// A positioned visual unit. Coordinate units depend on the configured
/// [`CoordinateConvention`](crate::config::CoordinateConvention).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutElement {
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "lenient_kind")]
    pub kind: ElementKind,
    #[serde(default, deserialize_with = "lenient_offset")]
    pub x: f64,
    #[serde(default, deserialize_with = "lenient_offset")]
    pub y: f64,
    #[serde(default = "default_width", deserialize_with = "lenient_width")]
    pub width: f64,
    #[serde(default = "default_height", deserialize_with = "lenient_height")]
    pub height: f64,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Single-screen responses name the content `label`.
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(flatten)]
    pub style: StyleOverrides,
}

fn default_width() -> f64 {
    100.0
}

fn default_height() -> f64 {
    40.0
}

impl LayoutElement {
    pub fn new(kind: ElementKind, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            id: None,
            kind,
            x,
            y,
            width,
            height,
            content: None,
            label: None,
            style: StyleOverrides::default(),
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// `content`, falling back to `label`; blank strings count as absent.
    pub fn text(&self) -> Option<&str> {
        self.content
            .as_deref()
            .or(self.label.as_deref())
            .filter(|s| !s.trim().is_empty())
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

// Element fields are read leniently: a value of the wrong shape falls back to the field's
// default with a warning instead of rejecting the element.

/// A number from a JSON number or a numeric string ("12", "12.5%", "40px").
pub(crate) fn number_from_value(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s
            .trim()
            .trim_end_matches("px")
            .trim_end_matches('%')
            .trim()
            .parse::<f64>()
            .ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

fn number_or<'de, D>(deserializer: D, field: &str, default: f64) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(number_from_value(&value).unwrap_or_else(|| {
        if !value.is_null() {
            tracing::warn!(field, value = %value, default, "ignoring non-numeric value");
        }
        default
    }))
}

fn lenient_offset<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    number_or(deserializer, "x/y", 0.0)
}

fn lenient_width<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    number_or(deserializer, "width", default_width())
}

fn lenient_height<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    number_or(deserializer, "height", default_height())
}

/// Optional number; anything unusable becomes `None`.
pub(crate) fn lenient_optional_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let number = number_from_value(&value);
    if number.is_none() && !value.is_null() {
        tracing::warn!(value = %value, "ignoring non-numeric style value");
    }
    Ok(number)
}

/// Optional text. Numbers and booleans are written out; arrays and objects are dropped.
pub(crate) fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => None,
        other => {
            tracing::warn!(value = %other, "ignoring non-text value");
            None
        }
    })
}

/// `type` as a string; null or a non-string means `section`.
fn lenient_kind<'de, D>(deserializer: D) -> Result<ElementKind, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) if !s.trim().is_empty() => ElementKind::from(s),
        Value::String(_) | Value::Null => ElementKind::Section,
        other => {
            tracing::warn!(value = %other, "unreadable element type, using section");
            ElementKind::Section
        }
    })
}

/// Element type. Unknown names are kept verbatim so they can still be labelled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ElementKind {
    #[default]
    Section,
    Card,
    Button,
    Input,
    Image,
    Text,
    Header,
    Footer,
    Divider,
    Grid,
    Navbar,
    Label,
    Other(String),
}

impl ElementKind {
    pub const KNOWN: [ElementKind; 12] = [
        ElementKind::Section,
        ElementKind::Card,
        ElementKind::Button,
        ElementKind::Input,
        ElementKind::Image,
        ElementKind::Text,
        ElementKind::Header,
        ElementKind::Footer,
        ElementKind::Divider,
        ElementKind::Grid,
        ElementKind::Navbar,
        ElementKind::Label,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            ElementKind::Section => "section",
            ElementKind::Card => "card",
            ElementKind::Button => "button",
            ElementKind::Input => "input",
            ElementKind::Image => "image",
            ElementKind::Text => "text",
            ElementKind::Header => "header",
            ElementKind::Footer => "footer",
            ElementKind::Divider => "divider",
            ElementKind::Grid => "grid",
            ElementKind::Navbar => "navbar",
            ElementKind::Label => "label",
            ElementKind::Other(name) => name.as_str(),
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, ElementKind::Other(_))
    }

    /// Name for captions: "Section", "Navbar", or the unknown type as written.
    pub fn display_name(&self) -> String {
        match self {
            ElementKind::Other(name) => name.clone(),
            known => {
                let name = known.as_str();
                let mut chars = name.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            }
        }
    }
}

impl From<String> for ElementKind {
    fn from(value: String) -> Self {
        let normalized = value.trim().to_ascii_lowercase();
        ElementKind::KNOWN
            .iter()
            .find(|k| k.as_str() == normalized)
            .cloned()
            .unwrap_or(ElementKind::Other(value))
    }
}

impl From<ElementKind> for String {
    fn from(value: ElementKind) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parsing_is_case_insensitive() {
        assert_eq!(ElementKind::from("Button".to_string()), ElementKind::Button);
        assert_eq!(ElementKind::from(" navbar ".to_string()), ElementKind::Navbar);
    }

    #[test]
    fn test_unknown_kind_keeps_its_name() {
        let kind = ElementKind::from("Carousel".to_string());
        assert_eq!(kind, ElementKind::Other("Carousel".to_string()));
        assert!(!kind.is_known());
        assert_eq!(kind.display_name(), "Carousel");
        assert_eq!(ElementKind::Navbar.display_name(), "Navbar");
    }

    #[test]
    fn test_element_defaults_and_numeric_strings() {
        let el: LayoutElement =
            serde_json::from_str(r#"{"type":"card","y":"120px","width":"30%"}"#).unwrap();
        assert_eq!(el.kind, ElementKind::Card);
        assert_eq!(el.x, 0.0);
        assert_eq!(el.y, 120.0);
        assert_eq!(el.width, 30.0);
        assert_eq!(el.height, 40.0);
        assert_eq!(el.text(), None);
    }

    #[test]
    fn test_missing_type_is_section() {
        let el: LayoutElement = serde_json::from_str(r#"{"x":1,"y":2}"#).unwrap();
        assert_eq!(el.kind, ElementKind::Section);
    }

    #[test]
    fn test_label_is_fallback_content() {
        let el: LayoutElement =
            serde_json::from_str(r#"{"type":"navbar","label":"Top nav","x":0,"y":0}"#).unwrap();
        assert_eq!(el.text(), Some("Top nav"));
    }

    #[test]
    fn test_style_overrides_are_flattened() {
        let el: LayoutElement = serde_json::from_str(
            r##"{"type":"text","content":"Hi","color":"#ff0000","borderStyle":"dashed"}"##,
        )
        .unwrap();
        assert_eq!(el.style.color.as_deref(), Some("#ff0000"));
        assert_eq!(el.style.border_style, Some(crate::style::BorderStyle::Dashed));

        let json = serde_json::to_value(&el).unwrap();
        assert_eq!(json["color"], "#ff0000");
        assert!(json.get("fontSize").is_none());
    }
}
