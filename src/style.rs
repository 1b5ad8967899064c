use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::sync::OnceLock;

use crate::model::{lenient_optional_number, lenient_text};

/// Optional per-element style overrides, flattened into the element object.
/// Values of the wrong shape are dropped so the type default applies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StyleOverrides {
    #[serde(
        alias = "textColor",
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub color: Option<String>,
    #[serde(deserialize_with = "lenient_optional_number", skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    #[serde(deserialize_with = "lenient_optional_number", skip_serializing_if = "Option::is_none")]
    pub border_width: Option<f64>,
    #[serde(deserialize_with = "lenient_border_style", skip_serializing_if = "Option::is_none")]
    pub border_style: Option<BorderStyle>,
    #[serde(deserialize_with = "lenient_optional_number", skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<f64>,
}

impl StyleOverrides {
    pub fn is_empty(&self) -> bool {
        *self == StyleOverrides::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorderStyle {
    Solid,
    Dashed,
    Dotted,
    None,
}

impl BorderStyle {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "solid" => Some(BorderStyle::Solid),
            "dashed" => Some(BorderStyle::Dashed),
            "dotted" => Some(BorderStyle::Dotted),
            "none" => Some(BorderStyle::None),
            _ => None,
        }
    }

    pub fn as_css(self) -> &'static str {
        match self {
            BorderStyle::Solid => "solid",
            BorderStyle::Dashed => "dashed",
            BorderStyle::Dotted => "dotted",
            BorderStyle::None => "none",
        }
    }
}

fn lenient_border_style<'de, D>(deserializer: D) -> Result<Option<BorderStyle>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let style = value.as_str().and_then(BorderStyle::parse);
    if style.is_none() && !value.is_null() {
        tracing::warn!(value = %value, "unsupported border style, using the type default");
    }
    Ok(style)
}

const NAMED_COLORS: &[&str] = &[
    "red", "blue", "green", "white", "black", "transparent", "yellow", "orange", "purple",
    "pink", "gray", "grey",
];

/// Accepts `#rgb`, `#rrggbb`, `#rrggbbaa` and a small set of named colors.
/// Anything else is rejected so it never reaches an inline `style` attribute.
pub fn is_valid_color(value: &str) -> bool {
    static HEX_COLOR_REGEX: OnceLock<Regex> = OnceLock::new();
    let hex_regex = HEX_COLOR_REGEX.get_or_init(|| {
        Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8})$").unwrap()
    });

    let value = value.trim();
    hex_regex.is_match(value) || NAMED_COLORS.contains(&value.to_ascii_lowercase().as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_colors() {
        for color in ["#fff", "#3B82F6", "#00000080", "white", "Transparent"] {
            assert!(is_valid_color(color), "should accept {}", color);
        }
    }

    #[test]
    fn test_invalid_colors() {
        for color in ["#12345", "#gggggg", "123456", "red;background:url(x)", ""] {
            assert!(!is_valid_color(color), "should reject {}", color);
        }
    }

    #[test]
    fn test_text_color_alias() {
        let style: StyleOverrides =
            serde_json::from_str(r##"{"textColor":"#111111","fontSize":14}"##).unwrap();
        assert_eq!(style.color.as_deref(), Some("#111111"));
        assert_eq!(style.font_size, Some(14.0));
        assert!(!style.is_empty());
    }

    #[test]
    fn test_unusable_values_are_dropped() {
        let style: StyleOverrides = serde_json::from_str(
            r##"{"fontSize":"16px","borderWidth":"thick","borderStyle":"Double","borderRadius":[4],"color":7}"##,
        )
        .unwrap();
        assert_eq!(style.font_size, Some(16.0));
        assert_eq!(style.border_width, None);
        assert_eq!(style.border_style, None);
        assert_eq!(style.border_radius, None);
        assert_eq!(style.color.as_deref(), Some("7"));
        assert_eq!(BorderStyle::parse(" DASHED "), Some(BorderStyle::Dashed));
    }
}
