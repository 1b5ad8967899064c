//! Element renderer: one [`LayoutElement`] to one positioned, styled [`RenderedBlock`].
//!
//! Rendering never fails. Bad overrides fall back to the type defaults and unknown types
//! borrow the `section` look while keeping their own name as a caption.

use std::fmt;

use crate::config::CoordinateConvention;
use crate::model::{ElementKind, LayoutElement};
use crate::palette::{ContentFormat, TypeStyle, TypeTable};
use crate::style::{is_valid_color, BorderStyle};

const GRID_MIN_FONT: f64 = 8.0;
const GRID_MAX_FONT: f64 = 12.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Length {
    Percent(f64),
    Px(f64),
}

impl Length {
    pub fn value(self) -> f64 {
        match self {
            Length::Percent(v) | Length::Px(v) => v,
        }
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Length::Percent(v) => write!(f, "{}%", v),
            Length::Px(v) => write!(f, "{}px", v),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    pub left: Length,
    pub top: Length,
    pub width: Length,
    pub height: Length,
}

impl Geometry {
    pub fn resolve(element: &LayoutElement, convention: CoordinateConvention) -> Self {
        let width = element.width.max(0.0);
        let height = element.height.max(0.0);
        match convention {
            CoordinateConvention::PixelY => Geometry {
                left: Length::Percent(element.x),
                top: Length::Px(element.y),
                width: Length::Percent(width),
                height: Length::Px(height),
            },
            CoordinateConvention::PercentGrid => Geometry {
                left: Length::Percent(element.x),
                top: Length::Percent(element.y),
                width: Length::Percent(width),
                height: Length::Percent(height),
            },
        }
    }
}

/// Type defaults merged with the element's valid overrides
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedStyle {
    pub fill: String,
    pub text_color: String,
    pub border_color: String,
    pub border_width: f64,
    pub border_style: BorderStyle,
    pub border_radius: f64,
    pub font_size: f64,
    pub bold: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedBlock {
    pub id: Option<String>,
    pub kind: ElementKind,
    /// Type name as shown to the user; unknown types keep their spelling.
    pub label: String,
    pub geometry: Geometry,
    pub style: ResolvedStyle,
    pub format: ContentFormat,
    /// Small heading above the content (captioned types only).
    pub caption: Option<String>,
    pub content: String,
    pub tooltip: String,
    /// Source `y` and `height`, kept for extent and stacking calculations.
    pub y: f64,
    pub height: f64,
}

pub fn render(
    element: &LayoutElement,
    table: &TypeTable,
    convention: CoordinateConvention,
) -> RenderedBlock {
    let defaults = table.get(&element.kind);
    let label = element.kind.display_name();
    let text = element.text();

    let (caption, content) = format_content(&element.kind, defaults, text, &label);
    let tooltip = format!(
        "{} ({})",
        text.unwrap_or(if defaults.placeholder.is_empty() {
            label.as_str()
        } else {
            defaults.placeholder
        }),
        element.kind.as_str()
    );

    RenderedBlock {
        id: element.id.clone(),
        kind: element.kind.clone(),
        label,
        geometry: Geometry::resolve(element, convention),
        style: resolve_style(element, defaults, convention),
        format: defaults.format,
        caption,
        content,
        tooltip,
        y: element.y,
        height: element.height.max(0.0),
    }
}

fn format_content(
    kind: &ElementKind,
    defaults: &TypeStyle,
    text: Option<&str>,
    label: &str,
) -> (Option<String>, String) {
    match defaults.format {
        ContentFormat::Captioned => {
            let content = match (text, kind.is_known()) {
                (Some(t), _) => t.to_string(),
                (None, true) => defaults.placeholder.to_string(),
                (None, false) => String::new(),
            };
            (Some(label.to_string()), content)
        }
        ContentFormat::ImagePlaceholder => (
            None,
            format!("[image] {}", text.unwrap_or(defaults.placeholder)),
        ),
        ContentFormat::Rule => (None, String::new()),
        ContentFormat::Plain | ContentFormat::Button | ContentFormat::Placeholder => {
            (None, text.unwrap_or(defaults.placeholder).to_string())
        }
    }
}

fn resolve_style(
    element: &LayoutElement,
    defaults: &TypeStyle,
    convention: CoordinateConvention,
) -> ResolvedStyle {
    let overrides = &element.style;

    let default_font = match convention {
        CoordinateConvention::PixelY => defaults.font_size,
        CoordinateConvention::PercentGrid => (element.width / 3.0).clamp(GRID_MIN_FONT, GRID_MAX_FONT),
    };

    ResolvedStyle {
        fill: color_or(&overrides.background_color, &defaults.colors.fill, element),
        text_color: color_or(&overrides.color, &defaults.colors.text, element),
        border_color: color_or(&overrides.border_color, &defaults.colors.border, element),
        border_width: non_negative_or(overrides.border_width, defaults.border_width),
        border_style: overrides.border_style.unwrap_or(defaults.border_style),
        border_radius: non_negative_or(overrides.border_radius, defaults.border_radius),
        font_size: overrides
            .font_size
            .filter(|s| s.is_finite() && *s > 0.0)
            .unwrap_or(default_font),
        bold: defaults.bold,
    }
}

fn color_or(value: &Option<String>, default: &str, element: &LayoutElement) -> String {
    match value {
        Some(color) if is_valid_color(color) => color.trim().to_string(),
        Some(color) => {
            tracing::warn!(
                element = element.id.as_deref().unwrap_or("-"),
                kind = %element.kind,
                color = %color,
                "ignoring invalid color override"
            );
            default.to_string()
        }
        None => default.to_string(),
    }
}

fn non_negative_or(value: Option<f64>, default: f64) -> f64 {
    value.filter(|v| v.is_finite() && *v >= 0.0).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::StyleOverrides;

    fn element(kind: ElementKind) -> LayoutElement {
        LayoutElement::new(kind, 10.0, 20.0, 30.0, 40.0)
    }

    #[test]
    fn test_pixel_y_geometry() {
        let block = render(&element(ElementKind::Card), &TypeTable::builtin(), CoordinateConvention::PixelY);
        assert_eq!(block.geometry.left, Length::Percent(10.0));
        assert_eq!(block.geometry.top, Length::Px(20.0));
        assert_eq!(block.geometry.width, Length::Percent(30.0));
        assert_eq!(block.geometry.height, Length::Px(40.0));
        assert_eq!(block.geometry.top.to_string(), "20px");
    }

    #[test]
    fn test_percent_grid_geometry_and_font() {
        let block = render(
            &element(ElementKind::Card),
            &TypeTable::builtin(),
            CoordinateConvention::PercentGrid,
        );
        assert_eq!(block.geometry.top, Length::Percent(20.0));
        assert_eq!(block.geometry.height, Length::Percent(40.0));
        // 30 / 3 = 10, inside the 8..=12 band
        assert_eq!(block.style.font_size, 10.0);

        let wide = LayoutElement::new(ElementKind::Card, 0.0, 0.0, 90.0, 10.0);
        let block = render(&wide, &TypeTable::builtin(), CoordinateConvention::PercentGrid);
        assert_eq!(block.style.font_size, 12.0);
    }

    #[test]
    fn test_section_is_captioned_text_is_not() {
        let table = TypeTable::builtin();
        let section = render(
            &element(ElementKind::Section).with_content("Features"),
            &table,
            CoordinateConvention::PixelY,
        );
        assert_eq!(section.caption.as_deref(), Some("Section"));
        assert_eq!(section.content, "Features");

        let text = render(
            &element(ElementKind::Text).with_content("Features"),
            &table,
            CoordinateConvention::PixelY,
        );
        assert_eq!(text.caption, None);
        assert_eq!(text.content, "Features");
    }

    #[test]
    fn test_unknown_type_renders_as_section_with_own_label() {
        let table = TypeTable::builtin();
        let block = render(
            &element(ElementKind::Other("Carousel".to_string())).with_content("Slides"),
            &table,
            CoordinateConvention::PixelY,
        );
        let section = table.get(&ElementKind::Section);
        assert_eq!(block.label, "Carousel");
        assert_eq!(block.caption.as_deref(), Some("Carousel"));
        assert_eq!(block.style.fill, section.colors.fill);
        assert_eq!(block.tooltip, "Slides (Carousel)");
    }

    #[test]
    fn test_placeholders() {
        let table = TypeTable::builtin();
        let button = render(&element(ElementKind::Button), &table, CoordinateConvention::PixelY);
        assert_eq!(button.content, "Button");
        let image = render(&element(ElementKind::Image), &table, CoordinateConvention::PixelY);
        assert_eq!(image.content, "[image] Image");
        let divider = render(&element(ElementKind::Divider), &table, CoordinateConvention::PixelY);
        assert_eq!(divider.content, "");
    }

    #[test]
    fn test_overrides_win_and_invalid_ones_are_ignored() {
        let mut el = element(ElementKind::Button);
        el.style = StyleOverrides {
            color: Some("#000000".to_string()),
            background_color: Some("url(javascript:x)".to_string()),
            font_size: Some(22.0),
            border_width: Some(-3.0),
            ..StyleOverrides::default()
        };
        let table = TypeTable::builtin();
        let block = render(&el, &table, CoordinateConvention::PixelY);
        let defaults = table.get(&ElementKind::Button);
        assert_eq!(block.style.text_color, "#000000");
        assert_eq!(block.style.fill, defaults.colors.fill);
        assert_eq!(block.style.font_size, 22.0);
        assert_eq!(block.style.border_width, defaults.border_width);
    }

    #[test]
    fn test_negative_size_clamped() {
        let el = LayoutElement::new(ElementKind::Card, 0.0, 0.0, -5.0, -10.0);
        let block = render(&el, &TypeTable::builtin(), CoordinateConvention::PixelY);
        assert_eq!(block.geometry.width, Length::Percent(0.0));
        assert_eq!(block.height, 0.0);
    }
}
