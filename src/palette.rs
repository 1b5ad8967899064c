use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::config::Theme;
use crate::model::ElementKind;
use crate::style::{is_valid_color, BorderStyle};

/// Fill, text and border colors for one element type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeColors {
    pub fill: String,
    pub text: String,
    pub border: String,
}

impl TypeColors {
    fn new(fill: &str, text: &str, border: &str) -> Self {
        Self {
            fill: fill.to_string(),
            text: text.to_string(),
            border: border.to_string(),
        }
    }

    pub(crate) fn validate(&self) -> Result<(), String> {
        for (name, value) in [("fill", &self.fill), ("text", &self.text), ("border", &self.border)] {
            if !is_valid_color(value) {
                return Err(format!("invalid {} color '{}'", name, value));
            }
        }
        Ok(())
    }
}

/// How an element's content string is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentFormat {
    /// Type name shown as a caption above the content.
    Captioned,
    /// Content shown as-is.
    Plain,
    /// Centred call to action.
    Button,
    /// Greyed placeholder text.
    Placeholder,
    /// `[image]` marker before the description.
    ImagePlaceholder,
    /// No text at all.
    Rule,
}

/// Default appearance of one element type
#[derive(Debug, Clone, PartialEq)]
pub struct TypeStyle {
    pub colors: TypeColors,
    pub font_size: f64,
    pub bold: bool,
    pub border_width: f64,
    pub border_style: BorderStyle,
    pub border_radius: f64,
    pub format: ContentFormat,
    /// Shown when the element has no content.
    pub placeholder: &'static str,
}

/// Per-type defaults. Lookups for unknown types fall back to `section`.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeTable {
    styles: HashMap<ElementKind, TypeStyle>,
    fallback: TypeStyle,
}

impl Default for TypeTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TypeTable {
    pub fn builtin() -> Self {
        let mut styles = HashMap::new();
        for kind in ElementKind::KNOWN {
            let style = builtin_style(&kind);
            styles.insert(kind, style);
        }
        Self {
            styles,
            fallback: builtin_style(&ElementKind::Section),
        }
    }

    /// Builtin table with colors replaced for the types named in `overrides`.
    /// Names that are not known types are ignored.
    pub fn with_color_overrides(overrides: &HashMap<String, TypeColors>) -> Self {
        let mut table = Self::builtin();
        for (name, colors) in overrides {
            let kind = ElementKind::from(name.clone());
            match table.styles.get_mut(&kind) {
                Some(style) => style.colors = colors.clone(),
                None => tracing::warn!(type_name = %name, "ignoring color override for unknown type"),
            }
        }
        if let Some(section) = table.styles.get(&ElementKind::Section) {
            table.fallback = section.clone();
        }
        table
    }

    pub fn get(&self, kind: &ElementKind) -> &TypeStyle {
        self.styles.get(kind).unwrap_or(&self.fallback)
    }
}

fn builtin_style(kind: &ElementKind) -> TypeStyle {
    let base = TypeStyle {
        colors: TypeColors::new("#F9FAFB", "#1F2937", "#E5E7EB"),
        font_size: 14.0,
        bold: false,
        border_width: 2.0,
        border_style: BorderStyle::Solid,
        border_radius: 4.0,
        format: ContentFormat::Captioned,
        placeholder: "Section",
    };

    match kind {
        ElementKind::Navbar => TypeStyle {
            colors: TypeColors::new("#3B82F6", "#FFFFFF", "#1E40AF"),
            bold: true,
            border_radius: 0.0,
            format: ContentFormat::Plain,
            placeholder: "Navigation",
            ..base
        },
        ElementKind::Header => TypeStyle {
            colors: TypeColors::new("#1E3A8A", "#FFFFFF", "#1E40AF"),
            font_size: 20.0,
            bold: true,
            border_radius: 0.0,
            format: ContentFormat::Plain,
            placeholder: "Header",
            ..base
        },
        ElementKind::Button => TypeStyle {
            colors: TypeColors::new("#10B981", "#FFFFFF", "#059669"),
            bold: true,
            border_radius: 6.0,
            format: ContentFormat::Button,
            placeholder: "Button",
            ..base
        },
        ElementKind::Input => TypeStyle {
            colors: TypeColors::new("#FFFFFF", "#6B7280", "#D1D5DB"),
            border_width: 1.0,
            format: ContentFormat::Placeholder,
            placeholder: "Enter text...",
            ..base
        },
        ElementKind::Card => TypeStyle {
            colors: TypeColors::new("#F3F4F6", "#1F2937", "#E5E7EB"),
            border_radius: 8.0,
            placeholder: "Card",
            ..base
        },
        ElementKind::Label => TypeStyle {
            colors: TypeColors::new("#FFFFFF", "#374151", "#E5E7EB"),
            font_size: 13.0,
            border_width: 0.0,
            border_style: BorderStyle::None,
            format: ContentFormat::Plain,
            placeholder: "Label",
            ..base
        },
        ElementKind::Text => TypeStyle {
            colors: TypeColors::new("transparent", "#1F2937", "#E5E7EB"),
            border_width: 0.0,
            border_style: BorderStyle::None,
            border_radius: 0.0,
            format: ContentFormat::Plain,
            placeholder: "Lorem ipsum dolor sit amet",
            ..base
        },
        ElementKind::Image => TypeStyle {
            colors: TypeColors::new("#E5E7EB", "#6B7280", "#D1D5DB"),
            border_style: BorderStyle::Dashed,
            format: ContentFormat::ImagePlaceholder,
            placeholder: "Image",
            ..base
        },
        ElementKind::Footer => TypeStyle {
            colors: TypeColors::new("#1F2937", "#FFFFFF", "#111827"),
            font_size: 13.0,
            border_radius: 0.0,
            format: ContentFormat::Plain,
            placeholder: "Footer",
            ..base
        },
        ElementKind::Grid => TypeStyle {
            colors: TypeColors::new("#FFFFFF", "#1F2937", "#D1D5DB"),
            border_style: BorderStyle::Dashed,
            placeholder: "Grid",
            ..base
        },
        ElementKind::Divider => TypeStyle {
            colors: TypeColors::new("#D1D5DB", "#6B7280", "#9CA3AF"),
            border_width: 0.0,
            border_style: BorderStyle::None,
            border_radius: 0.0,
            format: ContentFormat::Rule,
            placeholder: "",
            ..base
        },
        ElementKind::Section | ElementKind::Other(_) => base,
    }
}

/// Colors of the document around the wireframe canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChromeColors {
    pub page: &'static str,
    pub canvas: &'static str,
    pub text: &'static str,
    pub muted: &'static str,
    pub accent: &'static str,
}

impl ChromeColors {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => ChromeColors {
                page: "#F9FAFB",
                canvas: "#FFFFFF",
                text: "#1F2937",
                muted: "#6B7280",
                accent: "#3B82F6",
            },
            Theme::Dark => ChromeColors {
                page: "#111827",
                canvas: "#1F2937",
                text: "#F9FAFB",
                muted: "#9CA3AF",
                accent: "#60A5FA",
            },
        }
    }
}
