//! # Wireframe Generator
//!
//! Turns a free-form text-generation response into a validated website layout model and a
//! self-contained HTML wireframe document.
//!
//! ## Features
//! - Tolerant extraction of the JSON object embedded in prose or markdown fences
//! - Structural validation with precise error locations
//! - Per-type element styling with style overrides and configurable colours
//! - Multi-page documents with tab navigation and a stacked mobile view
//! - Pixel or percentage-grid coordinates
//!
//! ## Example
//! ```ignore
//! use wireframe_gen::{render_html, WireframeConfig};
//!
//! let raw = r#"Here you go: {"websiteTitle": "Cafe", "pages": [{"pageId": "home", "layout": [
//!   {"type": "text", "x": 10, "y": 0, "width": 80, "height": 60, "content": "Welcome"}
//! ]}]}"#;
//!
//! let html = render_html(raw, &WireframeConfig::default()).expect("Failed to render");
//! ```

pub mod compose;
pub mod config;
pub mod document;
pub mod error;
pub mod export;
pub mod extract;
pub mod html;
pub mod model;
pub mod palette;
pub mod prompt;
pub mod render;
pub mod session;
pub mod style;
pub mod validator;

// --- Core types ---
pub use config::{CoordinateConvention, Theme, ViewMode, WireframeConfig};
pub use document::{assemble, Document, NavItem, ViewState};
pub use error::{WireframeError, WireframeResult};
pub use model::{ElementGroup, ElementKind, LayoutElement, Page, Website};
pub use style::{BorderStyle, StyleOverrides};

// --- Rendering ---
pub use compose::{compose, ComposeOptions, ComposedPage};
pub use palette::{TypeColors, TypeTable};
pub use render::{render, RenderedBlock};

// --- Generation ---
pub use prompt::build_prompt;
pub use session::{Generation, GeneratorError, Session, SessionStore, TextGenerator};
pub use validator::{parse_response, parse_screen, parse_website, ParsedResponse};

/// Parse a model response with the configured convention and render every page into one
/// document, with the first page active.
pub fn render_html(raw: &str, config: &WireframeConfig) -> WireframeResult<String> {
    let parsed = parse_response(raw, config.convention)?;
    Ok(assemble(&parsed.website, config).to_html())
}
