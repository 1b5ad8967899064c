use crate::config::{CoordinateConvention, WireframeConfig};
use crate::model::{LayoutElement, Page};
use crate::palette::TypeTable;
use crate::render::{render, Geometry, Length, RenderedBlock};

pub const DEFAULT_BACKGROUND: &str = "#ffffff";

/// Horizontal inset and vertical gap used when stacking blocks for the mobile view.
const STACK_INSET_PERCENT: f64 = 2.0;
const STACK_GAP_PX: f64 = 12.0;
const STACK_MIN_HEIGHT_PX: f64 = 24.0;

/// Settings the composer needs, derived from [`WireframeConfig`]
#[derive(Debug, Clone, PartialEq)]
pub struct ComposeOptions {
    pub convention: CoordinateConvention,
    pub min_extent: f64,
    pub extent_padding: f64,
    pub grid_canvas_px: f64,
    pub table: TypeTable,
}

impl ComposeOptions {
    pub fn from_config(config: &WireframeConfig) -> Self {
        Self {
            convention: config.convention,
            min_extent: config.min_extent(),
            extent_padding: config.extent_padding(),
            grid_canvas_px: config.grid_canvas_px,
            table: TypeTable::with_color_overrides(&config.type_colors),
        }
    }
}

impl Default for ComposeOptions {
    fn default() -> Self {
        Self::from_config(&WireframeConfig::default())
    }
}

/// A page merged with the global header/footer, rendered in paint order
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedPage {
    pub page_id: String,
    pub title: String,
    pub background: String,
    pub blocks: Vec<RenderedBlock>,
    /// Vertical extent in the convention's units (pixels, or percent of the canvas).
    pub extent: f64,
}

/// Merge `header + page.layout + footer`, stable-sort by `y`, render and measure.
pub fn compose(
    page: &Page,
    header: &[LayoutElement],
    footer: &[LayoutElement],
    options: &ComposeOptions,
) -> ComposedPage {
    let mut elements: Vec<&LayoutElement> = header
        .iter()
        .chain(page.layout.iter())
        .chain(footer.iter())
        .collect();
    // sort_by is stable: equal `y` keeps source order.
    elements.sort_by(|a, b| a.y.total_cmp(&b.y));

    let blocks: Vec<RenderedBlock> = elements
        .iter()
        .map(|el| render(el, &options.table, options.convention))
        .collect();

    let lowest = elements
        .iter()
        .map(|el| el.y + el.height.max(0.0))
        .fold(f64::NEG_INFINITY, f64::max);
    let extent = if lowest.is_finite() {
        (lowest + options.extent_padding).max(options.min_extent)
    } else {
        options.min_extent
    };

    tracing::debug!(
        page = %page.page_id,
        blocks = blocks.len(),
        extent,
        "composed page"
    );

    ComposedPage {
        page_id: page.page_id.clone(),
        title: page.page_title.clone(),
        background: page
            .background_color
            .clone()
            .filter(|c| crate::style::is_valid_color(c))
            .unwrap_or_else(|| DEFAULT_BACKGROUND.to_string()),
        blocks,
        extent,
    }
}

impl ComposedPage {
    /// Canvas height in pixels for the given convention.
    pub fn canvas_height_px(&self, options: &ComposeOptions) -> f64 {
        match options.convention {
            CoordinateConvention::PixelY => self.extent,
            CoordinateConvention::PercentGrid => options.grid_canvas_px * self.extent / 100.0,
        }
    }

    /// Blocks laid out for a narrow screen: full width, one under another in paint order.
    /// Heights are converted to pixels; the composed blocks are left untouched.
    pub fn stacked_blocks(&self, options: &ComposeOptions) -> (Vec<RenderedBlock>, f64) {
        let mut cursor = STACK_GAP_PX;
        let stacked = self
            .blocks
            .iter()
            .map(|block| {
                let height_px = match block.geometry.height {
                    Length::Px(h) => h,
                    Length::Percent(p) => options.grid_canvas_px * p / 100.0,
                }
                .max(STACK_MIN_HEIGHT_PX);

                let mut moved = block.clone();
                moved.geometry = Geometry {
                    left: Length::Percent(STACK_INSET_PERCENT),
                    top: Length::Px(cursor),
                    width: Length::Percent(100.0 - 2.0 * STACK_INSET_PERCENT),
                    height: Length::Px(height_px),
                };
                cursor += height_px + STACK_GAP_PX;
                moved
            })
            .collect();
        (stacked, cursor)
    }
}
