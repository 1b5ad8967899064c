//! Serialises a [`Document`] into one self-contained HTML page.
//! Styles and the tab/view-mode script are inlined; no external resources are referenced.

use std::fmt::{self, Write};

use crate::compose::{ComposeOptions, ComposedPage};
use crate::config::{CoordinateConvention, ViewMode};
use crate::document::Document;
use crate::palette::{ChromeColors, ContentFormat};
use crate::render::{Length, RenderedBlock};

const BASE_STYLES: &str = "*{margin:0;padding:0;box-sizing:border-box;}\
body{font-family:-apple-system,BlinkMacSystemFont,'Segoe UI',Roboto,sans-serif;background:var(--wf-page);color:var(--wf-text);padding:20px;}\
.wf-topbar{max-width:1200px;margin:0 auto 16px;display:flex;flex-wrap:wrap;align-items:center;gap:12px;}\
.wf-topbar h1{font-size:1.5rem;margin-right:auto;}\
.wf-nav{display:flex;flex-wrap:wrap;gap:6px;}\
.wf-tab,.wf-mode{border:1px solid var(--wf-muted);background:transparent;color:var(--wf-text);padding:6px 14px;border-radius:6px;cursor:pointer;font-size:0.9rem;}\
.wf-tab.active{background:var(--wf-accent);border-color:var(--wf-accent);color:#fff;}\
.wf-mode{margin-left:12px;}\
.wf-page{position:relative;max-width:1200px;margin:0 auto;border:2px solid #E5E7EB;border-radius:8px;overflow:hidden;height:var(--dh);}\
.wf-page[hidden]{display:none;}\
.wf-grid{width:var(--cw);max-width:none;box-sizing:content-box;}\
.wf-el{position:absolute;left:var(--dl);top:var(--dt);width:var(--dw);height:var(--dh);border-style:solid;display:flex;flex-direction:column;align-items:center;justify-content:center;text-align:center;overflow:hidden;padding:4px;}\
.wf-el:hover{box-shadow:0 4px 12px rgba(0,0,0,0.1);z-index:10;}\
.wf-caption{font-size:0.7em;text-transform:uppercase;letter-spacing:0.05em;opacity:0.7;}\
.wf-placeholder{font-style:italic;opacity:0.8;align-self:flex-start;}\
.wf-rule{padding:0;}\
.wf-mobile .wf-page{width:auto;max-width:420px;height:var(--mh);}\
.wf-mobile .wf-el{left:var(--ml);top:var(--mt);width:var(--mw);height:var(--mh);}";

const SWITCH_SCRIPT: &str = "(function(){\
var tabs=document.querySelectorAll('.wf-tab');\
function show(id){var target=document.querySelector('.wf-page[data-page=\"'+CSS.escape(id)+'\"]');if(!target||!target.hidden){return;}\
document.querySelectorAll('.wf-page').forEach(function(p){p.hidden=p!==target;});\
tabs.forEach(function(t){t.classList.toggle('active',t.dataset.page===id);});}\
tabs.forEach(function(t){t.addEventListener('click',function(){show(t.dataset.page);});});\
var mode=document.querySelector('.wf-mode');\
if(mode){mode.addEventListener('click',function(){var b=document.body;var m=b.classList.contains('wf-mobile');\
b.classList.toggle('wf-mobile',!m);b.classList.toggle('wf-desktop',m);mode.textContent=m?'Mobile view':'Desktop view';});}\
})();";

impl Document {
    /// Render the whole document with the current view state applied.
    pub fn to_html(&self) -> String {
        let mut html = String::new();
        // Writing into a String cannot fail.
        self.write_html(&mut html).ok();
        html
    }

    pub fn write_html<W: Write>(&self, out: &mut W) -> fmt::Result {
        let chrome = ChromeColors::for_theme(self.theme);
        let mode = self.view_mode();

        write!(
            out,
            r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<style>:root{{--wf-page:{page};--wf-canvas:{canvas};--wf-text:{text};--wf-muted:{muted};--wf-accent:{accent};}}{base}</style>
</head>
<body class="wf-{mode}">
"#,
            title = escape_html(&self.title),
            page = chrome.page,
            canvas = chrome.canvas,
            text = chrome.text,
            muted = chrome.muted,
            accent = chrome.accent,
            base = BASE_STYLES,
            mode = mode.as_str(),
        )?;

        self.write_nav(out, mode)?;

        out.write_str("<main>\n")?;
        for page in &self.pages {
            write_page(out, page, self.is_visible(&page.page_id), &self.options)?;
        }
        out.write_str("</main>\n")?;

        write!(out, "<script>{}</script>\n</body>\n</html>\n", SWITCH_SCRIPT)
    }

    fn write_nav<W: Write>(&self, out: &mut W, mode: ViewMode) -> fmt::Result {
        write!(
            out,
            "<header class=\"wf-topbar\"><h1>{}</h1><nav class=\"wf-nav\">",
            escape_html(&self.title)
        )?;
        for item in &self.nav {
            let active = if self.is_visible(&item.page_id) {
                " active"
            } else {
                ""
            };
            write!(
                out,
                "<button type=\"button\" class=\"wf-tab{}\" data-page=\"{}\">{}</button>",
                active,
                escape_html(&item.page_id),
                escape_html(&item.label)
            )?;
        }
        let toggle_label = match mode {
            ViewMode::Desktop => "Mobile view",
            ViewMode::Mobile => "Desktop view",
        };
        write!(
            out,
            "</nav><button type=\"button\" class=\"wf-mode\">{}</button></header>\n",
            toggle_label
        )
    }
}

fn write_page<W: Write>(
    out: &mut W,
    page: &ComposedPage,
    visible: bool,
    options: &ComposeOptions,
) -> fmt::Result {
    let (stacked, stacked_height) = page.stacked_blocks(options);
    // The grid canvas has a fixed width so x/width and y/height share one base.
    let (class, canvas_width) = match options.convention {
        CoordinateConvention::PixelY => ("wf-page", String::new()),
        CoordinateConvention::PercentGrid => (
            "wf-page wf-grid",
            format!("--cw:{}px;", options.grid_canvas_px),
        ),
    };
    write!(
        out,
        "<section class=\"{}\" data-page=\"{}\" style=\"background:{};{}--dh:{}px;--mh:{}px;\"{}>\n",
        class,
        escape_html(&page.page_id),
        escape_html(&page.background),
        canvas_width,
        page.canvas_height_px(options),
        stacked_height,
        if visible { "" } else { " hidden" }
    )?;
    for (block, mobile) in page.blocks.iter().zip(stacked.iter()) {
        write_block(out, block, mobile, options)?;
    }
    out.write_str("</section>\n")
}

fn write_block<W: Write>(
    out: &mut W,
    block: &RenderedBlock,
    mobile: &RenderedBlock,
    options: &ComposeOptions,
) -> fmt::Result {
    let desktop = &block.geometry;
    let stacked = &mobile.geometry;
    let style = &block.style;

    let mut css = String::new();
    write!(
        css,
        "--dl:{};--dt:{}px;--dw:{};--dh:{}px;--ml:{};--mt:{}px;--mw:{};--mh:{}px;",
        desktop.left,
        vertical_px(desktop.top, options),
        desktop.width,
        vertical_px(desktop.height, options),
        stacked.left,
        vertical_px(stacked.top, options),
        stacked.width,
        vertical_px(stacked.height, options),
    )?;
    write!(
        css,
        "background:{};color:{};border-color:{};border-width:{}px;border-style:{};border-radius:{}px;font-size:{}px;",
        style.fill,
        style.text_color,
        style.border_color,
        style.border_width,
        style.border_style.as_css(),
        style.border_radius,
        style.font_size,
    )?;
    if style.bold {
        css.push_str("font-weight:600;");
    }

    let mut attrs = format!(
        "class=\"wf-el wf-{}\" data-type=\"{}\"",
        css_class_for(block),
        escape_html(block.kind.as_str())
    );
    if let Some(id) = &block.id {
        write!(attrs, " data-id=\"{}\"", escape_html(id))?;
    }

    write!(
        out,
        "<div {} style=\"{}\" title=\"{}\">",
        attrs,
        escape_html(&css),
        escape_html(&block.tooltip)
    )?;

    match block.format {
        ContentFormat::Captioned => {
            if let Some(caption) = &block.caption {
                write!(out, "<span class=\"wf-caption\">{}</span>", escape_html(caption))?;
            }
            if !block.content.is_empty() {
                write!(out, "<span class=\"wf-content\">{}</span>", escape_html(&block.content))?;
            }
        }
        ContentFormat::Placeholder => {
            write!(out, "<span class=\"wf-placeholder\">{}</span>", escape_html(&block.content))?;
        }
        ContentFormat::Rule => {}
        ContentFormat::Plain | ContentFormat::Button | ContentFormat::ImagePlaceholder => {
            write!(out, "<span class=\"wf-content\">{}</span>", escape_html(&block.content))?;
        }
    }
    out.write_str("</div>\n")
}

/// Vertical lengths are emitted in pixels so percentages stay relative to the square grid
/// canvas even when the page grows past it.
fn vertical_px(length: Length, options: &ComposeOptions) -> f64 {
    match length {
        Length::Px(v) => v,
        Length::Percent(p) => options.grid_canvas_px * p / 100.0,
    }
}

fn css_class_for(block: &RenderedBlock) -> &str {
    if block.kind.is_known() {
        block.kind.as_str()
    } else {
        "other"
    }
}

pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
