//! Request text sent to the text-generation model, and the matching response splitter.

use crate::config::CoordinateConvention;

pub const OUTLINE_MARKER: &str = "OUTLINE:";
pub const JSON_MARKER: &str = "WIREFRAME_JSON:";

const ELEMENT_TYPES: &str = "section|card|button|input|image|text|header|footer|divider|grid|navbar|label";

/// Prompt for a multi-page website with pixel `y`/`height` (the default convention).
const WEBSITE_PROMPT: &str = r##"You are a senior UX/UI designer. Design a complete multi-page website wireframe.

REQUIREMENTS:
1. Start with an OUTLINE describing the pages and their purpose.
2. Follow with WIREFRAME_JSON containing one valid JSON object.
3. The first pages should be authentication pages (login, sign up) when the site needs accounts.
4. Put navigation in "globalHeader" and shared links in "globalFooter"; they appear on every page.
5. "x" and "width" are percentages of the page width (0-100); "y" and "height" are pixels from
   the top of the page. Pages may be taller than one screen.
6. Every element needs "type", "x", "y", "width", "height" and "content".

JSON FORMAT:
{
  "websiteTitle": "string",
  "globalHeader": { "layout": [ELEMENT] },
  "globalFooter": { "layout": [ELEMENT] },
  "pages": [
    { "pageId": "string", "pageTitle": "string", "backgroundColor": "#rrggbb", "layout": [ELEMENT] }
  ]
}
ELEMENT = { "id": "optional", "type": "{types}", "x": 0-100, "y": pixels, "width": 0-100,
            "height": pixels, "content": "visible text", "color": "#rrggbb",
            "backgroundColor": "#rrggbb", "fontSize": number }

USER REQUEST:
"{description}"

OUTPUT FORMAT (exactly):
OUTLINE:
[outline]

WIREFRAME_JSON:
[JSON only]
"##;

/// Prompt for a single screen on a 100x100 grid.
const SCREEN_PROMPT: &str = r##"You are a senior UX/UI designer. Create a professional single-screen wireframe.

REQUIREMENTS:
1. Start with a hierarchical OUTLINE describing the interface structure.
2. Follow with WIREFRAME_JSON containing one valid JSON object.
3. Use realistic proportions and 5-10 unit margins between elements.
4. All elements must fit within a 100x100 grid; "x", "y", "width" and "height" are percentages.

JSON FORMAT:
{
  "elements": [
    { "type": "{types}", "label": "descriptive name", "x": 0-100, "y": 0-100,
      "width": 5-100, "height": 5-100 }
  ]
}

LAYOUT GUIDELINES:
- Navbar: top of the screen, full width (0, 0, 100, 8)
- Cards: organised in grid patterns
- Footer: bottom of the screen, full width

USER REQUEST:
"{description}"

OUTPUT FORMAT (exactly):
OUTLINE:
[outline]

WIREFRAME_JSON:
[JSON only]
"##;

/// Build the model request for `description`. The description is inserted unmodified.
pub fn build_prompt(description: &str, convention: CoordinateConvention) -> String {
    let template = match convention {
        CoordinateConvention::PixelY => WEBSITE_PROMPT,
        CoordinateConvention::PercentGrid => SCREEN_PROMPT,
    };
    // Types first so a description containing "{types}" is left alone.
    template
        .replace("{types}", ELEMENT_TYPES)
        .replace("{description}", description)
}

/// A model response split into its optional outline and the part holding the JSON
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseSections<'a> {
    pub outline: Option<String>,
    pub body: &'a str,
    /// Byte offset of `body` in the full response.
    pub body_offset: usize,
}

/// Split `OUTLINE: ... WIREFRAME_JSON: ...`. Responses without the JSON marker are returned
/// whole as the body.
pub fn split_outline(raw: &str) -> ResponseSections<'_> {
    let Some(json_at) = raw.find(JSON_MARKER) else {
        return ResponseSections {
            outline: None,
            body: raw,
            body_offset: 0,
        };
    };

    let outline = raw[..json_at].find(OUTLINE_MARKER).and_then(|start| {
        let text = raw[start + OUTLINE_MARKER.len()..json_at].trim();
        (!text.is_empty()).then(|| text.to_string())
    });

    let body_offset = json_at + JSON_MARKER.len();
    ResponseSections {
        outline,
        body: &raw[body_offset..],
        body_offset,
    }
}
