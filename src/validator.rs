use serde_json::{Map, Value};
use std::collections::HashSet;

use crate::config::CoordinateConvention;
use crate::error::{WireframeError, WireframeResult};
use crate::extract::{extract_object, line_column};
use crate::model::{
    ElementGroup, ElementKind, LayoutElement, Page, Website, DEFAULT_WEBSITE_TITLE,
};
use crate::prompt::split_outline;

/// Page id given to the single page built from a `{"elements": [...]}` response.
pub const SCREEN_PAGE_ID: &str = "screen";

/// Extract, parse and validate a multi-page website from raw model output.
pub fn parse_website(raw: &str) -> WireframeResult<Website> {
    let value = extract_object(raw)?;
    validate_website(&value, raw)
}

/// Like [`parse_website`], but also accepts the single-screen `{"elements": [...]}` shape,
/// which becomes a one-page website.
pub fn parse_screen(raw: &str) -> WireframeResult<Website> {
    let value = extract_object(raw)?;
    let object = as_object(&value, "$", raw)?;
    if object.contains_key("pages") || !object.contains_key("elements") {
        return validate_website(&value, raw);
    }

    let elements = parse_elements(object.get("elements"), "elements", raw)?;
    let title = object
        .get("title")
        .or_else(|| object.get("websiteTitle"))
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_WEBSITE_TITLE)
        .to_string();

    Ok(Website {
        website_title: title.clone(),
        global_header: None,
        global_footer: None,
        pages: vec![Page {
            page_id: SCREEN_PAGE_ID.to_string(),
            page_title: title,
            background_color: None,
            layout: elements,
        }],
    })
}

/// A full model response: the optional outline section and the validated website
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedResponse {
    pub outline: Option<String>,
    pub website: Website,
}

/// Parse a complete model response in the shape requested by [`build_prompt`]
/// (`OUTLINE:` then `WIREFRAME_JSON:`), using the parser that matches `convention`.
/// Errors refer to positions in the whole response.
///
/// [`build_prompt`]: crate::prompt::build_prompt
pub fn parse_response(raw: &str, convention: CoordinateConvention) -> WireframeResult<ParsedResponse> {
    let sections = split_outline(raw);
    let parsed = match convention {
        CoordinateConvention::PixelY => parse_website(sections.body),
        CoordinateConvention::PercentGrid => parse_screen(sections.body),
    };

    match parsed {
        Ok(website) => Ok(ParsedResponse {
            outline: sections.outline,
            website,
        }),
        Err(err) => Err(rebase_error(err, raw, sections.body_offset)),
    }
}

/// Point an error produced on a slice of `raw` back at the full text.
fn rebase_error(err: WireframeError, raw: &str, body_offset: usize) -> WireframeError {
    match err {
        WireframeError::MalformedResponse { .. } => WireframeError::MalformedResponse {
            raw: raw.to_string(),
        },
        WireframeError::InvalidJson { offset, message, .. } => {
            let offset = offset + body_offset;
            let (line, column) = line_column(raw, offset);
            WireframeError::InvalidJson {
                offset,
                line,
                column,
                message,
                raw: raw.to_string(),
            }
        }
        WireframeError::SchemaViolation { path, reason, .. } => WireframeError::SchemaViolation {
            path,
            reason,
            raw: raw.to_string(),
        },
        other => other,
    }
}

/// Validate an already parsed JSON value and normalise it into a [`Website`].
pub fn validate_website(value: &Value, raw: &str) -> WireframeResult<Website> {
    let object = as_object(value, "$", raw)?;

    let pages = match object.get("pages") {
        Some(Value::Array(pages)) => pages,
        Some(_) => return Err(WireframeError::schema("pages", "must be a list", raw)),
        None => return Err(WireframeError::schema("pages", "missing required key", raw)),
    };
    if pages.is_empty() {
        return Err(WireframeError::schema(
            "pages",
            "must contain at least one page",
            raw,
        ));
    }

    let website_title = match object.get("websiteTitle") {
        Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
        Some(Value::String(_)) | Some(Value::Null) | None => DEFAULT_WEBSITE_TITLE.to_string(),
        Some(_) => {
            return Err(WireframeError::schema(
                "websiteTitle",
                "must be a string",
                raw,
            ))
        }
    };

    let global_header = parse_group(object.get("globalHeader"), "globalHeader", raw)?;
    let global_footer = parse_group(object.get("globalFooter"), "globalFooter", raw)?;

    let mut seen_ids = HashSet::new();
    let mut parsed_pages = Vec::with_capacity(pages.len());
    for (index, page) in pages.iter().enumerate() {
        let page = parse_page(page, index, raw)?;
        if !seen_ids.insert(page.page_id.clone()) {
            return Err(WireframeError::schema(
                format!("pages[{}].pageId", index),
                format!("duplicate page id '{}'", page.page_id),
                raw,
            ));
        }
        parsed_pages.push(page);
    }

    tracing::debug!(
        pages = parsed_pages.len(),
        header = global_header.is_some(),
        footer = global_footer.is_some(),
        "validated website"
    );

    Ok(Website {
        website_title,
        global_header,
        global_footer,
        pages: parsed_pages,
    })
}

fn as_object<'a>(value: &'a Value, path: &str, raw: &str) -> WireframeResult<&'a Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| WireframeError::schema(path, "must be an object", raw))
}

fn parse_page(value: &Value, index: usize, raw: &str) -> WireframeResult<Page> {
    let path = format!("pages[{}]", index);
    let object = as_object(value, &path, raw)?;

    let layout = match object.get("layout") {
        Some(layout) => parse_elements(Some(layout), &format!("{}.layout", path), raw)?,
        None => {
            return Err(WireframeError::schema(
                format!("{}.layout", path),
                "missing required key",
                raw,
            ))
        }
    };

    let page_id = optional_string(object, "pageId", &path, raw)?
        .unwrap_or_else(|| format!("page-{}", index + 1));
    let page_title = optional_string(object, "pageTitle", &path, raw)?
        .unwrap_or_else(|| page_id.clone());
    let background_color = optional_string(object, "backgroundColor", &path, raw)?;

    Ok(Page {
        page_id,
        page_title,
        background_color,
        layout,
    })
}

/// A string field that may be absent, null or blank (all treated as absent).
fn optional_string(
    object: &Map<String, Value>,
    key: &str,
    path: &str,
    raw: &str,
) -> WireframeResult<Option<String>> {
    match object.get(key) {
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(Some(s.trim().to_string())),
        Some(Value::String(_)) | Some(Value::Null) | None => Ok(None),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(_) => Err(WireframeError::schema(
            format!("{}.{}", path, key),
            "must be a string",
            raw,
        )),
    }
}

fn parse_group(value: Option<&Value>, path: &str, raw: &str) -> WireframeResult<Option<ElementGroup>> {
    let value = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(value) => value,
    };
    let object = as_object(value, path, raw)?;
    match object.get("layout") {
        Some(layout) => Ok(Some(ElementGroup {
            layout: parse_elements(Some(layout), &format!("{}.layout", path), raw)?,
        })),
        None => Err(WireframeError::schema(
            format!("{}.layout", path),
            "missing required key",
            raw,
        )),
    }
}

fn parse_elements(
    value: Option<&Value>,
    path: &str,
    raw: &str,
) -> WireframeResult<Vec<LayoutElement>> {
    let items = match value {
        Some(Value::Array(items)) => items,
        Some(_) => return Err(WireframeError::schema(path, "must be a list", raw)),
        None => return Err(WireframeError::schema(path, "missing required key", raw)),
    };

    let mut elements = Vec::with_capacity(items.len());
    let mut seen_ids = HashSet::new();
    for (index, item) in items.iter().enumerate() {
        let element_path = format!("{}[{}]", path, index);
        let element = parse_element(as_object(item, &element_path, raw)?, &element_path);

        if let Some(id) = &element.id {
            if !seen_ids.insert(id.clone()) {
                return Err(WireframeError::schema(
                    format!("{}.id", element_path),
                    format!("duplicate element id '{}'", id),
                    raw,
                ));
            }
        }
        elements.push(element);
    }
    Ok(elements)
}

/// Read one element object. Unusable fields fall back to their defaults, so this never
/// rejects an object.
fn parse_element(object: &Map<String, Value>, path: &str) -> LayoutElement {
    let mut object = object.clone();
    // `color` and its alias would otherwise collide.
    if object.contains_key("color") {
        object.remove("textColor");
    }
    serde_json::from_value(Value::Object(object)).unwrap_or_else(|err| {
        tracing::warn!(path, error = %err, "unreadable element, using section defaults");
        LayoutElement::new(ElementKind::Section, 0.0, 0.0, 100.0, 40.0)
    })
}
