use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::json;
use std::fs;
use std::path::PathBuf;
use wireframe_gen::export::to_json_pretty;
use wireframe_gen::{
    assemble, compose, parse_response, parse_website, render_html, ComposeOptions,
    CoordinateConvention, ElementGroup, ElementKind, LayoutElement, Page, ViewMode, Website,
    WireframeConfig, WireframeError,
};

fn get_fixture_path(filename: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("fixtures");
    path.push(filename);
    path
}

fn read_fixture(filename: &str) -> String {
    fs::read_to_string(get_fixture_path(filename)).unwrap()
}

fn block_ids(page: &wireframe_gen::ComposedPage) -> Vec<String> {
    page.blocks
        .iter()
        .map(|b| b.id.clone().unwrap_or_default())
        .collect()
}

// Parsing fixtures
#[test]
fn test_fenced_multipage_response() {
    let raw = read_fixture("fenced-multipage.txt");
    let parsed = parse_response(&raw, CoordinateConvention::PixelY).unwrap();

    assert!(parsed.outline.unwrap().starts_with("1. Login"));
    let website = parsed.website;
    assert_eq!(website.website_title, "Bean There Cafe");
    let ids: Vec<&str> = website.pages.iter().map(|p| p.page_id.as_str()).collect();
    assert_eq!(ids, vec!["login", "signup", "home"]);
    assert_eq!(website.header_elements().len(), 1);
    assert_eq!(
        website.footer_elements()[0].content.as_deref(),
        Some("© Bean There {2024}")
    );
    assert_eq!(website.pages[0].layout[0].style.font_size, Some(24.0));
}

#[test]
fn test_nested_braces_in_fenced_block() {
    let raw = read_fixture("nested-braces.txt");
    let website = parse_website(&raw).unwrap();
    assert_eq!(website.website_title, "Template {Shop}");
    let layout = &website.pages[0].layout;
    assert_eq!(layout.len(), 2);
    assert_eq!(
        layout[0].content.as_deref(),
        Some("Use {literal} braces and \"quotes\" freely }}")
    );
    assert_eq!(layout[1].content.as_deref(), Some("{\"nested\": {\"json\": true}}"));
}

#[test]
fn test_single_screen_response() {
    let raw = read_fixture("single-screen.txt");
    let parsed = parse_response(&raw, CoordinateConvention::PercentGrid).unwrap();
    let website = parsed.website;
    assert_eq!(website.pages.len(), 1);
    let layout = &website.pages[0].layout;
    assert_eq!(layout[1].height, 40.0);
    assert_eq!(layout[2].height, 40.0);
    assert_eq!(layout[2].label.as_deref(), Some("Calendar"));

    let config = WireframeConfig::with_convention(CoordinateConvention::PercentGrid);
    let document = assemble(&website, &config);
    assert_eq!(document.pages[0].extent, 100.0);
}

#[test]
fn test_invalid_json_location() {
    let raw = read_fixture("invalid-json.txt");
    match parse_response(&raw, CoordinateConvention::PixelY).unwrap_err() {
        WireframeError::InvalidJson {
            offset,
            line,
            raw: reported,
            ..
        } => {
            assert_eq!(reported, raw);
            assert_eq!(line, 7);
            assert_eq!(offset, raw.find("},,").unwrap() + 2);
        }
        other => panic!("expected InvalidJson, got {:?}", other),
    }
}

#[test]
fn test_missing_layout_is_schema_violation() {
    let raw = read_fixture("missing-layout.txt");
    match parse_website(&raw).unwrap_err() {
        WireframeError::SchemaViolation { path, .. } => assert_eq!(path, "pages[0].layout"),
        other => panic!("expected SchemaViolation, got {:?}", other),
    }
}

#[test]
fn test_prose_only_is_malformed() {
    let raw = read_fixture("prose-only.txt");
    let err = parse_response(&raw, CoordinateConvention::PixelY).unwrap_err();
    assert!(matches!(err, WireframeError::MalformedResponse { .. }));
    assert_eq!(err.raw_text(), Some(raw.as_str()));
}

// Composition
#[test]
fn test_home_page_scenario() {
    let page: Page = serde_json::from_value(json!({
        "pageId": "home",
        "pageTitle": "Home",
        "layout": [
            {"type": "text", "x": 5, "y": 0, "width": 90, "height": 40, "content": "Hi"},
            {"type": "button", "x": 5, "y": 200, "width": 30, "height": 40, "content": "Go"}
        ]
    }))
    .unwrap();

    let composed = compose(&page, &[], &[], &ComposeOptions::default());
    assert!(composed.extent >= 240.0);
    let kinds: Vec<&ElementKind> = composed.blocks.iter().map(|b| &b.kind).collect();
    assert_eq!(kinds, vec![&ElementKind::Text, &ElementKind::Button]);
}

#[test]
fn test_home_page_with_unusable_style_values() {
    let raw = r#"{"pages": [{"pageId": "home", "pageTitle": "Home", "layout": [
        {"type": "text", "x": 5, "y": 0, "width": 90, "height": 40, "content": "Hi"},
        {"type": "button", "x": 5, "y": 200, "width": 30, "height": 40, "content": "Go",
         "fontSize": "16px", "borderStyle": "double"}
    ]}]}"#;
    let website = parse_website(raw).unwrap();
    let document = assemble(&website, &WireframeConfig::default());
    let home = document.page("home").unwrap();
    assert_eq!(home.blocks.len(), 2);
    assert_eq!(home.blocks[1].style.font_size, 16.0);
    assert!(home.extent >= 240.0);
}

#[test]
fn test_empty_page_gets_floor_extent() {
    let page = Page {
        page_id: "empty".to_string(),
        page_title: "Empty".to_string(),
        background_color: None,
        layout: vec![],
    };
    let pixel = compose(&page, &[], &[], &ComposeOptions::default());
    assert_eq!(pixel.extent, 800.0);
    assert!(pixel.blocks.is_empty());

    let grid_options =
        ComposeOptions::from_config(&WireframeConfig::with_convention(CoordinateConvention::PercentGrid));
    assert_eq!(compose(&page, &[], &[], &grid_options).extent, 100.0);
}

#[test]
fn test_global_header_and_footer_on_every_page() {
    let raw = read_fixture("fenced-multipage.txt");
    let website = parse_response(&raw, CoordinateConvention::PixelY).unwrap().website;
    let document = assemble(&website, &WireframeConfig::default());

    for page in &document.pages {
        assert_eq!(page.blocks.first().unwrap().kind, ElementKind::Navbar);
        assert_eq!(page.blocks.last().unwrap().kind, ElementKind::Footer);
        assert_eq!(page.extent, 1080.0);
    }
    let home = document.page("home").unwrap();
    assert_eq!(home.blocks[3].kind, ElementKind::Other("carousel".to_string()));
}

// Document state
#[test]
fn test_page_switching() {
    let raw = read_fixture("fenced-multipage.txt");
    let website = parse_response(&raw, CoordinateConvention::PixelY).unwrap().website;
    let mut document = assemble(&website, &WireframeConfig::default());
    assert_eq!(document.active_page_id(), Some("login"));

    assert!(document.switch_to("home"));
    let once = document.state().clone();
    assert!(!document.switch_to("home"));
    assert_eq!(document.state(), &once);

    assert!(!document.switch_to("checkout"));
    assert_eq!(document.active_page_id(), Some("home"));
    assert!(document.is_visible("home"));
    assert!(!document.is_visible("login"));
}

#[test]
fn test_rendered_document() {
    let raw = read_fixture("fenced-multipage.txt");
    let html = render_html(&raw, &WireframeConfig::default()).unwrap();

    assert!(html.starts_with("<!DOCTYPE html>"));
    assert_eq!(html.matches("<section class=\"wf-page\"").count(), 3);
    assert_eq!(html.matches(" hidden>").count(), 2);
    assert!(html.contains("class=\"wf-tab active\" data-page=\"login\">Login</button>"));
    assert!(html.contains("class=\"wf-el wf-other\" data-type=\"carousel\""));
    assert!(html.contains("data-id=\"nav\""));
    assert!(!html.contains("http://") && !html.contains("https://"));
}

#[test]
fn test_mobile_view_from_config() {
    let raw = read_fixture("fenced-multipage.txt");
    let mut config = WireframeConfig::default();
    config.view_mode = ViewMode::Mobile;
    let html = render_html(&raw, &config).unwrap();
    assert!(html.contains("<body class=\"wf-mobile\">"));
    assert!(html.contains(">Desktop view</button>"));
}

// Round trip
#[test]
fn test_round_trip_through_export() {
    let raw = read_fixture("fenced-multipage.txt");
    let website = parse_website(&raw).unwrap();
    let exported = to_json_pretty(&website).unwrap();
    assert_eq!(parse_website(&exported).unwrap(), website);
}

#[test]
fn test_round_trip_with_header_and_overrides() {
    let mut button = LayoutElement::new(ElementKind::Button, 10.0, 50.0, 20.0, 40.0)
        .with_content("Go")
        .with_id("go");
    button.style.background_color = Some("#123456".to_string());
    button.style.border_radius = Some(12.0);

    let website = Website {
        website_title: "Round".to_string(),
        global_header: Some(ElementGroup {
            layout: vec![LayoutElement::new(ElementKind::Navbar, 0.0, 0.0, 100.0, 60.0)],
        }),
        global_footer: None,
        pages: vec![Page {
            page_id: "only".to_string(),
            page_title: "Only".to_string(),
            background_color: Some("#fafafa".to_string()),
            layout: vec![
                button,
                LayoutElement::new(ElementKind::Other("Map".to_string()), 0.0, 100.0, 50.0, 50.0),
            ],
        }],
    };

    let json = serde_json::to_string(&website).unwrap();
    assert_eq!(parse_website(&json).unwrap(), website);
}

proptest! {
    #[test]
    fn prop_pages_kept_in_order(count in 1usize..8) {
        let pages: Vec<_> = (0..count)
            .map(|i| json!({"pageId": format!("p{}", i), "layout": []}))
            .collect();
        let raw = json!({"pages": pages}).to_string();
        let website = parse_website(&raw).unwrap();
        let ids: Vec<String> = website.pages.iter().map(|p| p.page_id.clone()).collect();
        let expected: Vec<String> = (0..count).map(|i| format!("p{}", i)).collect();
        prop_assert_eq!(ids, expected);
    }

    #[test]
    fn prop_sort_is_stable(ys in proptest::collection::vec(0u8..4, 0..20)) {
        let layout: Vec<LayoutElement> = ys
            .iter()
            .enumerate()
            .map(|(i, y)| {
                LayoutElement::new(ElementKind::Section, 0.0, f64::from(*y) * 10.0, 10.0, 10.0)
                    .with_id(format!("e{:02}", i))
            })
            .collect();
        let page = Page {
            page_id: "p".to_string(),
            page_title: "P".to_string(),
            background_color: None,
            layout,
        };

        let composed = compose(&page, &[], &[], &ComposeOptions::default());
        let mut expected: Vec<(u8, String)> = ys
            .iter()
            .enumerate()
            .map(|(i, y)| (*y, format!("e{:02}", i)))
            .collect();
        expected.sort_by_key(|(y, _)| *y);
        let expected: Vec<String> = expected.into_iter().map(|(_, id)| id).collect();
        prop_assert_eq!(block_ids(&composed), expected);
        prop_assert!(composed.extent >= 800.0);
    }
}
