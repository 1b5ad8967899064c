use crate::compose::{compose, ComposeOptions, ComposedPage};
use crate::config::{Theme, ViewMode, WireframeConfig};
use crate::model::Website;

/// One tab in the navigation bar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    pub page_id: String,
    pub label: String,
}

/// What is currently on screen. Owned by the [`Document`], never global.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    /// `None` only for a website with no pages.
    pub active_page: Option<String>,
    pub mode: ViewMode,
}

/// All pages of a website composed and ready to be shown, plus navigation and view state
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub title: String,
    pub nav: Vec<NavItem>,
    pub pages: Vec<ComposedPage>,
    pub theme: Theme,
    pub(crate) options: ComposeOptions,
    state: ViewState,
}

/// Compose every page of `website` and build the navigation. The first page starts active.
pub fn assemble(website: &Website, config: &WireframeConfig) -> Document {
    let options = ComposeOptions::from_config(config);
    let header = website.header_elements();
    let footer = website.footer_elements();

    let pages: Vec<ComposedPage> = website
        .pages
        .iter()
        .map(|page| compose(page, header, footer, &options))
        .collect();

    let nav = pages
        .iter()
        .map(|p| NavItem {
            page_id: p.page_id.clone(),
            label: p.title.clone(),
        })
        .collect();

    let state = ViewState {
        active_page: pages.first().map(|p| p.page_id.clone()),
        mode: config.view_mode,
    };

    tracing::debug!(title = %website.website_title, pages = pages.len(), "assembled document");

    Document {
        title: website.website_title.clone(),
        nav,
        pages,
        theme: config.theme,
        options,
        state,
    }
}

impl Document {
    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn active_page_id(&self) -> Option<&str> {
        self.state.active_page.as_deref()
    }

    pub fn active_page(&self) -> Option<&ComposedPage> {
        let id = self.active_page_id()?;
        self.page(id)
    }

    pub fn page(&self, page_id: &str) -> Option<&ComposedPage> {
        self.pages.iter().find(|p| p.page_id == page_id)
    }

    pub fn is_visible(&self, page_id: &str) -> bool {
        self.active_page_id() == Some(page_id)
    }

    /// Show `page_id` and hide the previous page.
    ///
    /// Returns `true` when the visible page changed. Switching to the active page, or to an
    /// id that does not exist, leaves the state as it was.
    pub fn switch_to(&mut self, page_id: &str) -> bool {
        if self.is_visible(page_id) {
            return false;
        }
        if self.page(page_id).is_none() {
            tracing::warn!(page = %page_id, "ignoring switch to unknown page");
            return false;
        }
        self.state.active_page = Some(page_id.to_string());
        true
    }

    pub fn view_mode(&self) -> ViewMode {
        self.state.mode
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.state.mode = mode;
    }

    pub fn toggle_view_mode(&mut self) -> ViewMode {
        self.state.mode = self.state.mode.toggled();
        self.state.mode
    }

    pub fn options(&self) -> &ComposeOptions {
        &self.options
    }
}
