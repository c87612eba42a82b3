//! Askama templates for the web frontend.

use askama::Template;

use crate::domain::{CONNECTOR_TYPES, Station, StationFields, StationStatus};
use crate::filter::{ALL, StationFilter};
use crate::form::{DraftOrigin, StationForm};
use crate::notify::Notice;
use crate::shell::{Shell, View};

// ============================================================================
// Page Templates (extend base.html)
// ============================================================================

/// Station list with filters.
#[derive(Template)]
#[template(path = "stations.html")]
pub struct StationsTemplate {
    pub nav: NavView,
    pub notices: Vec<NoticeView>,
    pub load_failed: bool,
    pub stations: Vec<StationView>,
    pub search: String,
    pub status_options: Vec<OptionView>,
    pub connector_options: Vec<OptionView>,
}

/// Placeholder map with a details panel.
#[derive(Template)]
#[template(path = "map.html")]
pub struct MapTemplate {
    pub nav: NavView,
    pub notices: Vec<NoticeView>,
    pub load_failed: bool,
    pub stations: Vec<StationView>,
    pub selected: Option<StationView>,
}

/// Create or edit form.
#[derive(Template)]
#[template(path = "form.html")]
pub struct FormTemplate {
    pub nav: NavView,
    pub notices: Vec<NoticeView>,
    pub heading: &'static str,
    pub description: &'static str,
    pub submit_label: &'static str,
    pub action: String,
    pub draft: StationFields,
    pub status_options: Vec<OptionView>,
    pub connector_options: Vec<OptionView>,
}

/// Error page.
#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub nav: NavView,
    pub notices: Vec<NoticeView>,
    pub title: String,
    pub message: String,
    pub details: Option<String>,
}

// ============================================================================
// View Models (for templates)
// ============================================================================

/// Sidebar highlight state.
#[derive(Debug, Clone, Copy, Default)]
pub struct NavView {
    pub list_active: bool,
    pub map_active: bool,
    pub form_active: bool,
}

impl NavView {
    pub fn from_shell(shell: &Shell) -> Self {
        let active = shell.active();
        Self {
            list_active: active == View::List,
            map_active: active == View::Map,
            form_active: active == View::Form,
        }
    }
}

/// Flash message.
#[derive(Debug, Clone)]
pub struct NoticeView {
    pub title: &'static str,
    pub description: &'static str,
    pub destructive: bool,
}

impl NoticeView {
    pub fn from_notices(notices: Vec<Notice>) -> Vec<Self> {
        notices
            .into_iter()
            .map(|n| Self {
                title: n.title,
                description: n.description,
                destructive: n.is_destructive(),
            })
            .collect()
    }
}

/// One `<option>` of a select.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionView {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

impl OptionView {
    fn new(value: impl Into<String>, label: impl Into<String>, current: &str) -> Self {
        let value = value.into();
        Self {
            selected: value == current,
            label: label.into(),
            value,
        }
    }
}

/// Status filter options, with "All Status" first.
pub fn status_filter_options(filter: &StationFilter) -> Vec<OptionView> {
    let current = filter.status.to_string();
    std::iter::once(OptionView::new(ALL, "All Status", &current))
        .chain(
            StationStatus::ALL
                .iter()
                .map(|s| OptionView::new(s.as_str(), s.as_str(), &current)),
        )
        .collect()
}

/// Connector filter options, with "All Connectors" first.
pub fn connector_filter_options(filter: &StationFilter) -> Vec<OptionView> {
    let current = filter.connector.to_string();
    std::iter::once(OptionView::new(ALL, "All Connectors", &current))
        .chain(
            CONNECTOR_TYPES
                .iter()
                .map(|c| OptionView::new(*c, *c, &current)),
        )
        .collect()
}

/// Status options for the form.
pub fn status_options(current: StationStatus) -> Vec<OptionView> {
    StationStatus::ALL
        .iter()
        .map(|s| OptionView::new(s.as_str(), s.as_str(), current.as_str()))
        .collect()
}

/// Connector options for the form. A stored value outside the known set is
/// kept as an extra option so editing does not silently change it.
pub fn connector_options(current: &str) -> Vec<OptionView> {
    let mut options: Vec<OptionView> = CONNECTOR_TYPES
        .iter()
        .map(|c| OptionView::new(*c, *c, current))
        .collect();
    if !CONNECTOR_TYPES.contains(&current) {
        options.push(OptionView::new(current, current, current));
    }
    options
}

/// Station view model for templates.
#[derive(Debug, Clone)]
pub struct StationView {
    pub id: String,
    pub name: String,
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    pub status: &'static str,
    pub is_active: bool,
    pub power_output: i32,
    pub connector_type: String,
}

impl StationView {
    /// Create from a domain Station.
    pub fn from_station(station: &Station) -> Self {
        Self {
            id: station.id.as_str().to_string(),
            name: station.name.clone(),
            location: station.location.clone(),
            latitude: station.latitude,
            longitude: station.longitude,
            status: station.status.as_str(),
            is_active: station.status.is_active(),
            power_output: station.power_output,
            connector_type: station.connector_type.clone(),
        }
    }

    /// CSS class for the status badge.
    pub fn status_class(&self) -> &'static str {
        if self.is_active {
            "badge badge-active"
        } else {
            "badge badge-inactive"
        }
    }

    pub fn edit_url(&self) -> String {
        format!("/stations/{}/edit", self.id)
    }

    pub fn delete_url(&self) -> String {
        format!("/stations/{}/delete", self.id)
    }

    pub fn map_url(&self) -> String {
        format!("/map?selected={}", self.id)
    }
}

impl FormTemplate {
    /// Build the form page for a draft.
    pub fn from_form(form: &StationForm, nav: NavView, notices: Vec<NoticeView>) -> Self {
        let action = match form.origin() {
            DraftOrigin::New => "/stations".to_string(),
            DraftOrigin::Editing(id) => format!("/stations/{id}"),
        };
        let draft = form.draft().clone();

        Self {
            nav,
            notices,
            heading: form.heading(),
            description: form.description(),
            submit_label: form.submit_label(),
            action,
            status_options: status_options(draft.status),
            connector_options: connector_options(&draft.connector_type),
            draft,
        }
    }
}
