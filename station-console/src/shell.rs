//! Which view the console shows.

use crate::domain::Station;

/// Top-level views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    List,
    Map,
    Form,
}

impl View {
    /// Where the view lives.
    pub fn path(&self) -> &'static str {
        match self {
            View::List => "/",
            View::Map => "/map",
            View::Form => "/stations/new",
        }
    }
}

/// View switcher state: the active view and the station being edited.
#[derive(Debug, Clone, Default)]
pub struct Shell {
    active: View,
    editing: Option<Station>,
}

impl Shell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> View {
        self.active
    }

    pub fn editing(&self) -> Option<&Station> {
        self.editing.as_ref()
    }

    /// Switch between list and map. Leaving the form drops the edit target.
    pub fn show(&mut self, view: View) {
        if view != View::Form {
            self.editing = None;
        }
        self.active = view;
    }

    /// Open a blank form.
    pub fn add_new(&mut self) {
        self.editing = None;
        self.active = View::Form;
    }

    /// Open the form for an existing station.
    pub fn edit(&mut self, station: Station) {
        self.editing = Some(station);
        self.active = View::Form;
    }

    /// Close the form and return to the list.
    pub fn close_form(&mut self) -> View {
        self.editing = None;
        self.active = View::List;
        self.active
    }
}
