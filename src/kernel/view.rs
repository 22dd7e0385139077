use serde::{Deserialize, Serialize};

/// Content of the app's main area. Exactly one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AppPanel {
    #[default]
    Dashboard,
    Map,
    Debug,
    Travel,
    Notification,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ViewMode {
    #[default]
    Face,
    App(AppPanel),
}

impl ViewMode {
    pub fn is_face(&self) -> bool {
        matches!(self, ViewMode::Face)
    }

    pub fn panel(&self) -> Option<AppPanel> {
        match self {
            ViewMode::Face => None,
            ViewMode::App(panel) => Some(*panel),
        }
    }

    /// Interrupt-style escalation: the face gives way to the alert-capable app.
    /// An already-open app keeps whatever panel it shows.
    pub fn escalate(self) -> Self {
        match self {
            ViewMode::Face => ViewMode::App(AppPanel::Dashboard),
            other => other,
        }
    }

    pub fn open_app(self) -> Self {
        self.escalate()
    }

    pub fn show_map(self) -> Self {
        match self {
            ViewMode::App(AppPanel::Dashboard) | ViewMode::App(AppPanel::Debug) => {
                ViewMode::App(AppPanel::Map)
            }
            other => other,
        }
    }

    pub fn close_map(self) -> Self {
        match self {
            ViewMode::App(AppPanel::Map) => ViewMode::App(AppPanel::Dashboard),
            other => other,
        }
    }

    pub fn toggle_debug(self) -> Self {
        match self {
            ViewMode::App(AppPanel::Dashboard) => ViewMode::App(AppPanel::Debug),
            ViewMode::App(AppPanel::Debug) => ViewMode::App(AppPanel::Dashboard),
            other => other,
        }
    }

    pub fn begin_travel(self) -> Self {
        match self {
            ViewMode::App(_) => ViewMode::App(AppPanel::Travel),
            ViewMode::Face => ViewMode::Face,
        }
    }

    /// Travel cancelled or finished without a notification to show.
    pub fn leave_travel(self) -> Self {
        match self {
            ViewMode::App(AppPanel::Travel) => ViewMode::App(AppPanel::Dashboard),
            other => other,
        }
    }

    pub fn arrive(self) -> Self {
        match self {
            ViewMode::App(AppPanel::Travel) => ViewMode::App(AppPanel::Notification),
            other => other,
        }
    }

    pub fn dismiss_notification(self) -> Self {
        match self {
            ViewMode::App(AppPanel::Notification) => ViewMode::App(AppPanel::Dashboard),
            other => other,
        }
    }
}
