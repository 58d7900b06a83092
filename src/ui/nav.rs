//! Route and drawer navigation state.

/// Top-level route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    Login,
    Dashboard,
}

/// Dashboard section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Section {
    #[default]
    Home,
    Profile,
    UserManagement,
    Graphs,
    Reports,
    Forms,
    Emails,
    Settings,
}

impl Section {
    /// Get the display name for the section.
    pub fn name(&self) -> &'static str {
        match self {
            Section::Home => "Home",
            Section::Profile => "Profile",
            Section::UserManagement => "User Management",
            Section::Graphs => "Graphs",
            Section::Reports => "Reports",
            Section::Forms => "Forms",
            Section::Emails => "Emails",
            Section::Settings => "Settings",
        }
    }
}

/// Entry in the drawer menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    Section(Section),
    /// Expandable group holding Forms and Emails.
    Updates,
}

impl MenuItem {
    /// Top-level drawer entries in display order.
    pub const TOP_LEVEL: [MenuItem; 7] = [
        MenuItem::Section(Section::Home),
        MenuItem::Section(Section::Profile),
        MenuItem::Section(Section::UserManagement),
        MenuItem::Section(Section::Graphs),
        MenuItem::Section(Section::Reports),
        MenuItem::Updates,
        MenuItem::Section(Section::Settings),
    ];

    /// Children of the Updates group.
    pub const UPDATES: [Section; 2] = [Section::Forms, Section::Emails];

    pub fn name(&self) -> &'static str {
        match self {
            MenuItem::Section(section) => section.name(),
            MenuItem::Updates => "Updates",
        }
    }
}

/// What the central area shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Section(Section),
    AddUser,
}

/// Dashboard navigation state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavState {
    pub drawer_open: bool,
    pub active: Section,
    pub updates_open: bool,
    pub show_add_user: bool,
}

impl NavState {
    /// Handle a drawer click. Updates only toggles its group.
    pub fn select(&mut self, item: MenuItem) {
        match item {
            MenuItem::Updates => self.updates_open = !self.updates_open,
            MenuItem::Section(section) => {
                self.active = section;
                self.show_add_user = false;
            }
        }
    }

    pub fn open_drawer(&mut self) {
        self.drawer_open = true;
    }

    pub fn close_drawer(&mut self) {
        self.drawer_open = false;
    }

    /// Show the add-user form over the listing.
    pub fn open_add_user(&mut self) {
        self.show_add_user = true;
    }

    pub fn close_add_user(&mut self) {
        self.show_add_user = false;
    }

    pub fn view(&self) -> View {
        if self.show_add_user {
            View::AddUser
        } else {
            View::Section(self.active)
        }
    }
}
