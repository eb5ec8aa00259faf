/// Top-level navigation tabs. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tab {
    #[default]
    Home,
    Analytics,
    HowItWorks,
    About,
}

impl Tab {
    /// All tabs in display order.
    pub const ALL: [Tab; 4] = [Tab::Home, Tab::Analytics, Tab::HowItWorks, Tab::About];

    pub fn id(self) -> &'static str {
        match self {
            Tab::Home => "home",
            Tab::Analytics => "analytics",
            Tab::HowItWorks => "how it works",
            Tab::About => "about",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tab::Home => "Home",
            Tab::Analytics => "Analytics",
            Tab::HowItWorks => "Architecture",
            Tab::About => "About",
        }
    }

    /// Looks a tab up by id or label, ignoring case.
    pub fn from_id(raw: &str) -> Option<Tab> {
        let wanted = raw.trim();
        Tab::ALL.into_iter().find(|tab| {
            tab.id().eq_ignore_ascii_case(wanted) || tab.label().eq_ignore_ascii_case(wanted)
        })
    }
}
