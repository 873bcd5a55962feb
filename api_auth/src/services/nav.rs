use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavItem {
    pub title: &'static str,
    pub url: String,
    pub public: bool,
    pub badge: Option<&'static str>,
}

const PAGES: [(&str, &str, bool, Option<&str>); 9] = [
    ("Home", "Home", true, None),
    ("Documentation", "Documentation", true, None),
    ("AI Blocknode", "AIAgent", true, None),
    ("Dashboard", "Dashboard", false, None),
    ("API Keys", "ApiKeys", false, None),
    ("Usage", "Usage", false, None),
    ("Pricing", "Pricing", true, None),
    ("Webhooks", "Webhooks", false, Some("Soon")),
    ("Real-time Data", "RealTimeData", false, Some("Soon")),
];

/// Shown in the desktop header regardless of session.
const HEADER_TITLES: [&str; 4] = ["Home", "Documentation", "AI Blocknode", "Pricing"];

/// Front-end route of a page: `/` plus the lowercased page name.
pub fn page_url(page: &str) -> String {
    format!("/{}", page.to_lowercase().replace(' ', "-"))
}

pub fn catalogue() -> Vec<NavItem> {
    PAGES
        .iter()
        .map(|(title, page, public, badge)| NavItem {
            title: *title,
            url: page_url(page),
            public: *public,
            badge: *badge,
        })
        .collect()
}

/// Items visible to the caller: public pages, plus everything once signed in.
pub fn visible_items(authenticated: bool) -> Vec<NavItem> {
    catalogue()
        .into_iter()
        .filter(|item| item.public || authenticated)
        .collect()
}

pub fn header_items() -> Vec<NavItem> {
    catalogue()
        .into_iter()
        .filter(|item| HEADER_TITLES.contains(&item.title))
        .collect()
}
