//! Navigation links and active-link highlighting
//!
//! The host calls `highlight_active_links` whenever the location changes,
//! passing the new pathname and the current attributes of each link, and
//! writes the returned attributes back.

use crate::classes::{update_utility_classes, ClassList, ClassResult};
use serde::{Deserialize, Serialize};

/// A page known to the app
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageEntry {
    pub name: String,
    pub path: String,
    pub icon_path: String,
    /// Whether the page gets a sidebar link
    #[serde(default)]
    pub navbar: bool,
}

impl PageEntry {
    pub fn new(name: &str, path: &str, icon_path: &str, navbar: bool) -> Self {
        Self {
            name: name.to_string(),
            path: path.to_string(),
            icon_path: icon_path.to_string(),
            navbar,
        }
    }
}

/// The dashboard's pages, in sidebar order
pub fn default_pages() -> Vec<PageEntry> {
    vec![
        PageEntry::new("Home", "/", "/assets/house.svg", false),
        PageEntry::new("Dashboard", "/dashboard", "/assets/chart-line.svg", true),
        PageEntry::new("Background", "/background", "/assets/book-open.svg", true),
        PageEntry::new("Quarto", "/quarto", "/assets/file-lines.svg", true),
    ]
}

/// Style attributes of one navigation link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavLinkState {
    pub href: String,
    pub class_name: String,
    pub icon_src: String,
}

/// Classes that distinguish an active link from an inactive one
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavLinkStyle {
    pub base: Vec<String>,
    pub active: Vec<String>,
    pub inactive: Vec<String>,
}

impl Default for NavLinkStyle {
    fn default() -> Self {
        Self {
            base: ["px-4", "py-2", "flex", "space-x-2", "items-center", "hover:bg-slate-700"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            active: vec!["bg-emerald-50".to_string(), "text-slate-800".to_string()],
            inactive: vec!["bg-slate-800".to_string(), "text-emerald-50".to_string()],
        }
    }
}

/// Icon variants for a link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavIcon {
    pub inactive: String,
    pub active: String,
}

impl NavIcon {
    /// Active variant named `<stem>-active.<ext>` next to the inactive icon
    pub fn from_path(path: &str) -> Self {
        let active = match path.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() && !ext.contains('/') => {
                format!("{}-active.{}", stem, ext)
            }
            _ => format!("{}-active", path),
        };
        Self {
            inactive: path.to_string(),
            active,
        }
    }

    fn src(&self, active: bool) -> &str {
        if active {
            &self.active
        } else {
            &self.inactive
        }
    }
}

/// Sidebar links for pages flagged `navbar`, all inactive
pub fn nav_links(pages: &[PageEntry], style: &NavLinkStyle) -> Vec<NavLinkState> {
    let class_name = style
        .base
        .iter()
        .chain(style.inactive.iter())
        .cloned()
        .collect::<Vec<_>>()
        .join(" ");

    pages
        .iter()
        .filter(|page| page.navbar)
        .map(|page| NavLinkState {
            href: page.path.clone(),
            class_name: class_name.clone(),
            icon_src: page.icon_path.clone(),
        })
        .collect()
}

/// Compare paths ignoring a trailing `/` (except for the root)
fn same_path(a: &str, b: &str) -> bool {
    fn normalize(p: &str) -> &str {
        let trimmed = p.trim_end_matches('/');
        if trimmed.is_empty() {
            "/"
        } else {
            trimmed
        }
    }
    normalize(a) == normalize(b)
}

/// Restyle one link for the current pathname
pub fn highlight_active_link(
    pathname: &str,
    link: &NavLinkState,
    style: &NavLinkStyle,
    icon: &NavIcon,
) -> ClassResult<NavLinkState> {
    let should_be_active = same_path(pathname, &link.href);
    let classes = ClassList::parse(&link.class_name);

    let (remove, add) = if should_be_active {
        (&style.inactive, &style.active)
    } else {
        (&style.active, &style.inactive)
    };

    let remove: Vec<&str> = remove
        .iter()
        .map(|s| s.as_str())
        .filter(|c| classes.contains(c))
        .collect();
    let add: Vec<&str> = add
        .iter()
        .map(|s| s.as_str())
        .filter(|c| !classes.contains(c))
        .collect();

    let class_name = if remove.is_empty() && add.is_empty() {
        classes.to_string()
    } else {
        // Active/inactive backgrounds always share a prefix with the hover class
        update_utility_classes(&link.class_name, &remove, &add, true)?
    };

    Ok(NavLinkState {
        href: link.href.clone(),
        class_name,
        icon_src: icon.src(should_be_active).to_string(),
    })
}

/// Restyle every link for the current pathname
///
/// Icons are derived from each link's current `icon_src` via
/// `NavIcon::from_path`, stripping an existing `-active` suffix first.
pub fn highlight_active_links(
    pathname: &str,
    links: &[NavLinkState],
    style: &NavLinkStyle,
) -> ClassResult<Vec<NavLinkState>> {
    links
        .iter()
        .map(|link| {
            let icon = NavIcon::from_path(&inactive_icon_path(&link.icon_src));
            highlight_active_link(pathname, link, style, &icon)
        })
        .collect()
}

fn inactive_icon_path(src: &str) -> String {
    match src.rsplit_once('.') {
        Some((stem, ext)) if stem.ends_with("-active") => {
            format!("{}.{}", stem.trim_end_matches("-active"), ext)
        }
        _ => src.trim_end_matches("-active").to_string(),
    }
}
