//! Top navigation bar.

use super::classes;
use super::icons::Icon;

/// The page the navbar highlights.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivePage {
    Home,
    Chat,
    Upload,
}

struct NavLink {
    title: &'static str,
    path: &'static str,
    icon: Option<Icon>,
    page: ActivePage,
}

const NAV_LINKS: &[NavLink] = &[
    NavLink {
        title: "Home",
        path: "/",
        icon: None,
        page: ActivePage::Home,
    },
    NavLink {
        title: "Chat",
        path: "/chat",
        icon: Some(Icon::MessageSquare),
        page: ActivePage::Chat,
    },
    NavLink {
        title: "Upload",
        path: "/chat?upload=true",
        icon: Some(Icon::Upload),
        page: ActivePage::Upload,
    },
];

fn links(active: ActivePage, base: &str) -> String {
    NAV_LINKS
        .iter()
        .map(|link| {
            let state = if link.page == active {
                "nav-link-active"
            } else {
                "nav-link-idle"
            };
            let aria = if link.page == active {
                r#" aria-current="page""#
            } else {
                ""
            };
            let icon = link.icon.map(|i| i.svg(18, "")).unwrap_or_default();
            format!(
                r#"<a href="{path}" class="{class}"{aria}>{icon}{title}</a>"#,
                path = link.path,
                class = classes([base, state]),
                title = link.title,
            )
        })
        .collect()
}

/// Render the navbar. The mobile menu is a `<details>` disclosure.
#[must_use]
pub fn navbar(active: ActivePage) -> String {
    format!(
        r#"<header class="navbar">
    <div class="container-custom">
        <nav class="navbar-inner">
            <a href="/" class="brand"><span class="text-gradient">LangRAG</span></a>
            <div class="nav-desktop">{desktop}</div>
            <details class="nav-mobile">
                <summary aria-label="Toggle menu">{menu}</summary>
                <div class="glass-card nav-mobile-panel">{mobile}</div>
            </details>
        </nav>
    </div>
</header>"#,
        desktop = links(active, "nav-link"),
        mobile = links(active, "nav-link nav-link-mobile"),
        menu = Icon::Menu.svg(24, ""),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_active_link_is_marked() {
        let html = navbar(ActivePage::Upload);
        // desktop and mobile copies
        assert_eq!(html.matches(r#"aria-current="page""#).count(), 2);
        assert!(html.contains(
            r#"<a href="/chat?upload=true" class="nav-link nav-link-active" aria-current="page">"#
        ));
        assert!(html.contains(r#"<a href="/" class="nav-link nav-link-idle">Home</a>"#));
    }
}
