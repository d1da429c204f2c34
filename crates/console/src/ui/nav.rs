//! Navigation shell

use std::fmt::Write as _;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Dashboard,
    Companies,
    Users,
    Schedules,
    Reports,
    Settings,
    Login,
    NotFound(String),
}

/// Sidebar entries, in display order
pub const NAV_ITEMS: [Route; 6] = [
    Route::Dashboard,
    Route::Companies,
    Route::Users,
    Route::Schedules,
    Route::Reports,
    Route::Settings,
];

impl Route {
    /// Resolve a path such as `/schedules`; a bare page name works too
    pub fn resolve(path: &str) -> Self {
        let trimmed = path.trim();
        let name = trimmed.trim_start_matches('/').trim_end_matches('/');
        match name.to_ascii_lowercase().as_str() {
            "" | "dashboard" => Self::Dashboard,
            "companies" => Self::Companies,
            "users" => Self::Users,
            "schedules" => Self::Schedules,
            "reports" => Self::Reports,
            "settings" => Self::Settings,
            "login" => Self::Login,
            _ => Self::NotFound(trimmed.to_string()),
        }
    }

    pub fn path(&self) -> &str {
        match self {
            Self::Dashboard => "/",
            Self::Companies => "/companies",
            Self::Users => "/users",
            Self::Schedules => "/schedules",
            Self::Reports => "/reports",
            Self::Settings => "/settings",
            Self::Login => "/login",
            Self::NotFound(path) => path,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Companies => "Companies",
            Self::Users => "Users",
            Self::Schedules => "Schedules",
            Self::Reports => "Reports",
            Self::Settings => "Settings",
            Self::Login => "Login",
            Self::NotFound(_) => "Not Found",
        }
    }

    /// Pages reachable without logging in
    pub fn is_public(&self) -> bool {
        matches!(self, Self::Login | Self::Settings | Self::NotFound(_))
    }
}

/// Sidebar with the active entry marked
pub fn render_sidebar(active: &Route) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "KatiCRM");
    let _ = writeln!(out, "Ticket Management System");
    let _ = writeln!(out);
    for item in NAV_ITEMS.iter() {
        let marker = if item == active { '>' } else { ' ' };
        let _ = writeln!(out, "{} {:<10} {}", marker, item.title(), item.path());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_paths() {
        assert_eq!(Route::resolve("/"), Route::Dashboard);
        assert_eq!(Route::resolve("/companies"), Route::Companies);
        assert_eq!(Route::resolve("schedules"), Route::Schedules);
        assert_eq!(Route::resolve("/Reports/"), Route::Reports);
        assert_eq!(Route::resolve("/login"), Route::Login);
        assert_eq!(
            Route::resolve("/billing"),
            Route::NotFound("/billing".to_string())
        );
    }

    #[test]
    fn test_paths_round_trip_for_nav_items() {
        for item in NAV_ITEMS.iter() {
            assert_eq!(&Route::resolve(item.path()), item);
        }
    }

    #[test]
    fn test_sidebar_marks_active_entry() {
        let sidebar = render_sidebar(&Route::Users);
        assert!(sidebar.starts_with("KatiCRM\nTicket Management System\n"));
        assert!(sidebar.contains("> Users"));
        assert!(sidebar.contains("  Companies"));
    }

    #[test]
    fn test_public_routes() {
        assert!(Route::Login.is_public());
        assert!(Route::Settings.is_public());
        assert!(!Route::Companies.is_public());
    }
}
