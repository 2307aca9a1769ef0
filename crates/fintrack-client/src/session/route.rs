use std::fmt;

use serde::Serialize;

/// The navigation surface. Every route but `Auth` and `Home` needs a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Route {
    Home,
    Auth,
    Dashboard,
    Transactions,
    Budgets,
    Goals,
    Profile,
}

impl Route {
    pub const ALL: [Route; 7] = [
        Route::Home,
        Route::Auth,
        Route::Dashboard,
        Route::Transactions,
        Route::Budgets,
        Route::Goals,
        Route::Profile,
    ];

    pub const fn path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Auth => "/auth",
            Self::Dashboard => "/dashboard",
            Self::Transactions => "/transactions",
            Self::Budgets => "/budgets",
            Self::Goals => "/goals",
            Self::Profile => "/profile",
        }
    }

    /// Resolves a path or bare route name. Anything unknown lands on `Auth`.
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed == "/" {
            return Self::Home;
        }
        let name = trimmed.trim_start_matches('/').trim_end_matches('/');
        Self::ALL
            .into_iter()
            .find(|route| route.path().trim_start_matches('/') == name)
            .unwrap_or(Self::Auth)
    }

    pub const fn is_protected(self) -> bool {
        !matches!(self, Self::Home | Self::Auth)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
