use serde::Serialize;

use crate::auth::AuthBackend;
use crate::models::Session;
use crate::session::route::Route;

/// Outcome of a navigation attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum Navigation {
    Allow { route: Route, session: Option<Session> },
    Redirect { from: Route, to: Route },
}

impl Navigation {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow { .. })
    }

    pub fn session(&self) -> Option<&Session> {
        match self {
            Self::Allow { session, .. } => session.as_ref(),
            Self::Redirect { .. } => None,
        }
    }

    /// Where the user ends up.
    pub fn destination(&self) -> Route {
        match self {
            Self::Allow { route, .. } => *route,
            Self::Redirect { to, .. } => *to,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Authenticated(Session),
    Unauthenticated,
}

/// Gates protected routes on a valid stored session.
///
/// Any failed check clears what is stored, so a later check starts from
/// `Unauthenticated` without consulting stale data.
#[derive(Debug)]
pub struct SessionGuard<'a, A> {
    auth: &'a A,
}

impl<'a, A: AuthBackend> SessionGuard<'a, A> {
    pub fn new(auth: &'a A) -> Self {
        Self { auth }
    }

    pub fn state(&self) -> SessionState {
        match self.auth.current_session() {
            Ok(Some(session)) => SessionState::Authenticated(session),
            Ok(None) => {
                self.clear();
                SessionState::Unauthenticated
            }
            Err(error) => {
                tracing::warn!(code = %error.code, "session lookup failed");
                self.clear();
                SessionState::Unauthenticated
            }
        }
    }

    pub fn check(&self, route: Route) -> Navigation {
        match route {
            Route::Home => {
                let stored = self.auth.has_stored_session().unwrap_or_else(|error| {
                    tracing::warn!(code = %error.code, "session presence check failed");
                    false
                });
                let to = if stored { Route::Dashboard } else { Route::Auth };
                Navigation::Redirect { from: route, to }
            }
            Route::Auth => match self.state() {
                SessionState::Authenticated(_) => Navigation::Redirect {
                    from: route,
                    to: Route::Dashboard,
                },
                SessionState::Unauthenticated => Navigation::Allow {
                    route,
                    session: None,
                },
            },
            protected => match self.state() {
                SessionState::Authenticated(session) => Navigation::Allow {
                    route: protected,
                    session: Some(session),
                },
                SessionState::Unauthenticated => {
                    tracing::debug!(route = %protected, "redirecting to sign-in");
                    Navigation::Redirect {
                        from: protected,
                        to: Route::Auth,
                    }
                }
            },
        }
    }

    fn clear(&self) {
        if let Err(error) = self.auth.clear_session() {
            tracing::warn!(code = %error.code, "could not clear stored session");
        }
    }
}
