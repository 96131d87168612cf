use serde::Serialize;

use super::route::{names, Route};
use crate::session::SessionState;

/// Terminal outcome of evaluating one navigation attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NavigationDecision {
    Allowed,
    RedirectToLogin,
    RedirectToHome,
}

/// Decides whether a resolved route may be entered with the current session.
///
/// Rules, first match wins:
/// 1. gated route, no user → login
/// 2. user present, target is the login route → home
/// 3. otherwise allowed
#[derive(Debug, Clone)]
pub struct AuthSessionGuard {
    login_route: String,
    home_route: String,
}

impl Default for AuthSessionGuard {
    fn default() -> Self {
        Self::new(names::AUTHORIZATION_FORM, names::HOME)
    }
}

impl AuthSessionGuard {
    pub fn new(login_route: impl Into<String>, home_route: impl Into<String>) -> Self {
        Self {
            login_route: login_route.into(),
            home_route: home_route.into(),
        }
    }

    pub fn login_route(&self) -> &str {
        &self.login_route
    }

    pub fn home_route(&self) -> &str {
        &self.home_route
    }

    pub fn evaluate(&self, target: &Route, session: &SessionState) -> NavigationDecision {
        self.decide(target, session.is_authenticated())
    }

    /// Pure decision over (route metadata, session presence)
    pub fn decide(&self, target: &Route, authenticated: bool) -> NavigationDecision {
        let decision = if target.requires_auth && !authenticated {
            NavigationDecision::RedirectToLogin
        } else if authenticated && target.name == self.login_route {
            NavigationDecision::RedirectToHome
        } else {
            NavigationDecision::Allowed
        };

        tracing::debug!(route = %target.name, authenticated, ?decision, "guard evaluated");
        decision
    }
}
