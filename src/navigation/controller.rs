use serde::Serialize;
use thiserror::Error;

use super::guard::{AuthSessionGuard, NavigationDecision};
use super::route::{NavigationTable, RouteError, RouteParams, View};
use crate::session::SessionState;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    #[error("No route matches '{0}'")]
    NotFound(String),

    #[error("Redirect limit {limit} exceeded navigating to '{path}'")]
    TooManyRedirects { path: String, limit: usize },

    #[error(transparent)]
    Route(#[from] RouteError),
}

/// A committed navigation: the view that is actually mounted
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    pub route: String,
    pub path: String,
    pub params: RouteParams,
    pub view: View,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationOutcome {
    /// Path the caller asked for
    pub requested: String,
    /// Guard verdict on the requested route
    pub decision: NavigationDecision,
    pub location: Location,
    /// Redirect hops followed before the final route was allowed
    pub redirects: usize,
}

/// Resolves paths, runs the guard and commits the resulting location.
///
/// The current location only changes once a route is allowed; a failed
/// attempt leaves it untouched.
#[derive(Debug)]
pub struct NavigationController {
    table: NavigationTable,
    guard: AuthSessionGuard,
    max_redirects: usize,
    current: Option<Location>,
}

impl NavigationController {
    pub fn new(table: NavigationTable, guard: AuthSessionGuard, max_redirects: usize) -> Self {
        Self {
            table,
            guard,
            max_redirects,
            current: None,
        }
    }

    pub fn table(&self) -> &NavigationTable {
        &self.table
    }

    pub fn guard(&self) -> &AuthSessionGuard {
        &self.guard
    }

    pub fn current(&self) -> Option<&Location> {
        self.current.as_ref()
    }

    pub fn navigate(
        &mut self,
        path: &str,
        session: &SessionState,
    ) -> Result<NavigationOutcome, NavigationError> {
        let mut target = path.to_string();
        let mut first_decision = None;
        let mut redirects = 0;

        loop {
            let resolved = self
                .table
                .resolve(&target)
                .ok_or_else(|| NavigationError::NotFound(target.clone()))?;

            let decision = self.guard.evaluate(resolved.route, session);
            let first = *first_decision.get_or_insert(decision);

            let redirect_to = match decision {
                NavigationDecision::Allowed => {
                    let location = Location {
                        route: resolved.route.name.clone(),
                        path: resolved.path,
                        params: resolved.params,
                        view: resolved.route.view,
                    };
                    tracing::info!(requested = path, route = %location.route, redirects, "navigation committed");
                    self.current = Some(location.clone());

                    return Ok(NavigationOutcome {
                        requested: path.to_string(),
                        decision: first,
                        location,
                        redirects,
                    });
                }
                NavigationDecision::RedirectToLogin => self.guard.login_route(),
                NavigationDecision::RedirectToHome => self.guard.home_route(),
            };

            if redirects >= self.max_redirects {
                tracing::warn!(requested = path, limit = self.max_redirects, "redirect limit reached");
                return Err(NavigationError::TooManyRedirects {
                    path: path.to_string(),
                    limit: self.max_redirects,
                });
            }

            target = self.table.href(redirect_to, &RouteParams::new())?;
            redirects += 1;
            tracing::debug!(from = %resolved.route.name, to = %target, "redirecting");
        }
    }

    /// Navigate by route name instead of concrete path
    pub fn navigate_to(
        &mut self,
        name: &str,
        params: &RouteParams,
        session: &SessionState,
    ) -> Result<NavigationOutcome, NavigationError> {
        let path = self.table.href(name, params)?;
        self.navigate(&path, session)
    }
}
