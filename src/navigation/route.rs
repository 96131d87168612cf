use std::collections::{BTreeMap, HashSet};

use serde::Serialize;
use thiserror::Error;

/// Named values bound by `:param` segments
pub type RouteParams = BTreeMap<String, String>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    #[error("Duplicate route name: {0}")]
    DuplicateName(String),

    #[error("Invalid path pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Unknown route name: {0}")]
    UnknownName(String),

    #[error("Missing parameter '{param}' for route {route}")]
    MissingParam { route: String, param: String },
}

/// View mounted when a route resolves; rendering lives outside this crate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum View {
    AuthorizationForm,
    HomePage,
    OAuthCallback,
    ProjectsPage,
    ProjectDetail,
    SprintDetail,
    TaskDetail,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Static(String),
    Param(String),
}

/// Parsed `/a/:b/c` pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    pub fn parse(pattern: &str) -> Result<Self, RouteError> {
        let invalid = |reason: &str| RouteError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: reason.to_string(),
        };

        if !pattern.starts_with('/') {
            return Err(invalid("must start with '/'"));
        }

        let mut seen = HashSet::new();
        let mut segments = Vec::new();
        for part in split_path(pattern) {
            match part.strip_prefix(':') {
                Some("") => return Err(invalid("empty parameter name")),
                Some(name) => {
                    if !seen.insert(name.to_string()) {
                        return Err(invalid(&format!("parameter ':{}' repeated", name)));
                    }
                    segments.push(Segment::Param(name.to_string()));
                }
                None => segments.push(Segment::Static(part.to_string())),
            }
        }

        Ok(Self {
            raw: pattern.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Param(name) => Some(name.as_str()),
            Segment::Static(_) => None,
        })
    }

    /// Structural match: same segment count, statics equal, params bind anything non-empty
    pub fn match_path(&self, path: &str) -> Option<RouteParams> {
        let parts: Vec<&str> = split_path(strip_query(path)).collect();
        if parts.len() != self.segments.len() {
            return None;
        }

        let mut params = RouteParams::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Static(s) if s == part => {}
                Segment::Static(_) => return None,
                Segment::Param(name) => {
                    params.insert(name.clone(), part.to_string());
                }
            }
        }
        Some(params)
    }

    /// Fill the pattern back in; `route` only names the error
    fn build(&self, route: &str, params: &RouteParams) -> Result<String, RouteError> {
        if self.segments.is_empty() {
            return Ok("/".to_string());
        }

        let mut path = String::new();
        for segment in &self.segments {
            path.push('/');
            match segment {
                Segment::Static(s) => path.push_str(s),
                Segment::Param(name) => {
                    let value = params.get(name).ok_or_else(|| RouteError::MissingParam {
                        route: route.to_string(),
                        param: name.clone(),
                    })?;
                    path.push_str(value);
                }
            }
        }
        Ok(path)
    }
}

fn strip_query(path: &str) -> &str {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    &path[..end]
}

fn split_path(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|p| !p.is_empty())
}

/// One navigation table entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub path: PathPattern,
    pub name: String,
    pub requires_auth: bool,
    pub view: View,
}

impl Route {
    /// Public route; chain [`Route::authenticated`] to gate it
    pub fn new(path: &str, name: impl Into<String>, view: View) -> Result<Self, RouteError> {
        Ok(Self {
            path: PathPattern::parse(path)?,
            name: name.into(),
            requires_auth: false,
            view,
        })
    }

    pub fn authenticated(mut self) -> Self {
        self.requires_auth = true;
        self
    }
}

/// A concrete path resolved against the table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRoute<'a> {
    pub route: &'a Route,
    pub path: String,
    pub params: RouteParams,
}

pub mod names {
    pub const AUTHORIZATION_FORM: &str = "AuthorizationForm";
    pub const HOME: &str = "Home";
    pub const OAUTH_CALLBACK: &str = "OAuthCallback";
    pub const PROJECTS_PAGE: &str = "ProjectsPage";
    pub const PROJECT_DETAIL: &str = "ProjectDetail";
    pub const SPRINT_DETAIL: &str = "SprintDetail";
    pub const TASK_DETAIL: &str = "TaskDetail";
}

/// Ordered, immutable route list. Lookup is first structural match.
#[derive(Debug, Clone)]
pub struct NavigationTable {
    routes: Vec<Route>,
}

impl NavigationTable {
    pub fn new(routes: Vec<Route>) -> Result<Self, RouteError> {
        let mut names = HashSet::new();
        for route in &routes {
            if !names.insert(route.name.as_str()) {
                return Err(RouteError::DuplicateName(route.name.clone()));
            }
        }
        Ok(Self { routes })
    }

    /// The application's navigable surface
    pub fn standard() -> Result<Self, RouteError> {
        use self::names::*;

        Self::new(vec![
            Route::new("/", HOME, View::HomePage)?.authenticated(),
            Route::new("/login", AUTHORIZATION_FORM, View::AuthorizationForm)?,
            Route::new("/oauth/callback", OAUTH_CALLBACK, View::OAuthCallback)?,
            Route::new("/projects", PROJECTS_PAGE, View::ProjectsPage)?,
            Route::new("/projects/:projectId", PROJECT_DETAIL, View::ProjectDetail)?,
            Route::new(
                "/projects/:projectId/sprints/:sprintId",
                SPRINT_DETAIL,
                View::SprintDetail,
            )?,
            Route::new(
                "/projects/:projectId/tasks/:taskId",
                TASK_DETAIL,
                View::TaskDetail,
            )?
            .authenticated(),
        ])
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn by_name(&self, name: &str) -> Option<&Route> {
        self.routes.iter().find(|r| r.name == name)
    }

    pub fn resolve(&self, path: &str) -> Option<ResolvedRoute<'_>> {
        self.routes.iter().find_map(|route| {
            route.path.match_path(path).map(|params| ResolvedRoute {
                route,
                path: strip_query(path).to_string(),
                params,
            })
        })
    }

    /// Reverse lookup: concrete path for `name` with `params` substituted
    pub fn href(&self, name: &str, params: &RouteParams) -> Result<String, RouteError> {
        let route = self
            .by_name(name)
            .ok_or_else(|| RouteError::UnknownName(name.to_string()))?;
        route.path.build(name, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> RouteParams {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_pattern_binds_params() {
        let pattern = PathPattern::parse("/projects/:projectId/tasks/:taskId").unwrap();

        assert_eq!(
            pattern.match_path("/projects/3/tasks/17"),
            Some(params(&[("projectId", "3"), ("taskId", "17")]))
        );
        assert_eq!(pattern.match_path("/projects/3/tasks"), None);
        assert_eq!(pattern.match_path("/projects/3/sprints/17"), None);
    }

    #[test]
    fn test_pattern_ignores_trailing_slash_and_query() {
        let pattern = PathPattern::parse("/projects").unwrap();
        assert!(pattern.match_path("/projects/").is_some());
        assert!(pattern.match_path("/projects?page=2#top").is_some());
    }

    #[test]
    fn test_pattern_rejects_bad_input() {
        assert!(PathPattern::parse("projects").is_err());
        assert!(PathPattern::parse("/a/:").is_err());
        assert!(PathPattern::parse("/a/:id/b/:id").is_err());
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let routes = vec![
            Route::new("/", "Home", View::HomePage).unwrap(),
            Route::new("/home", "Home", View::HomePage).unwrap(),
        ];
        assert_eq!(
            NavigationTable::new(routes).unwrap_err(),
            RouteError::DuplicateName("Home".to_string())
        );
    }

    #[test]
    fn test_first_match_wins() {
        let table = NavigationTable::new(vec![
            Route::new("/projects/:id", "ById", View::ProjectDetail).unwrap(),
            Route::new("/projects/new", "New", View::ProjectsPage).unwrap(),
        ])
        .unwrap();

        assert_eq!(table.resolve("/projects/new").unwrap().route.name, "ById");
    }

    #[test]
    fn test_standard_table_surface() {
        let table = NavigationTable::standard().unwrap();

        let gated: Vec<&str> = table
            .routes()
            .iter()
            .filter(|r| r.requires_auth)
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(gated, vec![names::HOME, names::TASK_DETAIL]);

        assert_eq!(table.resolve("/").unwrap().route.view, View::HomePage);
        assert_eq!(table.resolve("/login").unwrap().route.name, names::AUTHORIZATION_FORM);
        let sprint = table.resolve("/projects/2/sprints/5").unwrap();
        assert_eq!(sprint.route.name, names::SPRINT_DETAIL);
        assert_eq!(sprint.params["sprintId"], "5");
        assert!(table.resolve("/nowhere").is_none());
    }

    #[test]
    fn test_href_builds_paths() {
        let table = NavigationTable::standard().unwrap();

        assert_eq!(table.href(names::HOME, &RouteParams::new()).unwrap(), "/");
        assert_eq!(
            table
                .href(names::TASK_DETAIL, &params(&[("projectId", "1"), ("taskId", "9")]))
                .unwrap(),
            "/projects/1/tasks/9"
        );
        assert!(matches!(
            table.href(names::TASK_DETAIL, &params(&[("projectId", "1")])),
            Err(RouteError::MissingParam { .. })
        ));
        assert!(matches!(
            table.href("Nope", &RouteParams::new()),
            Err(RouteError::UnknownName(_))
        ));
    }
}
