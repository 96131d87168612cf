pub mod controller;
pub mod guard;
pub mod route;

pub use controller::{Location, NavigationController, NavigationError, NavigationOutcome};
pub use guard::{AuthSessionGuard, NavigationDecision};
pub use route::{names, NavigationTable, PathPattern, ResolvedRoute, Route, RouteError, RouteParams, View};
