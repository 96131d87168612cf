use anyhow::Result;
use taskboard_client::navigation::{
    names, AuthSessionGuard, NavigationController, NavigationDecision, NavigationError, NavigationTable, Route,
    View,
};
use taskboard_client::session::{SessionState, User};

fn signed_in() -> SessionState {
    let mut session = SessionState::in_memory();
    session.set_user(User::new("erin"));
    session
}

/// Every flag combination a route can carry, including oddities the standard table lacks
fn route_variants() -> Vec<Route> {
    let mut routes = Vec::new();
    for (path, name, view) in [
        ("/login", names::AUTHORIZATION_FORM, View::AuthorizationForm),
        ("/", names::HOME, View::HomePage),
        ("/projects/:projectId", names::PROJECT_DETAIL, View::ProjectDetail),
    ] {
        let route = Route::new(path, name, view).unwrap();
        routes.push(route.clone());
        routes.push(route.authenticated());
    }
    routes
}

#[test]
fn gated_routes_without_session_always_redirect_to_login() {
    let guard = AuthSessionGuard::default();
    let anonymous = SessionState::in_memory();

    for route in route_variants().iter().filter(|r| r.requires_auth) {
        assert_eq!(
            guard.evaluate(route, &anonymous),
            NavigationDecision::RedirectToLogin,
            "route {}",
            route.name
        );
    }
}

#[test]
fn login_route_with_session_redirects_home() {
    let guard = AuthSessionGuard::default();
    let session = signed_in();

    for route in route_variants().iter().filter(|r| r.name == names::AUTHORIZATION_FORM) {
        assert_eq!(guard.evaluate(route, &session), NavigationDecision::RedirectToHome);
    }
}

#[test]
fn everything_else_is_allowed() {
    let guard = AuthSessionGuard::default();

    for route in route_variants() {
        for session in [SessionState::in_memory(), signed_in()] {
            let gated_out = route.requires_auth && !session.is_authenticated();
            let bypassed = session.is_authenticated() && route.name == names::AUTHORIZATION_FORM;
            if !gated_out && !bypassed {
                assert_eq!(guard.evaluate(&route, &session), NavigationDecision::Allowed);
            }
        }
    }
}

#[test]
fn token_without_user_does_not_open_gated_routes() {
    let guard = AuthSessionGuard::default();
    let table = NavigationTable::standard().unwrap();
    let mut session = SessionState::in_memory();
    session.set_token("tok-without-user");

    let home = table.by_name(names::HOME).unwrap();
    assert_eq!(guard.evaluate(home, &session), NavigationDecision::RedirectToLogin);
}

#[test]
fn anonymous_walkthrough() -> Result<()> {
    let mut nav = NavigationController::new(NavigationTable::standard()?, AuthSessionGuard::default(), 3);
    let session = SessionState::in_memory();

    let public = nav.navigate("/projects/3/sprints/8", &session)?;
    assert_eq!(public.decision, NavigationDecision::Allowed);
    assert_eq!(public.location.view, View::SprintDetail);
    assert_eq!(public.location.params["projectId"], "3");

    let gated = nav.navigate("/projects/3/tasks/21", &session)?;
    assert_eq!(gated.decision, NavigationDecision::RedirectToLogin);
    assert_eq!(gated.location.path, "/login");

    let callback = nav.navigate("/oauth/callback?code=xyz", &session)?;
    assert_eq!(callback.location.route, names::OAUTH_CALLBACK);

    assert_eq!(
        nav.navigate("/projects/3/boards", &session).unwrap_err(),
        NavigationError::NotFound("/projects/3/boards".to_string())
    );
    assert_eq!(nav.current().map(|l| l.route.as_str()), Some(names::OAUTH_CALLBACK));
    Ok(())
}

#[test]
fn signed_in_walkthrough() -> Result<()> {
    let mut nav = NavigationController::new(NavigationTable::standard()?, AuthSessionGuard::default(), 3);
    let session = signed_in();

    let task = nav.navigate("/projects/3/tasks/21", &session)?;
    assert_eq!(task.decision, NavigationDecision::Allowed);
    assert_eq!(task.location.params["taskId"], "21");

    let login = nav.navigate("/login", &session)?;
    assert_eq!(login.decision, NavigationDecision::RedirectToHome);
    assert_eq!(login.location.path, "/");
    assert_eq!(login.redirects, 1);
    Ok(())
}
