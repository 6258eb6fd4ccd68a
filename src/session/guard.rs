use super::SessionState;

/// Privilege a protected view requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Authenticated,
    AdminOnly,
}

/// Outcome of a guard check. Evaluated synchronously from the session
/// snapshot; the guard itself never triggers a fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    /// Identity probe still in flight - render a placeholder, decide nothing
    Loading,
    /// No user - redirect to login
    Unauthenticated,
    /// User present but lacks the required privilege - redirect to unauthorized
    Unauthorized,
    /// Render the wrapped view
    Authorized,
}

pub fn evaluate(state: &SessionState, access: Access) -> RouteDecision {
    if state.is_loading {
        return RouteDecision::Loading;
    }

    let user = match &state.user {
        Some(user) => user,
        None => return RouteDecision::Unauthenticated,
    };

    match access {
        Access::Authenticated => RouteDecision::Authorized,
        Access::AdminOnly if user.is_admin => RouteDecision::Authorized,
        Access::AdminOnly => RouteDecision::Unauthorized,
    }
}
