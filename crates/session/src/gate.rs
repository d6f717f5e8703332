//! Route gate

/// What to do with a page request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    Redirect(String),
}

/// Send signed-out users away from the dashboard and signed-in users past
/// the sign-in page
///
/// Only `/` and `/dashboard` (with anything below it) are gated.
pub fn gate(path: &str, has_session: bool) -> GateDecision {
    let on_dashboard = path == "/dashboard" || path.starts_with("/dashboard/");

    match (path, has_session) {
        (_, false) if on_dashboard => GateDecision::Redirect("/".to_string()),
        ("/", true) => GateDecision::Redirect("/dashboard".to_string()),
        _ => GateDecision::Allow,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_out() {
        assert_eq!(gate("/", false), GateDecision::Allow);
        assert_eq!(gate("/dashboard", false), GateDecision::Redirect("/".into()));
        assert_eq!(
            gate("/dashboard/doc/1", false),
            GateDecision::Redirect("/".into())
        );
    }

    #[test]
    fn test_signed_in() {
        assert_eq!(gate("/", true), GateDecision::Redirect("/dashboard".into()));
        assert_eq!(gate("/dashboard", true), GateDecision::Allow);
    }

    #[test]
    fn test_ungated_paths() {
        assert_eq!(gate("/error", false), GateDecision::Allow);
        assert_eq!(gate("/dashboards", false), GateDecision::Allow);
        assert_eq!(gate("/auth/callback", true), GateDecision::Allow);
    }
}
