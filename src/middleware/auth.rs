//! Authentication gate.
//!
//! Lets authenticated sessions through. Anyone else is sent to the login
//! page, with the requested URI remembered so login can send them back.

use crate::dispatch::DispatchContext;
use crate::http::{Request, Response};
use crate::middleware::{Flow, Middleware};

/// Session key holding the URI to return to after login.
pub const INTENDED_URL_KEY: &str = "intended_url";

#[derive(Debug, Clone)]
pub struct AuthMiddleware {
    login_path: String,
}

impl AuthMiddleware {
    pub fn new(login_path: impl Into<String>) -> Self {
        Self {
            login_path: login_path.into(),
        }
    }
}

impl Default for AuthMiddleware {
    fn default() -> Self {
        Self::new("/login")
    }
}

impl Middleware for AuthMiddleware {
    fn handle(&self, ctx: &DispatchContext<'_>, req: &mut Request) -> Flow {
        if req.session().is_authenticated() {
            return Flow::Continue;
        }

        let intended = if req.uri().is_empty() { "/".to_string() } else { req.uri().to_string() };
        tracing::debug!(
            request_id = %req.request_id(),
            route = %ctx.route,
            intended = %intended,
            "Unauthenticated request redirected to login"
        );
        req.session_mut().set(INTENDED_URL_KEY, intended);

        Flow::Halt(Response::redirect(&self.login_path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::RouteTable;
    use crate::session::Session;

    fn table() -> RouteTable {
        let mut table = RouteTable::new();
        table
            .get("/watchlist", "WatchlistController@index".parse().unwrap(), vec!["auth".into()])
            .unwrap();
        table
    }

    fn ctx(table: &RouteTable) -> DispatchContext<'_> {
        DispatchContext {
            route: &table.routes()[0],
            params: vec![],
            method: "GET".into(),
            path: "/watchlist".into(),
        }
    }

    #[test]
    fn test_guest_redirected_with_intended_url() {
        let table = table();
        let mut req = Request::new("GET", "/watchlist?sort=title");

        match AuthMiddleware::default().handle(&ctx(&table), &mut req) {
            Flow::Halt(res) => assert_eq!(res.header("location"), Some("/login")),
            Flow::Continue => panic!("guest should be halted"),
        }
        assert_eq!(req.session().get(INTENDED_URL_KEY), Some("/watchlist?sort=title"));
    }

    #[test]
    fn test_authenticated_passes() {
        let table = table();
        let mut session = Session::new();
        session.set_user("ana@example.com");
        let mut req = Request::new("GET", "/watchlist").with_session(session);

        assert!(matches!(AuthMiddleware::default().handle(&ctx(&table), &mut req), Flow::Continue));
        assert_eq!(req.session().get(INTENDED_URL_KEY), None);
    }
}
