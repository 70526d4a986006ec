//! Middleware trait and chain execution.

use crate::dispatch::DispatchContext;
use crate::http::{Request, Response};
use crate::middleware::MiddlewareRegistry;
use crate::observability::metrics;

/// Result of running a middleware.
#[derive(Debug)]
pub enum Flow {
    /// Proceed to the next middleware or the handler.
    Continue,
    /// Stop dispatch; this response is sent as-is.
    Halt(Response),
}

/// A named gate that runs before a route's handler.
pub trait Middleware: Send + Sync {
    fn handle(&self, ctx: &DispatchContext<'_>, req: &mut Request) -> Flow;
}

impl<F> Middleware for F
where
    F: Fn(&DispatchContext<'_>, &mut Request) -> Flow + Send + Sync,
{
    fn handle(&self, ctx: &DispatchContext<'_>, req: &mut Request) -> Flow {
        self(ctx, req)
    }
}

/// Run the matched route's middleware in order, stopping at the first halt.
pub fn run_chain(registry: &MiddlewareRegistry, ctx: &DispatchContext<'_>, req: &mut Request) -> Flow {
    for name in ctx.route.middleware() {
        let Some(middleware) = registry.get(name) else {
            // Unreachable for routers built through RouterBuilder, which rejects unknown names.
            tracing::warn!(middleware = %name, route = %ctx.route, "Unregistered middleware skipped");
            continue;
        };

        if let Flow::Halt(response) = middleware.handle(ctx, req) {
            tracing::debug!(
                middleware = %name,
                route = %ctx.route,
                status = response.status().as_u16(),
                "Middleware halted dispatch"
            );
            metrics::record_middleware_halt(name);
            return Flow::Halt(response);
        }
    }
    Flow::Continue
}
