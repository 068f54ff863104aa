//! Local HTTP backend used by the async tests.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use anyhow::Result;
use axum::{
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use tracing::warn;

/// Responses served for one request path, in order. The last one repeats.
pub(crate) struct Route {
    path: String,
    responses: Vec<(StatusCode, String)>,
    hits: AtomicUsize,
}

impl Route {
    pub(crate) fn new(path: &str, status: u16, body: &str) -> Self {
        Self {
            path: path.to_string(),
            responses: vec![(status_code(status), body.to_string())],
            hits: AtomicUsize::new(0),
        }
    }

    /// Queue another response for subsequent requests.
    pub(crate) fn then(mut self, status: u16, body: &str) -> Self {
        self.responses.push((status_code(status), body.to_string()));
        self
    }

    fn next_response(&self) -> impl IntoResponse {
        let hit = self.hits.fetch_add(1, Ordering::SeqCst);
        let (status, body) = self.responses[hit.min(self.responses.len() - 1)].clone();
        (status, [(header::CONTENT_TYPE, "application/json")], body)
    }
}

fn status_code(status: u16) -> StatusCode {
    StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

/// Serve `routes` on `127.0.0.1:0` and return the base URL. Unknown paths answer 404.
pub(crate) async fn serve(routes: Vec<Route>) -> Result<String> {
    let mut app = Router::new();
    for route in routes {
        let route = Arc::new(route);
        let path = route.path.clone();
        app = app.route(
            &path,
            get(move || {
                let route = Arc::clone(&route);
                async move { route.next_response() }
            }),
        );
    }

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = axum::serve(listener, app).await {
            warn!("test backend stopped: {err}");
        }
    });

    Ok(format!("http://{addr}"))
}
