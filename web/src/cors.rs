//! Permissive CORS for the browser-facing notification endpoints.
//!
//! Every response carries the same three headers, errors included, and any
//! `OPTIONS` request is answered directly with `200` and an empty body whether
//! or not it looks like a real preflight.

use axum::{
    body::Body,
    extract::Request,
    http::{HeaderName, HeaderValue, Method, StatusCode},
    response::Response,
};
use std::task::{Context, Poll};
use tower::{Layer, Service};

/// `Access-Control-Allow-Origin` value.
pub const ALLOW_ORIGIN: &str = "*";

/// `Access-Control-Allow-Headers` value.
pub const ALLOW_HEADERS: &str = "authorization, x-client-info, apikey, content-type";

/// `Access-Control-Allow-Methods` value.
pub const ALLOW_METHODS: &str = "POST, OPTIONS";

/// Create the CORS layer.
#[must_use]
pub const fn cors_layer() -> CorsHeadersLayer {
    CorsHeadersLayer
}

/// Layer that adds the CORS headers and answers `OPTIONS`.
#[derive(Clone, Copy, Debug)]
pub struct CorsHeadersLayer;

impl<S> Layer<S> for CorsHeadersLayer {
    type Service = CorsHeaders<S>;

    fn layer(&self, inner: S) -> Self::Service {
        CorsHeaders { inner }
    }
}

/// Middleware service produced by [`CorsHeadersLayer`].
#[derive(Clone, Debug)]
pub struct CorsHeaders<S> {
    inner: S,
}

fn apply_headers(response: &mut Response) {
    let headers = response.headers_mut();
    headers.insert(
        HeaderName::from_static("access-control-allow-origin"),
        HeaderValue::from_static(ALLOW_ORIGIN),
    );
    headers.insert(
        HeaderName::from_static("access-control-allow-headers"),
        HeaderValue::from_static(ALLOW_HEADERS),
    );
    headers.insert(
        HeaderName::from_static("access-control-allow-methods"),
        HeaderValue::from_static(ALLOW_METHODS),
    );
}

impl<S> Service<Request> for CorsHeaders<S>
where
    S: Service<Request, Response = Response> + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request) -> Self::Future {
        if req.method() == Method::OPTIONS {
            tracing::debug!(uri = %req.uri(), "Answering CORS preflight");
            let mut response = Response::new(Body::empty());
            *response.status_mut() = StatusCode::OK;
            apply_headers(&mut response);
            return Box::pin(async move { Ok(response) });
        }

        let fut = self.inner.call(req);
        Box::pin(async move {
            let mut response = fut.await?;
            apply_headers(&mut response);
            Ok(response)
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use axum::{routing::post, Router};
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new()
            .route("/ok", post(|| async { "sent" }))
            .route(
                "/fail",
                post(|| async { Err::<(), _>(AppError::internal("provider down")) }),
            )
            .layer(cors_layer())
    }

    fn assert_cors(response: &Response) {
        let headers = response.headers();
        assert_eq!(headers["access-control-allow-origin"], ALLOW_ORIGIN);
        assert_eq!(headers["access-control-allow-headers"], ALLOW_HEADERS);
        assert_eq!(headers["access-control-allow-methods"], ALLOW_METHODS);
    }

    #[tokio::test]
    async fn test_options_is_answered_without_origin() {
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/ok")
            .body(Body::empty())
            .unwrap();

        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_cors(&response);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(bytes.is_empty());
    }

    #[tokio::test]
    async fn test_success_and_error_carry_headers() {
        for (uri, status) in [
            ("/ok", StatusCode::OK),
            ("/fail", StatusCode::INTERNAL_SERVER_ERROR),
        ] {
            let request = Request::builder()
                .method(Method::POST)
                .uri(uri)
                .body(Body::empty())
                .unwrap();

            let response = app().oneshot(request).await.unwrap();
            assert_eq!(response.status(), status);
            assert_cors(&response);
        }
    }
}
