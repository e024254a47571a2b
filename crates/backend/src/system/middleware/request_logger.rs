use axum::body::Body;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;

/// Logs method, path, status and duration of every HTTP request.
pub async fn request_logger(req: Request<Body>, next: Next) -> Response {
    let start = std::time::Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;

    let status = response.status().as_u16();
    let elapsed = start.elapsed().as_millis();
    if status < 400 {
        tracing::info!("{:>5}ms | {} {:>6} {}", elapsed, status, method, path);
    } else {
        tracing::warn!("{:>5}ms | {} {:>6} {}", elapsed, status, method, path);
    }
    response
}
