use axum::{
    extract::Request,
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::info;

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|h| h.to_str().ok())
}

/// One access-log line per request on the `access_log` target
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let uri = request.uri().clone();
    let headers = request.headers();
    let user_agent = header_str(headers, header::USER_AGENT.as_str())
        .unwrap_or("-")
        .to_string();
    let remote_addr = header_str(headers, "x-forwarded-for")
        .or_else(|| header_str(headers, "x-real-ip"))
        .unwrap_or("-")
        .to_string();

    let response = next.run(request).await;

    let length = header_str(response.headers(), header::CONTENT_LENGTH.as_str())
        .unwrap_or("-")
        .to_string();
    info!(
        target: "access_log",
        remote_addr = %remote_addr,
        status = response.status().as_u16(),
        length = %length,
        latency_ms = start.elapsed().as_millis() as u64,
        user_agent = %user_agent,
        "\"{} {} HTTP/1.1\"",
        method,
        uri
    );

    response
}
