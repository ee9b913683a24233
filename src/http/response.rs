//! Response relay back to the original caller.
//!
//! # Responsibilities
//! - Copy the upstream status code
//! - Append every upstream header value (multi-valued headers survive)
//! - Read the full upstream body before writing it back
//!
//! # Design Decisions
//! - No transformation and no hop-by-hop stripping
//! - An unreadable upstream body is relayed as zero-length content

use axum::body::{Body, Bytes, HttpBody};
use axum::http::{header, HeaderMap, Response};
use axum::BoxError;

pub async fn relay<B>(upstream: Response<B>) -> Response<Body>
where
    B: HttpBody<Data = Bytes> + Send + 'static,
    B::Error: Into<BoxError>,
{
    let (parts, body) = upstream.into_parts();

    let mut headers = HeaderMap::with_capacity(parts.headers.len());
    for (name, value) in parts.headers.iter() {
        headers.append(name.clone(), value.clone());
    }

    let bytes = match axum::body::to_bytes(Body::new(body), usize::MAX).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(status = %parts.status, error = %e, "Upstream body unreadable, relaying empty body");
            // the declared length no longer describes what is sent
            headers.remove(header::CONTENT_LENGTH);
            Bytes::new()
        }
    };

    let mut response = Response::new(Body::from(bytes));
    *response.status_mut() = parts.status;
    *response.headers_mut() = headers;
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use futures_util::stream;

    async fn body_string(response: Response<Body>) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_relay_copies_status_headers_and_body() {
        let upstream = Response::builder()
            .status(StatusCode::OK)
            .header("X-Test", "1")
            .body(Body::from("hello"))
            .unwrap();

        let relayed = relay(upstream).await;

        assert_eq!(relayed.status(), StatusCode::OK);
        assert_eq!(relayed.headers().get("x-test").unwrap(), "1");
        assert_eq!(body_string(relayed).await, "hello");
    }

    #[tokio::test]
    async fn test_relay_appends_multi_valued_headers() {
        let upstream = Response::builder()
            .status(StatusCode::FOUND)
            .header(header::SET_COOKIE, "session=abc")
            .header(header::SET_COOKIE, "theme=dark")
            .header(header::LOCATION, "/web/login")
            .body(Body::empty())
            .unwrap();

        let relayed = relay(upstream).await;

        assert_eq!(relayed.status(), StatusCode::FOUND);
        let cookies: Vec<_> = relayed.headers().get_all(header::SET_COOKIE).iter().collect();
        assert_eq!(cookies, vec!["session=abc", "theme=dark"]);
        assert_eq!(body_string(relayed).await, "");
    }

    #[tokio::test]
    async fn test_broken_body_relayed_as_empty() {
        let chunks: Vec<Result<Bytes, std::io::Error>> = vec![
            Ok(Bytes::from_static(b"par")),
            Err(std::io::Error::other("connection reset")),
        ];
        let upstream = Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_LENGTH, "10")
            .header(header::CONTENT_TYPE, "text/plain")
            .body(Body::from_stream(stream::iter(chunks)))
            .unwrap();

        let relayed = relay(upstream).await;

        assert_eq!(relayed.status(), StatusCode::OK);
        assert!(relayed.headers().get(header::CONTENT_LENGTH).is_none());
        assert_eq!(relayed.headers().get(header::CONTENT_TYPE).unwrap(), "text/plain");
        assert_eq!(body_string(relayed).await, "");
    }
}
