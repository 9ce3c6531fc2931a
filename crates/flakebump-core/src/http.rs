//! Single-shot HTTP GET via the curl crate (libcurl).
//!
//! Buffers the whole body in memory; both responses we fetch are tiny.

use std::time::Duration;

pub const USER_AGENT: &str = concat!("flakebump/", env!("CARGO_PKG_VERSION"));

/// Status and raw body of a completed GET.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub code: u32,
    pub body: Vec<u8>,
}

/// Performs a GET and returns the final status and body.
///
/// Follows redirects. `timeout` bounds both the connect phase and the whole
/// transfer. Any status is returned as-is; callers decide what counts as success.
pub fn get(
    url: &str,
    headers: &[(&str, String)],
    timeout: Duration,
) -> Result<HttpResponse, curl::Error> {
    let mut body = Vec::new();

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.useragent(USER_AGENT)?;
    easy.connect_timeout(timeout)?;
    easy.timeout(timeout)?;

    // Build curl list for extra headers (e.g. "Name: value").
    let mut list = curl::easy::List::new();
    for (k, v) in headers {
        list.append(&format!("{}: {}", k.trim(), v.trim()))?;
    }
    if !headers.is_empty() {
        easy.http_headers(list)?;
    }

    {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| {
            body.extend_from_slice(data);
            Ok(data.len())
        })?;
        transfer.perform()?;
    }

    let code = easy.response_code()?;
    tracing::debug!(url, code, bytes = body.len(), "GET finished");
    Ok(HttpResponse { code, body })
}

/// Short description of a curl failure for logs.
pub fn describe_curl_error(e: &curl::Error) -> &'static str {
    if e.is_operation_timedout() {
        return "timed out";
    }
    if e.is_couldnt_resolve_host() || e.is_couldnt_resolve_proxy() {
        return "could not resolve host";
    }
    if e.is_couldnt_connect() {
        return "could not connect";
    }
    if e.is_ssl_connect_error() || e.is_peer_failed_verification() {
        return "TLS failure";
    }
    if e.is_read_error() || e.is_recv_error() || e.is_send_error() || e.is_got_nothing() {
        return "connection dropped";
    }
    "transfer failed"
}
