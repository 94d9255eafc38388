//! HTTP response helpers.

use std::io;

use anyhow::{Result, anyhow};
use tiny_http::{Header, Method, Request, Response, StatusCode};

pub const PLAIN: &str = "text/plain; charset=utf-8";

pub fn is_head_request(request: &Request) -> bool {
    request.method() == &Method::Head
}

/// Respond with headers only, announcing a body of `length` bytes.
pub fn send_head(request: Request, status: u16, content_type: &str, length: usize) -> Result<()> {
    let response = Response::new(
        StatusCode(status),
        vec![header("Content-Type", content_type)?],
        io::empty(),
        Some(length),
        None,
    );
    request.respond(response)?;
    Ok(())
}

pub fn send_body(request: Request, status: u16, content_type: &str, body: Vec<u8>) -> Result<()> {
    let response = Response::from_data(body)
        .with_status_code(StatusCode(status))
        .with_header(header("Content-Type", content_type)?);
    request.respond(response)?;
    Ok(())
}

/// Respond with a short plain-text status page.
pub fn send_status(request: Request, status: u16, text: &str) -> Result<()> {
    let body = format!("{status} {text}").into_bytes();
    if is_head_request(&request) {
        return send_head(request, status, PLAIN, body.len());
    }
    send_body(request, status, PLAIN, body)
}

pub fn respond_unavailable(request: Request) -> Result<()> {
    send_status(request, 503, "Service Unavailable")
}

pub fn respond_method_not_allowed(request: Request) -> Result<()> {
    let response = Response::from_data(b"405 Method Not Allowed".to_vec())
        .with_status_code(StatusCode(405))
        .with_header(header("Content-Type", PLAIN)?)
        .with_header(header("Allow", "GET, HEAD")?);
    request.respond(response)?;
    Ok(())
}

pub fn respond_bad_request(request: Request) -> Result<()> {
    send_status(request, 400, "Bad Request")
}

pub fn respond_bad_gateway(request: Request) -> Result<()> {
    send_status(request, 502, "Bad Gateway")
}

fn header(key: &str, value: &str) -> Result<Header> {
    Header::from_bytes(key, value).map_err(|()| anyhow!("invalid header {key}: {value}"))
}
