//! Composing proxy.
//!
//! Sits in front of the origin serving the static site and runs the include
//! pass over every HTML page on its way to the browser.

mod lifecycle;
mod proxy;
mod response;

use crate::{config::Config, include::build_client, log};
use anyhow::{Context, Result};
use proxy::Proxy;
use std::sync::Arc;
use tiny_http::{Method, Request, Server};

/// Worker threads handling requests; each blocks on its own include pass.
const REQUEST_THREADS: usize = 4;

/// Run the `serve` command (blocking until Ctrl+C).
pub fn serve_site(config: &Config) -> Result<()> {
    let upstream = config.serve.upstream_url()?;
    let client = build_client(&config.fetch.user_agent)?;

    // Network I/O for every request's include pass
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;

    let proxy = Arc::new(Proxy::new(
        upstream,
        client,
        config.include.clone(),
        runtime.handle().clone(),
    ));

    let (server, addr) = lifecycle::bind_with_retry(config.serve.interface, config.serve.port)?;
    let server = Arc::new(server);
    lifecycle::register_server_for_shutdown(Arc::clone(&server));

    log!("serve"; "http://{} -> {}", addr, proxy.upstream());

    run_request_loop(&server, &proxy)
}

fn run_request_loop(server: &Server, proxy: &Arc<Proxy>) -> Result<()> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(REQUEST_THREADS)
        .build()
        .context("failed to create thread pool")?;

    for request in server.incoming_requests() {
        let proxy = Arc::clone(proxy);
        pool.spawn(move || {
            if let Err(e) = handle_request(request, &proxy) {
                log!("serve"; "request error: {e}");
            }
        });
    }
    Ok(())
}

/// Handle a single HTTP request
fn handle_request(request: Request, proxy: &Proxy) -> Result<()> {
    // Early exit if shutdown requested
    if crate::core::is_shutdown() {
        return response::respond_unavailable(request);
    }

    let head = match request.method() {
        Method::Get => false,
        Method::Head => true,
        _ => return response::respond_method_not_allowed(request),
    };

    let target = match proxy.target(request.url()) {
        Ok(target) => target,
        Err(e) => {
            log!("serve"; "{e}");
            return response::respond_bad_request(request);
        }
    };

    match proxy.forward(target) {
        Ok(reply) if head => {
            response::send_head(request, reply.status, &reply.content_type, reply.body.len())
        }
        Ok(reply) => response::send_body(request, reply.status, &reply.content_type, reply.body),
        Err(e) => {
            log!("serve"; "{} {}: {:#}", request.method(), request.url(), e);
            response::respond_bad_gateway(request)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IncludeConfig;
    use crate::utils::test_server::{Route, spawn_server};
    use std::thread;
    use url::Url;

    const ROUTES: &[Route] = &[
        (
            "/index.html",
            200,
            r#"<header data-include="parts/nav.html"></header><p>home</p>"#,
        ),
        ("/parts/nav.html", 200, "<nav>N</nav>"),
        ("/style.css", 200, "p { color: red }"),
    ];

    struct Harness {
        runtime: tokio::runtime::Runtime,
        origin: Url,
    }

    /// Start a proxy in front of `upstream`; returns its address.
    fn start_proxy(upstream: Url, runtime: &tokio::runtime::Runtime) -> Url {
        let client = build_client("tola-include-test").unwrap();
        let proxy = Arc::new(Proxy::new(
            upstream,
            client,
            IncludeConfig::default(),
            runtime.handle().clone(),
        ));
        let server = Server::http("127.0.0.1:0").unwrap();
        let port = server.server_addr().to_ip().unwrap().port();
        thread::spawn(move || run_request_loop(&server, &proxy));
        Url::parse(&format!("http://127.0.0.1:{port}/")).unwrap()
    }

    impl Harness {
        fn new(upstream: Url) -> Self {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .worker_threads(2)
                .enable_all()
                .build()
                .unwrap();
            let origin = start_proxy(upstream, &runtime);
            Self { runtime, origin }
        }

        fn request(&self, method: reqwest::Method, path: &str) -> (u16, String, String) {
            let url = self.origin.join(path).unwrap();
            self.runtime.block_on(async {
                let response = reqwest::Client::new()
                    .request(method, url)
                    .send()
                    .await
                    .unwrap();
                let status = response.status().as_u16();
                let content_type = response
                    .headers()
                    .get(reqwest::header::CONTENT_TYPE)
                    .map(|v| v.to_str().unwrap().to_string())
                    .unwrap_or_default();
                (status, content_type, response.text().await.unwrap())
            })
        }

        fn content_length(&self, method: reqwest::Method, path: &str) -> Option<String> {
            let url = self.origin.join(path).unwrap();
            self.runtime.block_on(async {
                let response = reqwest::Client::new()
                    .request(method, url)
                    .send()
                    .await
                    .unwrap();
                response
                    .headers()
                    .get(reqwest::header::CONTENT_LENGTH)
                    .map(|v| v.to_str().unwrap().to_string())
            })
        }

        /// Send a raw request line, bypassing client-side URL normalization.
        fn raw_status(&self, request_line: &str) -> u16 {
            use std::io::{Read, Write};

            let addr = format!("127.0.0.1:{}", self.origin.port().unwrap());
            let mut stream = std::net::TcpStream::connect(addr).unwrap();
            write!(stream, "{request_line}\r\nHost: x\r\nConnection: close\r\n\r\n").unwrap();
            let mut reply = String::new();
            stream.read_to_string(&mut reply).unwrap();
            reply.split(' ').nth(1).unwrap().parse().unwrap()
        }
    }

    #[test]
    fn test_html_is_composed() {
        let proxy = Harness::new(spawn_server(ROUTES));

        let (status, content_type, body) = proxy.request(reqwest::Method::GET, "index.html");

        assert_eq!(status, 200);
        assert!(content_type.starts_with("text/html"));
        assert_eq!(body, "<html><head></head><body><nav>N</nav><p>home</p></body></html>");
    }

    #[test]
    fn test_other_content_passes_through() {
        let proxy = Harness::new(spawn_server(ROUTES));

        let (status, content_type, body) = proxy.request(reqwest::Method::GET, "style.css");
        assert_eq!((status, content_type.as_str()), (200, "text/css"));
        assert_eq!(body, "p { color: red }");

        // Error pages are not composed either
        let (status, _, body) = proxy.request(reqwest::Method::GET, "missing.html");
        assert_eq!((status, body.as_str()), (404, "not found"));
    }

    #[test]
    fn test_head_and_method_filter() {
        let proxy = Harness::new(spawn_server(ROUTES));

        let (status, _, body) = proxy.request(reqwest::Method::HEAD, "index.html");
        assert_eq!(status, 200);
        assert!(body.is_empty());

        // HEAD announces the length of the composed page, not zero
        let composed = proxy.request(reqwest::Method::GET, "index.html").2;
        assert_eq!(
            proxy.content_length(reqwest::Method::HEAD, "index.html"),
            Some(composed.len().to_string())
        );

        let (status, ..) = proxy.request(reqwest::Method::POST, "index.html");
        assert_eq!(status, 405);
    }

    #[test]
    fn test_unreachable_upstream_is_bad_gateway() {
        // Bind then drop to get a port nothing listens on
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let upstream = Url::parse(&format!("http://127.0.0.1:{port}/")).unwrap();
        let proxy = Harness::new(upstream);

        let (status, ..) = proxy.request(reqwest::Method::GET, "index.html");
        assert_eq!(status, 502);
    }

    #[test]
    fn test_target_keeps_upstream_prefix() {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();
        let proxy = Proxy::new(
            Url::parse("http://origin.test/site/").unwrap(),
            build_client("t").unwrap(),
            IncludeConfig::default(),
            runtime.handle().clone(),
        );

        assert_eq!(
            proxy.target("/docs/a.html?x=1").unwrap().as_str(),
            "http://origin.test/site/docs/a.html?x=1"
        );
        assert_eq!(proxy.target("/").unwrap().as_str(), "http://origin.test/site/");
    }

    #[test]
    fn test_absolute_form_target_is_rejected() {
        let proxy = Harness::new(spawn_server(ROUTES));

        assert_eq!(proxy.raw_status("GET http://other.host/x HTTP/1.1"), 400);
        assert_eq!(proxy.raw_status("GET /style.css HTTP/1.1"), 200);
    }
}
