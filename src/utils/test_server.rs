//! Throwaway HTTP origin for tests.

use std::thread;

use tiny_http::{Header, Response, Server};
use url::Url;

/// `(path, status, body)`. Unlisted paths answer `404`.
pub type Route = (&'static str, u16, &'static str);

/// Serve `routes` on an ephemeral localhost port; returns the origin URL.
///
/// Bodies are sent as `text/css` for `.css` paths and `text/html` otherwise.
/// The server thread lives until the test process exits.
pub fn spawn_server(routes: &'static [Route]) -> Url {
    let server = Server::http("127.0.0.1:0").unwrap();
    let port = server.server_addr().to_ip().unwrap().port();

    thread::spawn(move || {
        for request in server.incoming_requests() {
            let (status, body) = routes
                .iter()
                .find(|(path, ..)| *path == request.url())
                .map_or((404, "not found"), |(_, status, body)| (*status, *body));

            let mime = if request.url().ends_with(".css") {
                "text/css"
            } else {
                "text/html; charset=utf-8"
            };
            let content_type = Header::from_bytes("Content-Type", mime).unwrap();
            let response = Response::from_data(body.as_bytes())
                .with_status_code(status)
                .with_header(content_type);
            let _ = request.respond(response);
        }
    });

    Url::parse(&format!("http://127.0.0.1:{port}/")).unwrap()
}
