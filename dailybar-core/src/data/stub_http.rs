//! Canned HTTP replies on a loopback port, for driving providers in tests.

use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Serves exactly one request with a fixed reply, then closes.
pub(crate) struct StubServer {
    pub base_url: String,
    request: JoinHandle<String>,
}

impl StubServer {
    /// `status` is the status line tail, e.g. `"500 Internal Server Error"`.
    pub(crate) fn reply(status: &str, body: &str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );

        let request = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream);
            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();
            // Drain headers up to the blank line
            let mut line = String::new();
            while reader.read_line(&mut line).unwrap() > 2 {
                line.clear();
            }
            // The client may hang up early on error statuses
            let _ = reader.get_mut().write_all(response.as_bytes());
            request_line.trim_end().to_string()
        });

        Self { base_url, request }
    }

    /// The request line received, e.g. `GET /query?function=... HTTP/1.1`.
    pub(crate) fn request_line(self) -> String {
        self.request.join().unwrap()
    }
}

/// A loopback address with nothing listening on it.
pub(crate) fn refused_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

/// Client that talks to loopback directly, whatever proxy the environment sets.
pub(crate) fn client() -> reqwest::blocking::Client {
    reqwest::blocking::Client::builder()
        .no_proxy()
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap()
}
