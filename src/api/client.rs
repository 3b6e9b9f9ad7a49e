//! Blocking client for the Toxiproxy admin API.
//!
//! The [`ProxyAdmin`] trait is the seam between the controller and the
//! network: the controller only ever talks to a `ProxyAdmin`, and
//! [`ToxiproxyClient`] is the implementation that issues real HTTP calls.

use std::collections::BTreeMap;

use log::debug;
use reqwest::blocking::{Client, Response};
use reqwest::{StatusCode, Url};

use crate::api::types::{ListedToxic, Proxy, ProxyUpdate, Toxic};
use crate::config::ClientConfig;
use crate::error::{NetsimError, Result};

/// Operations the admin API offers for proxies and their toxics.
///
/// Every method maps to exactly one HTTP request. A response with any
/// status other than the documented success code is returned as
/// [`NetsimError::Status`].
pub trait ProxyAdmin {
    /// `GET /proxies`, expects 200. Proxies are returned sorted by name.
    fn proxies(&self) -> Result<Vec<Proxy>>;

    /// `POST /proxies/{proxy}/toxics`, expects 200.
    fn add_toxic(&self, proxy: &str, toxic: &Toxic) -> Result<()>;

    /// `GET /proxies/{proxy}/toxics`, expects 200.
    fn toxics(&self, proxy: &str) -> Result<Vec<ListedToxic>>;

    /// `DELETE /proxies/{proxy}/toxics/{toxic}`, expects 204.
    fn remove_toxic(&self, proxy: &str, toxic: &str) -> Result<()>;

    /// `POST /proxies/{proxy}` with `{"enabled": ..}`, expects 200.
    fn set_enabled(&self, proxy: &str, enabled: bool) -> Result<()>;
}

/// HTTP implementation of [`ProxyAdmin`].
#[derive(Debug, Clone)]
pub struct ToxiproxyClient {
    http: Client,
    base: Url,
}

impl ToxiproxyClient {
    /// Builds a client for the admin API described by `config`.
    ///
    /// # Errors
    ///
    /// * `NetsimError::InvalidUrl` - if `api_url` cannot be used as a base URL
    /// * `NetsimError::Http` - if the underlying HTTP client cannot be built
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let base = Url::parse(&config.api_url)
            .map_err(|e| NetsimError::invalid_url(&config.api_url, e))?;
        if base.cannot_be_a_base() {
            return Err(NetsimError::invalid_url(
                &config.api_url,
                "not a base URL",
            ));
        }

        let http = Client::builder().timeout(config.timeout).build()?;

        Ok(Self { http, base })
    }

    /// Joins path segments onto the base URL, percent-encoding each one.
    ///
    /// Proxy and toxic names therefore always address a single path
    /// segment, even when they contain `/` or spaces.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| NetsimError::invalid_url(self.base.as_str(), "not a base URL"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

/// Passes the response through when it carries `expected`, otherwise
/// turns it into a status error holding the response body.
fn expect_status(response: Response, expected: StatusCode) -> Result<Response> {
    let status = response.status();
    if status == expected {
        return Ok(response);
    }

    let body = response.text().unwrap_or_default();
    debug!("Unexpected status {} (wanted {}): {}", status, expected, body);
    Err(NetsimError::status(status.as_u16(), body))
}

impl ProxyAdmin for ToxiproxyClient {
    fn proxies(&self) -> Result<Vec<Proxy>> {
        let url = self.endpoint(&["proxies"])?;
        debug!("GET {}", url);

        let response = expect_status(self.http.get(url).send()?, StatusCode::OK)?;
        let by_name: BTreeMap<String, Proxy> = response.json()?;

        Ok(by_name
            .into_iter()
            .map(|(name, mut proxy)| {
                if proxy.name.is_empty() {
                    proxy.name = name;
                }
                proxy
            })
            .collect())
    }

    fn add_toxic(&self, proxy: &str, toxic: &Toxic) -> Result<()> {
        let url = self.endpoint(&["proxies", proxy, "toxics"])?;
        debug!("POST {} ({} toxic '{}')", url, toxic.kind, toxic.name);

        expect_status(self.http.post(url).json(toxic).send()?, StatusCode::OK)?;
        Ok(())
    }

    fn toxics(&self, proxy: &str) -> Result<Vec<ListedToxic>> {
        let url = self.endpoint(&["proxies", proxy, "toxics"])?;
        debug!("GET {}", url);

        let response = expect_status(self.http.get(url).send()?, StatusCode::OK)?;
        Ok(response.json()?)
    }

    fn remove_toxic(&self, proxy: &str, toxic: &str) -> Result<()> {
        let url = self.endpoint(&["proxies", proxy, "toxics", toxic])?;
        debug!("DELETE {}", url);

        expect_status(self.http.delete(url).send()?, StatusCode::NO_CONTENT)?;
        Ok(())
    }

    fn set_enabled(&self, proxy: &str, enabled: bool) -> Result<()> {
        let url = self.endpoint(&["proxies", proxy])?;
        debug!("POST {} (enabled: {})", url, enabled);

        let body = ProxyUpdate { enabled };
        expect_status(self.http.post(url).json(&body).send()?, StatusCode::OK)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::thread::{self, JoinHandle};
    use std::time::Duration;

    fn client(api_url: &str) -> ToxiproxyClient {
        ToxiproxyClient::new(&ClientConfig {
            api_url: api_url.to_string(),
            timeout: Some(Duration::from_secs(5)),
        })
        .unwrap()
    }

    /// A request as seen by the stub admin server.
    #[derive(Debug)]
    struct Received {
        method: String,
        path: String,
        body: String,
    }

    /// Serves exactly one request with the given status line and body.
    ///
    /// Returns the base URL to point a client at and a handle yielding
    /// the request that was received.
    fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<Received>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());

        let handle = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream);

            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();
            let mut parts = request_line.split_whitespace();
            let method = parts.next().unwrap_or_default().to_string();
            let path = parts.next().unwrap_or_default().to_string();

            let mut content_length = 0;
            loop {
                let mut header = String::new();
                reader.read_line(&mut header).unwrap();
                let header = header.trim_end();
                if header.is_empty() {
                    break;
                }
                if let Some((name, value)) = header.split_once(':') {
                    if name.eq_ignore_ascii_case("content-length") {
                        content_length = value.trim().parse().unwrap();
                    }
                }
            }

            let mut raw_body = vec![0; content_length];
            reader.read_exact(&mut raw_body).unwrap();

            let response = if status.starts_with("204") {
                format!("HTTP/1.1 {}\r\nConnection: close\r\n\r\n", status)
            } else {
                format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                )
            };
            let stream = reader.get_mut();
            stream.write_all(response.as_bytes()).unwrap();
            stream.flush().unwrap();

            Received {
                method,
                path,
                body: String::from_utf8(raw_body).unwrap(),
            }
        });

        (base, handle)
    }

    fn json(body: &str) -> serde_json::Value {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn test_endpoint_on_default_base() {
        let client = client("http://localhost:8474");
        assert_eq!(
            client.endpoint(&["proxies", "p1", "toxics"]).unwrap().as_str(),
            "http://localhost:8474/proxies/p1/toxics"
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let client = client("http://admin.internal/toxiproxy/");
        assert_eq!(
            client.endpoint(&["proxies"]).unwrap().as_str(),
            "http://admin.internal/toxiproxy/proxies"
        );
    }

    #[test]
    fn test_endpoint_encodes_names() {
        let client = client("http://localhost:8474");
        assert_eq!(
            client
                .endpoint(&["proxies", "a/b c", "toxics", "x"])
                .unwrap()
                .as_str(),
            "http://localhost:8474/proxies/a%2Fb%20c/toxics/x"
        );
    }

    #[test]
    fn test_rejects_unusable_urls() {
        for url in ["not a url", "mailto:ops@example.com"] {
            let result = ToxiproxyClient::new(&ClientConfig {
                api_url: url.to_string(),
                timeout: None,
            });
            assert!(matches!(result, Err(NetsimError::InvalidUrl { .. })));
        }
    }

    #[test]
    fn test_list_proxies_over_http() {
        let (base, server) = serve_once(
            "200 OK",
            r#"{"web":{"name":"web","listen":"[::]:8080","upstream":"web:80","enabled":false,"toxics":[]},
                "cache":{"listen":"[::]:6380","upstream":"redis:6379","enabled":true,"toxics":[]}}"#,
        );

        let proxies = client(&base).proxies().unwrap();
        let received = server.join().unwrap();

        assert_eq!(received.method, "GET");
        assert_eq!(received.path, "/proxies");
        assert_eq!(proxies.len(), 2);
        assert_eq!(proxies[0].name, "cache");
        assert_eq!(proxies[1].name, "web");
        assert!(!proxies[1].enabled);
    }

    #[test]
    fn test_add_toxic_over_http() {
        let (base, server) = serve_once("200 OK", r#"{"name":"latency"}"#);

        client(&base)
            .add_toxic("p1", &Toxic::latency(50, 5))
            .unwrap();
        let received = server.join().unwrap();

        assert_eq!(received.method, "POST");
        assert_eq!(received.path, "/proxies/p1/toxics");
        assert_eq!(
            json(&received.body),
            serde_json::to_value(Toxic::latency(50, 5)).unwrap()
        );
    }

    #[test]
    fn test_add_toxic_error_carries_body() {
        let (base, server) = serve_once("409 Conflict", "toxic already exists");

        let err = client(&base)
            .add_toxic("p1", &Toxic::bandwidth(100))
            .unwrap_err();
        server.join().unwrap();

        match err {
            NetsimError::Status { status, body } => {
                assert_eq!(status, 409);
                assert_eq!(body, "toxic already exists");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_list_toxics_over_http_is_lenient() {
        let (base, server) = serve_once(
            "200 OK",
            r#"[{"name":"odd","type":"latency","toxicity":1.5,"attributes":{"latency":"x"}},
                {"name":"bandwidth","type":"bandwidth","stream":"downstream","toxicity":1,"attributes":{"rate":100}}]"#,
        );

        let toxics = client(&base).toxics("p1").unwrap();
        let received = server.join().unwrap();

        assert_eq!(received.method, "GET");
        assert_eq!(received.path, "/proxies/p1/toxics");
        let names: Vec<&str> = toxics.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["odd", "bandwidth"]);
    }

    #[test]
    fn test_list_toxics_not_found() {
        let (base, server) = serve_once("404 Not Found", "proxy not found");

        let err = client(&base).toxics("ghost").unwrap_err();
        server.join().unwrap();

        assert!(matches!(err, NetsimError::Status { status: 404, .. }));
    }

    #[test]
    fn test_remove_toxic_expects_no_content() {
        let (base, server) = serve_once("204 No Content", "");

        client(&base).remove_toxic("p1", "latency").unwrap();
        let received = server.join().unwrap();

        assert_eq!(received.method, "DELETE");
        assert_eq!(received.path, "/proxies/p1/toxics/latency");
    }

    #[test]
    fn test_remove_toxic_rejects_ok() {
        let (base, server) = serve_once("200 OK", "{}");

        let err = client(&base).remove_toxic("p1", "latency").unwrap_err();
        server.join().unwrap();

        assert!(matches!(err, NetsimError::Status { status: 200, .. }));
    }

    #[test]
    fn test_set_enabled_over_http() {
        let (base, server) = serve_once(
            "200 OK",
            r#"{"name":"p1","listen":"[::]:1","upstream":"x:1","enabled":false}"#,
        );

        client(&base).set_enabled("p1", false).unwrap();
        let received = server.join().unwrap();

        assert_eq!(received.method, "POST");
        assert_eq!(received.path, "/proxies/p1");
        assert_eq!(json(&received.body), serde_json::json!({ "enabled": false }));
    }

    #[test]
    fn test_set_enabled_rejects_no_content() {
        let (base, server) = serve_once("204 No Content", "");

        let err = client(&base).set_enabled("p1", true).unwrap_err();
        server.join().unwrap();

        assert!(matches!(err, NetsimError::Status { status: 204, .. }));
    }
}
