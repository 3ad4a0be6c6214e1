/*
 *
 *  *
 *  *      Copyright (c) 2018-2025, SnackCloud All rights reserved.
 *  *
 *  *   Redistribution and use in source and binary forms, with or without
 *  *   modification, are permitted provided that the following conditions are met:
 *  *
 *  *   Redistributions of source code must retain the above copyright notice,
 *  *   this list of conditions and the following disclaimer.
 *  *   Redistributions in binary form must reproduce the above copyright
 *  *   notice, this list of conditions and the following disclaimer in the
 *  *   documentation and/or other materials provided with the distribution.
 *  *   Neither the name of the www.snackcloud.cn developer nor the names of its
 *  *   contributors may be used to endorse or promote products derived from
 *  *   this software without specific prior written permission.
 *  *   Author: SnackCloud
 *  *
 *
 */

//!
//! Blocking HTTP helpers returning status, reason and body.
//!
use std::fmt;
use std::path::Path;
use std::time::Duration;
use reqwest::blocking::{multipart, Client, Response};
use reqwest::header::CONTENT_TYPE;
use serde_json::Value as JsonValue;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);
/// Keys removed by `HttpResult::to_filtered_json`.
pub const FILTERED_KEYS: [&str; 4] = ["passwd", "creater", "updater", "updateTime"];
const FILE_FIELD: &str = "sendfile";
const FILE_URL_MARKER: &str = "httpurl=";

#[derive(Debug)]
pub enum HttpError {
    Request(String),
    Io(String),
    Json(String),
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            HttpError::Request(err) => write!(f, "Http request error: {}", err),
            HttpError::Io(err) => write!(f, "Http io error: {}", err),
            HttpError::Json(err) => write!(f, "Http body is not json: {}", err),
        }
    }
}

impl std::error::Error for HttpError {}

impl From<reqwest::Error> for HttpError {
    fn from(err: reqwest::Error) -> Self {
        HttpError::Request(err.to_string())
    }
}

impl From<std::io::Error> for HttpError {
    fn from(err: std::io::Error) -> Self {
        HttpError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for HttpError {
    fn from(err: serde_json::Error) -> Self {
        HttpError::Json(err.to_string())
    }
}

/// Outcome of a call. `data` is only read for status 200.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpResult {
    pub status: u16,
    pub reason_phrase: String,
    pub data: Option<String>,
}

impl HttpResult {
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }

    /// `data` as JSON without the audit and password keys, at any depth.
    pub fn to_filtered_json(&self) -> Result<Option<String>, HttpError> {
        let data = match self.data.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
            Some(data) => data,
            None => return Ok(None),
        };
        let mut json: JsonValue = serde_json::from_str(data)?;
        strip_keys(&mut json);
        Ok(Some(json.to_string()))
    }
}

impl fmt::Display for HttpResult {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "HttpResult [status={}, reasonPhrase={}, data={}]",
            self.status,
            self.reason_phrase,
            self.data.as_deref().unwrap_or("null")
        )
    }
}

fn strip_keys(json: &mut JsonValue) {
    match json {
        JsonValue::Object(map) => {
            for key in FILTERED_KEYS {
                map.remove(key);
            }
            map.values_mut().for_each(strip_keys);
        }
        JsonValue::Array(items) => items.iter_mut().for_each(strip_keys),
        _ => {}
    }
}

/// Prefixes `http://` when the url has no http or https scheme.
pub fn with_scheme(url: &str) -> String {
    let lower = url.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        url.to_string()
    } else {
        format!("http://{}", url)
    }
}

/// `path?k=v&k2=v2` with form encoding, scheme added when missing.
pub fn build_url(path: &str, params: &[(&str, &str)]) -> String {
    let mut url = with_scheme(path);
    if !params.is_empty() {
        let query = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(params.iter())
            .finish();
        url.push(if url.contains('?') { '&' } else { '?' });
        url.push_str(&query);
    }
    url
}

#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new() -> Result<Self, HttpError> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, HttpError> {
        let client = Client::builder().timeout(timeout).connect_timeout(timeout).build()?;
        Ok(HttpClient { client })
    }

    /// Wraps a configured client, e.g. one with custom proxy settings.
    pub fn with_client(client: Client) -> Self {
        HttpClient { client }
    }

    fn result(response: Response) -> Result<HttpResult, HttpError> {
        let status = response.status();
        let mut result = HttpResult {
            status: status.as_u16(),
            reason_phrase: status.canonical_reason().unwrap_or_default().to_string(),
            data: None,
        };
        if result.is_ok() {
            result.data = Some(response.text()?);
        }
        tracing::debug!("<== {} {}", result.status, result.reason_phrase);
        Ok(result)
    }

    /// Posts a JSON document. A blank body sends no content.
    pub fn post_json(&self, url: &str, body: &str) -> Result<HttpResult, HttpError> {
        let mut request = self.client.post(url).header(CONTENT_TYPE, "application/json");
        if !body.trim().is_empty() {
            request = request.body(body.to_string());
        }
        let response = request.send().map_err(|e| {
            tracing::error!("http call failed: url--> {}, body--> {}: {}", url, body, e);
            e
        })?;
        Self::result(response)
    }

    pub fn post_bytes(&self, url: &str, bytes: &[u8]) -> Result<HttpResult, HttpError> {
        let mut request = self.client.post(url);
        if !bytes.is_empty() {
            request = request.body(bytes.to_vec());
        }
        Self::result(request.send()?)
    }

    /// Uploads `path` as the `sendfile` part. A body carrying `httpurl=`
    /// keeps only the text after it.
    pub fn post_file<P: AsRef<Path>>(&self, url: &str, path: P) -> Result<HttpResult, HttpError> {
        let form = multipart::Form::new().file(FILE_FIELD, path)?;
        let mut result = Self::result(self.client.post(url).multipart(form).send()?)?;
        result.data = result.data.map(|data| match data.find(FILE_URL_MARKER) {
            Some(idx) => data[idx + FILE_URL_MARKER.len()..].to_string(),
            None => data,
        });
        Ok(result)
    }

    pub fn get(&self, path: &str, params: &[(&str, &str)]) -> Result<HttpResult, HttpError> {
        let url = build_url(path, params);
        Self::result(self.client.get(&url).send()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::{TcpListener, TcpStream};
    use std::thread;

    #[test]
    fn test_build_url() {
        assert_eq!(with_scheme("localhost:8080/a"), "http://localhost:8080/a");
        assert_eq!(with_scheme("HTTPS://x.cn"), "HTTPS://x.cn");
        assert_eq!(build_url("x.cn/api", &[]), "http://x.cn/api");
        assert_eq!(
            build_url("http://x.cn/api", &[("method", "getAll"), ("q", "a b")]),
            "http://x.cn/api?method=getAll&q=a+b"
        );
        assert_eq!(build_url("x.cn/api?v=1", &[("k", "2")]), "http://x.cn/api?v=1&k=2");
    }

    #[test]
    fn test_filtered_json() {
        let result = HttpResult {
            status: 200,
            reason_phrase: "OK".to_string(),
            data: Some(r#"{"id":"1","passwd":"p","list":[{"creater":"c","name":"n"}],"createTime":"t"}"#.to_string()),
        };
        let filtered: JsonValue = serde_json::from_str(&result.to_filtered_json().unwrap().unwrap()).unwrap();
        assert_eq!(filtered, serde_json::json!({"id": "1", "list": [{"name": "n"}], "createTime": "t"}));
        assert_eq!(HttpResult::default().to_filtered_json().unwrap(), None);
        let broken = HttpResult { data: Some("<html>".to_string()), ..Default::default() };
        assert!(matches!(broken.to_filtered_json(), Err(HttpError::Json(_))));
        assert_eq!(HttpResult::default().to_string(), "HttpResult [status=0, reasonPhrase=, data=null]");
    }

    #[test]
    fn test_client_builds() {
        assert!(HttpClient::new().is_ok());
    }

    fn client() -> HttpClient {
        HttpClient::with_client(Client::builder().no_proxy().timeout(Duration::from_secs(5)).build().unwrap())
    }

    /// Answers one request with `status` and `body`, handing back the raw request.
    fn serve_once(status: &'static str, body: &'static str) -> (String, thread::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            stream.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
            let request = read_request(&mut stream);
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).unwrap();
            stream.flush().unwrap();
            String::from_utf8_lossy(&request).into_owned()
        });
        (base, handle)
    }

    fn read_request(stream: &mut TcpStream) -> Vec<u8> {
        let mut request = Vec::new();
        let mut buf = [0u8; 4096];
        while !request_complete(&request) {
            let n = stream.read(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }
        request
    }

    fn request_complete(request: &[u8]) -> bool {
        let Some(end) = request.windows(4).position(|w| w == b"\r\n\r\n") else {
            return false;
        };
        let head = String::from_utf8_lossy(&request[..end]).to_ascii_lowercase();
        let body = &request[end + 4..];
        let length = head
            .lines()
            .find_map(|line| line.strip_prefix("content-length:"))
            .and_then(|v| v.trim().parse::<usize>().ok());
        match length {
            Some(length) => body.len() >= length,
            None if head.contains("transfer-encoding: chunked") => body.ends_with(b"0\r\n\r\n"),
            None => true,
        }
    }

    #[test]
    fn test_get_round_trip() {
        let (base, server) = serve_once("200 OK", r#"{"id":"1","passwd":"p"}"#);
        let result = client().get(&format!("{}/users", base), &[("q", "a b")]).unwrap();
        let request = server.join().unwrap();
        assert!(request.starts_with("GET /users?q=a+b HTTP/1.1"));
        assert_eq!(result.status, 200);
        assert_eq!(result.reason_phrase, "OK");
        assert_eq!(result.data.as_deref(), Some(r#"{"id":"1","passwd":"p"}"#));
        assert_eq!(result.to_filtered_json().unwrap().as_deref(), Some(r#"{"id":"1"}"#));
    }

    #[test]
    fn test_post_json_round_trip() {
        let (base, server) = serve_once("200 OK", "done");
        let result = client().post_json(&format!("{}/save", base), r#"{"name":"n"}"#).unwrap();
        let request = server.join().unwrap();
        assert!(request.starts_with("POST /save HTTP/1.1"));
        assert!(request.to_ascii_lowercase().contains("content-type: application/json"));
        assert!(request.ends_with(r#"{"name":"n"}"#));
        assert_eq!(result.data.as_deref(), Some("done"));
    }

    #[test]
    fn test_post_bytes_round_trip() {
        let (base, server) = serve_once("200 OK", "stored");
        let result = client().post_bytes(&format!("{}/raw", base), b"raw-bytes").unwrap();
        let request = server.join().unwrap();
        assert!(request.ends_with("raw-bytes"));
        assert!(result.is_ok());
        assert_eq!(result.data.as_deref(), Some("stored"));
    }

    #[test]
    fn test_post_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("avatar.txt");
        std::fs::write(&path, "file content").unwrap();
        let (base, server) = serve_once("200 OK", "saved httpurl=http://files.cn/avatar.txt");
        let result = client().post_file(&format!("{}/upload", base), &path).unwrap();
        let request = server.join().unwrap();
        assert!(request.contains(r#"name="sendfile""#));
        assert!(request.contains("file content"));
        assert_eq!(result.data.as_deref(), Some("http://files.cn/avatar.txt"));
    }

    #[test]
    fn test_body_only_read_on_200() {
        let (base, server) = serve_once("404 Not Found", "missing");
        let result = client().get(&format!("{}/gone", base), &[]).unwrap();
        server.join().unwrap();
        assert_eq!(result.status, 404);
        assert_eq!(result.reason_phrase, "Not Found");
        assert_eq!(result.data, None);
        assert!(!result.is_ok());

        let (base, server) = serve_once("201 Created", "made");
        let result = client().post_json(&format!("{}/new", base), "").unwrap();
        server.join().unwrap();
        assert_eq!(result.status, 201);
        assert_eq!(result.data, None);
    }
}
