//! JSON over HTTP の汎用トランスポート（blocking reqwest）
//!
//! 成功時は本文を型にデコードし、失敗時は本文の `message` を優先してエラー文言を作る。
//! 404 は `Error::NotFound`、それ以外の失敗応答と通信失敗は `Error::Http`。

use crate::error::Error;
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// ベース URL を束ねた HTTP クライアント
pub struct HttpTransport {
    client: Client,
    base: Url,
    base_url: String,
}

impl HttpTransport {
    /// * `base_url` - 例: `http://localhost:3000`（末尾の `/` は無視）
    /// * `timeout` - 1 リクエストあたりのタイムアウト
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, Error> {
        let base_url = base_url.trim_end_matches('/').to_string();
        let base = Url::parse(&base_url)
            .ok()
            .filter(|u| !u.cannot_be_a_base())
            .ok_or_else(|| Error::env(format!("Invalid API URL '{}'", base_url)))?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base,
            base_url,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// ベース URL にパスセグメントを足す（各セグメントはパーセントエンコードされる）
    pub fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    pub fn get<T: DeserializeOwned>(&self, segments: &[&str], params: &[(&str, String)]) -> Result<T, Error> {
        self.send(self.client.get(self.url(segments)).query(params))
    }

    pub fn post<B, T>(&self, segments: &[&str], body: &B) -> Result<T, Error>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(self.client.post(self.url(segments)).json(body))
    }

    pub fn patch<B, T>(&self, segments: &[&str], body: &B) -> Result<T, Error>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(self.client.patch(self.url(segments)).json(body))
    }

    pub fn delete<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, Error> {
        self.send(self.client.delete(self.url(segments)))
    }

    fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, Error> {
        let response = builder
            .header("Accept", "application/json")
            .send()
            .map_err(|e| Error::http(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        let text = response
            .text()
            .map_err(|e| Error::http(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            let msg = error_message(status, &text);
            return Err(if status == StatusCode::NOT_FOUND {
                Error::not_found(msg)
            } else {
                Error::http(msg)
            });
        }

        // 本文なしの 200/204 は null として読む
        let text = if text.trim().is_empty() { "null" } else { text.as_str() };
        serde_json::from_str(text)
            .map_err(|e| Error::json(format!("Failed to parse response JSON: {}", e)))
    }
}

/// 失敗応答のエラー文言
///
/// 本文の `message` / `error.message` / `error`（文字列）を順に探し、無ければステータス行。
pub fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(v) = serde_json::from_str::<Value>(body) {
        let found = v["message"]
            .as_str()
            .or_else(|| v["error"]["message"].as_str())
            .or_else(|| v["error"].as_str());
        if let Some(msg) = found {
            if !msg.trim().is_empty() {
                return msg.to_string();
            }
        }
    }
    format!(
        "Server returned HTTP {}: {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or("Unknown")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_prefers_body_message() {
        let msg = error_message(StatusCode::INTERNAL_SERVER_ERROR, r#"{"message":"db locked"}"#);
        assert_eq!(msg, "db locked");
    }

    #[test]
    fn test_error_message_nested_error_object() {
        let msg = error_message(StatusCode::BAD_REQUEST, r#"{"error":{"message":"bad id"}}"#);
        assert_eq!(msg, "bad id");
    }

    #[test]
    fn test_error_message_falls_back_to_status_line() {
        assert_eq!(
            error_message(StatusCode::NOT_FOUND, "{}"),
            "Server returned HTTP 404: Not Found"
        );
        assert_eq!(
            error_message(StatusCode::BAD_GATEWAY, "<html>oops</html>"),
            "Server returned HTTP 502: Bad Gateway"
        );
    }

    #[test]
    fn test_url_joins_without_double_slash() {
        let t = HttpTransport::new("http://localhost:3000/", DEFAULT_TIMEOUT).unwrap();
        assert_eq!(t.base_url(), "http://localhost:3000");
        assert_eq!(t.url(&["recipes", "1"]).as_str(), "http://localhost:3000/recipes/1");
        assert_eq!(t.url(&["recipes"]).as_str(), "http://localhost:3000/recipes");
    }

    #[test]
    fn test_url_keeps_base_path() {
        let t = HttpTransport::new("http://localhost:3000/api/", DEFAULT_TIMEOUT).unwrap();
        assert_eq!(t.url(&["recipes"]).as_str(), "http://localhost:3000/api/recipes");
    }

    #[test]
    fn test_url_segments_are_percent_encoded() {
        let t = HttpTransport::new("http://localhost:3000", DEFAULT_TIMEOUT).unwrap();
        assert_eq!(t.url(&["recipes", "1?x"]).as_str(), "http://localhost:3000/recipes/1%3Fx");
        assert_eq!(t.url(&["recipes", "../y"]).as_str(), "http://localhost:3000/recipes/..%2Fy");
    }

    #[test]
    fn test_invalid_base_url_is_env_error() {
        let err = HttpTransport::new("localhost:3000", DEFAULT_TIMEOUT).err().unwrap();
        assert_eq!(err.exit_code(), 78);
        assert!(HttpTransport::new("not a url", DEFAULT_TIMEOUT).is_err());
    }
}
