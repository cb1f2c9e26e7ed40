//! HTTP client for the published menu document.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client};
use tracing::{debug, info};

use crate::models::{MenuDocument, MenuItem};

use super::{FetchError, MenuSource};

/// Where the menu document lives unless configured otherwise.
pub const DEFAULT_MENU_URL: &str =
    "https://raw.githubusercontent.com/Meta-Mobile-Developer-PC/Working-With-Data-API/main/capstone.json";

/// HTTP request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Menu client. Clone is cheap - reqwest::Client uses Arc internally.
#[derive(Clone)]
pub struct MenuClient {
    client: Client,
    menu_url: String,
}

impl MenuClient {
    pub fn new(menu_url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            menu_url: menu_url.into(),
        })
    }

    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, FetchError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(FetchError::from_status(status, &body))
    }
}

#[async_trait]
impl MenuSource for MenuClient {
    async fn fetch_menu(&self) -> Result<Vec<MenuItem>, FetchError> {
        info!(url = %self.menu_url, "Fetching remote menu");

        let response = self
            .client
            .get(&self.menu_url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        let response = Self::check_response(response).await?;
        let body = response.text().await?;
        parse_menu_body(&body)
    }
}

/// Turn a menu response body into validated items.
///
/// GitHub raw serves the document as text/plain, so the body is parsed
/// regardless of content type. A document with no usable dish is rejected.
pub(crate) fn parse_menu_body(body: &str) -> Result<Vec<MenuItem>, FetchError> {
    let doc = MenuDocument::from_json(body)
        .map_err(|e| FetchError::InvalidResponse(format!("Malformed menu document: {}", e)))?;

    debug!(
        items = doc.menu.len(),
        rejected = doc.rejected,
        "Remote menu parsed"
    );

    if doc.menu.is_empty() {
        return Err(FetchError::InvalidResponse(format!(
            "Menu document has no valid dishes ({} rejected)",
            doc.rejected
        )));
    }
    Ok(doc.menu)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    const MENU_BODY: &str = r#"{"menu": [
        {"name": "Greek Salad", "category": "starters", "description": "Crispy lettuce", "price": 12.99, "image": "greekSalad.jpg"},
        {"name": "Pasta", "category": "mains", "description": "Penne", "price": 18.99, "image": "pasta.jpg"}
    ]}"#;

    /// Serve exactly one HTTP response on a local port and return its URL.
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        });

        format!("http://{}/capstone.json", addr)
    }

    fn client_for(url: String) -> MenuClient {
        MenuClient::new(url, Duration::from_secs(DEFAULT_TIMEOUT_SECS)).unwrap()
    }

    #[test]
    fn test_parse_menu_body() {
        let items = parse_menu_body(MENU_BODY).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].name, "Pasta");
    }

    #[test]
    fn test_malformed_body_is_invalid_response() {
        assert!(matches!(
            parse_menu_body("<html>rate limited</html>"),
            Err(FetchError::InvalidResponse(_))
        ));
        assert!(matches!(
            parse_menu_body(r#"{"dishes": []}"#),
            Err(FetchError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_document_without_valid_dishes_is_rejected() {
        assert!(matches!(
            parse_menu_body(r#"{"menu": []}"#),
            Err(FetchError::InvalidResponse(_))
        ));

        let err = parse_menu_body(r#"{"menu": [{"title": "Greek Salad", "cost": 12}]}"#)
            .unwrap_err();
        assert!(err.to_string().contains("1 rejected"));
    }

    #[tokio::test]
    async fn test_fetch_menu_over_http() {
        let url = serve_once("200 OK", MENU_BODY).await;

        let items = client_for(url).fetch_menu().await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].category, "starters");
    }

    #[tokio::test]
    async fn test_fetch_menu_maps_error_status() {
        let url = serve_once("503 Service Unavailable", "maintenance").await;

        let err = client_for(url).fetch_menu().await.unwrap_err();
        assert!(matches!(err, FetchError::ServerError(ref body) if body == "maintenance"));
    }

    #[tokio::test]
    async fn test_fetch_menu_rejects_malformed_body() {
        let url = serve_once("200 OK", "not json at all").await;

        let err = client_for(url).fetch_menu().await.unwrap_err();
        assert!(matches!(err, FetchError::InvalidResponse(_)));
    }
}
