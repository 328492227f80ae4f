//! Turns a method, a path and optional query parameters into an `HttpRequest`.
//!
//! Every request bound for the API carries the bearer token and asks for JSON.
//! Nothing here touches the network or fails; a malformed path simply yields a
//! malformed URL.

use serde::Serialize;

use crate::config::ClientConfig;
use crate::error::{SquareError, SquareResult};
use crate::http::{escape_disposition_value, FormPart, HttpMethod, HttpRequest, MultipartForm, RequestBody};
use crate::types::QueryParams;

/// Builds requests for one client configuration.
#[derive(Debug, Clone, Copy)]
pub struct RequestBuilder<'a> {
    config: &'a ClientConfig,
}

impl<'a> RequestBuilder<'a> {
    pub fn new(config: &'a ClientConfig) -> Self {
        Self { config }
    }

    /// Build an API request. `method` falls back to GET.
    ///
    /// One leading `/` is dropped from `path` before it is joined to the host.
    pub fn build(&self, method: Option<HttpMethod>, path: &str, query: Option<&QueryParams>) -> HttpRequest {
        let path = path.strip_prefix('/').unwrap_or(path);
        HttpRequest {
            method: method.unwrap_or_default(),
            url: format!("{}/{path}", self.config.api_host()),
            query_string: query.and_then(QueryParams::to_query_string),
            headers: self.api_headers("application/json"),
            body: None,
        }
    }

    pub fn get(&self, path: &str) -> HttpRequest {
        self.build(None, path, None)
    }

    /// Build an API request whose body is `body` encoded as JSON.
    pub fn build_json<B: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        path: &str,
        body: &B,
    ) -> SquareResult<HttpRequest> {
        let value = serde_json::to_value(body).map_err(SquareError::Serialization)?;
        Ok(self.build(Some(method), path, None).with_json(value))
    }

    /// GET an absolute receipt URL as HTML.
    pub fn receipt(&self, receipt_url: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: receipt_url.to_string(),
            query_string: None,
            headers: self.api_headers("text/html"),
            body: None,
        }
    }

    /// GET an arbitrary image URL. No credentials are sent to third-party hosts.
    pub fn image_fetch(&self, image_url: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: image_url.to_string(),
            query_string: None,
            headers: Vec::new(),
            body: None,
        }
    }

    /// POST image bytes as the `image_data` field of a multipart form.
    ///
    /// `image_url` doubles as the uploaded file name; `extension` picks the
    /// part's `image/<extension>` content type.
    pub fn image_upload(&self, path: &str, image_url: &str, extension: &str, image: Vec<u8>) -> HttpRequest {
        let form = MultipartForm::new().part(FormPart {
            name: "image_data".to_string(),
            filename: Some(image_url.to_string()),
            content_type: Some(format!("image/{extension}")),
            data: image,
        });

        let mut request = self.build(Some(HttpMethod::Post), path, None);
        request.set_header("Content-Type", form.content_type());
        request.set_header(
            "Content-Disposition",
            format!("form-data; name=image_data; filename={}", escape_disposition_value(image_url)),
        );
        request.body = Some(RequestBody::Multipart(form));
        request
    }

    fn api_headers(&self, accept: &str) -> Vec<(String, String)> {
        vec![
            (
                "Authorization".to_string(),
                format!("Bearer {}", self.config.access_token()),
            ),
            ("Accept".to_string(), accept.to_string()),
        ]
    }
}
