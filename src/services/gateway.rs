//! Gateway client for the remote university API.
//!
//! Attaches the session's bearer token to every call. When the upstream
//! answers 401, the gateway asks the session manager for a refresh once and
//! replays the request once with the new token. A failed refresh surfaces the
//! original 401; a 401 on the replay is returned as is.

use std::sync::Arc;

use reqwest::{Method, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::{endpoints, session::SessionManager};
use crate::error::{AppError, AppResult, FieldErrors};

/// A file attached to a multipart request
#[derive(Debug, Clone)]
pub struct FilePart {
    pub field: String,
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Multipart body kept in a replayable form
#[derive(Debug, Clone, Default)]
pub struct MultipartBody {
    pub text: Vec<(String, String)>,
    pub files: Vec<FilePart>,
}

impl MultipartBody {
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.text.push((name.into(), value.into()));
        self
    }

    pub fn file(mut self, part: FilePart) -> Self {
        self.files.push(part);
        self
    }

    fn to_form(&self) -> AppResult<reqwest::multipart::Form> {
        let mut form = reqwest::multipart::Form::new();
        for (name, value) in &self.text {
            form = form.text(name.clone(), value.clone());
        }
        for file in &self.files {
            let mut part = reqwest::multipart::Part::bytes(file.bytes.clone())
                .file_name(file.file_name.clone());
            if let Some(content_type) = &file.content_type {
                part = part.mime_str(content_type)?;
            }
            form = form.part(file.field.clone(), part);
        }
        Ok(form)
    }
}

#[derive(Debug, Clone)]
pub enum RequestBody {
    Empty,
    Json(Value),
    Multipart(MultipartBody),
}

/// Description of an upstream call that can be rebuilt for a retry
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn query(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((name.into(), value.to_string()));
        self
    }

    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> AppResult<Self> {
        let value = serde_json::to_value(body)
            .map_err(|e| AppError::Internal(format!("Failed to encode request body: {}", e)))?;
        self.body = RequestBody::Json(value);
        Ok(self)
    }

    pub fn multipart(mut self, body: MultipartBody) -> Self {
        self.body = RequestBody::Multipart(body);
        self
    }
}

#[derive(Clone)]
pub struct GatewayClient {
    http: reqwest::Client,
    base_url: String,
    session: Arc<SessionManager>,
}

impl GatewayClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>, session: Arc<SessionManager>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            session,
        }
    }

    /// Send a request, returning the successful response
    pub async fn send(&self, request: &ApiRequest) -> AppResult<reqwest::Response> {
        let token = self.session.access_token().await;
        let response = self.dispatch(request, token.as_deref()).await?;

        if response.status() != StatusCode::UNAUTHORIZED {
            return ensure_success(response).await;
        }

        tracing::info!(path = %request.path, "Upstream rejected credentials, refreshing session");
        let original = error_from_response(response).await;

        match self.session.refresh_after_unauthorized(token.as_deref()).await {
            Ok(fresh) => {
                let retried = self.dispatch(request, Some(&fresh)).await?;
                ensure_success(retried).await
            }
            Err(e) => {
                tracing::warn!(path = %request.path, "Session refresh failed: {}", e);
                Err(original)
            }
        }
    }

    /// Send and decode a JSON response body
    pub async fn fetch<T: DeserializeOwned>(&self, request: &ApiRequest) -> AppResult<T> {
        let response = self.send(request).await?;
        let status = response.status();
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::warn!(path = %request.path, %status, "Malformed upstream response: {}", e);
            AppError::Upstream {
                status: StatusCode::BAD_GATEWAY.as_u16(),
                message: "Malformed response from inventory service".to_string(),
            }
        })
    }

    /// Send, ignoring whatever body comes back
    pub async fn execute(&self, request: &ApiRequest) -> AppResult<()> {
        self.send(request).await?;
        Ok(())
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> AppResult<T> {
        self.fetch(&ApiRequest::get(path)).await
    }

    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> AppResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.fetch(&ApiRequest::post(path).json(body)?).await
    }

    pub async fn put_json<B, T>(&self, path: &str, body: &B) -> AppResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.fetch(&ApiRequest::put(path).json(body)?).await
    }

    pub async fn delete(&self, path: &str) -> AppResult<()> {
        self.execute(&ApiRequest::delete(path)).await
    }

    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        body: MultipartBody,
    ) -> AppResult<T> {
        self.fetch(&ApiRequest::post(path).multipart(body)).await
    }

    async fn dispatch(&self, request: &ApiRequest, token: Option<&str>) -> AppResult<reqwest::Response> {
        let request_id = Uuid::new_v4();
        let url = endpoints::join(&self.base_url, &request.path);

        let mut builder = self
            .http
            .request(request.method.clone(), &url)
            .header("X-Request-Id", request_id.to_string());
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }
        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Multipart(body) => builder.multipart(body.to_form()?),
        };

        tracing::debug!(%request_id, method = %request.method, path = %request.path, "Upstream request");
        let response = builder.send().await?;
        tracing::debug!(%request_id, status = %response.status(), "Upstream response");
        Ok(response)
    }
}

async fn ensure_success(response: reqwest::Response) -> AppResult<reqwest::Response> {
    if response.status().is_success() {
        Ok(response)
    } else {
        Err(error_from_response(response).await)
    }
}

/// Turn a non-success upstream response into an `AppError`
pub(crate) async fn error_from_response(response: reqwest::Response) -> AppError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    error_from_parts(status, &body)
}

pub(crate) fn error_from_parts(status: u16, body: &str) -> AppError {
    let json: Option<Value> = serde_json::from_str(body).ok();
    let detail = json
        .as_ref()
        .and_then(|v| v.get("detail"))
        .and_then(Value::as_str)
        .map(str::to_string);

    match status {
        401 => AppError::Authentication(
            detail.unwrap_or_else(|| "Authentication credentials were rejected".to_string()),
        ),
        404 => AppError::NotFound(detail.unwrap_or_else(|| "Resource not found".to_string())),
        400 | 422 => match json.as_ref().and_then(field_errors) {
            Some(fields) => AppError::FieldErrors(fields),
            None => AppError::Upstream {
                status,
                message: detail.unwrap_or_else(|| "Request was rejected".to_string()),
            },
        },
        _ => AppError::Upstream {
            status,
            message: detail.unwrap_or_else(|| format!("Inventory service returned HTTP {}", status)),
        },
    }
}

/// Field-keyed error payloads: `{"name": ["This field is required."]}`
fn field_errors(value: &Value) -> Option<FieldErrors> {
    let object = value.as_object()?;
    let mut fields = FieldErrors::new();

    for (field, messages) in object {
        let messages: Vec<String> = match messages {
            Value::Array(items) => items
                .iter()
                .filter_map(|m| m.as_str().map(str::to_string))
                .collect(),
            Value::String(message) if field != "detail" => vec![message.clone()],
            _ => continue,
        };
        if !messages.is_empty() {
            fields.insert(field.clone(), messages);
        }
    }

    (!fields.is_empty()).then_some(fields)
}
