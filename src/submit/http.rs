use std::time::Duration;

use async_trait::async_trait;
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use url::Url;

use crate::domain::SelectOption;
use crate::i18n::Language;
use crate::search::OptionSource;

use super::error::StoreError;
use super::payload::{Payload, PayloadPart};
use super::store::EntityStore;

/// Characters escaped inside a single path segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// REST store for one entity collection under a base URL.
#[derive(Debug, Clone)]
pub struct RestClient {
    http: Client,
    base: Url,
    entity: String,
}

impl RestClient {
    const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    pub fn new(base: &str, entity: impl Into<String>) -> Result<Self, StoreError> {
        let base = Url::parse(base).map_err(|err| StoreError::Transport(err.to_string()))?;
        let http = Client::builder()
            .timeout(Self::REQUEST_TIMEOUT)
            .user_agent(concat!("dashform/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| StoreError::Transport(err.to_string()))?;
        Ok(Self {
            http,
            base,
            entity: entity.into(),
        })
    }

    pub fn entity(&self) -> &str {
        &self.entity
    }

    /// `{base}/{segments..}` with every segment percent-encoded.
    pub fn url_for(&self, segments: &[&str]) -> Result<Url, StoreError> {
        let mut raw = self.base.as_str().trim_end_matches('/').to_string();
        for segment in segments {
            raw.push('/');
            raw.extend(utf8_percent_encode(segment, SEGMENT));
        }
        Url::parse(&raw).map_err(|err| StoreError::Transport(err.to_string()))
    }

    /// Resolve an option endpoint: absolute URLs are used as is, anything
    /// else is a path below the base URL.
    fn endpoint_url(&self, endpoint: &str) -> Result<Url, StoreError> {
        if let Ok(url) = Url::parse(endpoint) {
            return Ok(url);
        }
        let segments = endpoint
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect::<Vec<_>>();
        self.url_for(&segments)
    }

    async fn with_payload(
        &self,
        request: RequestBuilder,
        payload: Payload,
    ) -> Result<RequestBuilder, StoreError> {
        match payload {
            Payload::Json(body) => Ok(request.json(&body)),
            Payload::Multipart(parts) => Ok(request.multipart(multipart_form(parts).await?)),
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Value, StoreError> {
        let response = request.send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        let text = response.text().await.map_err(map_reqwest_error)?;
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "request rejected");
            return Err(StoreError::from_response(status.as_u16(), &text));
        }
        if text.trim().is_empty() {
            // A bodiless 2xx still confirms the operation.
            return Ok(Value::Bool(true));
        }
        serde_json::from_str(&text).map_err(|err| StoreError::Decode(err.to_string()))
    }
}

#[async_trait]
impl EntityStore for RestClient {
    async fn create(
        &self,
        payload: Payload,
        language: Language,
        parent_id: Option<&str>,
    ) -> Result<Value, StoreError> {
        let mut url = self.url_for(&[self.entity.as_str()])?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("lang", language.code());
            if let Some(parent_id) = parent_id {
                query.append_pair("parentId", parent_id);
            }
        }
        tracing::debug!(%url, "POST");
        let request = self.with_payload(self.http.post(url), payload).await?;
        self.send(request).await
    }

    async fn update(
        &self,
        payload: Payload,
        entity_id: &str,
        language: Language,
    ) -> Result<Value, StoreError> {
        let mut url = self.url_for(&[self.entity.as_str(), entity_id])?;
        url.query_pairs_mut().append_pair("lang", language.code());
        tracing::debug!(%url, "PATCH");
        let request = self.with_payload(self.http.patch(url), payload).await?;
        self.send(request).await
    }

    async fn delete(&self, entity_id: &str, language: Language) -> Result<Value, StoreError> {
        let url = self.url_for(&[self.entity.as_str(), entity_id])?;
        tracing::debug!(%url, lang = language.code(), "DELETE");
        self.send(self.http.delete(url)).await
    }
}

#[async_trait]
impl OptionSource for RestClient {
    async fn search(&self, endpoint: &str, query: &str) -> Result<Vec<SelectOption>, StoreError> {
        let mut url = self.endpoint_url(endpoint)?;
        if !query.trim().is_empty() {
            url.query_pairs_mut().append_pair("search", query.trim());
        }
        tracing::debug!(%url, "option lookup");
        let body = self.send(self.http.get(url)).await?;
        let items: &[Value] = match &body {
            Value::Array(items) => items.as_slice(),
            Value::Object(map) => match map.get("data") {
                Some(Value::Array(items)) => items.as_slice(),
                _ => &[],
            },
            _ => &[],
        };
        Ok(items.iter().map(SelectOption::from_value).collect())
    }
}

async fn multipart_form(parts: Vec<PayloadPart>) -> Result<Form, StoreError> {
    let mut form = Form::new();
    for part in parts {
        form = match part {
            PayloadPart::Text { name, value } => form.text(name, value),
            PayloadPart::File { name, file } => {
                let bytes = tokio::fs::read(&file.path)
                    .await
                    .map_err(|source| StoreError::Io {
                        path: file.path.clone(),
                        source,
                    })?;
                form.part(name, Part::bytes(bytes).file_name(file.file_name))
            }
        };
    }
    Ok(form)
}

fn map_reqwest_error(err: reqwest::Error) -> StoreError {
    if err.is_decode() {
        StoreError::Decode(err.to_string())
    } else {
        StoreError::Transport(err.to_string())
    }
}
