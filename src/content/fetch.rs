use anyhow::Context;
use serde_json::Value;
use std::str::FromStr;
use thiserror::Error;

use super::model::{ContentSource, Entity, Level, Status};

const BASE_ENV: &str = "EXAMTREE_API_URL";
const DEFAULT_BASE: &str = "http://localhost:3000";

#[derive(Error, Debug)]
pub enum RequestError {
    #[error("HTTP request failed for {url}: {source}")]
    Transport {
        url: String,
        source: Box<ureq::Error>,
    },

    #[error("server returned {status} for {url}")]
    Status { status: u16, url: String },

    #[error("failed to read response body from {url}: {source}")]
    Body {
        url: String,
        source: std::io::Error,
    },

    #[error("expected JSON from {url} but got `{content_type}`; check that EXAMTREE_API_URL points at the API root (configured base: {base})")]
    NotJson {
        url: String,
        content_type: String,
        base: String,
    },
}

/// Thin client over the ExamTree REST API. Child lists are requested with
/// `contextapi=1` so the backend returns admin-context (unfiltered) rows;
/// Active filtering happens client-side in `active_sorted`.
pub struct Api {
    base: String,
}

impl Api {
    pub fn new(base: &str) -> Self {
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    /// Reads the base URL from `EXAMTREE_API_URL`, defaulting to localhost.
    pub fn from_env() -> Self {
        let base = std::env::var(BASE_ENV).unwrap_or_else(|_| DEFAULT_BASE.to_string());
        Self::new(&base)
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Lists every exam, admin context.
    pub fn get_exams(&self) -> anyhow::Result<Vec<Entity>> {
        let url = format!("{}/api/exams?contextapi=1", self.base);
        let body = self.get_json(&url).context("failed to fetch exams")?;
        collect_rows(body, "exams")
    }

    fn get_json(&self, url: &str) -> Result<Value, RequestError> {
        let response = ureq::get(url).call().map_err(|e| match e {
            ureq::Error::Status(code, _) => RequestError::Status {
                status: code,
                url: url.to_string(),
            },
            other => RequestError::Transport {
                url: url.to_string(),
                source: Box::new(other),
            },
        })?;

        // An HTML body here almost always means a misrouted base URL.
        let content_type = response.content_type().to_string();
        if !content_type.contains("json") {
            return Err(RequestError::NotJson {
                url: url.to_string(),
                content_type,
                base: self.base.clone(),
            });
        }

        response.into_json().map_err(|e| RequestError::Body {
            url: url.to_string(),
            source: e,
        })
    }
}

impl ContentSource for Api {
    fn exam(&self, slug_or_id: &str) -> anyhow::Result<Option<Entity>> {
        let url = format!("{}/api/exams/{}", self.base, slug_or_id);
        let body = match self.get_json(&url) {
            Ok(body) => body,
            Err(RequestError::Status { status: 404, .. }) => return Ok(None),
            Err(e) => return Err(e).context(format!("failed to fetch exam '{}'", slug_or_id)),
        };

        let row = body.get("exam").unwrap_or(&body);

        // An exam payload without an id cannot anchor navigation.
        if get_attribute::<String>(row, "id").is_none() {
            return Ok(None);
        }

        let exam =
            parse_row(row, 0).context(format!("exam '{}' has a malformed payload", slug_or_id))?;
        Ok(Some(exam))
    }

    fn children(&self, level: Level, parent_id: &str) -> anyhow::Result<Vec<Entity>> {
        let url = format!(
            "{}/api/{}?{}={}&contextapi=1",
            self.base,
            level.collection(),
            level.parent_key(),
            parent_id
        );
        let body = self
            .get_json(&url)
            .context(format!("failed to fetch {}", level.collection()))?;
        collect_rows(body, level.collection())
            .context(format!("{} of parent '{}'", level.collection(), parent_id))
    }
}

/// The API answers either with a bare array or `{ "<collection>": [...] }`.
fn rows_from_body(body: Value, collection: &str) -> Option<Vec<Value>> {
    match body {
        Value::Array(rows) => Some(rows),
        Value::Object(mut map) => match map.remove(collection) {
            Some(Value::Array(rows)) => Some(rows),
            _ => None,
        },
        _ => None,
    }
}

fn collect_rows(body: Value, collection: &str) -> anyhow::Result<Vec<Entity>> {
    rows_from_body(body, collection)
        .context(format!("no {} rows in response", collection))?
        .iter()
        .enumerate()
        .map(|(index, row)| parse_row(row, index))
        .collect()
}

fn parse_row(row: &Value, index: usize) -> anyhow::Result<Entity> {
    let id: String = get_attribute(row, "id").context(format!("row '{}' must set id", index))?;
    let name: String =
        get_attribute(row, "name").context(format!("row '{}' must set name", &id))?;
    let slug: Option<String> = get_attribute(row, "slug");
    let status = Status::parse(get_attribute::<String>(row, "status").as_deref());
    let order_number: i64 = get_attribute(row, "orderNumber").unwrap_or_default();

    Ok(Entity::new(id, name, slug, status, order_number))
}

fn get_attribute<T>(value: &Value, attribute: &str) -> Option<T>
where
    T: FromStr,
{
    value.get(attribute).and_then(|v| match v {
        Value::String(s) => T::from_str(s).ok(),
        Value::Number(n) => {
            if let Some(f) = n.as_f64() {
                T::from_str(&f.to_string()).ok()
            } else {
                None
            }
        }
        Value::Bool(b) => T::from_str(&b.to_string()).ok(),
        _ => None,
    })
}
