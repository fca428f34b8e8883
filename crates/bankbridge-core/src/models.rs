//! Canonical record shape and endpoint directory types.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::AppError;

/// Identifying information for one banking institution.
///
/// This is the only shape that crosses the external boundary; it serializes
/// as an object with exactly two fields, `"id"` and `"name"`.
///
/// # Examples
///
/// ```
/// use bankbridge_core::Record;
///
/// let record = Record::new("1234", "Royal Bank of Boredom").unwrap();
/// let json = serde_json::to_string(&record).unwrap();
/// assert_eq!(json, r#"{"id":"1234","name":"Royal Bank of Boredom"}"#);
///
/// assert!(Record::new("  ", "Nameless").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Record {
    /// Institution code (BIC). Never empty in a validated record.
    pub id: String,
    /// Display name
    pub name: String,
}

impl Record {
    /// Creates a validated record.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidRecord` if `id` is empty or whitespace only.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Result<Self, AppError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(AppError::InvalidRecord(
                "missing institution code".to_string(),
            ));
        }
        Ok(Self {
            id,
            name: name.into(),
        })
    }

    /// Returns true if this record satisfies the non-empty id invariant.
    pub fn is_valid(&self) -> bool {
        !self.id.trim().is_empty()
    }
}

/// Wire shape of a bank row, shared by the seed file and remote providers.
///
/// Providers return richer payloads than the bridge exposes; only the code
/// (`bic`, or `id` when `bic` is absent) and `name` are consumed, the rest is
/// tolerated.
///
/// ```
/// use bankbridge_core::BankEntry;
///
/// let json = r#"{"bic":"5678","countryCode":"CH","auth":"OpenID"}"#;
/// let entry: BankEntry = serde_json::from_str(json).unwrap();
/// assert_eq!(entry.code(), Some("5678"));
/// assert!(entry.name.is_none());
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankEntry {
    #[serde(default)]
    pub bic: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub auth: Option<String>,
}

impl BankEntry {
    /// Institution code; a non-blank `bic` wins over `id`.
    pub fn code(&self) -> Option<&str> {
        self.bic
            .as_deref()
            .filter(|bic| !bic.trim().is_empty())
            .or(self.id.as_deref())
    }

    /// Converts a seed row, keeping its own display name.
    pub fn into_record(self) -> Result<Record, AppError> {
        let code = self.code().unwrap_or_default().to_string();
        Record::new(code, self.name.unwrap_or_default())
    }

    /// Converts a remote provider body. Providers only identify themselves by
    /// code, so the display name is the directory label of the endpoint.
    pub fn into_labelled_record(self, label: &str) -> Result<Record, AppError> {
        Record::new(self.code().unwrap_or_default(), label)
    }
}

/// Seed file layout: `{ "banks": [ ... ] }`.
#[derive(Debug, Default, Deserialize)]
pub struct BankList {
    #[serde(default)]
    pub banks: Vec<BankEntry>,
}

/// A labelled remote provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub label: String,
    pub url: Url,
}

impl Endpoint {
    /// Parses and validates a directory entry.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` for a blank label and `AppError::InvalidUrl`
    /// if `url` does not parse or is not http(s).
    pub fn new(label: impl Into<String>, url: &str) -> Result<Self, AppError> {
        let label = label.into();
        if label.trim().is_empty() {
            return Err(AppError::Config(format!(
                "endpoint label for {} must not be empty",
                url
            )));
        }

        let url = Url::parse(url).map_err(|e| AppError::InvalidUrl(format!("{}: {}", url, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(AppError::InvalidUrl(format!(
                "{}: unsupported scheme {}",
                url,
                url.scheme()
            )));
        }

        Ok(Self { label, url })
    }
}

/// The set of remote providers the aggregator fans out to.
///
/// Loaded once at startup and never mutated afterwards. Labels are unique.
#[derive(Debug, Clone, Default)]
pub struct EndpointDirectory {
    endpoints: Vec<Endpoint>,
}

impl EndpointDirectory {
    /// Builds a directory, rejecting duplicate labels.
    pub fn new(endpoints: Vec<Endpoint>) -> Result<Self, AppError> {
        let mut seen = HashSet::with_capacity(endpoints.len());
        for endpoint in &endpoints {
            if !seen.insert(endpoint.label.as_str()) {
                return Err(AppError::DuplicateLabel(endpoint.label.clone()));
            }
        }
        Ok(Self { endpoints })
    }

    /// Builds a directory from `(label, url)` pairs.
    pub fn from_pairs<I, L, U>(pairs: I) -> Result<Self, AppError>
    where
        I: IntoIterator<Item = (L, U)>,
        L: Into<String>,
        U: AsRef<str>,
    {
        let endpoints = pairs
            .into_iter()
            .map(|(label, url)| Endpoint::new(label, url.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(endpoints)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Endpoint> {
        self.endpoints.iter()
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.endpoints.iter().map(|e| e.label.as_str()).collect()
    }
}
