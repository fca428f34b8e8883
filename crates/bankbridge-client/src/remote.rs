use bankbridge_core::error::AppError;
use bankbridge_core::models::{BankEntry, Endpoint, Record};
use reqwest::{Client, Url};

/// HTTP client for independently owned bank data providers.
///
/// Each provider exposes a single GET resource returning one bank:
///
/// ```json
/// { "bic": "1234", "countryCode": "GB", "auth": "OAUTH" }
/// ```
///
/// The client performs exactly one request per call. It never retries and
/// imposes no deadline of its own; the aggregator owns the per-call deadline.
///
/// # Examples
///
/// ```no_run
/// use bankbridge_client::RemoteBankClient;
/// use bankbridge_core::Endpoint;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = RemoteBankClient::new()?;
/// let endpoint = Endpoint::new("Credit Sweets", "http://localhost:1234/cs")?;
/// let record = client.fetch_record(&endpoint).await?;
/// println!("{} -> {}", record.id, record.name);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct RemoteBankClient {
    client: Client,
}

impl RemoteBankClient {
    /// Creates a client with a shared connection pool.
    ///
    /// # Errors
    ///
    /// Returns `AppError::ClientError` if the HTTP client cannot be built.
    pub fn new() -> Result<Self, AppError> {
        let client = Client::builder()
            .user_agent(concat!("bankbridge/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::ClientError(e.to_string()))?;

        Ok(Self { client })
    }

    /// Fetches the record published by `endpoint`.
    ///
    /// The record's display name is the endpoint label.
    ///
    /// # Errors
    ///
    /// - `AppError::NetworkError` if the provider is unreachable
    /// - `AppError::ClientError` for a non-success status or a transport failure
    /// - `AppError::InvalidRecord` if the body is malformed or carries no code
    pub async fn fetch_record(&self, endpoint: &Endpoint) -> Result<Record, AppError> {
        let body = self.get(&endpoint.url).await?;
        parse_record(&body, &endpoint.label).map_err(|e| match e {
            AppError::InvalidRecord(reason) => {
                AppError::InvalidRecord(format!("{} from {}", reason, endpoint.url))
            }
            other => other,
        })
    }

    async fn get(&self, url: &Url) -> Result<Vec<u8>, AppError> {
        let resp = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    AppError::NetworkError(format!("Connection failed: {}", e))
                } else {
                    AppError::ClientError(e.to_string())
                }
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(AppError::ClientError(format!(
                "HTTP {} from {}",
                status.as_u16(),
                url
            )));
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| AppError::ClientError(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

/// Decodes a provider body into a record named after `label`.
pub fn parse_record(body: &[u8], label: &str) -> Result<Record, AppError> {
    let entry: BankEntry = serde_json::from_slice(body)
        .map_err(|e| AppError::InvalidRecord(format!("malformed body ({})", e)))?;
    entry.into_labelled_record(label)
}
