//! Live adapter for the Supabase Storage REST API.

use std::future::Future;
use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::error::Error;
use crate::ports::object_store::{ObjectBytes, ObjectDescriptor, ObjectStore, StoreFuture};

/// Page size used when listing a prefix.
const LIST_PAGE_SIZE: usize = 100;

/// Live object store backed by a Supabase project's storage API.
pub struct SupabaseStore {
    client: Client,
    base_url: Url,
    key: String,
}

impl SupabaseStore {
    /// Open a session against the storage service at `url`.
    ///
    /// The key is checked by listing buckets once. A rejected key or an
    /// unreachable service both fail the session.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for a malformed URL and
    /// [`Error::Authentication`] if the session cannot be established.
    #[instrument(skip(key, timeout))]
    pub async fn connect(url: &str, key: &str, timeout: Duration) -> Result<Self, Error> {
        if key.trim().is_empty() {
            return Err(Error::Authentication("access key is empty".into()));
        }
        let base_url = parse_base_url(url)?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {e}")))?;

        let store = Self { client, base_url, key: key.to_string() };

        let probe = store.endpoint(&["bucket"], &[]);
        let response = store.authorized(store.client.get(probe)).send().await.map_err(|e| {
            Error::Authentication(format!("storage service unreachable at {url}: {e}"))
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Authentication(format!("session rejected ({status}): {body}")));
        }

        debug!("storage session established");
        Ok(store)
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.header("apikey", &self.key).bearer_auth(&self.key)
    }

    /// `{base}/storage/v1/{segments...}/{path segments...}` with each segment
    /// percent-encoded.
    fn endpoint(&self, segments: &[&str], path: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut parts) = url.path_segments_mut() {
            parts.pop_if_empty().extend(["storage", "v1"]).extend(segments).extend(path);
        }
        url
    }

    async fn list_page(
        &self,
        bucket: &str,
        prefix: &str,
        offset: usize,
    ) -> Result<Vec<ObjectDescriptor>, Error> {
        let body = serde_json::json!({
            "prefix": prefix,
            "limit": LIST_PAGE_SIZE,
            "offset": offset,
            "sortBy": { "column": "name", "order": "asc" },
        });

        let url = self.endpoint(&["object", "list", bucket], &[]);
        let response = self.authorized(self.client.post(url)).json(&body).send().await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(classify_failure(status, &text, &format!("{bucket}/{prefix}")));
        }

        let entries: Vec<ListEntry> = serde_json::from_str(&text)
            .map_err(|e| Error::Transport(format!("Failed to parse listing: {e}")))?;
        Ok(entries.into_iter().map(ObjectDescriptor::from).collect())
    }
}

impl ObjectStore for SupabaseStore {
    fn list<'a>(
        &'a self,
        bucket: &'a str,
        prefix: &'a str,
    ) -> StoreFuture<'a, Vec<ObjectDescriptor>> {
        Box::pin(async move {
            let all = collect_pages(LIST_PAGE_SIZE, move |offset| {
                self.list_page(bucket, prefix, offset)
            })
            .await?;
            debug!(bucket, prefix, count = all.len(), "listed objects");
            Ok(all)
        })
    }

    fn download<'a>(&'a self, bucket: &'a str, path: &'a str) -> StoreFuture<'a, ObjectBytes> {
        Box::pin(async move {
            let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
            let url = self.endpoint(&["object", bucket], &segments);
            let response = self.authorized(self.client.get(url)).send().await?;

            let status = response.status();
            if !status.is_success() {
                let text = response.text().await.unwrap_or_default();
                return Err(classify_failure(status, &text, path));
            }

            let data = response.bytes().await?.to_vec();
            debug!(bucket, path, size = data.len(), "downloaded object");
            Ok(ObjectBytes { data })
        })
    }
}

/// Fetch pages at increasing offsets until one comes back shorter than
/// `page_size`. A full last page costs one extra, empty request.
async fn collect_pages<T, F, Fut>(page_size: usize, mut fetch: F) -> Result<Vec<T>, Error>
where
    F: FnMut(usize) -> Fut,
    Fut: Future<Output = Result<Vec<T>, Error>>,
{
    let mut all = Vec::new();
    loop {
        let page = fetch(all.len()).await?;
        let short = page.len() < page_size;
        all.extend(page);
        if short {
            return Ok(all);
        }
    }
}

fn parse_base_url(url: &str) -> Result<Url, Error> {
    let parsed =
        Url::parse(url).map_err(|e| Error::Config(format!("Invalid storage URL '{url}': {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(Error::Config(format!("Unsupported URL scheme '{other}' in '{url}'"))),
    }
}

/// Map a failed response onto the error taxonomy.
///
/// The storage API sometimes answers with HTTP 400 and puts the real status
/// in the JSON body, so the body wins when it carries one.
fn classify_failure(status: StatusCode, body: &str, path: &str) -> Error {
    let parsed: Option<ErrorBody> = serde_json::from_str(body).ok();
    let effective = parsed
        .as_ref()
        .and_then(ErrorBody::status_code)
        .unwrap_or_else(|| status.as_u16());
    let message = parsed
        .as_ref()
        .and_then(|b| b.message.clone().or_else(|| b.error.clone()))
        .unwrap_or_else(|| body.trim().to_string());
    let says_not_found = parsed
        .as_ref()
        .and_then(|b| b.error.as_deref())
        .is_some_and(|e| e.eq_ignore_ascii_case("not_found"));

    match effective {
        401 | 403 => Error::Authentication(format!("{path}: {message}")),
        404 => Error::NotFound(path.to_string()),
        _ if says_not_found => Error::NotFound(path.to_string()),
        408 | 429 | 500..=599 => Error::Transport(format!("{path} ({effective}): {message}")),
        _ => Error::InvalidArgument(format!("storage rejected {path} ({effective}): {message}")),
    }
}

// --- Supabase API response types ---

#[derive(Deserialize)]
struct ListEntry {
    name: String,
    id: Option<String>,
    metadata: Option<ListMetadata>,
}

#[derive(Deserialize)]
struct ListMetadata {
    size: Option<u64>,
}

impl From<ListEntry> for ObjectDescriptor {
    fn from(entry: ListEntry) -> Self {
        Self { name: entry.name, id: entry.id, size: entry.metadata.and_then(|m| m.size) }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    status_code: Option<serde_json::Value>,
    error: Option<String>,
    message: Option<String>,
}

impl ErrorBody {
    fn status_code(&self) -> Option<u16> {
        match self.status_code.as_ref()? {
            serde_json::Value::String(s) => s.parse().ok(),
            serde_json::Value::Number(n) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
            _ => None,
        }
    }
}
