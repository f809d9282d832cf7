// Hand-crafted async HTTP client for the parasempre guest-directory API.
//
// Base path: /api/
// Auth: `user-racf` header on every mutating request; reads are open.

use reqwest::header::HeaderValue;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::Error;
use crate::types::{
    BulkDeleteBody, GuestPatchBody, GuestRecord, ImportResultBody, NewGuestBody, RoleBody,
    UserRecord,
};

/// Header carrying the caller's RACF identity token.
pub const IDENTITY_HEADER: &str = "user-racf";

// ── Error response shape ─────────────────────────────────────────────

#[derive(serde::Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the guest-directory API.
///
/// Wraps a `reqwest::Client` with a normalized base URL and the error
/// contract of the server: non-2xx bodies carry `{"error": string}`, and
/// anything else degrades to the generic `"Erro <status>"` message.
pub struct DirectoryClient {
    http: reqwest::Client,
    base_url: Url,
}

impl DirectoryClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from a base URL and transport config.
    pub fn new(base_url: &str, transport: &crate::TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::from_reqwest(base_url, http)
    }

    /// Wrap an existing `reqwest::Client` (callers manage transport setup).
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self { http, base_url })
    }

    /// Parse the base URL and guarantee a trailing slash so `Url::join`
    /// appends instead of replacing the last path segment.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        Ok(url)
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join a relative path (e.g. `"api/guests"`) onto the base URL.
    fn url(&self, path: &str) -> Url {
        // base_url always ends with `/`, so joining `api/…` works.
        self.base_url
            .join(path)
            .expect("path should be valid relative URL")
    }

    fn identity_header(racf: &str) -> Result<HeaderValue, Error> {
        HeaderValue::from_str(racf).map_err(|_| Error::Api {
            status: 400,
            message: format!("invalid identity header value: {racf:?}"),
        })
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path);
        debug!("GET {url}");

        let resp = self.http.get(url).send().await?;
        self.handle_response(resp).await
    }

    async fn get_identified<T: DeserializeOwned>(&self, path: &str, racf: &str) -> Result<T, Error> {
        let url = self.url(path);
        debug!("GET {url}");

        let resp = self
            .http
            .get(url)
            .header(IDENTITY_HEADER, Self::identity_header(racf)?)
            .send()
            .await?;
        self.handle_response(resp).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        racf: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path);
        debug!("POST {url}");

        let resp = self
            .http
            .post(url)
            .header(IDENTITY_HEADER, Self::identity_header(racf)?)
            .json(body)
            .send()
            .await?;
        self.handle_response(resp).await
    }

    async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        racf: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path);
        debug!("PUT {url}");

        let resp = self
            .http
            .put(url)
            .header(IDENTITY_HEADER, Self::identity_header(racf)?)
            .json(body)
            .send()
            .await?;
        self.handle_response(resp).await
    }

    async fn delete(&self, path: &str, racf: &str) -> Result<(), Error> {
        let url = self.url(path);
        debug!("DELETE {url}");

        let resp = self
            .http
            .delete(url)
            .header(IDENTITY_HEADER, Self::identity_header(racf)?)
            .send()
            .await?;
        self.handle_empty(resp).await
    }

    async fn delete_with_body<B: Serialize + Sync>(
        &self,
        path: &str,
        racf: &str,
        body: &B,
    ) -> Result<(), Error> {
        let url = self.url(path);
        debug!("DELETE {url}");

        let resp = self
            .http
            .delete(url)
            .header(IDENTITY_HEADER, Self::identity_header(racf)?)
            .json(body)
            .send()
            .await?;
        self.handle_empty(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            serde_json::from_str(&body).map_err(|e| {
                let preview = &body[..body.len().min(200)];
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                }
            })
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    async fn handle_empty(&self, resp: reqwest::Response) -> Result<(), Error> {
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    /// Decode the server's `{"error": string}` body; anything that doesn't
    /// carry one collapses to `"Erro <status>"`.
    async fn parse_error(status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        let raw = resp.text().await.unwrap_or_default();

        let message = serde_json::from_str::<ErrorBody>(&raw)
            .ok()
            .and_then(|b| b.error)
            .unwrap_or_else(|| format!("Erro {}", status.as_u16()));

        Error::Api {
            status: status.as_u16(),
            message,
        }
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    // ── Guests ───────────────────────────────────────────────────────

    pub async fn list_guests(&self) -> Result<Vec<GuestRecord>, Error> {
        self.get("api/guests").await
    }

    pub async fn get_guest(&self, id: i64) -> Result<GuestRecord, Error> {
        self.get(&format!("api/guests/{id}")).await
    }

    pub async fn create_guest(&self, racf: &str, body: &NewGuestBody) -> Result<GuestRecord, Error> {
        self.post("api/guests", racf, body).await
    }

    pub async fn update_guest(
        &self,
        racf: &str,
        id: i64,
        body: &GuestPatchBody,
    ) -> Result<GuestRecord, Error> {
        self.put(&format!("api/guests/{id}"), racf, body).await
    }

    pub async fn delete_guest(&self, racf: &str, id: i64) -> Result<(), Error> {
        self.delete(&format!("api/guests/{id}"), racf).await
    }

    /// Bulk delete in a single call. All-or-nothing from the client's view:
    /// a failure surfaces as one aggregate error.
    pub async fn delete_guests(&self, racf: &str, ids: &[i64]) -> Result<(), Error> {
        self.delete_with_body("api/guests", racf, &BulkDeleteBody { ids: ids.to_vec() })
            .await
    }

    // ── Import ───────────────────────────────────────────────────────

    /// Upload a spreadsheet as multipart field `file`.
    ///
    /// The server answers 200 on full success and 400 with the same
    /// `ImportResult` shape on partial failure; both are `Ok` here. Only a
    /// response carrying no parseable result is an error.
    pub async fn import_guests(
        &self,
        racf: &str,
        file_name: &str,
        contents: Vec<u8>,
    ) -> Result<ImportResultBody, Error> {
        let url = self.url("api/guests/import");
        debug!("POST {url} (multipart, {} bytes)", contents.len());

        let part = reqwest::multipart::Part::bytes(contents).file_name(file_name.to_owned());
        let form = reqwest::multipart::Form::new().part("file", part);

        let resp = self
            .http
            .post(url)
            .header(IDENTITY_HEADER, Self::identity_header(racf)?)
            .multipart(form)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;

        if let Ok(result) = serde_json::from_str::<ImportResultBody>(&body) {
            return Ok(result);
        }

        if status.is_success() {
            let preview = &body[..body.len().min(200)];
            Err(Error::Deserialization {
                message: format!("import response is not an ImportResult (body preview: {preview:?})"),
                body,
            })
        } else {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.error)
                .unwrap_or_else(|| format!("Erro {}", status.as_u16()));
            Err(Error::Api {
                status: status.as_u16(),
                message,
            })
        }
    }

    // ── Users ────────────────────────────────────────────────────────

    /// Resolve the caller's role from the `user-racf` header.
    pub async fn fetch_me(&self, racf: &str) -> Result<RoleBody, Error> {
        self.get_identified("api/users/me", racf).await
    }

    pub async fn list_users(&self) -> Result<Vec<UserRecord>, Error> {
        self.get("api/users").await
    }
}
