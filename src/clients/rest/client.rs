//! Resource primitives built on the call executor.
//!
//! This module provides [`RestClient`], the generic CRUD, binary transfer and
//! pagination layer that domain clients are written against.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::clients::rest::{FileData, PaginatedData};
use crate::clients::{
    attachment_filename, HttpClient, HttpMethod, MultipartPart, RequestBody, RestCallError,
    RestRequest, RetryOptions, Sleeper,
};
use crate::config::{BearerToken, ClientConfig};

/// Generic REST resource client.
///
/// Every method takes a request target that is either an absolute URL or a
/// path resolved against the configured base URL, and sends
/// `Authorization: Bearer <token>` with the configured token. Rate-limited
/// calls are retried inside [`HttpClient::execute_rest_call`]; the methods here
/// only encode the request and decode the settled response.
///
/// Each method has a `*_with_options` variant taking explicit
/// [`RetryOptions`]; the plain variant uses the options from the config.
///
/// # Example
///
/// ```rust,ignore
/// use resilient_rest::{BaseUrl, BearerToken, ClientConfig, RestClient};
///
/// let config = ClientConfig::builder()
///     .base_url(BaseUrl::new("https://api.example.com/api/v1")?)
///     .token(BearerToken::new("token")?)
///     .build()?;
/// let client = RestClient::new(&config);
///
/// let namespace: Namespace = client.get_resource("namespaces/default").await?;
/// let runs: Vec<Run> = client.list_all_resources("runs?pageSize=100").await?;
/// ```
#[derive(Clone, Debug)]
pub struct RestClient {
    /// The internal call executor.
    http_client: HttpClient,
}

// Verify RestClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<RestClient>();
};

impl RestClient {
    /// Creates a new resource client from the given configuration.
    #[must_use]
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            http_client: HttpClient::new(config),
        }
    }

    /// Creates a resource client on top of an existing executor.
    #[must_use]
    pub const fn from_http_client(http_client: HttpClient) -> Self {
        Self { http_client }
    }

    /// Replaces the sleeper used between rate-limit retries.
    #[must_use]
    pub fn with_sleeper(self, sleeper: impl Sleeper + 'static) -> Self {
        Self {
            http_client: self.http_client.with_sleeper(sleeper),
        }
    }

    /// Returns a client that shares this client's transport but
    /// authenticates with a different token.
    #[must_use]
    pub fn with_token(&self, token: &BearerToken) -> Self {
        Self {
            http_client: self.http_client.with_token(token),
        }
    }

    /// Returns the underlying call executor.
    #[must_use]
    pub const fn http_client(&self) -> &HttpClient {
        &self.http_client
    }

    fn default_options(&self) -> RetryOptions {
        *self.http_client.retry_options()
    }

    /// Fetches a resource and decodes its JSON body.
    ///
    /// # Errors
    ///
    /// Returns whatever [`HttpClient::execute_rest_call`] returns, or
    /// [`RestCallError::Decode`] if the body is not a `T`.
    pub async fn get_resource<T: DeserializeOwned>(&self, url: &str) -> Result<T, RestCallError> {
        self.get_resource_with_options(url, self.default_options())
            .await
    }

    /// [`get_resource`](Self::get_resource) with explicit retry options.
    ///
    /// # Errors
    ///
    /// See [`get_resource`](Self::get_resource).
    pub async fn get_resource_with_options<T: DeserializeOwned>(
        &self,
        url: &str,
        options: RetryOptions,
    ) -> Result<T, RestCallError> {
        let request = RestRequest::builder(HttpMethod::Get).build();
        self.send_json(url, &request, options).await
    }

    /// Creates a resource from a JSON body and decodes the JSON reply.
    ///
    /// # Errors
    ///
    /// Returns [`RestCallError::Encode`] if `body` cannot be serialized,
    /// otherwise see [`get_resource`](Self::get_resource).
    pub async fn create_resource<T, B>(&self, url: &str, body: &B) -> Result<T, RestCallError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.create_resource_with_options(url, body, self.default_options())
            .await
    }

    /// [`create_resource`](Self::create_resource) with explicit retry options.
    ///
    /// # Errors
    ///
    /// See [`create_resource`](Self::create_resource).
    pub async fn create_resource_with_options<T, B>(
        &self,
        url: &str,
        body: &B,
        options: RetryOptions,
    ) -> Result<T, RestCallError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = RestRequest::builder(HttpMethod::Post)
            .body(RequestBody::json(body)?)
            .build();
        self.send_json(url, &request, options).await
    }

    /// Partially updates a resource from a JSON body and decodes the JSON reply.
    ///
    /// # Errors
    ///
    /// See [`create_resource`](Self::create_resource).
    pub async fn update_resource<T, B>(&self, url: &str, body: &B) -> Result<T, RestCallError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.update_resource_with_options(url, body, self.default_options())
            .await
    }

    /// [`update_resource`](Self::update_resource) with explicit retry options.
    ///
    /// # Errors
    ///
    /// See [`create_resource`](Self::create_resource).
    pub async fn update_resource_with_options<T, B>(
        &self,
        url: &str,
        body: &B,
        options: RetryOptions,
    ) -> Result<T, RestCallError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = RestRequest::builder(HttpMethod::Patch)
            .body(RequestBody::json(body)?)
            .build();
        self.send_json(url, &request, options).await
    }

    /// Deletes a resource. The response body is ignored.
    ///
    /// # Errors
    ///
    /// Returns whatever [`HttpClient::execute_rest_call`] returns.
    pub async fn delete_resource(&self, url: &str) -> Result<(), RestCallError> {
        self.delete_resource_with_options(url, self.default_options())
            .await
    }

    /// [`delete_resource`](Self::delete_resource) with explicit retry options.
    ///
    /// # Errors
    ///
    /// See [`delete_resource`](Self::delete_resource).
    pub async fn delete_resource_with_options(
        &self,
        url: &str,
        options: RetryOptions,
    ) -> Result<(), RestCallError> {
        let request = RestRequest::builder(HttpMethod::Delete).build();
        self.http_client
            .execute_rest_call(url, &request, options)
            .await?;
        Ok(())
    }

    /// Uploads a multipart form, with POST or (when `is_update`) PATCH.
    ///
    /// No `Content-Type` is set explicitly; the transport adds the boundary.
    ///
    /// # Errors
    ///
    /// Returns [`RestCallError::Multipart`] if a part is malformed, otherwise
    /// whatever [`HttpClient::execute_rest_call`] returns.
    pub async fn upload_data(
        &self,
        url: &str,
        parts: Vec<MultipartPart>,
        is_update: bool,
    ) -> Result<(), RestCallError> {
        self.upload_data_with_options(url, parts, is_update, self.default_options())
            .await
    }

    /// [`upload_data`](Self::upload_data) with explicit retry options.
    ///
    /// # Errors
    ///
    /// See [`upload_data`](Self::upload_data).
    pub async fn upload_data_with_options(
        &self,
        url: &str,
        parts: Vec<MultipartPart>,
        is_update: bool,
        options: RetryOptions,
    ) -> Result<(), RestCallError> {
        let method = if is_update {
            HttpMethod::Patch
        } else {
            HttpMethod::Post
        };
        let request = RestRequest::builder(method)
            .body(RequestBody::Multipart(parts))
            .build();
        self.http_client
            .execute_rest_call(url, &request, options)
            .await?;
        Ok(())
    }

    /// Sends a JSON or multipart body with PATCH and returns the binary reply.
    ///
    /// # Errors
    ///
    /// Returns [`RestCallError::MissingFilename`] if the reply has no
    /// attachment filename, otherwise whatever
    /// [`HttpClient::execute_rest_call`] returns.
    pub async fn transform_data(
        &self,
        url: &str,
        body: RequestBody,
    ) -> Result<FileData, RestCallError> {
        self.transform_data_with_options(url, body, self.default_options())
            .await
    }

    /// [`transform_data`](Self::transform_data) with explicit retry options.
    ///
    /// # Errors
    ///
    /// See [`transform_data`](Self::transform_data).
    pub async fn transform_data_with_options(
        &self,
        url: &str,
        body: RequestBody,
        options: RetryOptions,
    ) -> Result<FileData, RestCallError> {
        let request = RestRequest::builder(HttpMethod::Patch).body(body).build();
        self.send_binary(url, &request, options).await
    }

    /// Downloads a binary resource.
    ///
    /// # Errors
    ///
    /// See [`transform_data`](Self::transform_data).
    pub async fn get_resource_binary_data(&self, url: &str) -> Result<FileData, RestCallError> {
        self.get_resource_binary_data_with_options(url, self.default_options())
            .await
    }

    /// [`get_resource_binary_data`](Self::get_resource_binary_data) with explicit retry options.
    ///
    /// # Errors
    ///
    /// See [`transform_data`](Self::transform_data).
    pub async fn get_resource_binary_data_with_options(
        &self,
        url: &str,
        options: RetryOptions,
    ) -> Result<FileData, RestCallError> {
        let request = RestRequest::builder(HttpMethod::Get).build();
        self.send_binary(url, &request, options).await
    }

    /// Triggers a remote action with a bodyless POST. The reply is ignored.
    ///
    /// # Errors
    ///
    /// Returns whatever [`HttpClient::execute_rest_call`] returns.
    pub async fn call_via_post(&self, url: &str) -> Result<(), RestCallError> {
        self.call_via_post_with_options(url, self.default_options())
            .await
    }

    /// [`call_via_post`](Self::call_via_post) with explicit retry options.
    ///
    /// # Errors
    ///
    /// See [`call_via_post`](Self::call_via_post).
    pub async fn call_via_post_with_options(
        &self,
        url: &str,
        options: RetryOptions,
    ) -> Result<(), RestCallError> {
        let request = RestRequest::builder(HttpMethod::Post).build();
        self.http_client
            .execute_rest_call(url, &request, options)
            .await?;
        Ok(())
    }

    /// Fetches a single page of a paginated listing.
    ///
    /// # Errors
    ///
    /// See [`get_resource`](Self::get_resource).
    pub async fn list_resources_page<T: DeserializeOwned>(
        &self,
        url: &str,
    ) -> Result<PaginatedData<T>, RestCallError> {
        self.get_resource(url).await
    }

    /// Fetches every page of a listing and concatenates their items in order.
    ///
    /// Pages are requested one after another, following only the
    /// server-supplied `links.next` until a page has none. A relative link
    /// (`/runs?page=2`, `?page=2`, `page-2`) is resolved against the URL of
    /// the page it came from.
    ///
    /// # Errors
    ///
    /// Fails with the error of the first page request that fails; items
    /// collected so far are discarded.
    pub async fn list_all_resources<T: DeserializeOwned>(
        &self,
        url: &str,
    ) -> Result<Vec<T>, RestCallError> {
        self.list_all_resources_with_options(url, self.default_options())
            .await
    }

    /// [`list_all_resources`](Self::list_all_resources) with explicit retry options.
    ///
    /// # Errors
    ///
    /// See [`list_all_resources`](Self::list_all_resources).
    pub async fn list_all_resources_with_options<T: DeserializeOwned>(
        &self,
        url: &str,
        options: RetryOptions,
    ) -> Result<Vec<T>, RestCallError> {
        let mut items = Vec::new();
        let mut next = Some(url.to_string());
        let mut pages: u32 = 0;
        let request = RestRequest::builder(HttpMethod::Get).build();

        while let Some(current) = next.take() {
            let (page, page_url): (PaginatedData<T>, reqwest::Url) =
                self.send_json_at(&current, &request, options).await?;
            pages += 1;
            tracing::debug!(
                page = page.pagination.page_number,
                total = page.pagination.total_count,
                "Fetched page {} of listing {}",
                pages,
                url
            );

            // Relative links are relative to the page that carried them
            next = match page.next_link() {
                Some(link) => Some(
                    page_url
                        .join(link)
                        .map_err(|e| RestCallError::InvalidUrl {
                            url: link.to_string(),
                            reason: e.to_string(),
                        })?
                        .to_string(),
                ),
                None => None,
            };
            items.extend(page.data);
        }

        Ok(items)
    }

    /// Executes a request and decodes the JSON body.
    async fn send_json<T: DeserializeOwned>(
        &self,
        url: &str,
        request: &RestRequest,
        options: RetryOptions,
    ) -> Result<T, RestCallError> {
        let (value, _) = self.send_json_at(url, request, options).await?;
        Ok(value)
    }

    /// Executes a request and decodes the JSON body, also returning the
    /// final URL of the response.
    async fn send_json_at<T: DeserializeOwned>(
        &self,
        url: &str,
        request: &RestRequest,
        options: RetryOptions,
    ) -> Result<(T, reqwest::Url), RestCallError> {
        let response = self
            .http_client
            .execute_rest_call(url, request, options)
            .await?;
        let final_url = response.url().clone();

        let bytes = response
            .bytes()
            .await
            .map_err(|source| RestCallError::Body {
                url: final_url.to_string(),
                source,
            })?;

        let value = serde_json::from_slice(&bytes).map_err(|source| RestCallError::Decode {
            url: final_url.to_string(),
            source,
        })?;
        Ok((value, final_url))
    }

    /// Executes a request and returns the body with its attachment filename.
    async fn send_binary(
        &self,
        url: &str,
        request: &RestRequest,
        options: RetryOptions,
    ) -> Result<FileData, RestCallError> {
        let response = self
            .http_client
            .execute_rest_call(url, request, options)
            .await?;
        let final_url = response.url().to_string();

        let filename = attachment_filename(response.headers()).ok_or_else(|| {
            RestCallError::MissingFilename {
                url: final_url.clone(),
            }
        })?;

        let data = response
            .bytes()
            .await
            .map_err(|source| RestCallError::Body {
                url: final_url,
                source,
            })?;

        Ok(FileData {
            filename,
            data: data.to_vec(),
        })
    }
}
