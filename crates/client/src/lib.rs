//! HTTP implementation of the Product Service seams.
//!
//! Every call is a single request with no retries. Non-success statuses are
//! classified through [`ServiceError::from_status`], carrying the backend's
//! `{"error": "..."}` message when one is present.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use catalog_admin_core::config::ApiConfig;
use catalog_admin_core::domain::image::{Image, ImageId, ImageUpload};
use catalog_admin_core::domain::lookup::{Brand, Category};
use catalog_admin_core::domain::owner::{
    Owner, OwnerDraft, OwnerId, SignInCredentials, SignInGrant,
};
use catalog_admin_core::domain::product::{Product, ProductDraft, ProductId};
use catalog_admin_core::errors::{ServiceError, ServiceErrorKind, ServiceResult};
use catalog_admin_core::service::{ImageService, LookupService, OwnerService, ProductService};

const IMAGE_FIELD: &str = "image";

#[derive(Clone)]
pub struct HttpCatalogService {
    client: Client,
    base_url: String,
    authorization: Option<SecretString>,
}

/// Create responses arrive wrapped in `{"data": ...}`; some update handlers
/// return the record bare.
#[derive(Deserialize)]
#[serde(untagged)]
enum Envelope<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Envelope<T> {
    fn into_inner(self) -> T {
        match self {
            Self::Wrapped { data } => data,
            Self::Bare(value) => value,
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

impl HttpCatalogService {
    pub fn new(config: &ApiConfig) -> ServiceResult<Self> {
        Self::with_timeout(&config.base_url, config.timeout())
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> ServiceResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| ServiceError::transport(format!("could not build client: {error}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            authorization: None,
        })
    }

    /// Sends the value as the `Authorization` header on every request.
    pub fn with_authorization(mut self, authorization: SecretString) -> Self {
        self.authorization = Some(authorization);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.client.request(method, self.url(path));
        match &self.authorization {
            Some(value) => builder.header("Authorization", value.expose_secret()),
            None => builder,
        }
    }

    async fn send(
        &self,
        operation: &'static str,
        builder: RequestBuilder,
    ) -> ServiceResult<Response> {
        let response = builder.send().await.map_err(|error| {
            warn!(
                event_name = "catalog.http.request_failed",
                operation,
                error = %error,
                "request failed"
            );
            map_transport_error(&error)
        })?;

        let status = response.status();
        debug!(
            event_name = "catalog.http.response",
            operation,
            status = status.as_u16(),
            "response received"
        );
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<ErrorBody>(&body)
            .map(|body| body.error)
            .ok()
            .filter(|message| !message.trim().is_empty())
            .unwrap_or_else(|| format!("{operation} returned {status}"));
        warn!(
            event_name = "catalog.http.rejected",
            operation,
            status = status.as_u16(),
            detail = %detail,
            "service rejected request"
        );
        Err(ServiceError::from_status(status.as_u16(), detail))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        path: &str,
    ) -> ServiceResult<T> {
        let response = self.send(operation, self.request(Method::GET, path)).await?;
        decode(operation, response).await
    }

    async fn send_json<B, T>(
        &self,
        operation: &'static str,
        method: Method,
        path: &str,
        body: &B,
    ) -> ServiceResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send(operation, self.request(method, path).json(body)).await?;
        decode::<Envelope<T>>(operation, response).await.map(Envelope::into_inner)
    }
}

async fn decode<T: DeserializeOwned>(
    operation: &'static str,
    response: Response,
) -> ServiceResult<T> {
    let bytes = response.bytes().await.map_err(|error| map_transport_error(&error))?;
    serde_json::from_slice::<T>(&bytes)
        .map_err(|error| ServiceError::decode(format!("{operation}: {error}")))
}

fn map_transport_error(error: &reqwest::Error) -> ServiceError {
    if error.is_timeout() {
        ServiceError::new(ServiceErrorKind::Timeout, error.to_string())
    } else if error.is_decode() {
        ServiceError::decode(error.to_string())
    } else {
        ServiceError::transport(error.to_string())
    }
}

fn image_part(upload: &ImageUpload) -> ServiceResult<Part> {
    Part::bytes(upload.bytes.clone())
        .file_name(upload.file_name.clone())
        .mime_str(mime_for(&upload.file_name))
        .map_err(|error| ServiceError::new(ServiceErrorKind::InvalidRequest, error.to_string()))
}

fn mime_for(file_name: &str) -> &'static str {
    let extension = file_name.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase());
    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

#[async_trait]
impl ProductService for HttpCatalogService {
    async fn list_products(&self) -> ServiceResult<Vec<Product>> {
        self.get_json("list_products", "/products").await
    }

    async fn get_product(&self, id: ProductId) -> ServiceResult<Product> {
        self.get_json("get_product", &format!("/products/{id}")).await
    }

    async fn create_product(&self, draft: &ProductDraft) -> ServiceResult<Product> {
        self.send_json("create_product", Method::POST, "/products", draft).await
    }

    async fn update_product(&self, id: ProductId, draft: &ProductDraft) -> ServiceResult<Product> {
        self.send_json("update_product", Method::PATCH, &format!("/products/{id}"), draft).await
    }

    async fn delete_product(&self, id: ProductId) -> ServiceResult<()> {
        self.send("delete_product", self.request(Method::DELETE, &format!("/products/{id}")))
            .await
            .map(|_| ())
    }
}

#[async_trait]
impl LookupService for HttpCatalogService {
    async fn list_brands(&self) -> ServiceResult<Vec<Brand>> {
        self.get_json("list_brands", "/brands").await
    }

    async fn list_categories(&self) -> ServiceResult<Vec<Category>> {
        self.get_json("list_categories", "/categories").await
    }
}

#[async_trait]
impl OwnerService for HttpCatalogService {
    async fn sign_in(&self, credentials: &SignInCredentials) -> ServiceResult<SignInGrant> {
        self.send_json("sign_in", Method::POST, "/signin", credentials).await
    }

    async fn create_owner(&self, draft: &OwnerDraft) -> ServiceResult<Owner> {
        self.send_json("create_owner", Method::POST, "/owners", draft).await
    }

    async fn list_owners(&self) -> ServiceResult<Vec<Owner>> {
        self.get_json("list_owners", "/owners").await
    }

    async fn get_owner(&self, id: OwnerId) -> ServiceResult<Owner> {
        self.get_json("get_owner", &format!("/owners/{id}")).await
    }
}

#[async_trait]
impl ImageService for HttpCatalogService {
    async fn list_images(&self) -> ServiceResult<Vec<Image>> {
        self.get_json("list_images", "/images").await
    }

    async fn images_for_product(&self, product_id: ProductId) -> ServiceResult<Vec<Image>> {
        self.get_json("images_for_product", &format!("/product-images/{product_id}")).await
    }

    async fn upload_images(
        &self,
        product_id: ProductId,
        uploads: &[ImageUpload],
    ) -> ServiceResult<()> {
        if uploads.is_empty() {
            return Ok(());
        }

        let mut form = Form::new();
        for upload in uploads {
            form = form.part(IMAGE_FIELD, image_part(upload)?);
        }
        let builder = self.request(Method::POST, &format!("/product-image/{product_id}"));
        self.send("upload_images", builder.multipart(form)).await.map(|_| ())
    }

    async fn replace_image(&self, image_id: ImageId, upload: &ImageUpload) -> ServiceResult<()> {
        let form = Form::new().part(IMAGE_FIELD, image_part(upload)?);
        let builder = self.request(Method::PUT, &format!("/product-image/{image_id}"));
        self.send("replace_image", builder.multipart(form)).await.map(|_| ())
    }
}
