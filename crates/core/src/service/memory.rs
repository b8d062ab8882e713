use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::RwLock;

use super::{ImageService, LookupService, OwnerService, ProductService};
use crate::domain::image::{Image, ImageId, ImageUpload};
use crate::domain::lookup::{Brand, Category};
use crate::domain::owner::{Owner, OwnerDraft, OwnerId, SignInCredentials, SignInGrant};
use crate::domain::product::{Product, ProductDraft, ProductId};
use crate::errors::{ServiceError, ServiceErrorKind, ServiceResult};

#[derive(Default)]
struct CatalogState {
    products: Vec<Product>,
    brands: Vec<Brand>,
    categories: Vec<Category>,
    owners: Vec<(Owner, String)>,
    images: Vec<Image>,
    next_product_id: u64,
    next_owner_id: u64,
    next_image_id: u64,
}

impl CatalogState {
    fn hydrate(&self, product: &Product) -> Product {
        let mut product = product.clone();
        product.brand = product
            .brand_id
            .and_then(|id| self.brands.iter().find(|brand| brand.id == id).cloned());
        product.category = product
            .category_id
            .and_then(|id| self.categories.iter().find(|category| category.id == id).cloned());
        product.images =
            self.images.iter().filter(|image| image.product_id == product.id).cloned().collect();
        product
    }

    fn product_index(&self, id: ProductId) -> ServiceResult<usize> {
        self.products
            .iter()
            .position(|product| product.id == id)
            .ok_or_else(|| ServiceError::not_found(format!("product {id} not found")))
    }
}

/// Product Service held entirely in memory.
///
/// Listing order is insertion order. Failures can be injected with
/// [`InMemoryCatalog::set_unavailable`], which makes every call fail with a
/// transport error until cleared.
#[derive(Default)]
pub struct InMemoryCatalog {
    state: RwLock<CatalogState>,
    unavailable: AtomicBool,
    list_calls: AtomicUsize,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_brands(mut self, brands: Vec<Brand>) -> Self {
        self.state.get_mut().brands = brands;
        self
    }

    pub fn with_categories(mut self, categories: Vec<Category>) -> Self {
        self.state.get_mut().categories = categories;
        self
    }

    pub fn with_products(mut self, products: Vec<Product>) -> Self {
        let state = self.state.get_mut();
        for product in products {
            state.next_product_id = state.next_product_id.max(product.id.0);
            state.images.extend(product.images.iter().cloned());
            state.next_image_id = state
                .next_image_id
                .max(product.images.iter().map(|image| image.id.0).max().unwrap_or(0));
            state.products.push(product);
        }
        self
    }

    pub fn with_owner(mut self, owner: Owner, password: impl Into<String>) -> Self {
        let state = self.state.get_mut();
        state.next_owner_id = state.next_owner_id.max(owner.id.0);
        state.owners.push((owner, password.into()));
        self
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of product listings served so far, successful or not.
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    fn ensure_available(&self) -> ServiceResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(ServiceError::new(ServiceErrorKind::Transport, "connection refused"));
        }
        Ok(())
    }
}

#[async_trait]
impl ProductService for InMemoryCatalog {
    async fn list_products(&self) -> ServiceResult<Vec<Product>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.ensure_available()?;
        let state = self.state.read().await;
        Ok(state.products.iter().map(|product| state.hydrate(product)).collect())
    }

    async fn get_product(&self, id: ProductId) -> ServiceResult<Product> {
        self.ensure_available()?;
        let state = self.state.read().await;
        let index = state.product_index(id)?;
        Ok(state.hydrate(&state.products[index]))
    }

    async fn create_product(&self, draft: &ProductDraft) -> ServiceResult<Product> {
        self.ensure_available()?;
        let mut state = self.state.write().await;
        state.next_product_id += 1;
        let product = Product::from_draft(ProductId(state.next_product_id), draft);
        state.products.push(product.clone());
        Ok(state.hydrate(&product))
    }

    async fn update_product(&self, id: ProductId, draft: &ProductDraft) -> ServiceResult<Product> {
        self.ensure_available()?;
        let mut state = self.state.write().await;
        let index = state.product_index(id)?;
        let created_at = state.products[index].created_at;
        state.products[index] = Product { created_at, ..Product::from_draft(id, draft) };
        Ok(state.hydrate(&state.products[index]))
    }

    async fn delete_product(&self, id: ProductId) -> ServiceResult<()> {
        self.ensure_available()?;
        let mut state = self.state.write().await;
        let index = state.product_index(id)?;
        state.products.remove(index);
        state.images.retain(|image| image.product_id != id);
        Ok(())
    }
}

#[async_trait]
impl LookupService for InMemoryCatalog {
    async fn list_brands(&self) -> ServiceResult<Vec<Brand>> {
        self.ensure_available()?;
        Ok(self.state.read().await.brands.clone())
    }

    async fn list_categories(&self) -> ServiceResult<Vec<Category>> {
        self.ensure_available()?;
        Ok(self.state.read().await.categories.clone())
    }
}

#[async_trait]
impl OwnerService for InMemoryCatalog {
    async fn sign_in(&self, credentials: &SignInCredentials) -> ServiceResult<SignInGrant> {
        self.ensure_available()?;
        let state = self.state.read().await;
        let (owner, password) = state
            .owners
            .iter()
            .find(|(owner, _)| owner.email == credentials.email)
            .ok_or_else(|| ServiceError::not_found("owner not found"))?;

        if password != credentials.password.expose_secret() {
            return Err(ServiceError::new(
                ServiceErrorKind::InvalidRequest,
                "password is incorrect",
            ));
        }

        Ok(SignInGrant {
            token_type: "Bearer".to_string(),
            token: SecretString::from(format!("memory-token-{}", owner.id)),
            id: owner.id,
        })
    }

    async fn create_owner(&self, draft: &OwnerDraft) -> ServiceResult<Owner> {
        self.ensure_available()?;
        let mut state = self.state.write().await;
        if state.owners.iter().any(|(owner, _)| owner.email == draft.email) {
            return Err(ServiceError::new(
                ServiceErrorKind::InvalidRequest,
                format!("owner with email {} already exists", draft.email),
            ));
        }
        state.next_owner_id += 1;
        let owner = Owner {
            id: OwnerId(state.next_owner_id),
            first_name: draft.first_name.clone(),
            last_name: draft.last_name.clone(),
            email: draft.email.clone(),
            profile_path: draft.profile_path.clone(),
        };
        state.owners.push((owner.clone(), draft.password.expose_secret().to_string()));
        Ok(owner)
    }

    async fn list_owners(&self) -> ServiceResult<Vec<Owner>> {
        self.ensure_available()?;
        Ok(self.state.read().await.owners.iter().map(|(owner, _)| owner.clone()).collect())
    }

    async fn get_owner(&self, id: OwnerId) -> ServiceResult<Owner> {
        self.ensure_available()?;
        self.state
            .read()
            .await
            .owners
            .iter()
            .find(|(owner, _)| owner.id == id)
            .map(|(owner, _)| owner.clone())
            .ok_or_else(|| ServiceError::not_found(format!("owner {id} not found")))
    }
}

#[async_trait]
impl ImageService for InMemoryCatalog {
    async fn list_images(&self) -> ServiceResult<Vec<Image>> {
        self.ensure_available()?;
        Ok(self.state.read().await.images.clone())
    }

    async fn images_for_product(&self, product_id: ProductId) -> ServiceResult<Vec<Image>> {
        self.ensure_available()?;
        let state = self.state.read().await;
        Ok(state.images.iter().filter(|image| image.product_id == product_id).cloned().collect())
    }

    async fn upload_images(
        &self,
        product_id: ProductId,
        uploads: &[ImageUpload],
    ) -> ServiceResult<()> {
        self.ensure_available()?;
        if uploads.is_empty() {
            return Err(ServiceError::new(ServiceErrorKind::InvalidRequest, "No file is received"));
        }
        let mut state = self.state.write().await;
        state.product_index(product_id)?;
        for upload in uploads {
            state.next_image_id += 1;
            let image = Image {
                id: ImageId(state.next_image_id),
                product_id,
                file_path: storage_path(product_id, &upload.file_name),
            };
            state.images.push(image);
        }
        Ok(())
    }

    async fn replace_image(&self, image_id: ImageId, upload: &ImageUpload) -> ServiceResult<()> {
        self.ensure_available()?;
        let mut state = self.state.write().await;
        let image = state
            .images
            .iter_mut()
            .find(|image| image.id == image_id)
            .ok_or_else(|| ServiceError::not_found("Image not found"))?;
        image.file_path = storage_path(image.product_id, &upload.file_name);
        Ok(())
    }
}

fn storage_path(product_id: ProductId, file_name: &str) -> String {
    format!("images/product/product{product_id}/{file_name}")
}
