//! Seams to the remote Product Service.
//!
//! `catalog-admin-client` implements these over HTTP; [`memory::InMemoryCatalog`]
//! implements them in process for tests and offline demos.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::image::{Image, ImageId, ImageUpload};
use crate::domain::lookup::{Brand, Category};
use crate::domain::owner::{Owner, OwnerDraft, OwnerId, SignInCredentials, SignInGrant};
use crate::domain::product::{Product, ProductDraft, ProductId};
use crate::errors::ServiceResult;

pub mod memory;

pub use memory::InMemoryCatalog;

#[async_trait]
pub trait ProductService: Send + Sync {
    async fn list_products(&self) -> ServiceResult<Vec<Product>>;
    async fn get_product(&self, id: ProductId) -> ServiceResult<Product>;
    async fn create_product(&self, draft: &ProductDraft) -> ServiceResult<Product>;
    async fn update_product(&self, id: ProductId, draft: &ProductDraft) -> ServiceResult<Product>;
    async fn delete_product(&self, id: ProductId) -> ServiceResult<()>;
}

#[async_trait]
pub trait LookupService: Send + Sync {
    async fn list_brands(&self) -> ServiceResult<Vec<Brand>>;
    async fn list_categories(&self) -> ServiceResult<Vec<Category>>;
}

#[async_trait]
pub trait OwnerService: Send + Sync {
    async fn sign_in(&self, credentials: &SignInCredentials) -> ServiceResult<SignInGrant>;
    async fn create_owner(&self, draft: &OwnerDraft) -> ServiceResult<Owner>;
    async fn list_owners(&self) -> ServiceResult<Vec<Owner>>;
    async fn get_owner(&self, id: OwnerId) -> ServiceResult<Owner>;
}

#[async_trait]
pub trait ImageService: Send + Sync {
    async fn list_images(&self) -> ServiceResult<Vec<Image>>;
    async fn images_for_product(&self, product_id: ProductId) -> ServiceResult<Vec<Image>>;
    async fn upload_images(
        &self,
        product_id: ProductId,
        uploads: &[ImageUpload],
    ) -> ServiceResult<()>;
    async fn replace_image(&self, image_id: ImageId, upload: &ImageUpload) -> ServiceResult<()>;
}

#[async_trait]
impl<T: ProductService + ?Sized> ProductService for Arc<T> {
    async fn list_products(&self) -> ServiceResult<Vec<Product>> {
        (**self).list_products().await
    }

    async fn get_product(&self, id: ProductId) -> ServiceResult<Product> {
        (**self).get_product(id).await
    }

    async fn create_product(&self, draft: &ProductDraft) -> ServiceResult<Product> {
        (**self).create_product(draft).await
    }

    async fn update_product(&self, id: ProductId, draft: &ProductDraft) -> ServiceResult<Product> {
        (**self).update_product(id, draft).await
    }

    async fn delete_product(&self, id: ProductId) -> ServiceResult<()> {
        (**self).delete_product(id).await
    }
}

#[async_trait]
impl<T: LookupService + ?Sized> LookupService for Arc<T> {
    async fn list_brands(&self) -> ServiceResult<Vec<Brand>> {
        (**self).list_brands().await
    }

    async fn list_categories(&self) -> ServiceResult<Vec<Category>> {
        (**self).list_categories().await
    }
}

#[async_trait]
impl<T: OwnerService + ?Sized> OwnerService for Arc<T> {
    async fn sign_in(&self, credentials: &SignInCredentials) -> ServiceResult<SignInGrant> {
        (**self).sign_in(credentials).await
    }

    async fn create_owner(&self, draft: &OwnerDraft) -> ServiceResult<Owner> {
        (**self).create_owner(draft).await
    }

    async fn list_owners(&self) -> ServiceResult<Vec<Owner>> {
        (**self).list_owners().await
    }

    async fn get_owner(&self, id: OwnerId) -> ServiceResult<Owner> {
        (**self).get_owner(id).await
    }
}

#[async_trait]
impl<T: ImageService + ?Sized> ImageService for Arc<T> {
    async fn list_images(&self) -> ServiceResult<Vec<Image>> {
        (**self).list_images().await
    }

    async fn images_for_product(&self, product_id: ProductId) -> ServiceResult<Vec<Image>> {
        (**self).images_for_product(product_id).await
    }

    async fn upload_images(
        &self,
        product_id: ProductId,
        uploads: &[ImageUpload],
    ) -> ServiceResult<()> {
        (**self).upload_images(product_id, uploads).await
    }

    async fn replace_image(&self, image_id: ImageId, upload: &ImageUpload) -> ServiceResult<()> {
        (**self).replace_image(image_id, upload).await
    }
}
