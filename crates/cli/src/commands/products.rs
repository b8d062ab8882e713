//! `products` subcommands. Listing and deletion go through [`ProductStore`]
//! so search, no-match recovery and the two-phase delete behave exactly as
//! they do in the listing view.

use std::fs;
use std::path::{Path, PathBuf};

use catalog_admin_core::domain::image::ImageUpload;
use catalog_admin_core::domain::lookup::{resolve_brand, resolve_category};
use catalog_admin_core::domain::product::{Product, ProductId};
use catalog_admin_core::errors::{AdminError, ServiceError};
use catalog_admin_core::filter::FilterQuery;
use catalog_admin_core::forms::ProductFormInput;
use catalog_admin_core::service::{ImageService, LookupService, ProductService};
use catalog_admin_core::store::{DeleteOutcome, ProductStore, RefreshOutcome, SearchOutcome};
use clap::Args;
use serde::Serialize;
use tracing::info;

use super::render::{product_detail, products_table};
use super::{CommandEnv, CommandResult, Confirm};

#[derive(Debug, Clone, Default, Args)]
pub struct ListArgs {
    #[arg(long, short = 's', help = "Product id, or text contained in the product name")]
    pub search: Option<String>,
    #[arg(long, help = "Brand id or name")]
    pub brand: Option<String>,
    #[arg(long, help = "Category id or name")]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default, Args)]
pub struct ProductArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long, help = "Price per piece")]
    pub price: Option<String>,
    #[arg(long, help = "Quantity in stock")]
    pub stock: Option<String>,
    #[arg(long, help = "Brand id or name")]
    pub brand: Option<String>,
    #[arg(long, help = "Category id or name")]
    pub category: Option<String>,
    #[arg(long = "image", value_name = "FILE", help = "Image file to upload (repeatable)")]
    pub images: Vec<PathBuf>,
}

#[derive(Serialize)]
struct ListReport<'a> {
    products: &'a [Product],
    notice: Option<&'a str>,
}

pub async fn list<S>(service: S, env: &CommandEnv<'_>, args: &ListArgs) -> CommandResult
where
    S: ProductService + LookupService,
{
    const COMMAND: &str = "products list";

    let mut store = ProductStore::new(service).with_reset_delay(env.reset_delay);
    if let RefreshOutcome::Failed(error) = store.activate().await {
        return CommandResult::from_error(COMMAND, &AdminError::Service(error));
    }

    let query = match build_query(store.service(), args).await {
        Ok(query) => query,
        Err(result) => return result,
    };

    let mut notice = None;
    if let Some(query) = query {
        if let SearchOutcome::NoMatch(recovery) = store.search(&query) {
            notice = Some(format!(
                "No products match {}; showing all products.",
                describe_query(recovery.query())
            ));
            store.recover(recovery).await;
        }
    }

    let products = store.displayed();
    let report = ListReport { products, notice: notice.as_deref() };
    CommandResult::report(
        COMMAND,
        env.mode,
        format!("{} product(s)", products.len()),
        || match &notice {
            Some(notice) => format!("{notice}\n{}", products_table(products, env.api)),
            None => products_table(products, env.api),
        },
        &report,
    )
}

async fn build_query<S: LookupService>(
    service: &S,
    args: &ListArgs,
) -> Result<Option<FilterQuery>, CommandResult> {
    const COMMAND: &str = "products list";

    if args.search.is_none() && args.brand.is_none() && args.category.is_none() {
        return Ok(None);
    }

    let mut query = FilterQuery::new(args.search.clone().unwrap_or_default());
    if let Some(selector) = &args.brand {
        let brands =
            service.list_brands().await.map_err(|error| service_failure(COMMAND, error))?;
        let brand = resolve_brand(&brands, selector)
            .ok_or_else(|| unknown_selector(COMMAND, "brand", selector))?;
        query = query.with_brand(Some(brand.id));
    }
    if let Some(selector) = &args.category {
        let categories =
            service.list_categories().await.map_err(|error| service_failure(COMMAND, error))?;
        let category = resolve_category(&categories, selector)
            .ok_or_else(|| unknown_selector(COMMAND, "category", selector))?;
        query = query.with_category(Some(category.id));
    }
    Ok(Some(query))
}

fn describe_query(query: &FilterQuery) -> String {
    let mut parts = Vec::new();
    if !query.term.trim().is_empty() {
        parts.push(format!("\"{}\"", query.term));
    }
    if let Some(brand) = query.brand_id {
        parts.push(format!("brand #{brand}"));
    }
    if let Some(category) = query.category_id {
        parts.push(format!("category #{category}"));
    }
    if parts.is_empty() {
        "the search".to_string()
    } else {
        parts.join(" + ")
    }
}

pub async fn show<S>(service: &S, env: &CommandEnv<'_>, id: u64) -> CommandResult
where
    S: ProductService,
{
    const COMMAND: &str = "products show";

    match service.get_product(ProductId(id)).await {
        Ok(product) => CommandResult::report(
            COMMAND,
            env.mode,
            format!("product #{id}"),
            || product_detail(&product, env.api),
            &product,
        ),
        Err(error) => service_failure(COMMAND, error),
    }
}

pub async fn create<S>(service: S, env: &CommandEnv<'_>, args: &ProductArgs) -> CommandResult
where
    S: ProductService + LookupService + ImageService,
{
    const COMMAND: &str = "products create";

    let uploads = match read_uploads(COMMAND, &args.images) {
        Ok(uploads) => uploads,
        Err(result) => return result,
    };
    let form = match resolve_selectors(COMMAND, &service, form_input(args)).await {
        Ok(form) => form,
        Err(result) => return result,
    };
    let draft = match form.validate() {
        Ok(draft) => draft,
        Err(errors) => return CommandResult::from_error(COMMAND, &AdminError::Form(errors)),
    };

    let mut store = ProductStore::new(service).with_reset_delay(env.reset_delay);
    let created = match store.create(&draft).await {
        Ok(created) => created,
        Err(error) => return service_failure(COMMAND, error),
    };

    if let Err(result) = attach_images(COMMAND, store.service(), created.id, &uploads).await {
        return result;
    }

    let message = format!(
        "Created product #{} \"{}\" with {} image(s)",
        created.id,
        created.name,
        uploads.len()
    );
    CommandResult::report(COMMAND, env.mode, message.clone(), || message, &created)
}

pub async fn update<S>(
    service: S,
    env: &CommandEnv<'_>,
    id: u64,
    args: &ProductArgs,
) -> CommandResult
where
    S: ProductService + LookupService + ImageService,
{
    const COMMAND: &str = "products update";

    let uploads = match read_uploads(COMMAND, &args.images) {
        Ok(uploads) => uploads,
        Err(result) => return result,
    };
    let current = match service.get_product(ProductId(id)).await {
        Ok(product) => product,
        Err(error) => return service_failure(COMMAND, error),
    };
    let changes = match resolve_selectors(COMMAND, &service, form_input(args)).await {
        Ok(changes) => changes,
        Err(result) => return result,
    };
    let draft = match ProductFormInput::from_product(&current).merge(changes).validate() {
        Ok(draft) => draft,
        Err(errors) => return CommandResult::from_error(COMMAND, &AdminError::Form(errors)),
    };

    let mut store = ProductStore::new(service).with_reset_delay(env.reset_delay);
    let updated = match store.update(ProductId(id), &draft).await {
        Ok(updated) => updated,
        Err(error) => return service_failure(COMMAND, error),
    };
    if let Err(result) = attach_images(COMMAND, store.service(), updated.id, &uploads).await {
        return result;
    }

    let message = format!("Updated product #{} \"{}\"", updated.id, updated.name);
    CommandResult::report(COMMAND, env.mode, message.clone(), || message, &updated)
}

/// Uploads images for a product that was already saved.
async fn attach_images<S: ImageService>(
    command: &str,
    service: &S,
    product_id: ProductId,
    uploads: &[ImageUpload],
) -> Result<(), CommandResult> {
    if uploads.is_empty() {
        return Ok(());
    }

    if let Err(error) = service.upload_images(product_id, uploads).await {
        let error = AdminError::Service(error);
        return Err(CommandResult::failure(
            command,
            error.error_class(),
            format!(
                "Product #{product_id} was saved but its images were not uploaded. {} ({error})",
                error.user_message()
            ),
            error.exit_code(),
        ));
    }
    info!(
        event_name = "catalog.product.images_uploaded",
        product_id = product_id.0,
        count = uploads.len(),
        "product images uploaded"
    );
    Ok(())
}

pub async fn delete<S, C>(
    service: S,
    env: &CommandEnv<'_>,
    id: u64,
    confirm: &mut C,
) -> CommandResult
where
    S: ProductService,
    C: Confirm + ?Sized,
{
    const COMMAND: &str = "products delete";

    let mut store = ProductStore::new(service).with_reset_delay(env.reset_delay);
    // Only used for the prompt; a failed listing falls back to the id.
    let _ = store.activate().await;

    let prompt = match store.request_delete(ProductId(id)) {
        Ok(prompt) => prompt,
        Err(error) => return CommandResult::from_error(COMMAND, &AdminError::Delete(error)),
    };

    if !confirm.confirm(&prompt.message()) {
        if let Err(error) = store.cancel_delete() {
            return CommandResult::from_error(COMMAND, &AdminError::Delete(error));
        }
        return CommandResult::done(COMMAND, env.mode, "Delete cancelled; nothing was changed.");
    }

    match store.confirm_delete().await {
        Ok(DeleteOutcome::Deleted { product_id, refresh }) => {
            let message = if refresh.is_refreshed() {
                format!("Deleted product #{product_id}")
            } else {
                format!("Deleted product #{product_id} (the product list could not be refreshed)")
            };
            CommandResult::done(COMMAND, env.mode, message)
        }
        Ok(DeleteOutcome::Failed { error, .. }) => service_failure(COMMAND, error),
        Err(error) => CommandResult::from_error(COMMAND, &AdminError::Delete(error)),
    }
}

fn form_input(args: &ProductArgs) -> ProductFormInput {
    ProductFormInput {
        name: args.name.clone(),
        description: args.description.clone(),
        price: args.price.clone(),
        stock: args.stock.clone(),
        brand_id: args.brand.clone(),
        category_id: args.category.clone(),
    }
}

/// Swaps brand and category selectors for the ids they name.
async fn resolve_selectors<S: LookupService>(
    command: &str,
    service: &S,
    mut form: ProductFormInput,
) -> Result<ProductFormInput, CommandResult> {
    if let Some(selector) = form.brand_id.clone().filter(|value| !value.trim().is_empty()) {
        let brands =
            service.list_brands().await.map_err(|error| service_failure(command, error))?;
        let brand = resolve_brand(&brands, &selector)
            .ok_or_else(|| unknown_selector(command, "brand", &selector))?;
        form.brand_id = Some(brand.id.to_string());
    }
    if let Some(selector) = form.category_id.clone().filter(|value| !value.trim().is_empty()) {
        let categories =
            service.list_categories().await.map_err(|error| service_failure(command, error))?;
        let category = resolve_category(&categories, &selector)
            .ok_or_else(|| unknown_selector(command, "category", &selector))?;
        form.category_id = Some(category.id.to_string());
    }
    Ok(form)
}

pub(crate) fn read_uploads(
    command: &str,
    paths: &[PathBuf],
) -> Result<Vec<ImageUpload>, CommandResult> {
    paths.iter().map(|path| read_upload(command, path)).collect()
}

pub(crate) fn read_upload(command: &str, path: &Path) -> Result<ImageUpload, CommandResult> {
    let bytes = fs::read(path).map_err(|error| {
        CommandResult::failure(
            command,
            "image_file",
            format!("could not read image `{}`: {error}", path.display()),
            5,
        )
    })?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    Ok(ImageUpload::new(file_name, bytes))
}

pub(crate) fn service_failure(command: &str, error: ServiceError) -> CommandResult {
    CommandResult::from_error(command, &AdminError::Service(error))
}

fn unknown_selector(command: &str, kind: &str, selector: &str) -> CommandResult {
    CommandResult::failure(command, "validation", format!("unknown {kind} `{selector}`"), 5)
}
