use std::path::PathBuf;

use catalog_admin_core::domain::image::ImageId;
use catalog_admin_core::domain::product::ProductId;
use catalog_admin_core::service::ImageService;

use super::products::{read_upload, read_uploads, service_failure};
use super::render::images_table;
use super::{CommandEnv, CommandResult};

pub async fn list<S: ImageService>(
    service: &S,
    env: &CommandEnv<'_>,
    product: Option<u64>,
) -> CommandResult {
    const COMMAND: &str = "images list";

    let images = match product {
        Some(id) => service.images_for_product(ProductId(id)).await,
        None => service.list_images().await,
    };
    match images {
        Ok(images) => CommandResult::report(
            COMMAND,
            env.mode,
            format!("{} image(s)", images.len()),
            || images_table(&images, env.api),
            &images,
        ),
        Err(error) => service_failure(COMMAND, error),
    }
}

pub async fn upload<S: ImageService>(
    service: &S,
    env: &CommandEnv<'_>,
    product_id: u64,
    files: &[PathBuf],
) -> CommandResult {
    const COMMAND: &str = "images upload";

    if files.is_empty() {
        let message = "at least one image file is required";
        return CommandResult::failure(COMMAND, "validation", message, 5);
    }
    let uploads = match read_uploads(COMMAND, files) {
        Ok(uploads) => uploads,
        Err(result) => return result,
    };

    match service.upload_images(ProductId(product_id), &uploads).await {
        Ok(()) => CommandResult::done(
            COMMAND,
            env.mode,
            format!("Uploaded {} image(s) to product #{product_id}", uploads.len()),
        ),
        Err(error) => service_failure(COMMAND, error),
    }
}

pub async fn replace<S: ImageService>(
    service: &S,
    env: &CommandEnv<'_>,
    image_id: u64,
    file: &PathBuf,
) -> CommandResult {
    const COMMAND: &str = "images replace";

    let upload = match read_upload(COMMAND, file) {
        Ok(upload) => upload,
        Err(result) => return result,
    };

    match service.replace_image(ImageId(image_id), &upload).await {
        Ok(()) => CommandResult::done(COMMAND, env.mode, format!("Replaced image #{image_id}")),
        Err(error) => service_failure(COMMAND, error),
    }
}
