use catalog_admin_core::service::LookupService;

use super::products::service_failure;
use super::render::{brands_table, categories_table};
use super::{CommandEnv, CommandResult};

pub async fn brands<S: LookupService>(service: &S, env: &CommandEnv<'_>) -> CommandResult {
    match service.list_brands().await {
        Ok(brands) => CommandResult::report(
            "brands",
            env.mode,
            format!("{} brand(s)", brands.len()),
            || brands_table(&brands),
            &brands,
        ),
        Err(error) => service_failure("brands", error),
    }
}

pub async fn categories<S: LookupService>(service: &S, env: &CommandEnv<'_>) -> CommandResult {
    match service.list_categories().await {
        Ok(categories) => CommandResult::report(
            "categories",
            env.mode,
            format!("{} categories", categories.len()),
            || categories_table(&categories),
            &categories,
        ),
        Err(error) => service_failure("categories", error),
    }
}
