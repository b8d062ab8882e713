use catalog_admin_core::domain::owner::OwnerId;
use catalog_admin_core::errors::AdminError;
use catalog_admin_core::forms::OwnerFormInput;
use catalog_admin_core::service::OwnerService;
use clap::Args;
use secrecy::SecretString;
use tracing::info;

use super::products::service_failure;
use super::render::owners_table;
use super::{CommandEnv, CommandResult};

#[derive(Debug, Clone, Default, Args)]
pub struct RegisterArgs {
    #[arg(long)]
    pub first_name: Option<String>,
    #[arg(long)]
    pub last_name: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long, help = "Falls back to CATALOG_ADMIN_PASSWORD when omitted")]
    pub password: Option<String>,
    #[arg(long, help = "Stored path of the owner's profile picture")]
    pub profile_path: Option<String>,
}

pub async fn register<S: OwnerService>(
    service: &S,
    env: &CommandEnv<'_>,
    args: RegisterArgs,
) -> CommandResult {
    const COMMAND: &str = "owners register";

    let form = OwnerFormInput {
        first_name: args.first_name,
        last_name: args.last_name,
        email: args.email,
        password: args.password.map(SecretString::from),
        profile_path: args.profile_path,
    };
    let draft = match form.validate() {
        Ok(draft) => draft,
        Err(errors) => return CommandResult::from_error(COMMAND, &AdminError::Form(errors)),
    };

    match service.create_owner(&draft).await {
        Ok(owner) => {
            info!(
                event_name = "catalog.owner.registered",
                owner_id = owner.id.0,
                "owner registered"
            );
            let message = format!("Registered owner #{} {}", owner.id, owner.display_name());
            CommandResult::report(COMMAND, env.mode, message.clone(), || message, &owner)
        }
        Err(error) => service_failure(COMMAND, error),
    }
}

pub async fn list<S: OwnerService>(service: &S, env: &CommandEnv<'_>) -> CommandResult {
    match service.list_owners().await {
        Ok(owners) => CommandResult::report(
            "owners list",
            env.mode,
            format!("{} owner(s)", owners.len()),
            || owners_table(&owners, env.api),
            &owners,
        ),
        Err(error) => service_failure("owners list", error),
    }
}

pub async fn show<S: OwnerService>(service: &S, env: &CommandEnv<'_>, id: u64) -> CommandResult {
    match service.get_owner(OwnerId(id)).await {
        Ok(owner) => CommandResult::report(
            "owners show",
            env.mode,
            format!("owner #{id}"),
            || owners_table(std::slice::from_ref(&owner), env.api),
            &owner,
        ),
        Err(error) => service_failure("owners show", error),
    }
}
