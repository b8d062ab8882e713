use catalog_admin_core::errors::{AdminError, ServiceErrorKind};
use catalog_admin_core::forms::SignInFormInput;
use catalog_admin_core::service::OwnerService;
use catalog_admin_core::session::{SessionContext, SessionStore};
use clap::Args;
use secrecy::SecretString;
use serde::Serialize;

use super::{CommandEnv, CommandResult};

#[derive(Debug, Clone, Default, Args)]
pub struct LoginArgs {
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long, help = "Falls back to CATALOG_ADMIN_PASSWORD when omitted")]
    pub password: Option<String>,
}

#[derive(Serialize)]
struct Identity<'a> {
    owner_id: u64,
    name: String,
    profile_url: Option<String>,
    token_type: &'a str,
}

pub async fn login<S, T>(
    service: &S,
    session: &mut SessionContext<T>,
    env: &CommandEnv<'_>,
    args: LoginArgs,
) -> CommandResult
where
    S: OwnerService,
    T: SessionStore,
{
    const COMMAND: &str = "login";

    let form =
        SignInFormInput { email: args.email, password: args.password.map(SecretString::from) };
    match session.sign_in(service, &form).await {
        Ok(signed_in) => {
            let message = format!("Signed in as {}", signed_in.display_name());
            CommandResult::done(COMMAND, env.mode, message)
        }
        Err(AdminError::Service(error))
            if matches!(
                error.kind,
                ServiceErrorKind::NotFound
                    | ServiceErrorKind::InvalidRequest
                    | ServiceErrorKind::Unauthorized
            ) =>
        {
            CommandResult::failure(
                COMMAND,
                "invalid_credentials",
                "Email or password is incorrect.",
                4,
            )
        }
        Err(error) => CommandResult::from_error(COMMAND, &error),
    }
}

pub fn logout<T: SessionStore>(
    session: &mut SessionContext<T>,
    env: &CommandEnv<'_>,
) -> CommandResult {
    const COMMAND: &str = "logout";

    let was_signed_in = session.is_signed_in();
    match session.sign_out() {
        Ok(()) if was_signed_in => CommandResult::done(COMMAND, env.mode, "Signed out"),
        Ok(()) => CommandResult::done(COMMAND, env.mode, "No owner was signed in"),
        Err(error) => CommandResult::from_error(COMMAND, &AdminError::Session(error)),
    }
}

pub fn whoami<T: SessionStore>(session: &SessionContext<T>, env: &CommandEnv<'_>) -> CommandResult {
    const COMMAND: &str = "whoami";

    let current = match session.require_signed_in() {
        Ok(current) => current,
        Err(error) => return CommandResult::from_error(COMMAND, &AdminError::Session(error)),
    };

    let identity = Identity {
        owner_id: current.owner_id.0,
        name: current.display_name(),
        profile_url: current.profile_path.as_deref().map(|path| env.api.asset_url(path)),
        token_type: &current.token_type,
    };
    CommandResult::report(
        COMMAND,
        env.mode,
        format!("signed in as owner #{}", identity.owner_id),
        || {
            let mut lines = vec![format!("{} (owner #{})", identity.name, identity.owner_id)];
            if let Some(url) = &identity.profile_url {
                lines.push(format!("Profile image: {url}"));
            }
            lines.join("\n")
        },
        &identity,
    )
}
