use clap::Subcommand;

use crate::cli::context::AppContext;
use crate::cli::utils::{output_error, output_field_errors, output_item, output_success};
use crate::cli::OutputFormat;
use crate::validate::schemas::LoginDraft;
use crate::validate::Schema;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Login to the vault API")]
    Login {
        #[arg(help = "Account email")]
        email: String,
        #[arg(long, help = "Password (will prompt if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Logout from the vault API")]
    Logout,

    #[command(about = "Show current user information")]
    Whoami,

    #[command(about = "Register a new account")]
    Register {
        #[arg(help = "Account email")]
        email: String,
        #[arg(long, help = "Password (will prompt if not provided)")]
        password: Option<String>,
        #[arg(long)]
        department_id: uuid::Uuid,
        #[arg(long)]
        level_id: uuid::Uuid,
    },
}

pub async fn handle(cmd: AuthCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let ctx = AppContext::new()?;

    match cmd {
        AuthCommands::Login { email, password } => {
            let password = match password {
                Some(password) => password,
                None => prompt_password()?,
            };

            let draft = LoginDraft { email: email.clone(), password: password.clone() };
            if let Err(e) = draft.validate() {
                output_field_errors(&output_format, e.field_errors().unwrap_or(&Default::default()))?;
                std::process::exit(1);
            }

            match ctx.session.login(&email, &password).await {
                Ok(user) => {
                    output_success(
                        &output_format,
                        &format!("Logged in as {}", user.email),
                        Some(serde_json::json!({ "user_id": user.id })),
                    )?;
                }
                Err(e) => {
                    output_error(&output_format, e.message(), Some(e.error_code()))?;
                    std::process::exit(1);
                }
            }
            Ok(())
        }
        AuthCommands::Logout => {
            ctx.authenticate().await?;
            ctx.session.logout().await;
            output_success(&output_format, "Logged out", None)
        }
        AuthCommands::Whoami => {
            ctx.authenticate().await?;
            match ctx.session.current_user() {
                Some(user) => output_item(&output_format, &user),
                None => {
                    output_error(&output_format, "Not logged in", Some("UNAUTHENTICATED"))?;
                    std::process::exit(1);
                }
            }
        }
        AuthCommands::Register { email, password, department_id, level_id } => {
            let password = match password {
                Some(password) => password,
                None => prompt_password()?,
            };

            let mut form = crate::forms::FormController::add(ctx.users(), ctx.notifier.clone());
            *form.draft_mut() = crate::validate::schemas::UserDraft {
                email,
                password,
                is_admin: Some(false),
                department_id: Some(department_id),
                level_id: Some(level_id),
            };
            crate::cli::commands::departments::submit_form(
                &output_format,
                &mut form,
                "Account registered successfully.",
            )
            .await
        }
    }
}

fn prompt_password() -> anyhow::Result<String> {
    use std::io::{BufRead, Write};

    eprint!("Password: ");
    std::io::stderr().flush()?;
    let mut password = String::new();
    std::io::stdin().lock().read_line(&mut password)?;
    Ok(password.trim_end_matches(['\r', '\n']).to_string())
}
