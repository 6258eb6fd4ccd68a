use clap::Subcommand;
use uuid::Uuid;

use crate::cli::commands::departments::submit_form;
use crate::cli::context::AppContext;
use crate::cli::utils::{output_error, output_item, output_page, output_success};
use crate::cli::OutputFormat;
use crate::forms::FormController;
use crate::list::fetchers::UserFetcher;
use crate::list::{FilterState, ListController, LoadState};
use crate::validate::field;
use crate::validate::schemas::UserDraft;

#[derive(Subcommand)]
pub enum UserCommands {
    #[command(about = "List users, paged and filtered")]
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long)]
        page_size: Option<u32>,
        #[arg(long, help = "Search by email")]
        search: Option<String>,
        #[arg(long, help = "Filter by creation date (YYYY-MM-DD)")]
        date: Option<String>,
        #[arg(long, help = "Scope to a department (requires --level-id)")]
        department_id: Option<Uuid>,
        #[arg(long, help = "Scope to a level (requires --department-id)")]
        level_id: Option<Uuid>,
    },

    #[command(about = "Show one user")]
    Show {
        #[arg(help = "User id")]
        id: Uuid,
    },

    #[command(about = "Register a user")]
    Create {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long, help = "true or false")]
        admin: String,
        #[arg(long)]
        department_id: Uuid,
        #[arg(long)]
        level_id: Uuid,
    },

    #[command(about = "Update a user")]
    Update {
        #[arg(help = "User id")]
        id: Uuid,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        password: Option<String>,
        #[arg(long, help = "true or false")]
        admin: Option<String>,
        #[arg(long)]
        department_id: Option<Uuid>,
        #[arg(long)]
        level_id: Option<Uuid>,
    },

    #[command(about = "Delete a user")]
    Delete {
        #[arg(help = "User id")]
        id: Uuid,
    },
}

pub async fn handle(cmd: UserCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let ctx = AppContext::new()?;

    match cmd {
        UserCommands::List { page, page_size, search, date, department_id, level_id } => {
            ctx.ensure_admin().await?;
            let mut filter = FilterState::default();
            filter.page_num = page.max(1);
            if let Some(page_size) = page_size {
                filter.page_size = page_size;
            }
            filter.search = search;
            filter.created_at = date;
            filter.department_id = department_id;
            filter.level_id = level_id;

            let controller =
                ListController::with_filter(UserFetcher { client: ctx.users() }, filter);
            controller.refetch().await;
            let snapshot = controller.snapshot();
            if snapshot.state == LoadState::Error {
                output_error(&output_format, "Error fetching all users.", None)?;
                std::process::exit(1);
            }
            output_page(&output_format, &snapshot)
        }
        UserCommands::Show { id } => {
            ctx.ensure_admin().await?;
            match ctx.users().fetch_one(id).await {
                Ok(user) => output_item(&output_format, &user),
                Err(e) => {
                    output_error(&output_format, e.message(), Some(e.error_code()))?;
                    std::process::exit(1);
                }
            }
        }
        UserCommands::Create { email, password, admin, department_id, level_id } => {
            ctx.ensure_admin().await?;
            let mut form = FormController::add(ctx.users(), ctx.notifier.clone());
            *form.draft_mut() = UserDraft {
                email,
                password,
                is_admin: decode_admin(&output_format, &admin)?,
                department_id: Some(department_id),
                level_id: Some(level_id),
            };
            submit_form(&output_format, &mut form, "User added successfully.").await
        }
        UserCommands::Update { id, email, password, admin, department_id, level_id } => {
            ctx.ensure_admin().await?;
            let current = match ctx.users().fetch_one(id).await {
                Ok(user) => user,
                Err(e) => {
                    output_error(&output_format, e.message(), Some(e.error_code()))?;
                    std::process::exit(1);
                }
            };

            let seed = UserDraft {
                email: email.unwrap_or(current.email),
                password: password.unwrap_or_default(),
                is_admin: match admin {
                    Some(raw) => decode_admin(&output_format, &raw)?,
                    None => Some(current.is_admin),
                },
                department_id: department_id.or(current.department_id),
                level_id: level_id.or(current.level_id),
            };
            let mut form = FormController::edit(ctx.users(), ctx.notifier.clone(), id, seed);
            submit_form(&output_format, &mut form, "User updated successfully.").await
        }
        UserCommands::Delete { id } => {
            ctx.ensure_admin().await?;
            match ctx.users().delete(id).await {
                Ok(()) => output_success(&output_format, "User deleted successfully.", None),
                Err(e) => {
                    output_error(&output_format, e.message(), Some(e.error_code()))?;
                    std::process::exit(1);
                }
            }
        }
    }
}

fn decode_admin(output_format: &OutputFormat, raw: &str) -> anyhow::Result<Option<bool>> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    match field::decode_bool(raw) {
        Ok(value) => Ok(Some(value)),
        Err(message) => {
            output_error(output_format, &message, None)?;
            std::process::exit(1);
        }
    }
}
