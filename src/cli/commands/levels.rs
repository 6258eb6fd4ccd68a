use clap::Subcommand;
use uuid::Uuid;

use crate::cli::commands::departments::submit_form;
use crate::cli::context::AppContext;
use crate::cli::utils::{output_error, output_item, output_page, output_success};
use crate::cli::OutputFormat;
use crate::forms::FormController;
use crate::list::fetchers::LevelFetcher;
use crate::list::{FilterState, ListController, LoadState};
use crate::validate::schemas::LevelDraft;

#[derive(Subcommand)]
pub enum LevelCommands {
    #[command(about = "List levels, paged")]
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long)]
        page_size: Option<u32>,
    },

    #[command(about = "Show one level")]
    Show {
        #[arg(help = "Level id")]
        id: Uuid,
    },

    #[command(about = "Add a level (100-500)")]
    Create {
        #[arg(help = "Level name: 100, 200, 300, 400 or 500")]
        level: String,
    },

    #[command(about = "Update a level")]
    Update {
        #[arg(help = "Level id")]
        id: Uuid,
        #[arg(help = "Level name: 100, 200, 300, 400 or 500")]
        level: String,
    },

    #[command(about = "Delete a level")]
    Delete {
        #[arg(help = "Level id")]
        id: Uuid,
    },
}

pub async fn handle(cmd: LevelCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let ctx = AppContext::new()?;

    match cmd {
        LevelCommands::List { page, page_size } => {
            ctx.authenticate().await?;
            let mut filter = FilterState::default();
            filter.page_num = page.max(1);
            if let Some(page_size) = page_size {
                filter.page_size = page_size;
            }

            let controller =
                ListController::with_filter(LevelFetcher { client: ctx.levels() }, filter);
            controller.refetch().await;
            let snapshot = controller.snapshot();
            if snapshot.state == LoadState::Error {
                output_error(&output_format, "Error fetching all levels.", None)?;
                std::process::exit(1);
            }
            output_page(&output_format, &snapshot)
        }
        LevelCommands::Show { id } => {
            ctx.authenticate().await?;
            match ctx.levels().fetch_one(id).await {
                Ok(level) => output_item(&output_format, &level),
                Err(e) => {
                    output_error(&output_format, e.message(), Some(e.error_code()))?;
                    std::process::exit(1);
                }
            }
        }
        LevelCommands::Create { level } => {
            ctx.ensure_admin().await?;
            let mut form = FormController::add(ctx.levels(), ctx.notifier.clone());
            form.draft_mut().level_name = decode_level(&output_format, &level)?;
            submit_form(&output_format, &mut form, "Level added successfully.").await
        }
        LevelCommands::Update { id, level } => {
            ctx.ensure_admin().await?;
            let seed = LevelDraft { level_name: decode_level(&output_format, &level)? };
            let mut form = FormController::edit(ctx.levels(), ctx.notifier.clone(), id, seed);
            submit_form(&output_format, &mut form, "Level updated successfully.").await
        }
        LevelCommands::Delete { id } => {
            ctx.ensure_admin().await?;
            match ctx.levels().delete(id).await {
                Ok(()) => output_success(&output_format, "Level deleted successfully.", None),
                Err(e) => {
                    output_error(&output_format, e.message(), Some(e.error_code()))?;
                    std::process::exit(1);
                }
            }
        }
    }
}

/// Numeric input adapter: "" stays "not provided" for the schema to reject
fn decode_level(output_format: &OutputFormat, raw: &str) -> anyhow::Result<Option<u32>> {
    match crate::validate::field::decode_opt_u32(raw) {
        Ok(value) => Ok(value),
        Err(message) => {
            output_error(output_format, &message, None)?;
            std::process::exit(1);
        }
    }
}
