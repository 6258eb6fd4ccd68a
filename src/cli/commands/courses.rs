use clap::Subcommand;
use uuid::Uuid;

use crate::cli::commands::departments::submit_form;
use crate::cli::context::AppContext;
use crate::cli::utils::{output_error, output_item, output_page, output_success};
use crate::cli::OutputFormat;
use crate::forms::FormController;
use crate::list::fetchers::CourseFetcher;
use crate::list::{FilterState, ListController, LoadState};
use crate::models::Semester;
use crate::validate::field;
use crate::validate::schemas::CourseDraft;

#[derive(Subcommand)]
pub enum CourseCommands {
    #[command(about = "List courses, paged and filtered")]
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long)]
        page_size: Option<u32>,
        #[arg(long, help = "first or second")]
        semester: Option<String>,
        #[arg(long, help = "Search by course code")]
        search: Option<String>,
        #[arg(long, help = "Filter by creation date (YYYY-MM-DD)")]
        date: Option<String>,
    },

    #[command(about = "Show one course")]
    Show {
        #[arg(help = "Course id")]
        id: Uuid,
    },

    #[command(about = "Add a course")]
    Create {
        #[arg(long, help = "Six-character course code")]
        code: String,
        #[arg(long, help = "first or second")]
        semester: String,
        #[arg(long, help = "Credit load, 1-10")]
        credit_load: String,
        #[arg(long)]
        level_id: Uuid,
        #[arg(long)]
        title: String,
        #[arg(long)]
        outline: String,
        #[arg(long, help = "true or false")]
        active: String,
    },

    #[command(about = "Update a course")]
    Update {
        #[arg(help = "Course id")]
        id: Uuid,
        #[arg(long)]
        code: Option<String>,
        #[arg(long)]
        semester: Option<String>,
        #[arg(long)]
        credit_load: Option<String>,
        #[arg(long)]
        level_id: Option<Uuid>,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        outline: Option<String>,
        #[arg(long, help = "true or false")]
        active: Option<String>,
    },

    #[command(about = "Delete a course")]
    Delete {
        #[arg(help = "Course id")]
        id: Uuid,
    },
}

pub async fn handle(cmd: CourseCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let ctx = AppContext::new()?;

    match cmd {
        CourseCommands::List { page, page_size, semester, search, date } => {
            ctx.authenticate().await?;
            let mut filter = FilterState::default();
            filter.page_num = page.max(1);
            if let Some(page_size) = page_size {
                filter.page_size = page_size;
            }
            filter.semester = decode_semester(&output_format, semester)?;
            filter.search = search;
            filter.created_at = date;

            let controller =
                ListController::with_filter(CourseFetcher { client: ctx.courses() }, filter);
            controller.refetch().await;
            let snapshot = controller.snapshot();
            if snapshot.state == LoadState::Error {
                output_error(&output_format, "Error fetching all courses.", None)?;
                std::process::exit(1);
            }
            output_page(&output_format, &snapshot)
        }
        CourseCommands::Show { id } => {
            ctx.authenticate().await?;
            match ctx.courses().fetch_one(id).await {
                Ok(course) => output_item(&output_format, &course),
                Err(e) => {
                    output_error(&output_format, e.message(), Some(e.error_code()))?;
                    std::process::exit(1);
                }
            }
        }
        CourseCommands::Create { code, semester, credit_load, level_id, title, outline, active } => {
            ctx.ensure_admin().await?;
            let mut form = FormController::add(ctx.courses(), ctx.notifier.clone());
            *form.draft_mut() = CourseDraft {
                course_code: code,
                semester: Semester::parse(&semester),
                credit_load: decode_credit_load(&output_format, &credit_load)?,
                level_id: Some(level_id),
                title,
                outline,
                is_active: decode_active(&output_format, &active)?,
            };
            submit_form(&output_format, &mut form, "Course added successfully.").await
        }
        CourseCommands::Update { id, code, semester, credit_load, level_id, title, outline, active } => {
            ctx.ensure_admin().await?;
            let current = match ctx.courses().fetch_one(id).await {
                Ok(course) => course,
                Err(e) => {
                    output_error(&output_format, e.message(), Some(e.error_code()))?;
                    std::process::exit(1);
                }
            };

            let seed = CourseDraft {
                course_code: code.unwrap_or(current.course_code),
                semester: match semester {
                    Some(raw) => Semester::parse(&raw),
                    None => Some(current.semester),
                },
                credit_load: match credit_load {
                    Some(raw) => decode_credit_load(&output_format, &raw)?,
                    None => Some(current.credit_load as u32),
                },
                level_id: Some(level_id.unwrap_or(current.level_id)),
                title: title.unwrap_or(current.title),
                outline: outline.unwrap_or(current.outline),
                is_active: match active {
                    Some(raw) => decode_active(&output_format, &raw)?,
                    None => Some(current.is_active),
                },
            };
            let mut form = FormController::edit(ctx.courses(), ctx.notifier.clone(), id, seed);
            submit_form(&output_format, &mut form, "Course updated successfully.").await
        }
        CourseCommands::Delete { id } => {
            ctx.ensure_admin().await?;
            match ctx.courses().delete(id).await {
                Ok(()) => output_success(&output_format, "Course deleted successfully.", None),
                Err(e) => {
                    output_error(&output_format, e.message(), Some(e.error_code()))?;
                    std::process::exit(1);
                }
            }
        }
    }
}

fn decode_semester(
    output_format: &OutputFormat,
    raw: Option<String>,
) -> anyhow::Result<Option<Semester>> {
    match raw {
        None => Ok(None),
        Some(raw) => match Semester::parse(&raw) {
            Some(semester) => Ok(Some(semester)),
            None => {
                output_error(output_format, "Semester must be either first or second.", None)?;
                std::process::exit(1);
            }
        },
    }
}

/// Numeric field adapter: empty means "not provided", never NaN-style junk
fn decode_credit_load(output_format: &OutputFormat, raw: &str) -> anyhow::Result<Option<u32>> {
    match field::decode_opt_u32(raw) {
        Ok(value) => Ok(value),
        Err(message) => {
            output_error(output_format, &message, None)?;
            std::process::exit(1);
        }
    }
}

/// Boolean select adapter: the string "true"/"false" from the flag becomes a
/// real bool before validation
fn decode_active(output_format: &OutputFormat, raw: &str) -> anyhow::Result<Option<bool>> {
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
