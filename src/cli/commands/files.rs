use clap::Subcommand;
use std::path::PathBuf;
use uuid::Uuid;

use crate::cli::context::AppContext;
use crate::cli::utils::{output_error, output_field_errors, output_item, output_page, output_success};
use crate::cli::OutputFormat;
use crate::error::ApiError;
use crate::list::fetchers::FileFetcher;
use crate::list::{FilterState, ListController, LoadState};
use crate::models::{FileStatus, FileType};
use crate::upload::UploadController;
use crate::validate::field;

#[derive(Subcommand)]
pub enum FileCommands {
    #[command(about = "List files by review status, paged")]
    List {
        #[arg(long, default_value = "pending", help = "pending, approved or rejected")]
        status: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long)]
        page_size: Option<u32>,
        #[arg(long, help = "Search by file name")]
        search: Option<String>,
        #[arg(long, help = "Filter by creation date (YYYY-MM-DD)")]
        date: Option<String>,
    },

    #[command(about = "Show one file")]
    Show {
        #[arg(help = "File id")]
        id: Uuid,
    },

    #[command(about = "Upload files for a course, one batch")]
    Upload {
        #[arg(long, help = "Course code to attach the files to (type-ahead pick)")]
        course: String,
        #[arg(long, help = "lecture material, note or past question(s)")]
        file_type: String,
        #[arg(long, help = "Academic session, e.g. 2020/2021 (past questions)")]
        session: Option<String>,
        #[arg(required = true, help = "Paths of the files to upload")]
        paths: Vec<PathBuf>,
    },

    #[command(about = "Approve a pending file")]
    Approve {
        #[arg(help = "File id")]
        id: Uuid,
    },

    #[command(about = "Reject a pending file")]
    Reject {
        #[arg(help = "File id")]
        id: Uuid,
        #[arg(long, help = "Why the file was rejected")]
        reason: String,
    },

    #[command(about = "Delete a file")]
    Delete {
        #[arg(help = "File id")]
        id: Uuid,
    },

    #[command(about = "Resolve the download URL for a file")]
    Download {
        #[arg(help = "File id")]
        id: Uuid,
    },
}

pub async fn handle(cmd: FileCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let ctx = AppContext::new()?;

    match cmd {
        FileCommands::List { status, page, page_size, search, date } => {
            ctx.ensure_admin().await?;
            let status = match FileStatus::parse(&status) {
                Some(status) => status,
                None => {
                    output_error(
                        &output_format,
                        "Status must be either: pending, rejected or approved.",
                        None,
                    )?;
                    std::process::exit(1);
                }
            };

            let mut filter = FilterState::default();
            filter.page_num = page.max(1);
            if let Some(page_size) = page_size {
                filter.page_size = page_size;
            }
            filter.status = Some(status);
            filter.search = search;
            filter.created_at = date;

            let controller =
                ListController::with_filter(FileFetcher { client: ctx.files() }, filter);
            controller.refetch().await;
            let snapshot = controller.snapshot();
            if snapshot.state == LoadState::Error {
                output_error(&output_format, "Error fetching all files.", None)?;
                std::process::exit(1);
            }
            output_page(&output_format, &snapshot)
        }
        FileCommands::Show { id } => {
            ctx.ensure_admin().await?;
            match ctx.files().fetch_one(id).await {
                Ok(file) => output_item(&output_format, &file),
                Err(e) => fail(&output_format, e),
            }
        }
        FileCommands::Upload { course, file_type, session, paths } => {
            ctx.ensure_admin().await?;

            let file_type = match FileType::parse(&file_type) {
                Some(file_type) => file_type,
                None => {
                    output_error(
                        &output_format,
                        "File type must be either: lecture material, note or past question(s)",
                        None,
                    )?;
                    std::process::exit(1);
                }
            };
            let session = session.as_deref().and_then(field::decode_opt_string);

            let mut controller = UploadController::new(ctx.files(), ctx.notifier.clone());

            // Type-ahead pick: load the cached course list, filter by the
            // typed code, confirm only an exact match
            controller.picker.load(&ctx.courses()).await.map_err(|e| {
                anyhow::anyhow!("could not load course list: {}", e)
            })?;
            controller.picker.set_query(&course);
            let picked = controller
                .picker
                .suggestions()
                .into_iter()
                .find(|c| c.course_code.eq_ignore_ascii_case(&course))
                .cloned();
            match picked {
                Some(course) => controller.picker.select(course),
                None => {
                    output_error(
                        &output_format,
                        "Please select a valid course from the dropdown",
                        None,
                    )?;
                    std::process::exit(1);
                }
            }

            for (index, path) in paths.iter().enumerate() {
                if index > 0 {
                    controller.add_row()?;
                }
                let bytes = std::fs::read(path)
                    .map_err(|e| anyhow::anyhow!("could not read {}: {}", path.display(), e))?;
                let file_name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                let row = controller.row_mut(index).expect("row just added");
                row.file_type = Some(file_type);
                row.session = session.clone();
                row.file_name = file_name;
                row.bytes = bytes;
            }

            match controller.submit_all().await {
                Ok(report) => {
                    if let Some(e) = &report.failed {
                        output_error(
                            &output_format,
                            &format!(
                                "{} file(s) uploaded before a failure: {}",
                                report.uploaded.len(),
                                e.message()
                            ),
                            Some(e.error_code()),
                        )?;
                        std::process::exit(1);
                    }
                    output_success(
                        &output_format,
                        &format!("Uploaded {} file(s) successfully.", report.uploaded.len()),
                        Some(serde_json::json!({
                            "uploaded": report.uploaded.iter().map(|f| f.id).collect::<Vec<_>>(),
                        })),
                    )
                }
                Err(e) => {
                    if let Some(field_errors) = e.field_errors() {
                        output_field_errors(&output_format, field_errors)?;
                        std::process::exit(1);
                    }
                    fail(&output_format, e)
                }
            }
        }
        FileCommands::Approve { id } => {
            ctx.ensure_admin().await?;
            let file = match ctx.files().fetch_one(id).await {
                Ok(file) => file,
                Err(e) => return fail(&output_format, e),
            };
            match ctx.files().set_status(&file, FileStatus::Approved, None).await {
                Ok(file) => {
                    output_success(&output_format, "File approved.", None)?;
                    output_item(&output_format, &file)
                }
                Err(e) => fail(&output_format, e),
            }
        }
        FileCommands::Reject { id, reason } => {
            ctx.ensure_admin().await?;
            let file = match ctx.files().fetch_one(id).await {
                Ok(file) => file,
                Err(e) => return fail(&output_format, e),
            };
            match ctx
                .files()
                .set_status(&file, FileStatus::Rejected, Some(reason))
                .await
            {
                Ok(file) => {
                    output_success(&output_format, "File rejected.", None)?;
                    output_item(&output_format, &file)
                }
                Err(e) => {
                    if let Some(field_errors) = e.field_errors() {
                        output_field_errors(&output_format, field_errors)?;
                        std::process::exit(1);
                    }
                    fail(&output_format, e)
                }
            }
        }
        FileCommands::Delete { id } => {
            ctx.ensure_admin().await?;
            match ctx.files().delete(id).await {
                Ok(()) => output_success(&output_format, "File deleted successfully.", None),
                Err(e) => fail(&output_format, e),
            }
        }
        FileCommands::Download { id } => {
            ctx.authenticate().await?;
            match ctx.files().download_url(id).await {
                Ok(link) => {
                    output_item(&output_format, &serde_json::json!({ "url": link.url }))
                }
                Err(e) => fail(&output_format, e),
            }
        }
    }
}

fn fail(output_format: &OutputFormat, e: ApiError) -> anyhow::Result<()> {
    output_error(output_format, e.message(), Some(e.error_code()))?;
    std::process::exit(1);
}
