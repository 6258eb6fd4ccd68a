use clap::Subcommand;
use uuid::Uuid;

use crate::cli::context::AppContext;
use crate::cli::utils::{output_error, output_field_errors, output_item, output_page, output_success};
use crate::cli::OutputFormat;
use crate::error::ApiError;
use crate::forms::{FormController, SubmitOutcome};
use crate::list::fetchers::DepartmentFetcher;
use crate::list::{FilterState, ListController, LoadState};
use crate::models::Semester;
use crate::validate::schemas::DepartmentDraft;

#[derive(Subcommand)]
pub enum DepartmentCommands {
    #[command(about = "List departments, paged")]
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long)]
        page_size: Option<u32>,
    },

    #[command(about = "Show one department")]
    Show {
        #[arg(help = "Department id")]
        id: Uuid,
    },

    #[command(about = "Add a department")]
    Create {
        #[arg(long, help = "Department name (must end with 'engineering')")]
        name: String,
        #[arg(long, help = "Three-letter department code")]
        code: String,
    },

    #[command(about = "Update a department")]
    Update {
        #[arg(help = "Department id")]
        id: Uuid,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        code: Option<String>,
    },

    #[command(about = "Delete a department")]
    Delete {
        #[arg(help = "Department id")]
        id: Uuid,
    },

    #[command(about = "Assign a course to a department")]
    Assign {
        #[arg(help = "Department id")]
        department_id: Uuid,
        #[arg(help = "Course id")]
        course_id: Uuid,
    },

    #[command(about = "Remove a course from a department")]
    Unassign {
        #[arg(help = "Department id")]
        department_id: Uuid,
        #[arg(help = "Course id")]
        course_id: Uuid,
    },

    #[command(about = "List a department's courses for one level")]
    Courses {
        #[arg(help = "Department id")]
        department_id: Uuid,
        #[arg(help = "Level id")]
        level_id: Uuid,
        #[arg(long, help = "first or second")]
        semester: Option<String>,
    },
}

pub async fn handle(cmd: DepartmentCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let ctx = AppContext::new()?;

    match cmd {
        DepartmentCommands::List { page, page_size } => {
            ctx.authenticate().await?;
            let mut filter = FilterState::default();
            filter.page_num = page.max(1);
            if let Some(page_size) = page_size {
                filter.page_size = page_size;
            }

            let controller =
                ListController::with_filter(DepartmentFetcher { client: ctx.departments() }, filter);
            controller.refetch().await;
            let snapshot = controller.snapshot();
            if snapshot.state == LoadState::Error {
                output_error(&output_format, "Error fetching all departments.", None)?;
                std::process::exit(1);
            }
            output_page(&output_format, &snapshot)
        }
        DepartmentCommands::Show { id } => {
            ctx.authenticate().await?;
            match ctx.departments().fetch_one(id).await {
                Ok(department) => output_item(&output_format, &department),
                Err(e) => fail(&output_format, e),
            }
        }
        DepartmentCommands::Create { name, code } => {
            ctx.ensure_admin().await?;
            let mut form = FormController::add(ctx.departments(), ctx.notifier.clone());
            form.draft_mut().dept_name = name;
            form.draft_mut().dept_code = code;
            submit_form(&output_format, &mut form, "Department added successfully.").await
        }
        DepartmentCommands::Update { id, name, code } => {
            ctx.ensure_admin().await?;
            let current = match ctx.departments().fetch_one(id).await {
                Ok(department) => department,
                Err(e) => return fail(&output_format, e),
            };
            let seed = DepartmentDraft {
                dept_name: name.unwrap_or(current.dept_name),
                dept_code: code.unwrap_or(current.dept_code),
            };
            let mut form =
                FormController::edit(ctx.departments(), ctx.notifier.clone(), id, seed);
            submit_form(&output_format, &mut form, "Department updated successfully.").await
        }
        DepartmentCommands::Delete { id } => {
            ctx.ensure_admin().await?;
            match ctx.departments().delete(id).await {
                Ok(()) => output_success(&output_format, "Department deleted successfully.", None),
                Err(e) => fail(&output_format, e),
            }
        }
        DepartmentCommands::Assign { department_id, course_id } => {
            ctx.ensure_admin().await?;
            match ctx.departments().assign_course(department_id, course_id).await {
                Ok(()) => output_success(&output_format, "Course assigned to department.", None),
                Err(e) => fail(&output_format, e),
            }
        }
        DepartmentCommands::Unassign { department_id, course_id } => {
            ctx.ensure_admin().await?;
            match ctx.departments().remove_course(department_id, course_id).await {
                Ok(()) => output_success(&output_format, "Course removed from department.", None),
                Err(e) => fail(&output_format, e),
            }
        }
        DepartmentCommands::Courses { department_id, level_id, semester } => {
            ctx.authenticate().await?;
            let semester = match semester {
                Some(raw) => match Semester::parse(&raw) {
                    Some(semester) => Some(semester),
                    None => {
                        output_error(
                            &output_format,
                            "Semester must be either first or second.",
                            None,
                        )?;
                        std::process::exit(1);
                    }
                },
                None => None,
            };
            match ctx
                .departments()
                .courses_for_level(department_id, level_id, semester)
                .await
            {
                Ok(courses) => output_item(&output_format, &courses),
                Err(e) => fail(&output_format, e),
            }
        }
    }
}

fn fail(output_format: &OutputFormat, e: ApiError) -> anyhow::Result<()> {
    output_error(output_format, e.message(), Some(e.error_code()))?;
    std::process::exit(1);
}

pub(super) async fn submit_form<B: crate::forms::FormBackend>(
    output_format: &OutputFormat,
    form: &mut FormController<B>,
    success_message: &str,
) -> anyhow::Result<()>
where
    B::Saved: serde::Serialize,
{
    match form.submit().await {
        Ok(SubmitOutcome::Saved(saved)) => {
            output_success(output_format, success_message, None)?;
            output_item(output_format, &saved)
        }
        Ok(SubmitOutcome::Invalid) => {
            output_field_errors(output_format, form.errors())?;
            std::process::exit(1);
        }
        Ok(SubmitOutcome::InFlight) => Ok(()),
        Err(e) => {
            output_error(output_format, e.message(), Some(e.error_code()))?;
            std::process::exit(1);
        }
    }
}
