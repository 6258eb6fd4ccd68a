use crate::cli::context::AppContext;
use crate::cli::utils::{output_error, output_item};
use crate::cli::OutputFormat;

pub async fn handle(output_format: OutputFormat) -> anyhow::Result<()> {
    let ctx = AppContext::new()?;
    ctx.authenticate().await?;

    match ctx.stats().fetch().await {
        Ok(stats) => output_item(&output_format, &stats),
        Err(e) => {
            output_error(&output_format, e.message(), Some(e.error_code()))?;
            std::process::exit(1);
        }
    }
}
