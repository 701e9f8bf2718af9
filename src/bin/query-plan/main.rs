use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use query_plan::config::{read_config_lines, WorkloadConfig};
use query_plan::template::TemplateIndex;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config_path = std::env::args()
        .nth(1)
        .context("Usage: query-plan <workload-config-file>")?;

    let index = match build_plan(&config_path) {
        Ok(index) => index,
        Err(e) => {
            eprintln!("\n{:?}", e);
            return Err(anyhow::anyhow!("Failed to build the workload plan."));
        }
    };

    index.print_plan();

    Ok(())
}

fn build_plan(config_path: &str) -> Result<TemplateIndex> {
    let lines = read_config_lines(config_path)
        .with_context(|| format!("Failed to read workload configuration {config_path}"))?;
    let config = WorkloadConfig::parse(&lines).context("Failed to parse workload configuration")?;
    TemplateIndex::build(config).context("Failed to validate workload configuration")
}
