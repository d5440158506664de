mod bootstrap;

use anyhow::{Context, Result};
use placement_core::settings::{OutputFormat, Settings};
use placement_core::PlacementError;
use placement_data::analysis::build_dashboard;
use placement_report::report::{render_json, render_text, ReportHeader};
use placement_runtime::session::Session;

fn main() -> Result<()> {
    let settings = Settings::load();

    bootstrap::setup_logging(&settings.log_level)?;

    tracing::info!("Placement Dashboard v{} starting", env!("CARGO_PKG_VERSION"));

    let mut session = match &settings.dataset_file {
        Some(file) => Session::from_file(file),
        None => {
            let cwd = std::env::current_dir().context("reading current directory")?;
            let dir = bootstrap::resolve_data_dir(settings.data_dir.as_deref(), &cwd);
            tracing::info!(dir = %dir.display(), "discovering datasets");
            let session = Session::from_dir(&dir);
            if session.datasets().is_empty() {
                return Err(PlacementError::DatasetNotFound(dir).into());
            }
            session
        }
    };

    if settings.list_datasets {
        for info in session.datasets() {
            println!("{}\t{}", info.id, info.path.display());
        }
        return Ok(());
    }

    let info = match &settings.dataset {
        Some(id) => session
            .dataset(id)
            .cloned()
            .ok_or_else(|| PlacementError::UnknownDataset(id.clone()))?,
        None => session
            .default_dataset()
            .cloned()
            .context("no dataset available")?,
    };
    tracing::info!(
        dataset = %info.id,
        granularity = %settings.granularity,
        "building dashboard"
    );

    let table = session.table(&info.id, settings.granularity)?;
    let params = settings.dashboard_params(table.ctc_bounds())?;
    let dashboard = build_dashboard(table, &params);

    let output = match settings.format {
        OutputFormat::Json => render_json(&dashboard)?,
        OutputFormat::Text => {
            let header = ReportHeader {
                dataset: info.label(),
                job_type: settings.job_type,
                ctc_range: params.filter.ctc_range,
                period: params.filter.period,
                period_options: table.period_options(),
            };
            render_text(&dashboard, &header)
        }
    };
    print!("{}", output);

    if let (Some(month), None) = (params.detail_month, &dashboard.high_ctc.detail) {
        tracing::warn!(%month, "requested month has no high CTC offers");
    }

    Ok(())
}
