// Entry point and CLI flow.
//
// Every command loads both sheets once, logs in with the given access code
// and answers a single query:
// - `results` prints the school's results and the edition comparison table.
// - `ranking` prints the edition ranking and exports the report artifact.
// - `editions` lists the editions present in the data.
use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand, ValueEnum};
use literacy_report::config::Settings;
use literacy_report::deltas::compute_deltas;
use literacy_report::error::{QueryError, ValidationError};
use literacy_report::report::{
    render_ranking, write_artifact, Branding, RenderOptions, ReportFormat,
};
use literacy_report::util::format_int;
use literacy_report::{loader, output, AccessRegistry, Dataset, SchoolSelection, Session};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "literacy_report")]
#[command(about = "Literacy assessment results: comparisons, rankings and reports", long_about = None)]
struct Cli {
    /// CSV export of the results sheet
    #[arg(long, env = "LITERACY_DATA", default_value = "xls/bd_ama.csv")]
    data: PathBuf,

    /// CSV export of the access-code sheet
    #[arg(long, env = "LITERACY_ACCESS", default_value = "xls/senhas_acesso.csv")]
    access: PathBuf,

    /// JSON settings file (columns, branding, master code)
    #[arg(long, env = "LITERACY_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a school's results and the comparison between editions
    Results {
        /// School access code (INEP) or the master code
        #[arg(long, env = "LITERACY_CODE")]
        code: String,

        /// School name to show (master code only); all schools when omitted
        #[arg(long)]
        school: Option<String>,

        /// Write chart data series as JSON to this file
        #[arg(long)]
        chart_out: Option<PathBuf>,
    },
    /// Rank all schools of one edition and export the report
    Ranking {
        #[arg(long, env = "LITERACY_CODE")]
        code: String,

        #[arg(long)]
        edition: i32,

        #[arg(long, value_enum, default_value_t = Format::Html)]
        format: Format,

        /// Directory for the exported files
        #[arg(long, default_value = "reports")]
        out_dir: PathBuf,

        /// Also export the ranking table as CSV
        #[arg(long, default_value_t = false)]
        csv: bool,
    },
    /// List the editions present in the data
    Editions,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Svg,
    Html,
}

impl From<Format> for ReportFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Svg => ReportFormat::Svg,
            Format::Html => ReportFormat::Html,
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn load_dataset(cli: &Cli, settings: &Settings) -> Result<Dataset> {
    let rows = loader::load_results(&cli.data, &settings.columns)
        .with_context(|| format!("failed to load {}", cli.data.display()))?;
    let (dataset, rejected) = Dataset::from_rows(&rows);
    let report = dataset.report();
    println!(
        "Dados carregados: {} linhas, {} registros válidos, {} rejeitadas, {} duplicadas substituídas.",
        format_int(report.total_rows),
        format_int(report.accepted),
        format_int(report.rejected),
        format_int(report.duplicates_replaced)
    );
    print_rejected(&rejected);
    Ok(dataset)
}

fn print_rejected(rejected: &[ValidationError]) {
    for e in rejected.iter().take(10) {
        println!("  aviso: {}", e);
    }
    if rejected.len() > 10 {
        println!("  ... e mais {} linhas rejeitadas.", format_int(rejected.len() - 10));
    }
}

fn login(cli: &Cli, settings: &Settings, dataset: &Dataset, code: &str) -> Result<Session> {
    let codes = loader::load_access_codes(&cli.access, &settings.access_column.0)
        .with_context(|| format!("failed to load {}", cli.access.display()))?;
    let master = std::env::var("LITERACY_MASTER_CODE")
        .ok()
        .or_else(|| settings.master_code.clone());
    let registry = AccessRegistry::new(codes, master);
    let mut session = Session::new();
    let principal = session.login(code, &registry, dataset).context("login failed")?;
    info!(?principal, "session started");
    Ok(session)
}

fn handle_results(
    dataset: &Dataset,
    session: &Session,
    school: Option<String>,
    chart_out: Option<PathBuf>,
) -> Result<()> {
    let selection = school.map_or(SchoolSelection::All, SchoolSelection::Named);
    let all = match session.visible_series(dataset, &selection) {
        Ok(s) => s,
        Err(QueryError::Empty(e)) => {
            println!("Não há dados disponíveis para esta escola. ({})", e);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    for series in &all {
        let name = series.school_name().unwrap_or(&series.school_id);
        println!("Tabela de Resultados - Percentual médio de Alfabetização - {}\n", name);
        output::preview_table_rows(&output::result_rows(series), usize::MAX);

        println!("Tabela Comparativa entre Edições - {}\n", name);
        let deltas = compute_deltas(series);
        if deltas.is_empty() {
            println!("Não há dados suficientes para calcular a variação entre as edições.\n");
        } else {
            output::preview_table_rows(&output::delta_rows(&deltas), usize::MAX);
        }
    }

    if let Some(path) = chart_out {
        let charts: Vec<_> = all.iter().map(|s| s.chart()).collect();
        output::write_json(&path, &charts)
            .map_err(|e| anyhow::anyhow!("write error: {}", e))?;
        println!("(Dados dos gráficos exportados para {})", path.display());
    }
    Ok(())
}

fn handle_ranking(
    dataset: &Dataset,
    session: &Session,
    settings: &Settings,
    edition: i32,
    format: Format,
    out_dir: PathBuf,
    csv: bool,
) -> Result<()> {
    let ranking = match session.ranking(dataset, edition) {
        Ok(r) => r,
        Err(QueryError::Empty(e)) => {
            println!("Nenhum resultado para a edição {}. ({})", edition, e);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    println!("Ranking - Edição {}\n", edition);
    let rows = output::ranking_rows(&ranking);
    output::preview_table_rows(&rows, 10);

    let options = RenderOptions {
        format: format.into(),
        layout: settings.report.layout.clone(),
        generated_on: Local::now().date_naive(),
    };
    let branding = Branding::from(&settings.report);
    let artifact = render_ranking(&ranking, edition, &branding, &options)?;
    let written = write_artifact(&artifact, &out_dir)?;
    for path in &written {
        println!("(Relatório exportado para {})", path.display());
    }

    if csv {
        let path = out_dir.join(format!("ranking_{}.csv", edition));
        if let Err(e) = output::write_csv(&path, &rows) {
            warn!("write error: {}", e);
        } else {
            println!("(Tabela completa exportada para {})", path.display());
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_logging();

    let cli = Cli::parse();
    let settings = Settings::load_or_default(cli.config.as_deref())?;
    let dataset = load_dataset(&cli, &settings)?;

    match &cli.command {
        Commands::Results { code, school, chart_out } => {
            let session = login(&cli, &settings, &dataset, code)?;
            handle_results(&dataset, &session, school.clone(), chart_out.clone())
        }
        Commands::Ranking { code, edition, format, out_dir, csv } => {
            let session = login(&cli, &settings, &dataset, code)?;
            handle_ranking(&dataset, &session, &settings, *edition, *format, out_dir.clone(), *csv)
        }
        Commands::Editions => {
            let editions = dataset.editions();
            if editions.is_empty() {
                bail!("no editions found in {}", cli.data.display());
            }
            for e in editions {
                println!("{}", e);
            }
            Ok(())
        }
    }
}
