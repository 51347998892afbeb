// Entry point and high-level CLI flow.
//
// - Option [1] loads and cleans the CSV, printing diagnostics.
// - Option [2] filters the cleaned data and generates the restaurant-view
//   reports: overview metrics, four tables and a JSON summary.
// - Option [3] changes the cutoff date used by the filter.
// With `--batch` the binary loads, reports once and exits.
use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use delivery_report::filter::{self, FilterConfig};
use delivery_report::types::CleanRecord;
use delivery_report::{loader, output, reports, util};
use once_cell::sync::Lazy;
use std::ffi::OsStr;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

#[derive(Parser, Debug)]
#[command(name = "delivery_report")]
#[command(about = "Restaurant-view delivery time and distance reports", long_about = None)]
struct Cli {
    /// Delivery CSV to load
    #[arg(short, long, env = "DELIVERY_DATA_PATH", default_value = "dataset/train.csv")]
    input: PathBuf,

    /// Include orders up to this date (DD-MM-YYYY)
    #[arg(short, long, value_parser = parse_cutoff, default_value = "13-04-2022")]
    until: NaiveDate,

    /// Traffic densities to include (Low, Medium, High, Jam)
    #[arg(short, long, value_delimiter = ',', default_values = filter::DEFAULT_TRAFFIC)]
    traffic: Vec<String>,

    /// Cities to include
    #[arg(short, long, value_delimiter = ',', default_values = filter::CITIES)]
    city: Vec<String>,

    /// Directory the CSV and JSON reports are written to
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,

    /// Rows shown per table preview
    #[arg(long, default_value_t = 5)]
    preview_rows: usize,

    /// Load, report once and exit instead of showing the menu
    #[arg(long, default_value_t = false)]
    batch: bool,
}

fn parse_cutoff(s: &str) -> std::result::Result<NaiveDate, String> {
    util::parse_date(s).ok_or_else(|| format!("invalid date {:?}, expected DD-MM-YYYY", s))
}

// The cleaned data does not depend on the filter, so it is loaded once and
// reused for every report run.
static APP_STATE: Lazy<Mutex<AppState>> = Lazy::new(|| Mutex::new(AppState { data: None }));

struct AppState {
    data: Option<Vec<CleanRecord>>,
}

fn cached_data() -> Option<Vec<CleanRecord>> {
    let state = APP_STATE.lock().unwrap_or_else(PoisonError::into_inner);
    state.data.clone()
}

fn read_line(prompt: &str) -> String {
    print!("{}", prompt);
    let _ = io::stdout().flush();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf.trim().to_string()
}

/// Returns `true` if the user chose `Y`, `false` if they chose `N`.
fn prompt_back_to_menu() -> bool {
    loop {
        match read_line("Back to Report Selection (Y/N): ").to_uppercase().as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

fn handle_load(path: &Path) -> Result<()> {
    let (data, report) = loader::load_and_clean(path)
        .with_context(|| format!("failed to load {}", path.display()))?;
    println!(
        "Processing dataset... ({} rows read, {} kept)",
        util::format_int(report.total_rows),
        util::format_int(report.clean_rows)
    );
    println!(
        "Note: {} rows dropped due to missing values.\n",
        util::format_int(report.sentinel_rows)
    );
    let mut state = APP_STATE.lock().unwrap_or_else(PoisonError::into_inner);
    state.data = Some(data);
    Ok(())
}

fn handle_generate_reports(config: &FilterConfig, out_dir: &Path, preview_rows: usize) -> Result<()> {
    let Some(data) = cached_data() else {
        println!("Error: No data loaded. Please load the CSV file first (option 1).\n");
        return Ok(());
    };
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("cannot create {}", out_dir.display()))?;

    let df = filter::apply(&data, config.clone());
    info!(rows = df.len(), cutoff = %config.cutoff_date, "Generating reports");
    println!(
        "Generating reports for {} orders up to {}...\n",
        util::format_int(df.len()),
        config.cutoff_date.format(util::DATE_FORMAT)
    );

    let summary = reports::overview(&df);
    println!("Overall Metrics");
    println!("  Unique delivery persons:        {}", util::format_int(summary.unique_delivery_persons));
    println!("  Average distance (km):          {}", util::format_number(summary.avg_distance_km, 2));
    println!("  Avg delivery time festival:     {}", util::format_number(summary.festival.avg_time, 2));
    println!("  Std delivery time festival:     {}", util::format_number(summary.festival.std_time, 2));
    println!("  Avg delivery time no festival:  {}", util::format_number(summary.no_festival.avg_time, 2));
    println!("  Std delivery time no festival:  {}\n", util::format_number(summary.no_festival.std_time, 2));

    let by_city = reports::avg_time_by_city(&df);
    let file = out_dir.join("report_time_by_city.csv");
    output::write_csv(&file, &by_city)?;
    output::preview_table("Delivery Average Time by City", &by_city, preview_rows);
    println!("(Full table exported to {})\n", file.display());

    let distance = reports::distance_by_city(&df);
    let file = out_dir.join("report_distance_by_city.csv");
    output::write_csv(&file, &distance)?;
    output::preview_table("Average Distance by City", &distance, preview_rows);
    println!("(Full table exported to {})\n", file.display());

    let by_order = reports::avg_time_by_city_and_order_type(&df);
    let file = out_dir.join("report_time_by_order_type.csv");
    output::write_csv(&file, &by_order)?;
    output::preview_table("Average Time by City and Order Type", &by_order, preview_rows);
    println!("(Full table exported to {})\n", file.display());

    let by_traffic = reports::avg_time_by_city_and_traffic(&df);
    let file = out_dir.join("report_time_by_traffic.csv");
    output::write_csv(&file, &by_traffic)?;
    output::preview_table("Average Time by City and Traffic", &by_traffic, preview_rows);
    println!("(Full table exported to {})\n", file.display());

    let file = out_dir.join("summary.json");
    output::write_json(&file, &summary)?;
    println!("Summary saved to {}\n", file.display());
    Ok(())
}

fn handle_change_cutoff(config: &mut FilterConfig) {
    let answer = read_line("Cutoff date (DD-MM-YYYY): ");
    match parse_cutoff(&answer) {
        Ok(date) => {
            config.cutoff_date = date;
            println!("Cutoff set to {}.\n", answer);
        }
        Err(e) => println!("{}\n", e),
    }
}

fn init_tracing() -> tracing_appender::non_blocking::WorkerGuard {
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/delivery_report.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"))
        .to_path_buf();
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("delivery_report.log"))
        .to_os_string();

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_writer(io::stderr)
        .with_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::try_from_env("RUST_LOG_JSON").unwrap_or_else(|_| EnvFilter::new("debug")));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();
    guard
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let _log_guard = init_tracing();
    let cli = Cli::parse();
    let mut config = FilterConfig::new(cli.until, cli.traffic, cli.city);

    if cli.batch {
        handle_load(&cli.input)?;
        return handle_generate_reports(&config, &cli.out_dir, cli.preview_rows);
    }

    loop {
        println!("Restaurant Delivery Report");
        println!("[1] Load the file");
        println!("[2] Generate Reports");
        println!("[3] Change cutoff date");
        println!("[4] Exit\n");
        match read_line("Enter choice: ").as_str() {
            "1" => {
                if let Err(e) = handle_load(&cli.input) {
                    error!("{:#}", e);
                    eprintln!("Failed to load file: {:#}\n", e);
                }
            }
            "2" => {
                println!();
                if let Err(e) = handle_generate_reports(&config, &cli.out_dir, cli.preview_rows) {
                    error!("{:#}", e);
                    eprintln!("Report error: {:#}\n", e);
                }
                if !prompt_back_to_menu() {
                    println!("Exiting the program.");
                    break;
                }
            }
            "3" => handle_change_cutoff(&mut config),
            "4" => {
                println!("Exiting the program.");
                break;
            }
            _ => println!("Invalid choice. Please enter 1, 2, 3 or 4.\n"),
        }
    }
    Ok(())
}
