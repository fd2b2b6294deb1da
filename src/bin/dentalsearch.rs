use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use dentalsearch::prelude::*;
use dentalsearch::source::{ApiClient, ApiQuery};
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(name = "dentalsearch")]
#[command(about = "Find London dental clinics by service, language and access needs", long_about = None)]
#[command(version)]
struct Cli {
  #[command(subcommand)]
  command: Commands,

  /// Path to config file
  #[arg(long, global = true)]
  config: Option<PathBuf>,

  /// Emit logs as JSON lines
  #[arg(long, global = true)]
  log_json: bool,
}

#[derive(Subcommand)]
enum Commands {
  /// Search clinics
  Search(SearchArgs),
  /// Show the London zone for a postcode
  Zone {
    /// Full or partial postcode, e.g. "NW1 7JR"
    postcode: String,
  },
  /// Summary statistics for the clinic list
  Stats {
    /// JSON file of clinic records (defaults to the bundled dataset)
    #[arg(long)]
    data: Option<PathBuf>,
    /// How many services and languages to rank
    #[arg(long, default_value_t = 10)]
    top: usize,
  },
  /// List the areas known to the clinic API
  Areas,
  /// Inspect the persisted error log
  Errors {
    #[command(subcommand)]
    action: ErrorCommands,
  },
}

#[derive(Subcommand)]
enum ErrorCommands {
  /// Print every entry as JSON
  List,
  /// Delete every entry
  Clear,
  /// Write every entry to a file
  Export {
    /// Destination JSON file
    file: PathBuf,
  },
}

#[derive(Args)]
struct SearchArgs {
  /// JSON file of clinic records (defaults to the bundled dataset)
  #[arg(long, conflicts_with = "api")]
  data: Option<PathBuf>,
  /// Fetch clinics from the clinic API instead of a local list
  #[arg(long)]
  api: bool,
  #[arg(long)]
  text: Option<String>,
  #[arg(long)]
  area: Option<String>,
  #[arg(long)]
  postcode: Option<String>,
  /// Desired service; repeat for more
  #[arg(long = "service")]
  services: Vec<String>,
  /// Desired language; repeat for more
  #[arg(long = "language")]
  languages: Vec<String>,
  #[arg(long)]
  nhs: bool,
  #[arg(long)]
  private: bool,
  #[arg(long)]
  emergency: bool,
  #[arg(long)]
  children: bool,
  #[arg(long)]
  wheelchair: bool,
  #[arg(long)]
  parking: bool,
  #[arg(long, default_value_t = 0.0)]
  min_rating: f64,
  #[arg(long, default_value_t = 0)]
  min_score: u8,
  /// match, name, services or rating
  #[arg(long, default_value = "match")]
  sort: SortBy,
  #[arg(long, default_value_t = 1)]
  page: usize,
  #[arg(long)]
  page_size: Option<usize>,
  /// Print the page as JSON
  #[arg(long)]
  json: bool,
}

impl SearchArgs {
  fn criteria(&self, page_size: usize) -> SearchCriteria {
    let mut builder = SearchCriteria::builder()
      .services(self.services.iter().cloned())
      .languages(self.languages.iter().cloned())
      .min_rating(self.min_rating)
      .min_score(self.min_score)
      .sort_by(self.sort)
      .page(self.page)
      .page_size(page_size);
    if let Some(text) = &self.text {
      builder = builder.text(text.clone());
    }
    if let Some(area) = &self.area {
      builder = builder.area(area.clone());
    }
    if let Some(postcode) = &self.postcode {
      builder = builder.postcode(postcode.clone());
    }
    let flags = [
      (self.nhs, Feature::Nhs),
      (self.private, Feature::Private),
      (self.emergency, Feature::Emergency),
      (self.children, Feature::Children),
      (self.wheelchair, Feature::Wheelchair),
      (self.parking, Feature::Parking),
    ];
    for (_, feature) in flags.into_iter().filter(|(on, _)| *on) {
      builder = builder.require(feature);
    }
    builder.build()
  }
}

impl Commands {
  fn name(&self) -> &'static str {
    match self {
      Commands::Search(_) => "search",
      Commands::Zone { .. } => "zone",
      Commands::Stats { .. } => "stats",
      Commands::Areas => "areas",
      Commands::Errors { .. } => "errors",
    }
  }
}

fn init_logging(json: bool) {
  use tracing_subscriber::{fmt, EnvFilter};

  let builder = fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .with_writer(std::io::stderr);
  if json {
    builder.json().init();
  } else {
    builder.init();
  }
}

#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();
  init_logging(cli.log_json);

  let config = Config::load_or_default(cli.config.as_deref()).context("failed to load config")?;
  let mut errors = ErrorLog::open(&config.error_log).context("failed to open error log")?;

  let command = cli.command.name();
  let outcome = run(cli.command, &config, &mut errors).await;
  if let Err(err) = &outcome {
    errors.log_failure(&**err, json!({ "command": command }));
  }
  errors.close().context("failed to save error log")?;
  outcome
}

async fn run(command: Commands, config: &Config, errors: &mut ErrorLog) -> Result<()> {
  match command {
    Commands::Search(args) => search(&args, config).await,
    Commands::Zone { postcode } => {
      zone(&postcode);
      Ok(())
    }
    Commands::Stats { data, top } => stats(data.as_deref(), top),
    Commands::Areas => areas(config).await,
    Commands::Errors { action } => error_log(action, errors),
  }
}

fn load_clinics(data: Option<&Path>) -> Result<Vec<Clinic>> {
  let source = match data {
    Some(path) => EmbeddedSource::from_path(path)
      .with_context(|| format!("failed to read {}", path.display()))?,
    None => EmbeddedSource::new(),
  };
  Ok(source.load()?)
}

async fn search(args: &SearchArgs, config: &Config) -> Result<()> {
  let mut pager = config.search.pager()?;
  if let Some(size) = args.page_size {
    pager.set_page_size(size)?;
  }

  let clinics = if args.api {
    let client = ApiClient::new(&config.api)?;
    let mut query: ApiQuery = client.query();
    query.query = args.text.clone().or_else(|| args.postcode.clone());
    query.area = args.area.clone();
    let response = client.search(&query).await?;
    info!(
      total = response.total,
      remaining = ?response.remaining_requests,
      "fetched clinics from API"
    );
    response.clinics
  } else {
    load_clinics(args.data.as_deref())?
  };

  let matcher = ClinicMatcher::from_config(&config.search);
  let criteria = args.criteria(pager.page_size());
  let page = matcher.search(&clinics, &criteria);

  if args.json {
    println!("{}", serde_json::to_string_pretty(&page)?);
    return Ok(());
  }

  if page.is_empty() {
    println!("No clinics match your search.");
    return Ok(());
  }

  let (start, end) = page.showing();
  let limit_note = if page.limited {
    format!(" (limited to {})", matcher.max_results())
  } else {
    String::new()
  };
  println!("Showing {start}-{end} of {} clinics{limit_note}", page.total);
  println!();

  for m in &page.results {
    let clinic = m.clinic;
    let zone = zone_of(clinic).map(|z| format!(" [{z}]")).unwrap_or_default();
    println!("{:>3}%  {}{zone}", m.score, clinic.display_name());
    println!("      {}", clinic.address);
    if let Some(rating) = clinic.rating {
      println!("      rating {rating:.1}");
    }
    let details = m.detail_strings();
    if !details.is_empty() {
      println!("      {}", details.join(", "));
    }
  }

  if page.total_pages > 1 {
    let strip: Vec<String> = page
      .page_links()
      .into_iter()
      .map(|link| match link {
        PageLink::Page(n) if n == page.page => format!("[{n}]"),
        PageLink::Page(n) => n.to_string(),
        PageLink::Ellipsis => "...".to_string(),
      })
      .collect();
    println!();
    println!("Page {}", strip.join(" "));
  }
  Ok(())
}

fn zone(postcode: &str) {
  match zone_for_postcode(postcode) {
    Some(zone) => println!("{zone}"),
    None => println!("Outside zones 1-3"),
  }
}

fn stats(data: Option<&Path>, top: usize) -> Result<()> {
  let clinics = load_clinics(data)?;
  let stats = Statistics::from_clinics(&clinics);

  println!("Clinics:                 {}", stats.total_clinics);
  println!("Distinct services:       {}", stats.total_services);
  println!("Distinct languages:      {}", stats.total_languages);
  println!("Services per clinic:     {:.1}", stats.avg_services_per_clinic);
  println!("NHS / private / emergency: {} / {} / {}", stats.nhs_clinics, stats.private_clinics, stats.emergency_clinics);

  println!();
  println!("Top services");
  for (service, count) in stats.top_services(top) {
    println!("  {count:>4}  {service}");
  }
  println!();
  println!("Top languages");
  for (language, count) in stats.top_languages(top) {
    println!("  {count:>4}  {language}");
  }
  Ok(())
}

async fn areas(config: &Config) -> Result<()> {
  let client = ApiClient::new(&config.api)?;
  if !client.health().await {
    anyhow::bail!("clinic API at {} is not reachable", client.base_url());
  }
  for area in client.areas().await? {
    println!("{area}");
  }
  Ok(())
}

fn error_log(action: ErrorCommands, errors: &mut ErrorLog) -> Result<()> {
  match action {
    ErrorCommands::List => println!("{}", errors.to_json_pretty()?),
    ErrorCommands::Clear => {
      let count = errors.len();
      errors.clear()?;
      println!("Cleared {count} entries");
    }
    ErrorCommands::Export { file } => {
      errors
        .export(&file)
        .with_context(|| format!("failed to write {}", file.display()))?;
      println!("Exported {} entries to {}", errors.len(), file.display());
    }
  }
  Ok(())
}
