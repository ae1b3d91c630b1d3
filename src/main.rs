use agency_site::lead::{LeadClient, LeadForm, LeadFormSession, SubmissionMeta};
use agency_site::{config, content, generate, outline, output, share};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "agency-site")]
#[command(about = "Static site generator for an agency's blog and guides")]
#[command(long_about = "\
Static site generator for an agency's blog and guides

Articles are Markdown files with TOML front matter. Each article page gets a
heading outline with scroll-spy highlighting, share links and a lead form.

Content structure:

  content/
  ├── config.toml                      # Site config (optional)
  ├── blog/
  │   ├── config.toml                  # Blog overrides (optional)
  │   └── local-seo-basics.md          # Post (newest first)
  └── guides/
      ├── 010-google-business-profile.md   # Guide (ordered by NNN- prefix)
      └── 020-review-strategy.md

Front matter:

  +++
  title = \"Local SEO Basics\"
  publish_date = 2024-03-04
  category = \"Local SEO\"
  +++

Run 'agency-site gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    /// Directory for intermediate files (manifest)
    #[arg(long, default_value = ".agency-site-temp", global = true)]
    temp_dir: PathBuf,

    /// Log debug events to stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load content into a manifest
    Scan,
    /// Produce the HTML site from a manifest written by `scan`
    Generate,
    /// Run the full pipeline: scan → generate
    Build,
    /// Validate the content directory without building
    Check,
    /// Print the heading outline of a Markdown file
    Outline {
        /// Markdown file (front matter is ignored)
        file: PathBuf,
    },
    /// Print share links for a page
    Share {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        excerpt: String,
        #[arg(long)]
        url: String,
    },
    /// Validate a lead from a JSON file and send it to the form endpoint
    SubmitLead {
        /// JSON object with name, email, phone, businessType, marketingChallenge
        file: PathBuf,
        /// Page the lead came from
        #[arg(long, default_value = "/")]
        page: String,
        /// Visitor's city, if known
        #[arg(long)]
        city: Option<String>,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Scan => {
            let manifest = content::load(&cli.source)?;
            std::fs::create_dir_all(&cli.temp_dir)?;
            let manifest_path = cli.temp_dir.join("manifest.json");
            let json = serde_json::to_string_pretty(&manifest)?;
            std::fs::write(&manifest_path, json)?;
            output::print_scan_output(&manifest, &cli.source);
        }
        Command::Generate => {
            let manifest_path = cli.temp_dir.join("manifest.json");
            let summary = generate::generate_from_file(&manifest_path, &cli.output)?;
            output::print_generate_output(&summary);
        }
        Command::Build => {
            std::fs::create_dir_all(&cli.temp_dir)?;

            println!("==> Stage 1: Loading {}", cli.source.display());
            let manifest = content::load(&cli.source)?;
            let manifest_path = cli.temp_dir.join("manifest.json");
            let json = serde_json::to_string_pretty(&manifest)?;
            std::fs::write(&manifest_path, json)?;
            output::print_scan_output(&manifest, &cli.source);

            println!("==> Stage 2: Generating HTML → {}", cli.output.display());
            let summary = generate::generate(&manifest, &cli.output)?;
            output::print_generate_output(&summary);

            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let manifest = content::load(&cli.source)?;
            output::print_scan_output(&manifest, &cli.source);
            println!("==> Content is valid");
        }
        Command::Outline { file } => {
            let text = std::fs::read_to_string(&file)?;
            let body = content::split_front_matter(&text)
                .map(|(_, body)| body)
                .unwrap_or(text.as_str());
            output::print_outline(&outline::extract_outline(body));
        }
        Command::Share {
            title,
            excerpt,
            url,
        } => {
            output::print_share_links(&share::build_share_links(&title, &excerpt, &url));
        }
        Command::SubmitLead { file, page, city } => {
            let site_config = config::load_config(&cli.source)?;
            let form: LeadForm = serde_json::from_str(&std::fs::read_to_string(&file)?)?;
            let client = LeadClient::new(&site_config.forms)?;
            let meta = SubmissionMeta::new(site_config.forms.source.clone(), page).with_city(city);

            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            let mut session = LeadFormSession::new(form);
            let state = runtime.block_on(session.submit(&client, meta)).clone();
            output::print_submit_result(&state, session.wizard.errors());
            if state != agency_site::lead::FormState::Succeeded {
                return Err("lead was not submitted".into());
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Install the stderr log subscriber.
///
/// Uses `RUST_LOG` if set, otherwise `debug` with `--verbose` and `warn`
/// without.
fn init_logging(verbose: bool) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
