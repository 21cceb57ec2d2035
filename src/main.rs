use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use paydesk::client::ApiClient;
use paydesk::config::Config;
use paydesk::document::{DocumentFetcher, DocumentReference, DownloadAction};
use paydesk::metrics::gather_text;
use paydesk::profile::{DebtDecision, ProfileClient, UserProfile};
use paydesk::render::{RenderSurface, Renderer};
use paydesk::session::{SessionController, SessionExpiryListener};
use paydesk::viewer::{SecureViewer, ViewState};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Environment variable that overrides `session.token` from the config file
const TOKEN_ENV: &str = "PAYDESK_ADMIN_TOKEN";

/// Paydesk - admin console tooling for reviewing KYC documents
#[derive(Parser, Debug)]
#[command(name = "paydesk")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "paydesk.yaml")]
    config: PathBuf,

    /// Print Prometheus metrics to stdout when done
    #[arg(long)]
    metrics: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a document with the watermark baked in and save it as PNG
    View {
        /// Document path as stored in the KYC record
        #[arg(long)]
        path: String,
        /// Watermark text, normally the owner's unique id
        #[arg(long)]
        watermark: Option<String>,
        /// Output PNG file
        #[arg(short, long)]
        out: PathBuf,
    },
    /// Save the original document bytes
    Download {
        #[arg(long)]
        path: String,
        #[arg(long)]
        watermark: Option<String>,
        /// Output directory (defaults to download.output_dir)
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
    /// Show which profile sections a user has
    Profile {
        /// The user's unique id
        #[arg(long)]
        user: String,
    },
    /// Approve or reject a user's debt
    Debt {
        #[arg(long)]
        user: String,
        #[arg(long, conflicts_with = "reject", required_unless_present = "reject")]
        approve: bool,
        #[arg(long)]
        reject: bool,
    },
}

/// Tells the operator to sign in again once the proxy rejects the token.
struct SignInPrompt;

impl SessionExpiryListener for SignInPrompt {
    fn on_session_expired(&self, reason: &str) {
        eprintln!("Session expired ({}). Sign in again and update {}.", reason, TOKEN_ENV);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = Config::from_file(&args.config)
        .with_context(|| format!("Failed to load configuration from {}", args.config.display()))?;
    config.validate().context("Invalid configuration")?;

    paydesk::logging::init_subscriber(&config.logging)
        .map_err(|e| anyhow!("Failed to initialize logging subsystem: {}", e))?;

    tracing::info!(
        config_file = %args.config.display(),
        base_url = %config.api.base_url,
        session = config.session.token.is_some(),
        "Configuration loaded successfully"
    );

    let token = std::env::var(TOKEN_ENV).ok().or_else(|| config.session.token.clone());
    let session = SessionController::from_raw(token.as_deref());
    let _prompt = session.register(Arc::new(SignInPrompt));

    let result = run(args.command, &config, &session).await;

    if args.metrics {
        print!("{}", gather_text());
    }

    result
}

/// Execute one subcommand against the configured proxy.
async fn run(command: Command, config: &Config, session: &SessionController) -> anyhow::Result<()> {
    let client = ApiClient::new(&config.api, session.clone())?;
    let fetcher = Arc::new(DocumentFetcher::new(client.clone(), config.api.aadhaar_prefix.clone()));
    let fallback = config.viewer.fallback_watermark.as_str();

    match command {
        Command::View {
            path,
            watermark,
            out,
        } => {
            let reference = DocumentReference::new(path, watermark.as_deref(), fallback);
            let viewer = SecureViewer::mount(
                session.gate(),
                fetcher,
                Renderer::from_config(&config.viewer),
                fallback,
            );
            let state = viewer.load(&reference).await;
            let outcome = match state {
                ViewState::Ready(surface) => save_surface(&surface, &out).await,
                ViewState::AuthorizationRequired => {
                    Err(anyhow!("Authorization required: set {}", TOKEN_ENV))
                }
                ViewState::FetchFailed(e) => Err(e.into()),
                ViewState::RenderFailed(e) => Err(e.into()),
                ViewState::Superseded => Err(anyhow!("View was superseded")),
            };
            viewer.unmount();
            outcome
        }
        Command::Download {
            path,
            watermark,
            out_dir,
        } => {
            let reference = DocumentReference::new(path, watermark.as_deref(), fallback);
            let dir = out_dir.unwrap_or_else(|| config.download.output_dir.clone());
            let action = DownloadAction::new(session.gate(), fetcher);
            let saved = action.download(&reference, &dir).await?;
            println!("{} ({} bytes, {})", saved.path.display(), saved.size, saved.content_type);
            Ok(())
        }
        Command::Profile { user } => {
            let profiles = ProfileClient::new(client, &config.api);
            let profile = profiles.fetch(&user).await?;
            print_profile(&profile, fallback);
            Ok(())
        }
        Command::Debt { user, approve, .. } => {
            let decision = if approve {
                DebtDecision::Approve
            } else {
                DebtDecision::Reject
            };
            let profiles = ProfileClient::new(client, &config.api);
            let outcome = profiles.decide_debt(&user, decision).await?;
            match outcome.error {
                Some(error) => Err(anyhow!("Debt update rejected: {}", error)),
                None => {
                    println!(
                        "{}",
                        outcome
                            .message
                            .or(outcome.raw)
                            .unwrap_or_else(|| "Debt updated".to_string())
                    );
                    Ok(())
                }
            }
        }
    }
}

async fn save_surface(surface: &RenderSurface, out: &Path) -> anyhow::Result<()> {
    let png = surface.to_png()?;
    tokio::fs::write(out, png)
        .await
        .with_context(|| format!("Failed to write {}", out.display()))?;
    println!("{} ({}x{})", out.display(), surface.width(), surface.height());
    Ok(())
}

fn print_profile(profile: &UserProfile, fallback: &str) {
    let sections = profile.sections();
    println!(
        "sections: user={} kyc={} bank_account={} debt={}",
        sections.user, sections.kyc, sections.bank_account, sections.debt
    );

    if let Some(user) = &profile.user {
        println!("user: {} <{}> id={}", user.display_name(), user.email, user.unique_id);
    }
    if let Some(kyc) = &profile.kyc {
        println!(
            "kyc: type={} status={} aadhaar_linked={}",
            kyc.kyc_type, kyc.status, kyc.aadhaar_linked
        );
    }
    if let Some(reference) = profile.aadhaar_reference(fallback) {
        println!("aadhaar: {} (watermark {})", reference.path(), reference.watermark_text());
    }
    if let Some(bank) = &profile.bank_account {
        println!("bank: {} ifsc={} status={}", bank.full_name, bank.ifsc, bank.status);
    }
    if let Some(debt) = &profile.debt {
        let state = if debt.status { "active" } else { "inactive" };
        println!("debt: {} {} ({}, {})", debt.amount, debt.debt_type, debt.year, state);
    }
}
