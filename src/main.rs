use clap::Parser;
use reqwest::Client;
use std::path::PathBuf;
use std::sync::Arc;

use roster_upload::banner;
use roster_upload::clipboard::{copy_output, SystemClipboard};
use roster_upload::config::{AppConfig, Endpoint};
use roster_upload::controller::{FormController, SubmitEvent, Submission};
use roster_upload::errors::Result;
use roster_upload::form::RosterForm;
use roster_upload::preset::Format;
use roster_upload::response::{Outcome, ResponseMode};
use roster_upload::terminal::TerminalView;
use roster_upload::transport::HttpTransport;
use roster_upload::ui::OutputRegion;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
/// Upload a BattleScribe roster to the formatter and print the result
struct Args {
    /// Roster file (.ros or .rosz)
    #[arg(value_name = "ROSTER", required_unless_present = "health")]
    roster: Option<PathBuf>,

    /// Output format; also selects the matching option preset
    #[arg(long, default_value = "default")]
    format: Format,

    /// Hide selections every unit of the kind has anyway
    #[arg(long, value_name = "BOOL")]
    minimize: Option<bool>,

    /// List secondary objectives
    #[arg(long, value_name = "BOOL")]
    secondaries: Option<bool>,

    /// Strip point costs
    #[arg(long, value_name = "BOOL")]
    costs: Option<bool>,

    /// Show model counts per unit
    #[arg(long = "model-count", value_name = "BOOL")]
    model_count: Option<bool>,

    /// How the response body is read: text or json
    #[arg(long)]
    mode: Option<ResponseMode>,

    /// current, legacy, or an absolute path on the API host
    #[arg(long)]
    endpoint: Option<Endpoint>,

    /// Base URL of the formatter API
    #[arg(long = "api-base")]
    api_base: Option<String>,

    /// Copy the output to the clipboard
    #[arg(long)]
    copy: bool,

    /// Only call the health check
    #[arg(long)]
    health: bool,

    /// Don't print progress or the banner
    #[arg(long, short)]
    quiet: bool,
}

impl Args {
    fn apply_to(&self, config: &mut AppConfig) {
        if let Some(mode) = self.mode {
            config.response_mode = mode;
        }
        if let Some(endpoint) = &self.endpoint {
            config.endpoint = endpoint.clone();
        }
        if let Some(api_base) = &self.api_base {
            config.api_base = api_base.trim_end_matches('/').to_string();
        }
    }

    fn build_form(&self, roster: PathBuf) -> RosterForm {
        let mut form = RosterForm::new(roster);
        form.select_format(self.format);

        let options = form.options_mut();
        if let Some(minimize) = self.minimize {
            options.minimize = minimize;
        }
        if let Some(secondaries) = self.secondaries {
            options.secondaries = secondaries;
        }
        if let Some(costs) = self.costs {
            options.costs = costs;
        }
        if let Some(model_count) = self.model_count {
            options.model_count = model_count;
        }
        form
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let dotenv = dotenvy::dotenv();

    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    if let Err(e) = dotenv {
        log::debug!("No .env file loaded: {}", e);
    }

    if !args.quiet {
        banner::print_banner();
    }

    match run(args).await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(2);
        }
    }
}

/// Returns whether the submission (or health check) succeeded.
async fn run(args: Args) -> Result<bool> {
    let mut config = AppConfig::from_env()?;
    args.apply_to(&mut config);

    let transport = Arc::new(HttpTransport::new(Client::new(), config.clone()));

    if args.health {
        return match transport.health_check().await {
            Ok(info) => {
                println!("✅ Formatter is healthy: {}", info);
                Ok(true)
            }
            Err(e) => {
                eprintln!("❌ Health check failed: {}", e);
                Ok(false)
            }
        };
    }

    let Some(roster) = args.roster.clone() else {
        return Ok(false);
    };
    let form = args.build_form(roster);

    let view = Arc::new(TerminalView::new(args.quiet));
    let form_view = view.clone().into_form_view();
    let controller = FormController::new(transport, form_view, config.response_mode);

    let mut event = SubmitEvent::submit(&form);
    let outcome = match controller.submit(&mut event).await {
        Submission::Completed(outcome) => outcome,
        Submission::Rejected => return Ok(false),
    };

    match &outcome {
        Outcome::Success(_) => println!("{}", view.text()),
        Outcome::Failure { .. } => eprintln!("❌ {}", view.text()),
    }

    if args.copy {
        let form_view = controller.view();
        if copy_output(
            form_view.output.as_ref(),
            &mut SystemClipboard,
            form_view.diagnostics.as_ref(),
        ) && !args.quiet
        {
            eprintln!("📋 Copied to clipboard");
        }
    }

    Ok(outcome.is_success())
}
