use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use hostdesk_application::{Notice, NoticeLevel};
use hostdesk_core::HostdeskError;
use hostdesk_infrastructure::paths::HostdeskPaths;
use std::path::PathBuf;

mod bootstrap;
mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "hostdesk")]
#[command(about = "hostdesk - manage your host profile, travelers, templates and reviews", long_about = None)]
struct Cli {
    /// Use this directory instead of the platform config directory
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and remember the session
    Login {
        #[arg(long)]
        email: String,
        /// Read from stdin when omitted
        #[arg(long)]
        password: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Show the current session
    Whoami,
    /// Show or edit the host profile
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
    /// List candidate travelers
    Travelers(TravelerArgs),
    /// Send a message to a traveler
    Send {
        /// Traveler id
        #[arg(long)]
        to: String,
        /// Message text
        #[arg(long, conflicts_with = "template")]
        text: Option<String>,
        /// Use a saved template as the message
        #[arg(long)]
        template: Option<String>,
    },
    /// List or create message templates
    Templates {
        #[command(subcommand)]
        action: TemplateAction,
    },
    /// Show reviews left by travelers
    Reviews,
    /// Print notifications as they arrive
    Watch {
        /// Stop after this many notifications
        #[arg(long)]
        ticks: Option<usize>,
    },
}

#[derive(Subcommand)]
enum ProfileAction {
    Show,
    /// Change individual fields; the rest are kept
    Set(ProfileArgs),
}

#[derive(Args)]
pub struct ProfileArgs {
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub location: Option<String>,
    #[arg(long)]
    pub accommodation: Option<String>,
    #[arg(long)]
    pub languages: Option<String>,
    /// Replaces the help types; repeat for several
    #[arg(long = "help-type")]
    pub help_types: Vec<String>,
}

#[derive(Args)]
pub struct TravelerArgs {
    #[arg(long)]
    pub skill: Option<String>,
    #[arg(long)]
    pub availability: Option<String>,
    #[arg(long)]
    pub location: Option<String>,
}

#[derive(Subcommand)]
enum TemplateAction {
    List,
    Save {
        #[arg(long)]
        name: String,
        #[arg(long)]
        content: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let paths = HostdeskPaths::new(cli.config_dir.as_deref());
    let _log_guard = logging::init(paths.logs_dir().ok().as_deref(), cli.verbose);

    if let Err(err) = run(cli, &paths).await {
        let notice = match err.downcast_ref::<HostdeskError>() {
            Some(api_err) => Notice::error("Error", api_err),
            None => Notice {
                title: "Error".to_string(),
                description: format!("{:#}", err),
                level: NoticeLevel::Error,
            },
        };
        output::print_notice(&notice);
        std::process::exit(1);
    }

    Ok(())
}

async fn run(cli: Cli, paths: &HostdeskPaths) -> Result<()> {
    let app = bootstrap::bootstrap(paths).await?;
    let ctx = &app.ctx;

    match cli.command {
        Commands::Login { email, password } => commands::auth::login(ctx, email, password).await,
        Commands::Logout => commands::auth::logout(ctx).await,
        Commands::Whoami => commands::auth::whoami(ctx).await,
        Commands::Profile { action } => match action {
            ProfileAction::Show => commands::profile::show(ctx).await,
            ProfileAction::Set(args) => commands::profile::set(ctx, args).await,
        },
        Commands::Travelers(args) => commands::travelers::list(ctx, args).await,
        Commands::Send { to, text, template } => {
            commands::travelers::send(ctx, &to, text, template).await
        }
        Commands::Templates { action } => match action {
            TemplateAction::List => commands::templates::list(ctx).await,
            TemplateAction::Save { name, content } => {
                commands::templates::save(ctx, &name, &content).await
            }
        },
        Commands::Reviews => commands::reviews::list(ctx).await,
        Commands::Watch { ticks } => {
            commands::watch::run(ctx, app.config.poll_interval(), ticks).await
        }
    }
}
