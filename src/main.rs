//! CLI for votelive
//!
//! Subcommands:
//! - `login` / `logout` / `whoami`: manage the stored session
//! - `elections`, `positions`, `candidates`: browse
//! - `results`: print results, optionally following live updates
//! - `vote`: walk the ballot, casting one pick per position

use clap::{Parser, Subcommand};
use tracing::{error, info, warn};
use votelive::config::{Settings, load_config};
use votelive::gateway::ApiClient;
use votelive::live::LiveChannel;
use votelive::model::CandidateFilter;
use votelive::persistence::SessionStore;
use votelive::session::SessionProvider;
use votelive::utils::{ClientError, logging};
use votelive::views::{Ballot, ElectionBrowser, NextStep, ResultsDashboard};

#[derive(Parser)]
#[command(name = "votelive", about = "Corporate voting client with live results")]
struct Cli {
    /// Override the configured log level
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Log in and store the session token
    Login {
        #[arg(long)]
        corporate_id: String,
        #[arg(long)]
        pin: String,
    },
    /// End the session and forget the stored token
    Logout,
    /// Show the logged-in user
    Whoami,
    /// List elections
    Elections,
    /// List the positions of an election
    Positions { election_id: String },
    /// List the candidates standing for a position
    Candidates { position_id: String },
    /// Show results for every position of an election
    Results {
        election_id: String,
        /// Keep running and reprint on every live update
        #[arg(long)]
        watch: bool,
    },
    /// Vote, one `--pick position=candidate` per position
    Vote {
        election_id: String,
        #[arg(long = "pick", value_parser = parse_pick)]
        picks: Vec<(String, String)>,
    },
}

fn parse_pick(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((position, candidate)) if !position.is_empty() && !candidate.is_empty() => {
            Ok((position.to_string(), candidate.to_string()))
        }
        _ => Err(format!("expected <position>=<candidate>, got '{raw}'")),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let settings = match load_config() {
        Ok(settings) => settings,
        Err(e) => {
            logging::init("info");
            error!("Failed to load configuration: {e}");
            return;
        }
    };
    logging::init(cli.log_level.as_deref().unwrap_or(&settings.logging.level));

    if let Err(e) = run(cli.command, settings).await {
        error!("{e}");
        if e.downcast_ref::<ClientError>().is_some_and(ClientError::is_auth) {
            eprintln!("Your session is not valid. Run `votelive login` first.");
        }
    }
}

async fn run(command: Command, settings: Settings) -> Result<(), Box<dyn std::error::Error>> {
    let api = ApiClient::new(&settings.api)?;
    let store = SessionStore::open(&settings.session.store_path)?;
    let mut session = SessionProvider::new(api.clone(), store);

    if !matches!(command, Command::Login { .. }) && session.restore().await?.is_none() {
        return Err(Box::new(ClientError::NotAuthenticated));
    }

    match command {
        Command::Login { corporate_id, pin } => {
            let message = session.login(&corporate_id, &pin).await?;
            if let Some(user) = session.user() {
                println!("Logged in as {} ({})", user.name, user.corporate_id);
            }
            if !message.is_empty() {
                println!("{message}");
            }
        }
        Command::Logout => {
            session.logout().await?;
            println!("Logged out");
        }
        Command::Whoami => {
            if let Some(user) = session.user() {
                println!(
                    "{} ({}) {} {:?}{}",
                    user.name,
                    user.corporate_id,
                    user.department,
                    user.role,
                    if user.has_voted { " [voted]" } else { "" }
                );
            }
        }
        Command::Elections => {
            let mut browser = ElectionBrowser::new(api);
            for election in browser.load_elections().await {
                println!(
                    "{}  {:<32} {:<10} {} - {}",
                    election.id,
                    election.title,
                    election.status,
                    election.start_date.format("%Y-%m-%d"),
                    election.end_date.format("%Y-%m-%d")
                );
            }
        }
        Command::Positions { election_id } => {
            for position in api.positions(Some(&election_id)).await? {
                let state = if position.is_active { "" } else { " (inactive)" };
                println!("{}  {}{state}", position.id, position.title);
            }
        }
        Command::Candidates { position_id } => {
            for candidate in api.candidates(&CandidateFilter::position(&position_id)).await? {
                println!(
                    "{}  {:<24} {}",
                    candidate.id, candidate.name, candidate.department
                );
            }
        }
        Command::Results { election_id, watch } => {
            let channel = if watch {
                LiveChannel::open(&settings.channel, session.token().as_deref()).await
            } else {
                LiveChannel::disconnected()
            };
            let mut dashboard = ResultsDashboard::open(api, channel.handle(), &election_id).await;
            print!("{}", dashboard.render());

            if watch {
                if !channel.is_connected() {
                    warn!("Live updates unavailable, showing a static snapshot");
                    return Ok(());
                }
                loop {
                    tokio::select! {
                        changed = dashboard.next_update() => {
                            if let Some(topic) = changed {
                                info!("Results changed for {topic}");
                                print!("\n{}", dashboard.render());
                            }
                        }
                        _ = tokio::signal::ctrl_c() => {
                            info!("Stopping live results.");
                            break;
                        }
                    }
                }
            }
        }
        Command::Vote { election_id, picks } => {
            let channel = LiveChannel::open(&settings.channel, session.token().as_deref()).await;
            vote(api, channel, &election_id, &picks).await?;
        }
    }

    Ok(())
}

async fn vote(
    api: ApiClient,
    channel: LiveChannel,
    election_id: &str,
    picks: &[(String, String)],
) -> Result<(), Box<dyn std::error::Error>> {
    let mut ballot = Ballot::open(api, channel.handle(), election_id).await;
    if let Some(notice) = ballot.notice() {
        return Err(notice.to_string().into());
    }

    loop {
        let Some(position) = ballot.current_position().cloned() else {
            println!("No positions to vote on");
            return Ok(());
        };

        let Some((_, candidate)) = picks.iter().find(|(p, _)| *p == position.id) else {
            return Err(format!(
                "No pick given for position {} ({})",
                position.title, position.id
            )
            .into());
        };

        ballot.select(candidate)?;
        let step = match ballot.next().await? {
            NextStep::Confirm => match ballot.cast().await {
                Ok(step) => {
                    println!("Voted for {candidate} as {}", position.title);
                    step
                }
                Err(e) => {
                    return Err(e.user_message("Failed to cast vote").into());
                }
            },
            step => step,
        };

        if step == NextStep::Complete {
            println!("Thank you for participating in the election.");
            return Ok(());
        }
    }
}
