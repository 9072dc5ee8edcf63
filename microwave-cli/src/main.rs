mod display;
mod location;

use std::sync::Arc;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use log::{LevelFilter, info};
use microwave_logic::{
    AdminConsole, EntityId, EntityKind, GeoPoint, MicrowaveMap, NewMicrowave, ReportWindow,
};
use microwave_transport::{ApiConfig, DEFAULT_API_URL, HttpApi};
use tokio::io::{AsyncBufReadExt, BufReader};

use display::TerminalPresenter;
use location::{CAMPUS_CENTER, FixedLocation};

type Result<T = (), E = anyhow::Error> = std::result::Result<T, E>;

type Map = MicrowaveMap<HttpApi, FixedLocation, TerminalPresenter>;

#[derive(Parser)]
#[command(name = "microwave", version, about)]
struct Cli {
    /// Base URL of the microwave API
    #[arg(long, env = "MICROWAVE_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Secret sent with admin requests
    #[arg(long, env = "MICROWAVE_ADMIN_SECRET", hide_env_values = true)]
    admin_secret: Option<String>,

    /// Log more (-v for debug, -vv for trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum KindValue {
    Buildings,
    Microwaves,
}

impl From<KindValue> for EntityKind {
    fn from(value: KindValue) -> Self {
        match value {
            KindValue::Buildings => EntityKind::Building,
            KindValue::Microwaves => EntityKind::Microwave,
        }
    }
}

/// Parse a latitude or longitude, NaN and infinity can't be measured against
fn coordinate(raw: &str) -> Result<f64, String> {
    let value = raw.parse::<f64>().map_err(|e| e.to_string())?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(format!("{raw} is not a valid coordinate"))
    }
}

#[derive(Debug, Clone, Copy, Args)]
struct Position {
    /// Your latitude
    #[arg(long, default_value_t = CAMPUS_CENTER.lat, allow_negative_numbers = true, value_parser = coordinate)]
    lat: f64,
    /// Your longitude
    #[arg(long, default_value_t = CAMPUS_CENTER.lng, allow_negative_numbers = true, value_parser = coordinate)]
    lng: f64,
}

impl From<Position> for GeoPoint {
    fn from(value: Position) -> Self {
        GeoPoint::new(value.lat, value.lng)
    }
}

#[derive(Subcommand)]
enum AdminCommand {
    /// List microwaves waiting for approval
    Pending {
        #[arg(long)]
        json: bool,
    },
    /// Approve a pending microwave
    Approve { id: EntityId },
    /// Reject and delete a pending microwave
    Reject { id: EntityId },
    /// List microwaves by how many times they've been reported
    Reports {
        /// Only count reports from the last N days
        #[arg(long)]
        days: Option<u32>,
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum Commands {
    /// Print every building and microwave marker
    Map {
        /// Only count reports from the last N days
        #[arg(long)]
        days: Option<u32>,
        #[arg(long)]
        json: bool,
    },
    /// Walk through buildings or microwaves from closest to farthest
    Nearest {
        #[arg(value_enum)]
        kind: KindValue,
        #[command(flatten)]
        position: Position,
    },
    /// Submit a new microwave for approval
    Add {
        #[arg(long)]
        building: String,
        #[arg(long)]
        building_id: Option<EntityId>,
        #[arg(long, allow_negative_numbers = true)]
        floor: Option<i32>,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, allow_negative_numbers = true, value_parser = coordinate)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true, value_parser = coordinate)]
        lng: f64,
    },
    /// Report a microwave as not working
    Report {
        id: EntityId,
        /// What's wrong with it
        #[arg(long)]
        reason: Option<String>,
    },
    /// Flag a microwave as broken
    MarkBroken { id: EntityId },
    /// Moderation commands, need an admin secret
    #[command(subcommand)]
    Admin(AdminCommand),
}

fn window(days: Option<u32>) -> ReportWindow {
    days.map(ReportWindow::trailing_days).unwrap_or_default()
}

fn init_logging(verbose: u8) {
    let mut builder = colog::default_builder();
    match verbose {
        0 => {}
        1 => {
            builder.filter_level(LevelFilter::Debug);
        }
        _ => {
            builder.filter_level(LevelFilter::Trace);
        }
    }
    builder.init();
}

const NAV_HELP: &str = "[n]ext, [p]revious, [q]uit";

async fn navigate(map: &Map, kind: EntityKind) -> Result {
    if map.locate_closest(kind).await?.is_none() {
        return Ok(());
    }

    println!("{NAV_HELP}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            "n" | "next" => {
                map.next().await;
            }
            "p" | "prev" | "previous" => {
                map.previous().await;
            }
            "q" | "quit" => break,
            "" => {}
            other => println!("Unknown command \"{other}\", {NAV_HELP}"),
        }
    }
    Ok(())
}

async fn run_admin(api: Arc<HttpApi>, cmd: AdminCommand) -> Result {
    let admin = AdminConsole::new(api);
    match cmd {
        AdminCommand::Pending { json } => {
            let pending = admin.pending().await?;
            if json {
                display::print_json(&pending)?;
            } else {
                println!("{}", display::render_pending(&pending));
            }
        }
        AdminCommand::Approve { id } => admin.approve(id).await?,
        AdminCommand::Reject { id } => admin.reject(id).await?,
        AdminCommand::Reports { days, json } => {
            let summary = admin.report_summary(window(days)).await?;
            if json {
                display::print_json(&summary)?;
            } else {
                println!("{}", display::render_summary(&summary));
            }
        }
    }
    Ok(())
}

async fn run(api: Arc<HttpApi>, cmd: Commands) -> Result {
    let campus = FixedLocation(CAMPUS_CENTER);
    match cmd {
        Commands::Map { days, json } => {
            let map = Map::new(api, campus, TerminalPresenter).with_report_window(window(days));
            let markers = map.load_markers().await?;
            if json {
                display::print_json(&markers)?;
            } else {
                println!("{}", display::render_markers(&markers));
            }
        }
        Commands::Nearest { kind, position } => {
            let here = FixedLocation(position.into());
            let map = Map::new(api, here, TerminalPresenter);
            navigate(&map, kind.into()).await?;
        }
        Commands::Add {
            building,
            building_id,
            floor,
            description,
            lat,
            lng,
        } => {
            let new = NewMicrowave {
                building_id,
                building,
                floor,
                description,
                lat,
                lng,
            };
            Map::new(api, campus, TerminalPresenter)
                .submit_microwave(&new)
                .await?;
            println!("Thanks! Your microwave will show up once it's approved.");
        }
        Commands::Report { id, reason } => {
            Map::new(api, campus, TerminalPresenter)
                .report_broken(id, reason)
                .await?;
            println!("Report submitted.");
        }
        Commands::MarkBroken { id } => {
            Map::new(api, campus, TerminalPresenter)
                .mark_broken(id)
                .await?;
        }
        Commands::Admin(admin_cmd) => run_admin(api, admin_cmd).await?,
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let api = Arc::new(HttpApi::new(ApiConfig::new(cli.api_url, cli.admin_secret))?);
    info!("Using microwave API at {}", api.config().base_url);

    run(api, cli.command).await
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_nearest_negative_longitude() {
        let cli = Cli::try_parse_from([
            "microwave",
            "nearest",
            "microwaves",
            "--lat",
            "53.5",
            "--lng",
            "-113.5",
        ])
        .expect("Failed to parse");

        match cli.command {
            Commands::Nearest { kind, position } => {
                assert_eq!(kind, KindValue::Microwaves);
                assert_eq!(GeoPoint::from(position), GeoPoint::new(53.5, -113.5));
            }
            _ => panic!("Wrong command"),
        }
    }

    #[test]
    fn test_nearest_rejects_nan() {
        for bad in ["NaN", "inf", "-inf"] {
            let res = Cli::try_parse_from(["microwave", "nearest", "buildings", "--lat", bad]);
            assert!(res.is_err(), "accepted {bad}");
        }
        assert!(
            Cli::try_parse_from([
                "microwave", "add", "--building", "HUB", "--lat", "53.5", "--lng", "NaN",
            ])
            .is_err()
        );
    }

    #[test]
    fn test_nearest_defaults_to_campus() {
        let cli = Cli::try_parse_from(["microwave", "nearest", "buildings"]).unwrap();
        match cli.command {
            Commands::Nearest { position, .. } => {
                assert_eq!(GeoPoint::from(position), CAMPUS_CENTER);
            }
            _ => panic!("Wrong command"),
        }
    }

    #[test]
    fn test_admin_approve() {
        let cli = Cli::try_parse_from([
            "microwave",
            "--admin-secret",
            "hunter2",
            "admin",
            "approve",
            "12",
        ])
        .unwrap();
        assert_eq!(cli.admin_secret.as_deref(), Some("hunter2"));
        assert!(matches!(
            cli.command,
            Commands::Admin(AdminCommand::Approve { id: 12 })
        ));
    }

    #[test]
    fn test_report_window() {
        assert_eq!(window(None), ReportWindow::AllTime);
        assert_eq!(window(Some(7)), ReportWindow::trailing_days(7));
    }

    #[test]
    fn test_kind_conversion() {
        assert_eq!(EntityKind::from(KindValue::Buildings), EntityKind::Building);
        assert_eq!(EntityKind::from(KindValue::Microwaves), EntityKind::Microwave);
    }
}
