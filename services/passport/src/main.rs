//! Hike Passport client.
//!
//! Proves the user is standing near a trekking landmark, then mints the
//! landmark's soulbound badge through the hike_to_mint program.
//!
//! # Running
//!
//! ```bash
//! # List landmarks
//! passport landmarks
//! # Check distance using gpsd (set "gpsd_addr" in the config)
//! PASSPORT_CONFIG=passport.json passport check --landmark "Poon Hill"
//! # Manual override, then mint
//! RUST_LOG=info passport mint --landmark "Poon Hill" --lat 28.397 --lng 83.684
//! ```

mod config;
mod mint;
mod rpc;
mod wallet;

use clap::{Args, Parser, Subcommand};
use proximity::geo::format_distance;
use proximity::landmark::kathmandu_mock;
use proximity::{
    Coordinate, GpsdProvider, LandmarkSet, LocationSource, ProximitySession, SessionError,
};
use tracing::{error, info, warn};

use crate::config::{load_config, PassportConfig};
use crate::mint::{MintError, Minter};
use crate::rpc::Rpc;
use crate::wallet::{KeypairWallet, Wallet};

#[derive(Debug, Parser)]
#[command(name = "passport")]
#[command(about = "Prove you reached a landmark and mint its soulbound badge")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List the selectable landmarks.
    Landmarks,
    /// Measure the distance to a landmark and report mint eligibility.
    Check(TargetArgs),
    /// Verify proximity, then mint the landmark badge.
    Mint(TargetArgs),
}

#[derive(Debug, Args)]
struct TargetArgs {
    /// Destination landmark; defaults to the first configured one.
    #[arg(long)]
    landmark: Option<String>,
    /// Manual latitude override (skips GPS).
    #[arg(long, requires = "lng", allow_negative_numbers = true)]
    lat: Option<f64>,
    /// Manual longitude override (skips GPS).
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    lng: Option<f64>,
    /// Use the current GPS position as the destination.
    #[arg(long, conflicts_with_all = ["landmark", "lat", "lng"])]
    here: bool,
    /// Use the Kathmandu mock destination with a matching manual position.
    #[arg(long, conflicts_with_all = ["landmark", "lat", "lng", "here"])]
    mock: bool,
}

type Session = ProximitySession<GpsdProvider>;

fn build_session(config: &PassportConfig) -> Result<Session, SessionError> {
    let source = match &config.gpsd_addr {
        Some(addr) => LocationSource::new(GpsdProvider::new(addr.clone())),
        None => LocationSource::unsupported(),
    }
    .with_options(config.position_options());

    let landmarks = LandmarkSet::new(config.landmarks.clone())?;
    Ok(ProximitySession::new(source, landmarks).with_radius(config.radius_meters))
}

/// Select the target and take one reading, per the command line.
async fn locate(session: &mut Session, args: &TargetArgs) -> Result<(), SessionError> {
    if args.mock {
        session.use_mock_target(kathmandu_mock())?;
        return Ok(());
    }
    if args.here {
        session.use_current_location_as_target().await?;
        return Ok(());
    }
    if let Some(name) = &args.landmark {
        session.select_landmark(name)?;
    }
    match (args.lat, args.lng) {
        (Some(lat), Some(lng)) => {
            session.set_manual_position(Coordinate::new(lat, lng))?;
        }
        _ => {
            session.sync_position().await?;
        }
    }
    Ok(())
}

fn report(session: &Session) {
    let target = session.selected();
    match session.distance_m() {
        Some(d) => info!("{} away from {}", format_distance(d), target.name),
        None => info!("No position yet for {}", target.name),
    }
    if session.is_eligible() {
        info!("Verification Success! Destination Unlocked.");
    } else {
        info!("Get within {}m to mint", session.radius_m());
    }
}

/// Refuse to mint before touching the network when the reading is out of range.
fn ensure_eligible(session: &Session) -> Result<(), MintError> {
    if session.is_eligible() {
        return Ok(());
    }
    Err(MintError::NotEligible {
        landmark: session.selected().name.clone(),
        radius_m: session.radius_m(),
    })
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config();

    let mut session = match build_session(&config) {
        Ok(s) => s,
        Err(e) => {
            error!("Invalid landmark configuration: {}", e);
            std::process::exit(1);
        }
    };

    match cli.command {
        Commands::Landmarks => {
            for l in session.landmarks().iter() {
                println!("{:<28} {:>9.4} {:>9.4}", l.name, l.lat, l.lng);
            }
        }
        Commands::Check(args) => {
            if let Err(e) = locate(&mut session, &args).await {
                warn!("{}", e);
            }
            report(&session);
            if !session.is_eligible() {
                std::process::exit(2);
            }
        }
        Commands::Mint(args) => {
            if let Err(e) = locate(&mut session, &args).await {
                warn!("{}", e);
            }
            report(&session);
            if let Err(e) = ensure_eligible(&session) {
                error!("{}", e);
                std::process::exit(2);
            }

            let rpc = Rpc::new(config.rpc_url.clone());
            match rpc.get_version().await {
                Ok(version) => info!("Connected to Solana {} at {}", version, rpc.url()),
                Err(e) => {
                    error!("RPC connection failed: {}", e);
                    std::process::exit(1);
                }
            }

            let wallet = KeypairWallet::connect(&config.keypair_path);
            if let Some(payer) = wallet.pubkey() {
                info!("Payer: {}", payer);
            }
            let minter = Minter::new(rpc, wallet, &config);
            if let Err(e) = minter
                .mint(session.selected(), session.distance_m())
                .await
            {
                error!("{}", e);
                std::process::exit(1);
            }
        }
    }
}
