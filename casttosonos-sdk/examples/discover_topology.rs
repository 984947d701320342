//! Discover every group and player reachable with a stored token.
//!
//! Expects the token bundle in environment variables:
//!
//! ```sh
//! CASTTOSONOS_ACCESS_TOKEN=... CASTTOSONOS_REFRESH_TOKEN=... \
//!     cargo run --example discover_topology
//! ```

use casttosonos_sdk::{CastController, ReqwestGateway, TokenState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let mut tokens = TokenState {
        access_token: std::env::var("CASTTOSONOS_ACCESS_TOKEN")?,
        refresh_token: std::env::var("CASTTOSONOS_REFRESH_TOKEN")?,
        expires_in: None,
        token_type: "Bearer".to_string(),
        scope: None,
    };

    let controller = CastController::new();
    let report = controller.test_liveness(&tokens).await?;
    println!(
        "{} (sonos token: {})",
        CastController::<ReqwestGateway>::connection_label(&tokens),
        report.flag("hasSonosToken")
    );

    let topology = controller.discover(&mut tokens).await?;
    println!("\ngroups:");
    for group in &topology.groups {
        println!("  {} ({})", group.name, group.id);
    }
    println!("\nplayers:");
    for player in &topology.players {
        println!("  {} ({})", player.name, player.id);
    }

    Ok(())
}
