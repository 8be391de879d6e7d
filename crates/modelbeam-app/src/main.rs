mod cli;
mod source;

use std::sync::Arc;

use qrcode::render::unicode;
use qrcode::QrCode;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use modelbeam_common::{BeamError, PairingId, Result};
use modelbeam_pairing::{
    Asset, EditorSession, PairingConfig, StatusEvent, ViewerClient,
};
use modelbeam_relay::HttpRelay;

use source::UrlAssetSource;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::parse();

    let log_directive = args.log_level.as_deref().unwrap_or("modelbeam=info");
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(
                log_directive
                    .parse()
                    .unwrap_or_else(|_| "modelbeam=info".parse().unwrap()),
            ),
        )
        .init();

    match args.command {
        cli::Command::Deploy {
            model,
            title,
            relay,
            page,
            webxr_first,
        } => deploy(model, title, relay, page, webxr_first).await,
        cli::Command::View { id, relay, out } => view(id, relay, out).await,
    }
}

async fn deploy(
    model: String,
    title: Option<String>,
    relay: String,
    page: String,
    webxr_first: bool,
) -> Result<()> {
    let config = PairingConfig {
        domain: relay,
        ..PairingConfig::default()
    };
    let http_relay = Arc::new(HttpRelay::new()?);
    let asset_source = Arc::new(UrlAssetSource::new()?);
    let (editor, mut status_rx) = EditorSession::new(config, http_relay, asset_source);

    tokio::spawn(async move {
        while let Some(StatusEvent { state, message }) = status_rx.recv().await {
            info!(state = %state, "{message}");
        }
    });

    let viewer_url = editor.viewer_url(&page);
    let code = QrCode::new(viewer_url.as_bytes())
        .map_err(|e| BeamError::Other(format!("QR encoding failed: {e}")))?;
    let rendered = code
        .render::<unicode::Dense1x2>()
        .dark_color(unicode::Dense1x2::Light)
        .light_color(unicode::Dense1x2::Dark)
        .build();
    println!("\n{rendered}\n");
    println!("Scan to view on mobile: {viewer_url}");
    println!("Press Enter to re-push, or type 'quit' to stop.\n");

    editor.deploy().await;

    let mut asset = Asset::new(model);
    if let Some(title) = title {
        asset = asset.with_title(title);
    }
    asset.scene_viewer_first = !webxr_first;
    editor.set_asset(asset).await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            "quit" | "q" => break,
            _ => editor.push().await,
        }
    }

    editor.teardown().await;
    Ok(())
}

async fn view(id: u64, relay: String, out: std::path::PathBuf) -> Result<()> {
    let http_relay = Arc::new(HttpRelay::new()?);
    let viewer = ViewerClient::new(http_relay, relay, PairingId::from(id));

    info!(session = %viewer.session_id(), pairing = id, "joining editor session");
    viewer.announce().await.map_err(BeamError::from)?;

    loop {
        match viewer.next_packet().await {
            Ok(packet) => {
                let update = packet.updated_content.gltf_id;
                info!(
                    update = %update,
                    title = packet.snippet.config.title.as_deref().unwrap_or("untitled"),
                    "received content packet"
                );

                let poster = viewer.fetch_poster(update).await?;
                tokio::fs::write(out.join("poster.png"), &poster).await?;

                let model = viewer.fetch_model(update).await?;
                tokio::fs::write(out.join("model.glb"), &model).await?;
                info!(bytes = model.len(), dir = %out.display(), "model saved");

                if packet.updated_content.env_changed {
                    let env = viewer
                        .fetch_environment(packet.updated_content.env_is_hdr)
                        .await?;
                    tokio::fs::write(out.join("environment"), &env).await?;
                }
            }
            Err(err) => {
                // Timeouts just mean the editor has nothing new yet.
                warn!(error = %err, "no packet this cycle");
                tokio::time::sleep(std::time::Duration::from_secs(1)).await;
            }
        }
    }
}
