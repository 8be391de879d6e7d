//! Command-line interface.

use clap::{Parser, Subcommand};

use modelbeam_relay::DEFAULT_DOMAIN;

#[derive(Parser)]
#[command(name = "modelbeam", about = "Pair a desktop 3D editor with mobile viewers over an anonymous HTTP relay")]
pub struct Args {
    /// Log filter directive (e.g. "modelbeam=debug").
    #[arg(long)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the editor side: print a pairing QR code and push the model to
    /// every viewer that scans it.
    Deploy {
        /// Source URL of the glTF/GLB model to push.
        #[arg(long)]
        model: String,

        /// Display title for the model.
        #[arg(long)]
        title: Option<String>,

        /// Relay base URL (trailing slash included).
        #[arg(long, default_value = DEFAULT_DOMAIN)]
        relay: String,

        /// Base URL of the hosted viewer page the QR code points at.
        #[arg(long, default_value = "https://modelbeam.dev/")]
        page: String,

        /// Prefer WebXR over Scene Viewer in the AR mode list.
        #[arg(long)]
        webxr_first: bool,
    },

    /// Run a viewer session: announce to an editor and save whatever it
    /// pushes.
    View {
        /// Pairing id from the scanned URL's `?id=` parameter.
        #[arg(long)]
        id: u64,

        /// Relay base URL (trailing slash included).
        #[arg(long, default_value = DEFAULT_DOMAIN)]
        relay: String,

        /// Directory to write received blobs into.
        #[arg(long, default_value = ".")]
        out: std::path::PathBuf,
    },
}

pub fn parse() -> Args {
    Args::parse()
}
