use std::{net::IpAddr, path::PathBuf};

use clap::{Args, Parser, Subcommand};
use log::info;
use tracksvc::{
    config::{ConfigBuilder, ServiceKind},
    server,
    services::errors::Result,
};

#[derive(Parser)]
#[command(name = "tracksvc")]
#[command(version, about = "Placeholder free-music services", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ListenArgs {
    /// Address to bind [env: TRACKSVC_HOST]
    #[arg(long)]
    host: Option<IpAddr>,
    /// Port to bind [env: TRACKSVC_PORT]
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve GET /search
    Aggregator {
        #[command(flatten)]
        listen: ListenArgs,
    },
    /// Serve POST /check
    Fingerprint {
        #[command(flatten)]
        listen: ListenArgs,
        /// Directory for uploaded files [env: TRACKSVC_UPLOAD_DIR]
        #[arg(long)]
        upload_dir: Option<PathBuf>,
        /// Largest accepted request body [env: TRACKSVC_MAX_UPLOAD_BYTES]
        #[arg(long)]
        max_upload_bytes: Option<usize>,
    },
    /// Serve GET /recommend
    Recommender {
        #[command(flatten)]
        listen: ListenArgs,
    },
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    let (kind, builder) = match cli.command {
        Commands::Aggregator { listen } => {
            (ServiceKind::Aggregator, listen.apply(ServiceKind::Aggregator))
        }
        Commands::Fingerprint {
            listen,
            upload_dir,
            max_upload_bytes,
        } => (
            ServiceKind::Fingerprint,
            listen
                .apply(ServiceKind::Fingerprint)
                .upload_dir(upload_dir)
                .max_upload_bytes(max_upload_bytes),
        ),
        Commands::Recommender { listen } => {
            (ServiceKind::Recommender, listen.apply(ServiceKind::Recommender))
        }
    };

    info!("Building {kind} config ...");
    let config = builder.build()?;
    server::serve(kind, config).await
}

impl ListenArgs {
    fn apply(self, kind: ServiceKind) -> ConfigBuilder {
        ConfigBuilder::new(kind).host(self.host).port(self.port)
    }
}
