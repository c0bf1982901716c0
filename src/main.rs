mod app;
mod kube;
mod layout;
mod settings;
mod util;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use kube::{ClusterId, FileSource, HttpSource, ResourceSource};
use settings::{
    DEFAULT_API_URL, DEFAULT_LOG_REFRESH_SECS, DEFAULT_LOG_TAIL, DEFAULT_REFRESH_SECS,
    DEFAULT_REQUEST_TIMEOUT_SECS, Settings, SourceSettings,
};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Base URL of the discovery service.
    #[arg(long, env = "KUBE_ATLAS_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Cluster to visualize.
    #[arg(long, env = "KUBE_ATLAS_CLUSTER", required_unless_present = "snapshot_file")]
    cluster: Option<String>,

    #[arg(long, env = "KUBE_ATLAS_TOKEN", hide = true, hide_env_values = true)]
    token: Option<String>,

    /// Read the topology from a JSON snapshot instead of the discovery service.
    #[arg(long, value_name = "PATH")]
    snapshot_file: Option<PathBuf>,

    #[arg(long, default_value_t = DEFAULT_REFRESH_SECS)]
    refresh_secs: u64,

    #[arg(long, default_value_t = DEFAULT_LOG_REFRESH_SECS)]
    log_refresh_secs: u64,

    /// Number of log lines requested per poll.
    #[arg(long, default_value_t = DEFAULT_LOG_TAIL)]
    log_tail: usize,

    #[arg(long, default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS)]
    request_timeout_secs: u64,
}

impl Args {
    fn into_settings(self) -> Settings {
        let source = match self.snapshot_file {
            Some(path) => SourceSettings::File(path),
            None => SourceSettings::Http {
                api_url: self.api_url,
                token: self.token,
                timeout: Duration::from_secs(self.request_timeout_secs.max(1)),
            },
        };
        let cluster = self.cluster.unwrap_or_else(|| "local".to_owned());

        Settings {
            cluster: ClusterId::new(cluster),
            source,
            refresh_interval: Duration::from_secs(self.refresh_secs.max(1)),
            log_refresh_interval: Duration::from_secs(self.log_refresh_secs.max(1)),
            log_tail: self.log_tail.max(1),
        }
    }
}

fn build_source(settings: &Settings) -> Result<Arc<dyn ResourceSource>> {
    Ok(match &settings.source {
        SourceSettings::Http {
            api_url,
            token,
            timeout,
        } => Arc::new(HttpSource::new(api_url, token.clone(), *timeout)?),
        SourceSettings::File(path) => Arc::new(FileSource::new(path.clone())),
    })
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kube_atlas=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Args::parse().into_settings();
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("kube-atlas-io")
        .build()
        .context("failed to start the async runtime")?;
    let source = build_source(&settings)?;

    tracing::info!(
        cluster = %settings.cluster,
        source = %settings.describe_source(),
        "starting topology viewer"
    );

    let handle = runtime.handle().clone();
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "kube-atlas",
        options,
        Box::new(move |cc| {
            Ok(Box::new(app::TopologyApp::new(
                cc,
                settings,
                source,
                handle,
            )))
        }),
    )
    .map_err(|error| anyhow!("viewer exited with an error: {error}"))
}
