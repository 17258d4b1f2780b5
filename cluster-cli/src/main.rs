//! Binary entry point: parse the CLI, resolve layered configuration, stand
//! up the gRPC server, and spawn the five periodic loops the coordination
//! engine needs (metrics, heartbeat, election, stealing, worker), all
//! cancelled together on Ctrl-C.

mod file_config;
mod peers;

use clap::{Args, Parser, Subcommand};
use cluster_core::{election, heartbeat, metrics, stealing, worker, ClusterConfig, Node, PeerClient};
use cluster_rpc::proto::node_service_server::NodeServiceServer;
use cluster_rpc::{GrpcPeerClient, NodeServiceImpl};
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "cluster-node", about = "Peer-to-peer task coordination node")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start this node and join the cluster described by `--peers-file`.
    Run(RunArgs),
}

#[derive(Args)]
struct RunArgs {
    /// This node's listen address; doubles as its identity in the cluster.
    #[arg(long)]
    node_id: String,
    /// Path to a file listing every peer address, one per line.
    #[arg(long)]
    peers_file: PathBuf,
    /// Optional TOML file overlaying the default tunables.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    max_queue_size: Option<usize>,
    #[arg(long)]
    min_queue_length: Option<usize>,
    #[arg(long)]
    max_tasks_to_steal: Option<u32>,
    #[arg(long)]
    max_steal_count: Option<u32>,
    #[arg(long)]
    metrics_interval_ms: Option<u64>,
    #[arg(long)]
    heartbeat_interval_ms: Option<u64>,
    #[arg(long)]
    election_interval_ms: Option<u64>,
    #[arg(long)]
    steal_interval_ms: Option<u64>,
    #[arg(long)]
    worker_poll_interval_ms: Option<u64>,
    #[arg(long)]
    heartbeat_timeout_ms: Option<u64>,
    #[arg(long)]
    steal_timeout_ms: Option<u64>,
}

/// Flags given directly on the command line take precedence over
/// everything else (§4.11): defaults, then file, then environment, then these.
fn apply_cli_overrides(args: &RunArgs, cfg: &mut ClusterConfig) {
    macro_rules! cli_override {
        ($field:ident) => {
            if let Some(v) = args.$field {
                cfg.$field = v;
            }
        };
    }
    cli_override!(max_queue_size);
    cli_override!(min_queue_length);
    cli_override!(max_tasks_to_steal);
    cli_override!(max_steal_count);
    cli_override!(metrics_interval_ms);
    cli_override!(heartbeat_interval_ms);
    cli_override!(election_interval_ms);
    cli_override!(steal_interval_ms);
    cli_override!(worker_poll_interval_ms);
    cli_override!(heartbeat_timeout_ms);
    cli_override!(steal_timeout_ms);
}

/// Accepts both `cluster-node run --node-id <addr> --peers-file <path>` and
/// the legacy `server <node_id> <peers_file>` positional invocation.
fn parse_args() -> RunArgs {
    let raw: Vec<String> = std::env::args().collect();
    if raw.len() == 3 && raw[1] != "run" && !raw[1].starts_with('-') {
        return RunArgs {
            node_id: raw[1].clone(),
            peers_file: PathBuf::from(&raw[2]),
            config: None,
            max_queue_size: None,
            min_queue_length: None,
            max_tasks_to_steal: None,
            max_steal_count: None,
            metrics_interval_ms: None,
            heartbeat_interval_ms: None,
            election_interval_ms: None,
            steal_interval_ms: None,
            worker_poll_interval_ms: None,
            heartbeat_timeout_ms: None,
            steal_timeout_ms: None,
        };
    }

    match Cli::try_parse() {
        Ok(Cli {
            command: Commands::Run(args),
        }) => args,
        // `--help`/`--version` still exit 0 through clap's own path; any other
        // parse failure (e.g. a missing required argument) is a usage error,
        // and §6 requires that to exit 1, not clap's default exit code 2.
        Err(err) if err.exit_code() == 0 => err.exit(),
        Err(err) => {
            let _ = err.print();
            std::process::exit(1);
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = parse_args();

    let peer_addrs = match peers::load_peers(&args.peers_file) {
        Ok(peers) => peers,
        Err(err) => {
            error!(error = %err, "failed to load peers file");
            std::process::exit(1);
        }
    };

    let mut cluster_members = peer_addrs.clone();
    if !cluster_members.contains(&args.node_id) {
        cluster_members.push(args.node_id.clone());
    }

    let mut cfg = ClusterConfig::new(args.node_id.clone(), cluster_members);
    if let Some(path) = &args.config {
        match file_config::FileConfig::from_path(path) {
            Ok(file_cfg) => file_cfg.apply(&mut cfg),
            Err(err) => {
                error!(error = %err, "failed to load config file");
                std::process::exit(1);
            }
        }
    }
    file_config::apply_env_overrides(&mut cfg);
    apply_cli_overrides(&args, &mut cfg);

    info!(node_id = %cfg.node_id, peers = ?peer_addrs, "starting cluster node");

    let node = Arc::new(Node::new(cfg.clone()));
    let peer_client: Arc<dyn PeerClient> = Arc::new(GrpcPeerClient::new(
        cfg.heartbeat_timeout(),
        cfg.heartbeat_timeout(),
        cfg.steal_timeout(),
    ));

    let addr = cfg
        .node_id
        .parse()
        .map_err(|e| anyhow::anyhow!("node-id {} is not a valid socket address: {e}", cfg.node_id))?;

    let token = CancellationToken::new();

    let service = NodeServiceImpl::new(node.clone(), peer_client.clone());
    let server_token = token.clone();
    let server_handle = tokio::spawn(async move {
        tonic::transport::Server::builder()
            .add_service(NodeServiceServer::new(service))
            .serve_with_shutdown(addr, async move {
                server_token.cancelled().await;
            })
            .await
    });

    let metrics_handle = metrics::spawn_metrics_loop(node.clone(), token.clone());
    let heartbeat_handle =
        heartbeat::spawn_heartbeat_loop(node.clone(), peer_client.clone(), token.clone());
    let election_handle = election::spawn_election_loop(node.clone(), token.clone());
    let stealing_handle =
        stealing::spawn_stealing_loop(node.clone(), peer_client.clone(), token.clone());
    let worker_handle = worker::spawn_worker_loop(node.clone(), token.clone());

    tokio::signal::ctrl_c().await?;
    info!("shutdown signal received, draining loops");
    token.cancel();

    let _ = tokio::join!(
        server_handle,
        metrics_handle,
        heartbeat_handle,
        election_handle,
        stealing_handle,
        worker_handle,
    );

    Ok(())
}
