//! The `lbaas` command-line tool.
//!
//! Global flags configure the client (falling back to the usual `OS_*`
//! environment variables); each subcommand maps onto one manager call.

mod commands;
mod output;

use std::time::Duration;

use clap::{Args as ClapArgs, Parser, Subcommand};
use lbaas_client::rest::Map;
use lbaas_client::{
    AuthMode, ClientConfig, ConfigError, LbaasClient, Password, PasswordCredentials, ServiceUrl,
};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

/// Command-line interface to the LBaaS API
#[derive(Parser, Debug)]
#[command(name = "lbaas", version, about, long_about = None)]
pub struct Args {
    /// User name for the identity service
    #[arg(long, env = "OS_USERNAME", global = true)]
    pub os_username: Option<String>,

    /// Password for the identity service
    #[arg(long, env = "OS_PASSWORD", hide_env_values = true, global = true)]
    pub os_password: Option<String>,

    /// Tenant (project) name
    #[arg(long, env = "OS_TENANT_NAME", global = true)]
    pub os_tenant_name: Option<String>,

    /// Identity service URL, e.g. http://keystone:5000/v2.0
    #[arg(long, env = "OS_AUTH_URL", global = true)]
    pub os_auth_url: Option<String>,

    /// Region used to pick the endpoint from the service catalog
    #[arg(long, env = "OS_REGION_NAME", global = true)]
    pub os_region_name: Option<String>,

    /// Pre-provisioned token; requires --endpoint
    #[arg(long, env = "OS_AUTH_TOKEN", hide_env_values = true, global = true)]
    pub os_auth_token: Option<String>,

    /// LBaaS endpoint URL; used with --os-auth-token
    #[arg(long, env = "BALANCER_URL", global = true)]
    pub endpoint: Option<String>,

    /// Do not verify TLS certificates
    #[arg(long, global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECONDS", global = true)]
    pub timeout: Option<u64>,

    /// Log requests and responses to stderr
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands, one per manager operation.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List devices
    DeviceList,
    /// Show a device
    DeviceShow(IdArg),
    /// Register a device
    DeviceCreate(DeviceCreateArgs),
    /// Remove a device
    DeviceDelete(IdArg),
    /// List supported balancing algorithms
    AlgorithmsList,
    /// List supported protocols
    ProtocolsList,

    /// List load balancers
    LbList,
    /// Show a load balancer
    LbShow(IdArg),
    /// Create a load balancer
    LbCreate(LbCreateArgs),
    /// Update a load balancer
    LbUpdate(LbUpdateArgs),
    /// Delete a load balancer
    LbDelete(IdArg),

    /// List the nodes of a load balancer
    NodeList(LbArg),
    /// Show a node
    NodeShow(LbItemArgs),
    /// Add a node to a load balancer
    NodeCreate(NodeCreateArgs),
    /// Update a node
    NodeUpdate(NodeUpdateArgs),
    /// Remove a node
    NodeDelete(LbItemArgs),

    /// List the health probes of a load balancer
    ProbeList(LbArg),
    /// Show a health probe
    ProbeShow(LbItemArgs),
    /// Add a health probe
    ProbeCreate(NamedCreateArgs),
    /// Remove a health probe
    ProbeDelete(LbItemArgs),

    /// List the session persistence policies of a load balancer
    StickyList(LbArg),
    /// Show a session persistence policy
    StickyShow(LbItemArgs),
    /// Add a session persistence policy
    StickyCreate(NamedCreateArgs),
    /// Remove a session persistence policy
    StickyDelete(LbItemArgs),

    /// List the virtual IPs of a load balancer
    VipList(LbArg),
    /// Show a virtual IP
    VipShow(LbItemArgs),
    /// Add a virtual IP
    VipCreate(VipCreateArgs),
    /// Update a virtual IP
    VipUpdate(VipUpdateArgs),
    /// Remove a virtual IP
    VipDelete(LbItemArgs),
}

#[derive(ClapArgs, Debug)]
pub struct IdArg {
    /// Resource ID
    pub id: String,
}

#[derive(ClapArgs, Debug)]
pub struct LbArg {
    /// LoadBalancer ID
    pub lb_id: String,
}

#[derive(ClapArgs, Debug)]
pub struct LbItemArgs {
    /// LoadBalancer ID
    pub lb_id: String,
    /// Resource ID
    pub id: String,
}

#[derive(ClapArgs, Debug)]
pub struct ExtraArgs {
    /// Extra property merged into the request body (repeatable); typed flags win
    #[arg(long = "extra", value_name = "KEY=VALUE")]
    pub pairs: Vec<String>,
}

#[derive(ClapArgs, Debug)]
pub struct DeviceCreateArgs {
    /// New device name
    #[arg(long)]
    pub name: String,
    /// Type of the device
    #[arg(long = "type")]
    pub device_type: String,
    /// Device version
    #[arg(long)]
    pub version: String,
    /// IP address
    #[arg(long)]
    pub ip: String,
    /// Access port
    #[arg(long)]
    pub port: u16,
    /// Account name on the device
    #[arg(long)]
    pub user: String,
    /// Account password on the device
    #[arg(long)]
    pub password: String,
    #[command(flatten)]
    pub extra: ExtraArgs,
}

#[derive(ClapArgs, Debug)]
pub struct LbCreateArgs {
    /// New load balancer name
    #[arg(long)]
    pub name: String,
    /// Algorithm of choosing servers
    #[arg(long)]
    pub algorithm: String,
    /// Protocol of load balancing
    #[arg(long)]
    pub protocol: String,
    #[command(flatten)]
    pub extra: ExtraArgs,
}

#[derive(ClapArgs, Debug)]
pub struct LbUpdateArgs {
    /// LoadBalancer ID to update
    pub id: String,
    /// Desired new name
    #[arg(long)]
    pub name: Option<String>,
    /// Desired new algorithm
    #[arg(long)]
    pub algorithm: Option<String>,
    /// Desired new protocol
    #[arg(long)]
    pub protocol: Option<String>,
    #[command(flatten)]
    pub extra: ExtraArgs,
}

#[derive(ClapArgs, Debug)]
pub struct NodeCreateArgs {
    /// LoadBalancer ID
    pub lb_id: String,
    /// New node name
    #[arg(long)]
    pub name: String,
    /// Type of the node
    #[arg(long = "type")]
    pub node_type: String,
    /// Node address
    #[arg(long)]
    pub address: String,
    /// Node port
    #[arg(long)]
    pub port: u16,
    /// Node weight
    #[arg(long)]
    pub weight: u32,
    /// Node condition
    #[arg(long)]
    pub condition: String,
    #[command(flatten)]
    pub extra: ExtraArgs,
}

#[derive(ClapArgs, Debug)]
pub struct NodeUpdateArgs {
    /// LoadBalancer ID
    pub lb_id: String,
    /// Node ID
    pub id: String,
    /// Desired new node name
    #[arg(long)]
    pub name: Option<String>,
    /// Desired new type of the node
    #[arg(long = "type")]
    pub node_type: Option<String>,
    /// Node address
    #[arg(long)]
    pub address: Option<String>,
    /// Desired new node port
    #[arg(long)]
    pub port: Option<u16>,
    /// Desired new node weight
    #[arg(long)]
    pub weight: Option<u32>,
    /// Node condition
    #[arg(long)]
    pub condition: Option<String>,
    #[command(flatten)]
    pub extra: ExtraArgs,
}

/// Arguments shared by probe-create and sticky-create.
#[derive(ClapArgs, Debug)]
pub struct NamedCreateArgs {
    /// LoadBalancer ID
    pub lb_id: String,
    /// New name
    #[arg(long)]
    pub name: String,
    /// Type
    #[arg(long = "type")]
    pub kind: String,
    #[command(flatten)]
    pub extra: ExtraArgs,
}

#[derive(ClapArgs, Debug)]
pub struct VipCreateArgs {
    /// LoadBalancer ID
    pub lb_id: String,
    /// New VIP name
    #[arg(long)]
    pub name: String,
    /// Virtual IP address
    #[arg(long)]
    pub address: String,
    /// Virtual IP address mask
    #[arg(long)]
    pub mask: String,
    /// Virtual IP port
    #[arg(long)]
    pub port: u16,
    /// Virtual IP type
    #[arg(long = "type")]
    pub vip_type: Option<String>,
    /// Virtual IP VLAN
    #[arg(long)]
    pub vlan: Option<u16>,
    #[command(flatten)]
    pub extra: ExtraArgs,
}

#[derive(ClapArgs, Debug)]
pub struct VipUpdateArgs {
    /// LoadBalancer ID
    pub lb_id: String,
    /// Virtual IP ID
    pub id: String,
    /// New VIP name
    #[arg(long)]
    pub name: Option<String>,
    /// Virtual IP address
    #[arg(long)]
    pub address: Option<String>,
    /// Virtual IP address mask
    #[arg(long)]
    pub mask: Option<String>,
    /// Virtual IP port
    #[arg(long)]
    pub port: Option<u16>,
    /// Virtual IP type
    #[arg(long = "type")]
    pub vip_type: Option<String>,
    /// Virtual IP VLAN
    #[arg(long)]
    pub vlan: Option<u16>,
    #[command(flatten)]
    pub extra: ExtraArgs,
}

/// Installs the stderr subscriber.
///
/// `--debug` enables debug output for the client; otherwise `RUST_LOG`
/// applies, defaulting to warnings only.
pub fn setup_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("lbaas_client=debug,lbaas=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

/// Builds the client configuration from global flags.
///
/// A token together with an endpoint selects pre-provisioned mode; otherwise
/// password credentials are required.
pub fn build_config(args: &Args) -> Result<ClientConfig, ConfigError> {
    let auth = match (&args.os_auth_token, &args.endpoint) {
        (Some(token), Some(endpoint)) => AuthMode::PreProvisionedToken {
            endpoint: ServiceUrl::named("--endpoint", endpoint.as_str())?,
            token: Some(token.clone()),
        },
        _ => AuthMode::PasswordCredentials(PasswordCredentials {
            auth_url: ServiceUrl::named(
                "--os-auth-url",
                required(args.os_auth_url.as_deref(), "--os-auth-url")?,
            )?,
            username: required(args.os_username.as_deref(), "--os-username")?,
            password: Password::new(required(args.os_password.as_deref(), "--os-password")?)?,
            tenant_name: required(args.os_tenant_name.as_deref(), "--os-tenant-name")?,
            region_name: args.os_region_name.clone(),
        }),
    };

    let mut builder = ClientConfig::builder()
        .auth(auth)
        .insecure(args.insecure);
    if let Some(secs) = args.timeout {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    builder.build()
}

fn required(value: Option<&str>, field: &'static str) -> Result<String, ConfigError> {
    value
        .map(ToString::to_string)
        .ok_or(ConfigError::MissingRequiredField { field })
}

/// Parses `key=value` pairs into request body properties.
///
/// Only the first `=` separates key from value.
pub fn parse_extra(pairs: &[String]) -> Result<Map, ConfigError> {
    let mut extra = Map::new();
    for pair in pairs {
        match pair.split_once('=') {
            Some((key, value)) if !key.is_empty() => {
                extra.insert(key.to_string(), Value::String(value.to_string()));
            }
            _ => {
                return Err(ConfigError::InvalidExtraProperty { pair: pair.clone() });
            }
        }
    }
    Ok(extra)
}

/// Runs the parsed command line.
///
/// # Errors
///
/// Returns configuration errors and any [`lbaas_client::ClientError`].
pub async fn run(args: Args) -> anyhow::Result<()> {
    let config = build_config(&args)?;
    let client = LbaasClient::new(config)?;
    commands::dispatch(&client, args.command).await
}
