//! Subcommand handlers.

use lbaas_client::rest::resources::v1::{
    DeviceSpec, LoadBalancerSpec, LoadBalancerUpdate, NodeSpec, NodeUpdate, ProbeSpec, StickySpec,
    VipSpec, VipUpdate, DEFAULT_STATE_FIELD,
};
use lbaas_client::rest::Map;
use lbaas_client::{LbaasClient, Manager, Resource};
use serde::Serialize;
use serde_json::Value;

use super::output::{print_dict, print_flat_list, print_list};
use super::{parse_extra, Command, ExtraArgs};

const DEVICE_COLUMNS: &[&str] = &["id", "name", "type", "version", "ip", "port", "user", "password"];
const LB_COLUMNS: &[&str] = &["id", "name", "algorithm", "protocol"];
const NODE_COLUMNS: &[&str] = &[
    "id", "name", "type", "address", "port", "weight", "condition", "status",
];
const NAMED_COLUMNS: &[&str] = &["id", "name", "type"];
const VIP_COLUMNS: &[&str] = &["id", "name", "address", "port"];

/// Runs one subcommand against the API and prints its result.
///
/// # Errors
///
/// Returns malformed `--extra` pairs and any client error.
#[allow(clippy::too_many_lines)]
pub async fn dispatch(client: &LbaasClient, command: Command) -> anyhow::Result<()> {
    match command {
        Command::DeviceList => print_list(&client.devices().list().await?, DEVICE_COLUMNS),
        Command::DeviceShow(args) => show(&client.devices().get(&args.id).await?),
        Command::DeviceCreate(args) => {
            let spec = DeviceSpec {
                name: args.name,
                device_type: args.device_type,
                version: args.version,
                ip: args.ip,
                port: args.port,
                user: args.user,
                password: args.password,
            };
            let extra = flags_over_extra(&spec, &args.extra)?;
            let device = client.devices().create(&spec, extra).await?;
            show(&device);
        }
        Command::DeviceDelete(args) => client.devices().delete(&args.id).await?,
        Command::AlgorithmsList => {
            print_flat_list(&client.devices().list_algorithms().await?, "algorithms");
        }
        Command::ProtocolsList => {
            print_flat_list(&client.devices().list_protocols().await?, "protocols");
        }

        Command::LbList => print_list(&client.loadbalancers().list().await?, LB_COLUMNS),
        Command::LbShow(args) => show(&client.loadbalancers().get(&args.id).await?),
        Command::LbCreate(args) => {
            let spec = LoadBalancerSpec::new(args.name, args.algorithm, args.protocol);
            let mut lb = client
                .loadbalancers()
                .create(&spec, flags_over_extra(&spec, &args.extra)?)
                .await?;
            print_dict(&lb.get_info().await?);
        }
        Command::LbUpdate(args) => {
            let update = LoadBalancerUpdate {
                name: args.name,
                algorithm: args.algorithm,
                protocol: args.protocol,
            };
            let extra = flags_over_extra(&update, &args.extra)?;
            if update.is_empty() && extra.is_empty() {
                println!("LoadBalancer not updated, no arguments present.");
                return Ok(());
            }
            let updated = client
                .loadbalancers()
                .update(&args.id, &update, extra)
                .await?;
            updated_message("LoadBalancer", updated.as_ref());
        }
        Command::LbDelete(args) => client.loadbalancers().delete(&args.id).await?,

        Command::NodeList(args) => print_list(&client.nodes(&args.lb_id)?.list().await?, NODE_COLUMNS),
        Command::NodeShow(args) => show(&client.nodes(&args.lb_id)?.get(&args.id).await?),
        Command::NodeCreate(args) => {
            let spec = NodeSpec::new(
                args.name,
                args.node_type,
                args.address,
                args.port,
                args.weight,
                args.condition,
            );
            let mut extra = flags_over_extra(&spec, &args.extra)?;
            extra.remove(&spec.state_field);
            let node = client.nodes(&args.lb_id)?.create(&spec, extra).await?;
            show(&node);
        }
        Command::NodeUpdate(args) => {
            let update = NodeUpdate {
                name: args.name,
                node_type: args.node_type,
                address: args.address,
                port: args.port,
                weight: args.weight,
                state: args.condition,
                state_field: None,
            };
            let mut extra = flags_over_extra(&update, &args.extra)?;
            if update.state.is_some() {
                extra.remove(DEFAULT_STATE_FIELD);
            }
            if update.is_empty() && extra.is_empty() {
                println!("Node not updated, no arguments present.");
                return Ok(());
            }
            let updated = client
                .nodes(&args.lb_id)?
                .update(&args.id, &update, extra)
                .await?;
            updated_message("Node", updated.as_ref());
        }
        Command::NodeDelete(args) => client.nodes(&args.lb_id)?.delete(&args.id).await?,

        Command::ProbeList(args) => {
            print_list(&client.probes(&args.lb_id)?.list().await?, NAMED_COLUMNS);
        }
        Command::ProbeShow(args) => show(&client.probes(&args.lb_id)?.get(&args.id).await?),
        Command::ProbeCreate(args) => {
            let spec = ProbeSpec::new(args.name, args.kind);
            let probe = client
                .probes(&args.lb_id)?
                .create(&spec, flags_over_extra(&spec, &args.extra)?)
                .await?;
            show(&probe);
        }
        Command::ProbeDelete(args) => client.probes(&args.lb_id)?.delete(&args.id).await?,

        Command::StickyList(args) => {
            print_list(&client.stickies(&args.lb_id)?.list().await?, NAMED_COLUMNS);
        }
        Command::StickyShow(args) => show(&client.stickies(&args.lb_id)?.get(&args.id).await?),
        Command::StickyCreate(args) => {
            let spec = StickySpec::new(args.name, args.kind);
            let sticky = client
                .stickies(&args.lb_id)?
                .create(&spec, flags_over_extra(&spec, &args.extra)?)
                .await?;
            show(&sticky);
        }
        Command::StickyDelete(args) => client.stickies(&args.lb_id)?.delete(&args.id).await?,

        Command::VipList(args) => print_list(&client.vips(&args.lb_id)?.list().await?, VIP_COLUMNS),
        Command::VipShow(args) => show(&client.vips(&args.lb_id)?.get(&args.id).await?),
        Command::VipCreate(args) => {
            let mut spec = VipSpec::new(args.name, args.address, args.mask).port(args.port);
            if let Some(vip_type) = args.vip_type {
                spec = spec.vip_type(vip_type);
            }
            if let Some(vlan) = args.vlan {
                spec = spec.vlan(vlan);
            }
            let vip = client
                .vips(&args.lb_id)?
                .create(&spec, flags_over_extra(&spec, &args.extra)?)
                .await?;
            show(&vip);
        }
        Command::VipUpdate(args) => {
            let update = VipUpdate {
                name: args.name,
                address: args.address,
                mask: args.mask,
                port: args.port,
                vip_type: args.vip_type,
                vlan: args.vlan,
            };
            let extra = flags_over_extra(&update, &args.extra)?;
            if update.is_empty() && extra.is_empty() {
                println!("Virtual IP not updated, no arguments present.");
                return Ok(());
            }
            let updated = client
                .vips(&args.lb_id)?
                .update(&args.id, &update, extra)
                .await?;
            updated_message("Virtual IP", updated.as_ref());
        }
        Command::VipDelete(args) => client.vips(&args.lb_id)?.delete(&args.id).await?,
    }
    Ok(())
}

/// Parses `--extra` pairs, dropping keys a typed flag already sets.
fn flags_over_extra<T: Serialize>(typed: &T, args: &ExtraArgs) -> anyhow::Result<Map> {
    let mut extra = parse_extra(&args.pairs)?;
    if let Value::Object(fields) = serde_json::to_value(typed)? {
        for key in fields.keys() {
            extra.remove(key);
        }
    }
    Ok(extra)
}

fn show<M: Manager>(resource: &Resource<M>) {
    print_dict(resource.info());
}

fn updated_message<M: Manager>(kind: &str, updated: Option<&Resource<M>>) {
    println!("{kind} has been updated.");
    if let Some(resource) = updated {
        show(resource);
    }
}
