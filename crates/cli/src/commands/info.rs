//! `info` command implementation.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::cli::InfoArgs;

/// Configuration info for JSON output
#[derive(Serialize)]
struct ConfigInfo {
    version: String,
    sync_settings: SyncInfo,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    sensor_map: Vec<SensorSlotInfo>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    sinks: Vec<SinkInfo>,
}

#[derive(Serialize)]
struct SyncInfo {
    output_hz: u32,
    buffer_capacity: Option<usize>,
    drain_per_tick_limit: usize,
}

#[derive(Serialize)]
struct SensorSlotInfo {
    sensor_id: String,
    side: String,
    placement: String,
}

#[derive(Serialize)]
struct SinkInfo {
    name: String,
    sink_type: String,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration info");

    if !args.config.exists() {
        anyhow::bail!("Configuration file not found: {}", args.config.display());
    }

    let blueprint = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    if args.json {
        let info = build_config_info(&blueprint, args);
        let json =
            serde_json::to_string_pretty(&info).context("Failed to serialize config info")?;
        println!("{}", json);
    } else {
        print_config_info(&blueprint, args);
    }

    Ok(())
}

fn build_config_info(blueprint: &contracts::PipelineBlueprint, args: &InfoArgs) -> ConfigInfo {
    let sensor_map = if args.sensors {
        blueprint
            .sync
            .sensor_map
            .iter()
            .map(|slot| SensorSlotInfo {
                sensor_id: slot.sensor_id.to_string(),
                side: format!("{:?}", slot.side),
                placement: format!("{:?}", slot.placement),
            })
            .collect()
    } else {
        Vec::new()
    };

    let sinks = if args.sinks {
        blueprint
            .sinks
            .iter()
            .map(|s| SinkInfo {
                name: s.name.clone(),
                sink_type: format!("{:?}", s.sink_type),
            })
            .collect()
    } else {
        Vec::new()
    };

    ConfigInfo {
        version: format!("{:?}", blueprint.version),
        sync_settings: SyncInfo {
            output_hz: blueprint.sync.output_hz,
            buffer_capacity: blueprint.sync.buffer_capacity,
            drain_per_tick_limit: blueprint.sync.drain_per_tick_limit,
        },
        sensor_map,
        sinks,
    }
}

fn print_config_info(blueprint: &contracts::PipelineBlueprint, args: &InfoArgs) {
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║               Motion Sync Configuration                       ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    println!("⚙️  Sync Settings");
    println!("   ├─ Version: {:?}", blueprint.version);
    println!("   ├─ Output rate: {} Hz", blueprint.sync.output_hz);
    println!(
        "   ├─ Buffer capacity: {}",
        blueprint
            .sync
            .buffer_capacity
            .map(|c| c.to_string())
            .unwrap_or_else(|| "unbounded".to_string())
    );
    println!(
        "   └─ Drain per tick limit: {}",
        blueprint.sync.drain_per_tick_limit
    );

    println!("\n📡 Sensor Map ({})", blueprint.sync.sensor_map.len());
    if args.sensors {
        for (i, slot) in blueprint.sync.sensor_map.iter().enumerate() {
            let is_last = i == blueprint.sync.sensor_map.len() - 1;
            let prefix = if is_last { "└─" } else { "├─" };
            println!(
                "   {} {} ({:?} {:?})",
                prefix, slot.sensor_id, slot.side, slot.placement
            );
        }
    } else {
        println!("   └─ (pass --sensors for details)");
    }

    if !blueprint.sinks.is_empty() {
        println!("\n📤 Sinks ({})", blueprint.sinks.len());
        if args.sinks {
            for (i, sink) in blueprint.sinks.iter().enumerate() {
                let is_last = i == blueprint.sinks.len() - 1;
                let prefix = if is_last { "└─" } else { "├─" };
                println!("   {} {} ({:?})", prefix, sink.name, sink.sink_type);
            }
        } else {
            println!("   └─ (pass --sinks for details)");
        }
    }

    println!();
}
