// CLI entry point: run one search against a JSON scene file.
//
// The scene names a world (see `WorldSpec` in the core crate), a start cell
// and a goal. The request goes through a `PathfinderService` exactly as an
// embedding application would submit it; the resulting `PathResult` is
// printed as JSON on stdout, followed by a one-line summary on stderr.
//
// Usage:
//   pathfind <scene.json> [OPTIONS]
//     --config <FILE>      PathfinderConfig JSON (default: built-in defaults)
//     --mode <MODE>        ground | flight (default: from config)
//     --max-nodes <N>      Node-expansion budget (default: from config)
//     --timeout-ms <N>     Wall-clock budget in ms (default: from config)
//     --smooth             Smooth a successful path
//
// Exit status: 0 when a path was found, 2 when the search failed, 1 on bad
// arguments or unreadable input. Log verbosity follows `RUST_LOG` (default
// `info`).

use std::sync::Arc;

use serde::Deserialize;
use voxelpath_core::config::PathfinderConfig;
use voxelpath_core::goal::Goal;
use voxelpath_core::types::{MovementMode, VoxelCoord};
use voxelpath_core::world::{VoxelWorld, WorldSpec};
use voxelpath_service::{PathfinderService, SearchRequest};

/// Contents of a scene file.
#[derive(Deserialize)]
struct Scene {
    world: WorldSpec,
    start: VoxelCoord,
    goal: Goal,
}

#[derive(Default)]
struct CliArgs {
    scene: String,
    config: Option<String>,
    mode: Option<MovementMode>,
    max_nodes: Option<u32>,
    timeout_ms: Option<u64>,
    smooth: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = parse_args();

    let scene: Scene = match read_json(&args.scene) {
        Ok(scene) => scene,
        Err(e) => {
            eprintln!("Failed to load scene {}: {e}", args.scene);
            std::process::exit(1);
        }
    };
    let config = match &args.config {
        Some(path) => match read_json::<PathfinderConfig>(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load config {path}: {e}");
                std::process::exit(1);
            }
        },
        None => PathfinderConfig::default(),
    };

    let mut request = SearchRequest::with_config(scene.start, scene.goal, &config.search)
        .smoothed(args.smooth);
    if let Some(mode) = args.mode {
        request = request.mode(mode);
    }
    if let Some(max_nodes) = args.max_nodes {
        request = request.max_nodes(max_nodes);
    }
    if let Some(timeout_ms) = args.timeout_ms {
        request = request.timeout_ms(timeout_ms);
    }
    let mode = request.mode;

    let world = Arc::new(VoxelWorld::from_spec(&scene.world));
    let mut service = match PathfinderService::new(world, config) {
        Ok(service) => service,
        Err(e) => {
            eprintln!("Failed to start search worker: {e}");
            std::process::exit(1);
        }
    };
    let result = service.submit(request).wait();
    service.shutdown();

    match serde_json::to_string_pretty(&result) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("Failed to encode result: {e}");
            std::process::exit(1);
        }
    }

    match result.failure {
        None => eprintln!(
            "found {} waypoints, cost {:.2}, {} nodes in {} ms",
            result.len(),
            result.travel_cost(mode),
            result.nodes_evaluated,
            result.time_ms
        ),
        Some(reason) => {
            eprintln!(
                "no path ({reason}) after {} nodes in {} ms",
                result.nodes_evaluated, result.time_ms
            );
            std::process::exit(2);
        }
    }
}

/// Read and decode a JSON file, flattening both failure kinds to a message.
fn read_json<T: serde::de::DeserializeOwned>(path: &str) -> Result<T, String> {
    let text = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    serde_json::from_str(&text).map_err(|e| e.to_string())
}

/// Parse command-line arguments. Plain `std::env::args()` matching.
fn parse_args() -> CliArgs {
    let mut cli = CliArgs::default();
    let args: Vec<String> = std::env::args().collect();
    let mut scene = None;
    let mut i = 1;

    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                i += 1;
                cli.config = Some(args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--config requires a file path");
                    std::process::exit(1);
                }));
            }
            "--mode" => {
                i += 1;
                cli.mode = Some(match args.get(i).map(String::as_str) {
                    Some("ground") => MovementMode::Ground,
                    Some("flight") => MovementMode::Flight,
                    _ => {
                        eprintln!("--mode must be `ground` or `flight`");
                        std::process::exit(1);
                    }
                });
            }
            "--max-nodes" => {
                i += 1;
                cli.max_nodes = Some(args.get(i).and_then(|s| s.parse().ok()).unwrap_or_else(|| {
                    eprintln!("--max-nodes requires a valid number");
                    std::process::exit(1);
                }));
            }
            "--timeout-ms" => {
                i += 1;
                cli.timeout_ms = Some(args.get(i).and_then(|s| s.parse().ok()).unwrap_or_else(|| {
                    eprintln!("--timeout-ms requires a valid number");
                    std::process::exit(1);
                }));
            }
            "--smooth" => cli.smooth = true,
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other if other.starts_with("--") => {
                eprintln!("Unknown argument: {other}");
                print_usage();
                std::process::exit(1);
            }
            path => {
                if scene.replace(path.to_string()).is_some() {
                    eprintln!("Only one scene file may be given");
                    std::process::exit(1);
                }
            }
        }
        i += 1;
    }

    cli.scene = scene.unwrap_or_else(|| {
        print_usage();
        std::process::exit(1);
    });
    cli
}

fn print_usage() {
    println!("Usage: pathfind <scene.json> [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --config <FILE>      PathfinderConfig JSON (default: built-in defaults)");
    println!("  --mode <MODE>        ground | flight (default: from config)");
    println!("  --max-nodes <N>      Node-expansion budget (default: from config)");
    println!("  --timeout-ms <N>     Wall-clock budget in ms (default: from config)");
    println!("  --smooth             Smooth a successful path");
    println!("  --help, -h           Show this help");
}
