//! grid_town: street directory demo.
//!
//! Builds a small synthetic town, initialises the street directory, registers
//! a traffic signal at every intersection from worker threads, and runs a
//! handful of lane, range, driving and walking queries.
//!
//! Run with `RUST_LOG=debug` to see the build log of every crate.

mod network;

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use log::{info, warn};

use sd_core::{Cm, DirectoryConfig, NodeId, Point};
use sd_directory::{StreetDirectory, TrafficSignal, WayPoint};
use sd_network::RoadNetwork;

use network::{BLOCK, SIZE, build_town};

// ── Constants ─────────────────────────────────────────────────────────────────

const GRID_CELL:      Cm    = 20_000;
const SIGNAL_THREADS: usize = 4;

// ── Signals ───────────────────────────────────────────────────────────────────

struct IntersectionSignal {
    node: NodeId,
}

impl TrafficSignal for IntersectionSignal {
    fn node(&self) -> NodeId {
        self.node
    }
}

// ── Output helpers ────────────────────────────────────────────────────────────

fn describe(network: &RoadNetwork, wp: &WayPoint) -> String {
    match *wp {
        WayPoint::RoadSegment(s) => {
            let seg = network.segment(s);
            format!("drive {} ({} cm)", network.link(seg.link).name, seg.length)
        }
        WayPoint::BusStop { stop, .. } => format!("stop at '{}'", network.bus_stop(stop).name),
        WayPoint::SideWalk { lane, reverse } => {
            let seg = network.segment(network.lane(lane).segment);
            let dir = if reverse { "back along" } else { "along" };
            format!("walk {dir} {} ({} cm)", network.link(seg.link).name, seg.length)
        }
        WayPoint::Crossing { crossing, .. } => {
            format!("cross at {}", network.crossing(crossing).near_line[0])
        }
        WayPoint::Node(p) => format!("walk to/from {p}"),
    }
}

fn print_path(network: &RoadNetwork, title: &str, path: &[WayPoint]) {
    println!("{title}: {} waypoint(s)", path.len());
    for (i, wp) in path.iter().enumerate() {
        println!("  {:>2}. {}", i + 1, describe(network, wp));
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::init();

    println!("=== grid_town: street directory ===");
    println!("{SIZE} x {SIZE} intersections, {} m blocks", BLOCK / 100);
    println!();

    // 1. Build the road network.
    let town = build_town()?;
    let network = town.network.clone();
    println!(
        "Road network: {} nodes, {} links, {} segments, {} lanes, {} crossings, {} bus stops",
        network.node_count(),
        network.link_count(),
        network.segment_count(),
        network.lane_count(),
        network.crossings().len(),
        network.bus_stops().len(),
    );

    // 2. Initialise the directory.
    let directory = StreetDirectory::new();
    let config = DirectoryConfig { keep_stats: true, ..DirectoryConfig::with_grid(GRID_CELL, GRID_CELL) };
    directory.init_with_config(network.clone(), config)?;
    directory.print_statistics();

    // 3. Signals are created on worker threads, then the table is sealed.
    let t0 = Instant::now();
    std::thread::scope(|scope| {
        for worker in 0..SIGNAL_THREADS {
            let directory = &directory;
            let nodes = &town.intersections;
            scope.spawn(move || {
                for &node in nodes.iter().skip(worker).step_by(SIGNAL_THREADS) {
                    let signal = Arc::new(IntersectionSignal { node });
                    if let Err(e) = directory.register_signal(signal) {
                        warn!("could not register signal at {node}: {e}");
                    }
                }
            });
        }
    });
    directory.seal_signals();
    info!(
        "{} signals registered in {:.3} ms",
        directory.signals().len(),
        t0.elapsed().as_secs_f64() * 1e3
    );

    // 4. Lane and range queries.
    println!();
    for p in [Point::new(2_500, 300), Point::new(BLOCK, 4_000), Point::new(5_000, 5_000)] {
        match directory.get_lane(p) {
            Some(hit) => {
                let lane = network.lane(hit.lane);
                let kind = if lane.pedestrian { "sidewalk" } else { "driving lane" };
                println!("Lane at {p}: {} ({kind} {} of {})", hit.lane, lane.index, lane.segment);
            }
            None => println!("Lane at {p}: none"),
        }
    }
    let near = directory.closest_road_segments(Point::new(BLOCK, BLOCK), 1_500, 1_500);
    println!("Stretches within 15 m of ({BLOCK}, {BLOCK}): {}", near.len());
    println!();

    // 5. Driving: corner to corner, and back.
    let from = town.intersection(0, 0);
    let to = town.intersection(SIZE - 1, SIZE - 1);
    let there = directory.shortest_driving_path(from, to)?;
    print_path(&network, &format!("Drive {from} -> {to}"), &there);
    let back = directory.shortest_driving_path(to, from)?;
    println!("Drive back: {} waypoint(s)", back.len());
    println!();

    // 6. Walking between two points off the graph.
    let walk = directory.shortest_walking_path(Point::new(-300, 800), Point::new(2 * BLOCK + 700, BLOCK - 900))?;
    print_path(&network, "Walk", &walk);
    println!();

    // 7. Bulk routing from one corner to every intersection.
    let pairs: Vec<(NodeId, NodeId)> = town.intersections.iter().map(|&n| (from, n)).collect();
    let t0 = Instant::now();
    let results = directory.shortest_driving_paths(&pairs);
    let routed = results.iter().filter(|r| r.as_ref().is_ok_and(|p| !p.is_empty())).count();
    println!(
        "Bulk routing: {routed}/{} destinations reached in {:.3} ms",
        pairs.len(),
        t0.elapsed().as_secs_f64() * 1e3
    );

    // 8. Signal lookup.
    match directory.signal_at(to) {
        Some(signal) => println!("Signal at {to}: registered for {}", signal.node()),
        None => println!("Signal at {to}: none"),
    }

    Ok(())
}
