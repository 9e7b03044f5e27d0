use common::shapes::{Rect, Vec2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::env;
use std::hint::black_box;
use std::time::{Duration, Instant};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use world::{BodyKind, Collider, DetectionMode, EntityDesc, World, WorldConfig};

const SEED: u64 = 36207250;
const ENTITIES: usize = 20_000;
const MEASURE_TICKS: usize = 300;
const ARENA_WIDTH: f32 = 10000.0;
const ARENA_HEIGHT: f32 = 10000.0;
const SIZE_MIN: f32 = 2.0;
const SIZE_MAX: f32 = 40.0;
const WALL_ODDS: f64 = 0.1;
const PICKUP_ODDS: f64 = 0.05;
const FAST_ODDS: f64 = 0.05;
const SLOW_SPEED: f32 = 60.0;
const FAST_SPEED: f32 = 3000.0;
const DT: f32 = 1.0 / 60.0;
const QUERIES_NUM: usize = 1000;
const QUERY_WIDTH: f32 = 192.0;
const QUERY_HEIGHT: f32 = 108.0;

#[derive(Default)]
struct BenchResult {
    step: Duration,
    bounce: Duration,
    queries: Duration,
    pairs: Duration,
    begins: usize,
    ends: usize,
    out_of_bounds: usize,
    purged: usize,
    pair_count: usize,
}

fn duration_ms(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|value| value.parse::<T>().ok())
        .unwrap_or(default)
}

fn random_velocity(rng: &mut StdRng, speed: f32) -> Vec2 {
    Vec2::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0)) * speed
}

fn random_desc(rng: &mut StdRng, arena: &Rect) -> EntityDesc {
    let size = Vec2::new(
        rng.gen_range(SIZE_MIN..SIZE_MAX),
        rng.gen_range(SIZE_MIN..SIZE_MAX),
    );
    let bounds = Rect::new(
        arena.x + rng.gen_range(0.0..arena.width - size.x),
        arena.y + rng.gen_range(0.0..arena.height - size.y),
        size.x,
        size.y,
    );
    if rng.gen_bool(WALL_ODDS) {
        return EntityDesc::fixed(bounds);
    }
    if rng.gen_bool(PICKUP_ODDS) {
        return EntityDesc::fixed(bounds).with_compenetrable(true);
    }
    if rng.gen_bool(FAST_ODDS) {
        return EntityDesc::new(bounds)
            .with_mode(DetectionMode::Continuous)
            .with_velocity(random_velocity(rng, FAST_SPEED));
    }
    let desc = EntityDesc::new(bounds).with_velocity(random_velocity(rng, SLOW_SPEED));
    if rng.gen_bool(0.2) {
        desc.with_collider(Collider::Oriented {
            offset: Vec2::zeros(),
            size,
            angle: rng.gen_range(0.0..std::f32::consts::FRAC_PI_2),
        })
    } else {
        desc
    }
}

/// Turns movers around at the arena edges, the way a level's outer walls would.
fn bounce(world: &mut World) {
    let arena = world.bounds();
    let turned: Vec<_> = world
        .entities()
        .filter(|entity| entity.kind() != BodyKind::Static && !entity.is_pending_removal())
        .filter_map(|entity| {
            let next = entity.bounds().translated(entity.velocity() * DT);
            let mut velocity = entity.velocity();
            if next.left() < arena.left() || next.right() > arena.right() {
                velocity.x = -velocity.x;
            }
            if next.top() < arena.top() || next.bottom() > arena.bottom() {
                velocity.y = -velocity.y;
            }
            (velocity != entity.velocity()).then_some((entity.id(), velocity))
        })
        .collect();
    for (id, velocity) in turned {
        // Ids come straight from the live entity list.
        let _ = world.set_velocity(id, velocity);
    }
}

fn run(entity_count: usize, ticks: usize) -> BenchResult {
    let arena = Rect::new(0.0, 0.0, ARENA_WIDTH, ARENA_HEIGHT);
    let config = WorldConfig {
        index: quadtree::Config {
            pool_size: entity_count / 4,
            ..quadtree::Config::default()
        },
        ..WorldConfig::default()
    };
    let mut world = World::with_config(arena, config);
    let mut rng = StdRng::seed_from_u64(SEED);
    for _ in 0..entity_count {
        let desc = random_desc(&mut rng, &arena);
        // Descriptors are generated inside the arena with finite sizes.
        let _ = world.spawn(desc);
    }

    let mut result = BenchResult::default();
    let mut query_results = Vec::new();
    for _ in 0..ticks {
        let start = Instant::now();
        bounce(&mut world);
        let bounce_time = start.elapsed();
        result.bounce += bounce_time;

        let start = Instant::now();
        let report = world.step(DT);
        let step_time = start.elapsed();
        result.step += step_time;

        let begins = report.begins().count();
        let ends = report.ends().count();
        result.begins += begins;
        result.ends += ends;
        result.out_of_bounds += report.out_of_bounds.len();
        result.purged += report.purged.len();
        for &id in &report.out_of_bounds {
            let _ = world.despawn(id);
        }
        debug!(
            tick = report.tick,
            step_ms = duration_ms(step_time),
            begins,
            ends,
            out_of_bounds = report.out_of_bounds.len(),
            purged = report.purged.len(),
            "tick"
        );

        let start = Instant::now();
        for _ in 0..QUERIES_NUM {
            let query = Rect::new(
                rng.gen_range(0.0..ARENA_WIDTH - QUERY_WIDTH),
                rng.gen_range(0.0..ARENA_HEIGHT - QUERY_HEIGHT),
                QUERY_WIDTH,
                QUERY_HEIGHT,
            );
            query_results.clear();
            world.index().query_rect(&query, &mut query_results);
            black_box(&query_results);
        }
        result.queries += start.elapsed();

        let start = Instant::now();
        let pairs = world.query_all_pairs();
        result.pairs += start.elapsed();
        result.pair_count = pairs.len();
    }
    info!(
        entities = world.len(),
        nodes = world.index().node_count(),
        depth = world.index().depth(),
        "finished"
    );
    result
}

fn print_result(result: &BenchResult, ticks: usize) {
    let per_tick = |duration: Duration| duration_ms(duration) / ticks.max(1) as f64;
    println!("world");
    println!("  Step: {:.02}ms", per_tick(result.step));
    println!("  Bounce: {:.02}ms", per_tick(result.bounce));
    println!("  1k Queries: {:.02}ms", per_tick(result.queries));
    println!("  All pairs: {:.02}ms ({} pairs)", per_tick(result.pairs), result.pair_count);
    println!("  Begins: {}", result.begins);
    println!("  Ends: {}", result.ends);
    println!("  Out of bounds: {}", result.out_of_bounds);
    println!("  Purged: {}", result.purged);
    println!();
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let ticks = env_or("WORLD_BENCH_TICKS", MEASURE_TICKS);
    let entity_count = env_or("WORLD_BENCH_ENTITIES", ENTITIES);

    println!("Simulation settings:");
    println!("Arena size:       {:.01} x {:.01}", ARENA_WIDTH, ARENA_HEIGHT);
    println!("Entity size:      From {:.01} to {:.01}", SIZE_MIN, SIZE_MAX);
    println!("Seed:             {}", SEED);
    println!("Measure ticks:    {}", ticks);
    println!("Entity count:     {}", entity_count);
    println!();

    let result = run(entity_count, ticks);
    print_result(&result, ticks);
}
