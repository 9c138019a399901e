mod scene;
mod slice;

use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use lumen_blocks::BlockRegistry;
use lumen_chunk::{ChunkProvider, ChunkStore};
use lumen_propagation::{
    BatchPropagator, ChunkView, LightRules, PropagationRules, ProviderWorldView, SunlightRules,
    relight_loaded_neighbors,
};

use scene::SceneConfig;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Channel {
    Light,
    Sunlight,
}

#[derive(Parser, Debug)]
#[command(name = "lumen", version, about = "Light a voxel scene and print value slices")]
struct Args {
    /// Block catalog
    #[arg(long, default_value = "assets/blocks.toml")]
    blocks: PathBuf,
    /// Scene description
    #[arg(long)]
    scene: PathBuf,
    #[arg(long, value_enum, default_value_t = Channel::Light)]
    channel: Channel,
    /// World y of the printed slice (defaults to the middle of the first chunk layer)
    #[arg(long)]
    slice_y: Option<i32>,
    /// Light chunks one at a time in load order and stitch the seams
    #[arg(long)]
    stream: bool,
    /// Attenuation per step
    #[arg(long, default_value_t = 1)]
    scale: u8,
    /// Repeat for more detail (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let args = Args::parse();
    let level = match args.verbose {
        0 => log::LevelFilter::Info,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_env("RUST_LOG")
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let reg = Arc::new(BlockRegistry::load_from_path(&args.blocks)?);
    log::info!("loaded {} block types from {:?}", reg.by_name.len(), args.blocks);
    let scene = SceneConfig::load_from_path(&args.scene)?;
    let mut store = scene.build_store(&reg)?;
    match args.channel {
        Channel::Light => simulate(&LightRules::new(reg.clone()), &reg, &scene, &mut store, args),
        Channel::Sunlight => simulate(
            &SunlightRules::new(reg.clone(), scene.sky_height),
            &reg,
            &scene,
            &mut store,
            args,
        ),
    }
}

fn simulate<R: PropagationRules>(
    rules: &R,
    reg: &BlockRegistry,
    scene: &SceneConfig,
    store: &mut ChunkStore,
    args: &Args,
) -> Result<(), Box<dyn Error>> {
    let mut prop = BatchPropagator::new(rules).with_scale(args.scale);
    let coords = scene.chunk_coords();
    if args.stream {
        for &coord in &coords {
            let Some(chunk) = store.chunk_mut(coord) else {
                continue;
            };
            prop.seed_fixed_values(chunk);
            prop.process(&mut ChunkView::new(rules, chunk), &[]);
            relight_loaded_neighbors(&mut prop, store, coord, true);
        }
    } else {
        let mut sources = 0;
        for &coord in &coords {
            if let Some(chunk) = store.chunk_mut(coord) {
                sources += prop.seed_fixed_values(chunk);
            }
        }
        prop.process(&mut ProviderWorldView::new(rules, store), &[]);
        log::info!("settled {} chunks from {} sources", coords.len(), sources);
    }
    let dirty = store.take_dirty();
    log::debug!("{} chunks dirty after initial lighting", dirty.len());

    let dims = store.dims();
    let y = args.slice_y.unwrap_or_else(|| {
        let base = coords.first().map_or(0, |&c| dims.origin(c).y);
        base + dims.sy as i32 / 2
    });
    let channel = rules.channel();
    println!("{:?} at y={} before edits:", channel, y);
    print!("{}", slice::render_slice(store, reg, channel, y));

    let changes = scene.apply_edits(reg, store)?;
    if changes.is_empty() {
        return Ok(());
    }
    prop.process(&mut ProviderWorldView::new(rules, store), &changes);
    let stats = prop.last_stats();
    log::info!(
        "applied {} edits: purged={} pushed={} dirty={:?}",
        stats.changes,
        stats.purged,
        stats.pushed,
        store.take_dirty()
    );
    let loaded = store.stats();
    log::debug!("store: loaded={} dirty={}", loaded.loaded, loaded.dirty);
    println!("{:?} at y={} after edits:", channel, y);
    print!("{}", slice::render_slice(store, reg, channel, y));
    Ok(())
}
