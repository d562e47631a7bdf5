//! flowrouting CLI - lateral flow routing on elevation rasters

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use flowrouting_algorithms::config::{FlowAlgorithm, RoutingConfig, RoutingMethod};
use flowrouting_algorithms::hydrology::{delineate_all, DrainageGraph};
use flowrouting_core::io::{read_geotiff, write_geotiff, GeoTiffOptions};
use flowrouting_core::{
    CellParameters, Channel, Layer, ParameterGrid, ParameterLayers, PerChannel, Raster,
};

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "flowrouting")]
#[command(author, version, about = "Lateral flow routing on elevation rasters", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show information about a raster file
    Info {
        /// Input raster file
        input: PathBuf,
    },
    /// Build the drainage graph and write upstream edge counts
    Graph {
        /// Input DEM file
        #[arg(long)]
        dem: PathBuf,
        /// Flow-direction algorithm: D8, DInf, MFD8, MFDmd, MFDInf
        #[arg(short, long, default_value = "MFDmd")]
        algorithm: String,
        /// Convergence exponent for MFD8 and MFDInf
        #[arg(short, long, default_value = "5.0")]
        convergence: f64,
        /// Output file
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Delineate the basin of every cell and write contribution rasters
    Delineate {
        /// Input DEM file
        #[arg(long)]
        dem: PathBuf,
        /// JSON routing configuration; flags below override it
        #[arg(long)]
        config: Option<PathBuf>,
        /// Flow-direction algorithm: D8, DInf, MFD8, MFDmd, MFDInf
        #[arg(short, long)]
        algorithm: Option<String>,
        /// Routing method: climate, surface_account, subsurface_account, full_account
        #[arg(short, long)]
        method: Option<String>,
        /// Convergence exponent for MFD8 and MFDInf
        #[arg(short, long)]
        convergence: Option<f64>,
        /// Flow speeds as "surface,subsurface"; each a constant [m/s] or a raster path
        #[arg(long)]
        speeds: String,
        /// Dispersion coefficients as "surface,subsurface"; constants or raster paths
        #[arg(long)]
        dispersions: String,
        /// Drainage-time horizons in seconds as "surface,subsurface" ("inf" for none)
        #[arg(long)]
        drainage_times: Option<String>,
        /// Length of each response kernel
        #[arg(long)]
        time_steps: Option<usize>,
        /// Frontier capacity for one basin traversal
        #[arg(long)]
        queue_capacity: Option<usize>,
        /// Kernel time step written to the kernel rasters
        #[arg(long, default_value = "1")]
        kernel_step: usize,
        /// Also dump the basin of this cell as JSON, given as "row,col"
        #[arg(long)]
        basin: Option<String>,
        /// Output path prefix
        #[arg(short, long)]
        output_prefix: PathBuf,
    },
}

// ─── Helpers ────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to install the log subscriber")
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn read_raster(path: &Path) -> Result<Raster<f64>> {
    let pb = spinner("Reading raster...");
    let raster: Raster<f64> = read_geotiff(path)
        .with_context(|| format!("Failed to read raster {}", path.display()))?;
    pb.finish_and_clear();
    info!("Input: {} x {}", raster.cols(), raster.rows());
    Ok(raster)
}

fn write_result(raster: &Raster<f64>, path: &Path) -> Result<()> {
    let pb = spinner("Writing output...");
    write_geotiff(raster, path, Some(GeoTiffOptions::default()))
        .with_context(|| format!("Failed to write {}", path.display()))?;
    pb.finish_and_clear();
    Ok(())
}

fn done(name: &str, path: &Path, elapsed: std::time::Duration) {
    println!("{} saved to: {}", name, path.display());
    println!("  Processing time: {:.2?}", elapsed);
}

/// `<prefix>_<suffix>`
fn prefixed(prefix: &Path, suffix: &str) -> PathBuf {
    let mut name = prefix.as_os_str().to_owned();
    name.push("_");
    name.push(suffix);
    PathBuf::from(name)
}

fn parse_pair(s: &str, what: &str) -> Result<(String, String)> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != 2 || parts.iter().any(|p| p.is_empty()) {
        anyhow::bail!("{} must be 'surface,subsurface', got: {}", what, s);
    }
    Ok((parts[0].to_string(), parts[1].to_string()))
}

/// A per-cell parameter given on the command line: a number or a raster path
fn parse_layer(s: &str) -> Result<Layer> {
    match s.parse::<f64>() {
        Ok(v) => Ok(Layer::Constant(v)),
        Err(_) => Ok(Layer::Raster(read_raster(Path::new(s))?)),
    }
}

fn parse_layers(s: &str, what: &str) -> Result<PerChannel<Layer>> {
    let (surface, subsurface) = parse_pair(s, what)?;
    Ok(PerChannel::new(
        parse_layer(&surface).with_context(|| format!("Invalid surface {}", what))?,
        parse_layer(&subsurface).with_context(|| format!("Invalid subsurface {}", what))?,
    ))
}

fn parse_horizons(s: &str) -> Result<PerChannel<f64>> {
    let (surface, subsurface) = parse_pair(s, "drainage times")?;
    Ok(PerChannel::new(
        surface.parse().context("Invalid surface drainage time")?,
        subsurface.parse().context("Invalid subsurface drainage time")?,
    ))
}

fn parse_cell(s: &str) -> Result<(usize, usize)> {
    let parts: Vec<&str> = s.trim().split(',').collect();
    if parts.len() != 2 {
        anyhow::bail!("Cell must be 'row,col', got: {}", s);
    }
    let row: usize = parts[0].trim().parse().context("Invalid row")?;
    let col: usize = parts[1].trim().parse().context("Invalid col")?;
    Ok((row, col))
}

fn load_config(path: Option<&Path>) -> Result<RoutingConfig> {
    let Some(path) = path else {
        return Ok(RoutingConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Invalid config {}", path.display()))
}

// ─── Main ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose)?;

    match cli.command {
        // ── Info ─────────────────────────────────────────────────────
        Commands::Info { input } => {
            let raster = read_raster(&input)?;
            let (rows, cols) = raster.shape();
            let stats = raster.statistics();

            println!("File: {}", input.display());
            println!("Dimensions: {} x {} ({} cells)", cols, rows, raster.len());
            println!("Cell size: {}", raster.cell_size());
            if let Some(nodata) = raster.nodata() {
                println!("NoData: {}", nodata);
            }
            println!("\nStatistics:");
            if let Some(min) = stats.min {
                println!("  Min: {:.4}", min);
            }
            if let Some(max) = stats.max {
                println!("  Max: {:.4}", max);
            }
            if let Some(mean) = stats.mean {
                println!("  Mean: {:.4}", mean);
            }
            println!(
                "  Valid cells: {} ({:.1}%)",
                stats.valid_count,
                100.0 * stats.valid_count as f64 / raster.len().max(1) as f64
            );
        }

        // ── Graph ────────────────────────────────────────────────────
        Commands::Graph {
            dem,
            algorithm,
            convergence,
            output,
        } => {
            let algorithm: FlowAlgorithm = algorithm.parse()?;
            RoutingConfig {
                algorithm,
                convergence,
                ..Default::default()
            }
            .validate()?;

            let dem = read_raster(&dem)?;
            let transform = *dem.transform();
            let store = ParameterGrid::from_elevation(&dem, CellParameters::default());

            let start = Instant::now();
            let pb = spinner(&format!("Building {} drainage graph...", algorithm));
            let mut graph = DrainageGraph::build(&store, algorithm, convergence)?;
            pb.finish_and_clear();
            graph.set_transform(transform);

            let mut counts = graph.upstream_count_raster();
            counts.set_nodata(Some(f64::NAN));
            for ((row, col), value) in counts.data_mut().indexed_iter_mut() {
                if dem.value(row, col).is_none() {
                    *value = f64::NAN;
                }
            }
            write_result(&counts, &output)?;
            done("Upstream counts", &output, start.elapsed());
            println!("  Edges: {}", graph.edge_count());
        }

        // ── Delineate ────────────────────────────────────────────────
        Commands::Delineate {
            dem,
            config,
            algorithm,
            method,
            convergence,
            speeds,
            dispersions,
            drainage_times,
            time_steps,
            queue_capacity,
            kernel_step,
            basin,
            output_prefix,
        } => {
            let mut config = load_config(config.as_deref())?;
            if let Some(a) = algorithm {
                config.algorithm = a.parse()?;
            }
            if let Some(m) = method {
                config.method = m.parse::<RoutingMethod>()?;
            }
            if let Some(p) = convergence {
                config.convergence = p;
            }
            if let Some(t) = drainage_times {
                config.drainage_times = parse_horizons(&t)?;
            }
            if let Some(n) = time_steps {
                config.time_steps = n;
            }
            if let Some(q) = queue_capacity {
                config.queue_capacity = q;
            }
            config.validate()?;
            if kernel_step == 0 || kernel_step > config.time_steps {
                anyhow::bail!(
                    "--kernel-step must lie in [1, {}], got {}",
                    config.time_steps,
                    kernel_step
                );
            }
            let basin_cell = basin.as_deref().map(parse_cell).transpose()?;

            if !config.method.needs_graph() {
                println!("Method {} routes no lateral flow; nothing to do", config.method);
                return Ok(());
            }

            let dem = read_raster(&dem)?;
            let transform = *dem.transform();
            let [speed_sf, speed_ssf] = parse_layers(&speeds, "speeds")?.0;
            let [disp_sf, disp_ssf] = parse_layers(&dispersions, "dispersions")?.0;
            let store = ParameterLayers::new(dem)
                .flow_speed(Channel::Surface, speed_sf)
                .flow_speed(Channel::Subsurface, speed_ssf)
                .flow_dispersion(Channel::Surface, disp_sf)
                .flow_dispersion(Channel::Subsurface, disp_ssf)
                .build()?;
            info!(
                "Parameter grid: {} valid cells, {} / {}",
                store.valid_count(),
                config.algorithm,
                config.method
            );

            let start = Instant::now();
            let pb = spinner(&format!("Building {} drainage graph...", config.algorithm));
            let mut graph = DrainageGraph::build(&store, config.algorithm, config.convergence)?;
            graph.set_transform(transform);
            pb.set_message("Delineating basins...");
            let mut basins = delineate_all(&graph, &store, &config)?;
            basins.set_transform(transform);
            pb.finish_and_clear();

            for channel in Channel::ALL {
                let path = prefixed(&output_prefix, &format!("n{}.tif", channel.suffix()));
                write_result(&basins.contributing_count_raster(channel), &path)?;
                done(&format!("Contributing {} cells", channel), &path, start.elapsed());
            }
            for channel in config.method.channels() {
                let path = prefixed(
                    &output_prefix,
                    &format!("kernel_{}_t{}.tif", channel.suffix(), kernel_step),
                );
                write_result(&basins.kernel_raster(channel, kernel_step)?, &path)?;
                done(&format!("{} kernel", channel), &path, start.elapsed());
            }

            if let Some((row, col)) = basin_cell {
                let basin = basins
                    .get(row, col)
                    .with_context(|| format!("No basin at ({}, {}): null or outside the grid", row, col))?;
                let path = prefixed(&output_prefix, &format!("basin_{}_{}.json", row, col));
                let json = serde_json::to_string_pretty(basin).context("Failed to encode basin")?;
                std::fs::write(&path, json)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                done("Basin", &path, start.elapsed());
            }
        }
    }

    Ok(())
}
