//! planet-deform CLI - noise-displaced sphere meshes.
//!
//! Builds a subdivided box, projects it onto a sphere, displaces it with
//! layered fractal noise and writes the result as OBJ (plus an optional
//! equirectangular displacement map).

use clap::{Args, Parser, Subcommand, ValueEnum};
use glam::Vec3;
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

use planet_deform::deform::{radius_range, DeformOptions, SphereDeformer};
use planet_deform::export::{export_displacement_png, export_mesh_obj, DisplacementMapOptions};
use planet_deform::geometry::BoxMesh;
use planet_deform::layers::{LayerSet, LayerSetFile};
use planet_deform::mesh::VertexBuffer;
use planet_deform::noise::{NoiseBackend, NoiseLayerParams, SeededNoise};

/// Deforms sphere meshes into planet-like surfaces with layered noise.
#[derive(Parser)]
#[command(name = "planet-deform")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Deform a sphere mesh and export it.
    Deform(DeformArgs),

    /// Print the default layer configuration and mesh sizes.
    Info {
        /// Grid subdivisions per box face edge.
        #[arg(short, long, default_value = "64")]
        segments: u32,
    },
}

#[derive(Args)]
struct DeformArgs {
    /// Grid subdivisions per box face edge.
    #[arg(short, long, default_value = "64")]
    segments: u32,

    /// Edge length of the source box.
    #[arg(long, default_value = "15.0")]
    size: f32,

    /// Base radius of the sphere before displacement.
    #[arg(short, long)]
    radius: Option<f32>,

    /// Noise seed for reproducible surfaces.
    #[arg(long)]
    seed: Option<u32>,

    /// Noise algorithm.
    #[arg(short, long)]
    backend: Option<BackendArg>,

    /// JSON layer configuration (array of layers or `{ "layers": [...] }`).
    /// Cannot be combined with the single-layer flags.
    #[arg(short, long)]
    layers: Option<PathBuf>,

    /// Append this many default layers after the configured ones.
    #[arg(long, default_value = "0")]
    extra_layers: usize,

    #[command(flatten)]
    layer: LayerArgs,

    /// Run the vertex loop on the calling thread only.
    #[arg(long)]
    sequential: bool,

    /// Output directory for generated files.
    #[arg(short, long, default_value = "./output")]
    output: PathBuf,

    /// Base name for output files.
    #[arg(short, long, default_value = "planet")]
    name: String,

    /// Also export an equirectangular displacement map PNG.
    #[arg(long)]
    displacement_map: bool,

    /// Displacement map width in pixels.
    #[arg(long, default_value = "1024")]
    map_width: u32,

    /// Displacement map height in pixels.
    #[arg(long, default_value = "512")]
    map_height: u32,
}

/// Single-layer parameters, used when no layer file is given.
#[derive(Args)]
struct LayerArgs {
    /// Number of noise octaves.
    #[arg(long, conflicts_with = "layers", default_value = "4")]
    octaves: u32,

    /// Amplitude decay per octave.
    #[arg(long, conflicts_with = "layers", default_value = "0.5")]
    persistence: f32,

    /// Starting sampling frequency (base roughness).
    #[arg(long, conflicts_with = "layers", default_value = "1.0")]
    base_frequency: f32,

    /// Frequency growth per octave (roughness).
    #[arg(long, conflicts_with = "layers", default_value = "2.0")]
    roughness: f32,

    /// Displacement strength.
    #[arg(long, conflicts_with = "layers", default_value = "0.8")]
    strength: f32,

    /// Floor applied to the octave sum.
    #[arg(long, conflicts_with = "layers", default_value = "1.0")]
    min_value: f32,

    /// Noise field offset, as `x,y,z`.
    #[arg(long, conflicts_with = "layers", value_delimiter = ',', default_value = "0,0,0", allow_negative_numbers = true)]
    center: Vec<f32>,
}

impl LayerArgs {
    fn to_params(&self) -> NoiseLayerParams {
        NoiseLayerParams {
            num_octaves: self.octaves,
            persistence: self.persistence,
            base_frequency: self.base_frequency,
            frequency_multiplier: self.roughness,
            strength: self.strength,
            min_value: self.min_value,
            center: Vec3::from_slice(&self.center),
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum BackendArg {
    /// OpenSimplex noise.
    Simplex,
    /// Perlin noise.
    Perlin,
    /// SIMD simplex noise.
    Simd,
}

impl From<BackendArg> for NoiseBackend {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Simplex => NoiseBackend::Simplex,
            BackendArg::Perlin => NoiseBackend::Perlin,
            BackendArg::Simd => NoiseBackend::Simd,
        }
    }
}

const DEFAULT_BASE_RADIUS: f32 = 5.0;

fn main() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Deform(args) => run_deform(args),
        Commands::Info { segments } => run_info(segments),
    }
}

fn run_deform(args: DeformArgs) {
    if args.segments < 1 || args.segments > 1024 {
        eprintln!("Error: Segments must be between 1 and 1024");
        std::process::exit(1);
    }

    if args.layer.center.len() != 3 {
        eprintln!("Error: Center must have exactly three components (x,y,z)");
        std::process::exit(1);
    }

    if !(args.size.is_finite() && args.size > 0.0) {
        eprintln!("Error: Box size must be a positive number");
        std::process::exit(1);
    }

    let config = match &args.layers {
        Some(path) => LayerSetFile::load(path).unwrap_or_else(|e| {
            eprintln!("Error loading layer config {}: {}", path.display(), e);
            std::process::exit(1);
        }),
        None => LayerSetFile::from_layers(LayerSet::single(args.layer.to_params())),
    };

    let mut layers = config.layers;
    for _ in 0..args.extra_layers {
        layers.create_layer();
    }

    let seed = args
        .seed
        .or(config.seed)
        .unwrap_or_else(rand::random::<u32>);
    let backend = args
        .backend
        .map(NoiseBackend::from)
        .or(config.backend)
        .unwrap_or_default();
    let base_radius = args.radius.or(config.base_radius).unwrap_or(DEFAULT_BASE_RADIUS);

    println!("planet-deform - Noise-Displaced Sphere");
    println!("======================================");
    println!("Mesh: box {} x {} segments", args.size, args.segments);
    println!("Seed: {} ({})", seed, backend.name());
    println!("Layers: {} ({} octaves total)", layers.len(), layers.total_octaves());
    println!("Base radius: {}", base_radius);
    println!("Output: {}", args.output.display());

    let start = Instant::now();

    let options = if args.sequential {
        DeformOptions::sequential()
    } else {
        DeformOptions::default()
    };
    let deformer = SphereDeformer::with_options(SeededNoise::new(backend, seed), options);

    println!("\nBuilding mesh...");
    let mut mesh = BoxMesh::new(args.size, args.segments).build();
    println!(
        "  {} vertices, {} triangles",
        mesh.vertex_count(),
        mesh.triangle_count()
    );

    println!("Deforming...");
    deformer
        .deform(&mut mesh, base_radius, &layers)
        .unwrap_or_else(|e| {
            eprintln!("Error during deformation: {}", e);
            std::process::exit(1);
        });

    let deform_time = start.elapsed();
    println!("Deformation completed in {:.2?}", deform_time);

    let (min_r, max_r) = radius_range(mesh.positions());
    println!("Radius range: [{:.4}, {:.4}]", min_r, max_r);

    println!("\nExporting...");
    let export_start = Instant::now();

    let obj_path = args.output.join(format!("{}.obj", args.name));
    export_mesh_obj(&mesh, &obj_path).unwrap_or_else(|e| {
        eprintln!("Error exporting OBJ: {}", e);
        std::process::exit(1);
    });
    println!("  Exported mesh: {}", obj_path.display());

    if args.displacement_map {
        let map_path = args.output.join(format!("{}_displacement.png", args.name));
        let map_options = DisplacementMapOptions {
            width: args.map_width,
            height: args.map_height,
            ..Default::default()
        };
        let (lo, hi) = export_displacement_png(&deformer, &layers, base_radius, &map_path, &map_options)
            .unwrap_or_else(|e| {
                eprintln!("Error exporting displacement map: {}", e);
                std::process::exit(1);
            });
        println!(
            "  Exported displacement map: {} (radius {:.4}..{:.4})",
            map_path.display(),
            lo,
            hi
        );
    }

    println!("Export completed in {:.2?}", export_start.elapsed());
    tracing::info!(
        vertices = mesh.vertex_count(),
        min_radius = min_r,
        max_radius = max_r,
        "done"
    );
}

fn run_info(segments: u32) {
    let box_mesh = BoxMesh::new(15.0, segments);

    println!("planet-deform - Configuration Info");
    println!("==================================");
    println!("Segments per face edge: {}", box_mesh.segments);
    println!("Vertices: {}", box_mesh.vertex_count());
    println!("Triangles: {}", box_mesh.triangle_count());
    println!("Default base radius: {}", DEFAULT_BASE_RADIUS);

    let defaults = LayerSetFile {
        base_radius: Some(DEFAULT_BASE_RADIUS),
        backend: Some(NoiseBackend::default()),
        ..LayerSetFile::from_layers(LayerSet::single(NoiseLayerParams::default()))
    };
    match defaults.to_json_string() {
        Ok(json) => println!("\nDefault layer config:\n{}", json),
        Err(e) => eprintln!("Error rendering default config: {}", e),
    }
}
