use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use facekit::{Engine, EngineConfig, Face, FaceFeature, ImageFrame};

#[derive(Parser)]
#[command(name = "facekit", about = "Face detection and recognition via the gawrs_face engine")]
struct Cli {
    /// Path to libgawrs_face.so (falls back to FACEKIT_LIB, then the
    /// system loader path).
    #[arg(long, global = true)]
    lib: Option<String>,

    /// Engine configuration file (TOML).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect faces in an image
    Detect {
        image: PathBuf,
        /// Print detections as JSON
        #[arg(long)]
        json: bool,
    },
    /// Extract the feature vector of the best face in an image
    Extract {
        image: PathBuf,
        /// File to write the feature blob to
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Compare the faces in two images
    Compare {
        image_a: PathBuf,
        image_b: PathBuf,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show engine version info
    Version,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let lib_path = cli
        .lib
        .clone()
        .or_else(|| std::env::var("FACEKIT_LIB").ok())
        .unwrap_or_else(|| facekit::engine::DEFAULT_LIB.to_string());

    let base_config = match &cli.config {
        Some(path) => EngineConfig::from_toml_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => EngineConfig::default(),
    };

    match cli.command {
        Commands::Detect { image, json } => {
            let engine = init_engine(&lib_path, &base_config, true, false)?;
            let frame = load_frame(&image)?;
            let faces = engine.detect(&frame)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&faces)?);
            } else if faces.is_empty() {
                println!("no faces found");
            } else {
                for (i, face) in faces.iter().enumerate() {
                    print_face(i, face);
                }
            }
        }
        Commands::Extract { image, output } => {
            let engine = init_engine(&lib_path, &base_config, true, true)?;
            let frame = load_frame(&image)?;
            let feature = extract_best(&engine, &frame, &image)?;

            std::fs::write(&output, feature.as_bytes())
                .with_context(|| format!("writing {}", output.display()))?;
            println!(
                "wrote {} bytes (embedding version {}) to {}",
                feature.as_bytes().len(),
                feature.version(),
                output.display()
            );
        }
        Commands::Compare { image_a, image_b, json } => {
            let engine = init_engine(&lib_path, &base_config, true, true)?;

            let frame_a = load_frame(&image_a)?;
            let frame_b = load_frame(&image_b)?;
            let feature_a = extract_best(&engine, &frame_a, &image_a)?;
            let feature_b = extract_best(&engine, &frame_b, &image_b)?;

            let confidence = engine.compare(&feature_a, &feature_b)?;
            if json {
                println!("{}", serde_json::json!({ "confidence": confidence }));
            } else {
                println!("confidence: {confidence:.4}");
            }
        }
        Commands::Version => {
            let engine = init_engine(&lib_path, &base_config, false, false)?;
            println!("{}", engine.version());
        }
    }

    Ok(())
}

/// Initialize the engine with the given model flags forced on top of the
/// base configuration.
fn init_engine(
    lib_path: &str,
    base: &EngineConfig,
    detect: bool,
    recognize: bool,
) -> Result<Engine> {
    let mut config = base.clone();
    config.support_face_detect = config.support_face_detect || detect;
    config.support_face_recognition = config.support_face_recognition || recognize;
    Engine::init_with_lib(lib_path, &config).with_context(|| format!("initializing {lib_path}"))
}

fn load_frame(path: &PathBuf) -> Result<ImageFrame> {
    let frame = ImageFrame::open(path).with_context(|| format!("loading {}", path.display()))?;
    tracing::debug!(path = %path.display(), width = frame.width(), height = frame.height(), "image loaded");
    Ok(frame)
}

/// Detect and return the feature of the highest-confidence face.
fn extract_best(engine: &Engine, frame: &ImageFrame, path: &PathBuf) -> Result<FaceFeature> {
    let faces = engine.detect(frame)?;
    let best = faces
        .iter()
        .max_by(|a, b| a.score.partial_cmp(&b.score).unwrap_or(std::cmp::Ordering::Equal));
    let Some(face) = best else {
        bail!("no face found in {}", path.display());
    };
    Ok(engine.extract(frame, face)?)
}

fn print_face(index: usize, face: &Face) {
    println!(
        "face {index}: score {:.3}, rect [{:.1}, {:.1}, {:.1}, {:.1}] ({:.0}x{:.0})",
        face.score,
        face.rect.left,
        face.rect.top,
        face.rect.right,
        face.rect.bottom,
        face.rect.width(),
        face.rect.height(),
    );
    let names = ["left_eye", "right_eye", "nose", "left_mouth", "right_mouth"];
    for (name, p) in names.iter().zip(face.landmarks.iter()) {
        println!("  {name}: ({:.1}, {:.1})", p.x, p.y);
    }
}
