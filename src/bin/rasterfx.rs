use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use rasterfx::codec::{self, HeaderRequest};
use rasterfx::{
    EffectKind, EffectPipeline, EffectSpec, PipelineOpts, PixelBuffer, UnknownEffectPolicy,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "rasterfx", version)]
struct Cli {
    /// Log every applied step (overridden by RUST_LOG).
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Apply an effect list to an image and write a PNG.
    Apply(ApplyArgs),
    /// Run a saved length-prefixed request body and write the PNG response.
    Request(RequestArgs),
    /// Apply a single header-style manipulation.
    Manip(ManipArgs),
    /// Print the supported effect names.
    List,
}

#[derive(Parser, Debug)]
struct PipelineArgs {
    /// Seed for the noise effect.
    #[arg(long)]
    seed: Option<u64>,

    /// Fail on unknown effect names instead of skipping them.
    #[arg(long)]
    strict: bool,

    /// Worker threads for row-parallel effects.
    #[arg(long)]
    threads: Option<usize>,
}

impl PipelineArgs {
    fn opts(&self) -> PipelineOpts {
        PipelineOpts {
            seed: self.seed,
            unknown_effects: if self.strict {
                UnknownEffectPolicy::Reject
            } else {
                UnknownEffectPolicy::Skip
            },
            threads: self.threads,
        }
    }
}

#[derive(Parser, Debug)]
struct ApplyArgs {
    /// Input image (any format the decoder understands).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// JSON effect list: a bare array or an object with an `effects` array.
    #[arg(long)]
    effects: Option<PathBuf>,

    /// Effect name with default parameters, appended after `--effects`. Repeatable.
    #[arg(long = "effect")]
    effect: Vec<String>,

    #[command(flatten)]
    pipeline: PipelineArgs,
}

#[derive(Parser, Debug)]
struct RequestArgs {
    /// Request body: 4-byte big-endian JSON length, JSON, image bytes.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    pipeline: PipelineArgs,
}

#[derive(Parser, Debug)]
struct ManipArgs {
    /// Manipulation type: spin_cube, rotate or grayscale.
    #[arg(long = "type")]
    manip_type: String,

    /// Angle in degrees.
    #[arg(long)]
    angle: Option<String>,

    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Apply(args) => cmd_apply(args),
        Command::Request(args) => cmd_request(args),
        Command::Manip(args) => cmd_manip(args),
        Command::List => {
            for kind in EffectKind::ALL {
                println!("{kind}");
            }
            Ok(())
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_effects_json(path: &Path) -> anyhow::Result<serde_json::Value> {
    let bytes =
        std::fs::read(path).with_context(|| format!("open effects '{}'", path.display()))?;
    let v: serde_json::Value =
        serde_json::from_slice(&bytes).with_context(|| "parse effects JSON")?;
    Ok(match v {
        serde_json::Value::Object(mut obj) => obj.remove("effects").unwrap_or_default(),
        other => other,
    })
}

fn cmd_apply(args: ApplyArgs) -> anyhow::Result<()> {
    let pipeline = EffectPipeline::new(args.pipeline.opts())?;

    let mut specs: Vec<EffectSpec> = match &args.effects {
        Some(path) => pipeline.parse(&read_effects_json(path)?)?,
        None => Vec::new(),
    };
    let named: Vec<serde_json::Value> = args
        .effect
        .iter()
        .map(|name| serde_json::json!({ "type": name }))
        .collect();
    specs.extend(pipeline.parse(&serde_json::Value::Array(named))?);

    let img = codec::read_image(&args.in_path)?;
    let out = pipeline.run(img, &specs)?;
    write_png(&args.out, &out)
}

fn cmd_request(args: RequestArgs) -> anyhow::Result<()> {
    let body = std::fs::read(&args.in_path)
        .with_context(|| format!("read request '{}'", args.in_path.display()))?;
    let pipeline = EffectPipeline::new(args.pipeline.opts())?;
    let png = codec::process_framed(&pipeline, &body)?;
    create_parent_dir(&args.out)?;
    std::fs::write(&args.out, png)
        .with_context(|| format!("write png '{}'", args.out.display()))?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_manip(args: ManipArgs) -> anyhow::Result<()> {
    let req = HeaderRequest::from_headers(Some(&args.manip_type), args.angle.as_deref())?;
    let img = codec::read_image(&args.in_path)?;
    let out = EffectPipeline::new(PipelineOpts::default())?.run(img, &[req.to_effect()])?;
    write_png(&args.out, &out)
}

fn create_parent_dir(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}

fn write_png(path: &Path, img: &PixelBuffer) -> anyhow::Result<()> {
    create_parent_dir(path)?;
    image::save_buffer_with_format(
        path,
        img.as_raw(),
        img.width(),
        img.height(),
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;

    eprintln!("wrote {}", path.display());
    Ok(())
}
