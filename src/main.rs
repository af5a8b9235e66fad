//! Texmap CLI - Command-line tool for VTF and DDS textures.
//!
//! This is the main entry point for the texmap command-line application.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

use texmap::codec::{from_dynamic, to_dynamic};
use texmap::common::{ErrorKind, RawLayout, SurfaceKind};
use texmap::dds::FourCC;
use texmap::prelude::*;

/// Texmap - VTF and DDS texture tool
#[derive(Parser)]
#[command(name = "texmap")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the header and surface layout of a texture
    Info {
        /// Input VTF or DDS file
        #[arg(short, long, env = "TEXMAP_INPUT")]
        input: PathBuf,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Decode the full-resolution surface to an image file
    Extract {
        /// Input VTF or DDS file
        #[arg(short, long, env = "TEXMAP_INPUT")]
        input: PathBuf,

        /// Output image (format from the extension, e.g. .png)
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Encode an image as VTF or DDS
    Convert {
        /// Input image
        #[arg(short, long, env = "TEXMAP_INPUT")]
        input: PathBuf,

        /// Output file ending in .vtf or .dds
        #[arg(short, long)]
        output: PathBuf,

        /// Stored pixel format
        #[arg(short, long, value_enum)]
        format: Option<TextureFormat>,

        /// VTF container version
        #[arg(long, default_value = "7.4")]
        vtf_version: VtfVersion,

        /// Store the base level only
        #[arg(long)]
        no_mipmaps: bool,
    },

    /// Parse every texture under a directory and report failures
    Scan {
        /// Directory to walk
        #[arg(short, long)]
        dir: PathBuf,
    },
}

/// Pixel formats the writers can produce.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum TextureFormat {
    Rgba8888,
    Bgra8888,
    Rgb888,
    Bgr888,
    /// 8-bit luminance
    I8,
    /// 8-bit luminance and alpha
    Ia88,
    /// 8-bit alpha
    A8,
    /// BC1, opaque
    Dxt1,
    /// BC1 with one-bit alpha (VTF only)
    Dxt1a,
    /// BC2
    Dxt3,
    /// BC3
    Dxt5,
    /// Single channel (DDS only)
    Bc4,
    /// Two channels (DDS only)
    Bc5,
    /// BC7 with a DX10 header (DDS only)
    Bc7,
}

impl TextureFormat {
    fn to_vtf(self) -> Option<VtfPixelFormat> {
        let format = match self {
            Self::Rgba8888 => VtfPixelFormat::Rgba8888,
            Self::Bgra8888 => VtfPixelFormat::Bgra8888,
            Self::Rgb888 => VtfPixelFormat::Rgb888,
            Self::Bgr888 => VtfPixelFormat::Bgr888,
            Self::I8 => VtfPixelFormat::I8,
            Self::Ia88 => VtfPixelFormat::Ia88,
            Self::A8 => VtfPixelFormat::A8,
            Self::Dxt1 => VtfPixelFormat::Dxt1,
            Self::Dxt1a => VtfPixelFormat::Dxt1OneBitAlpha,
            Self::Dxt3 => VtfPixelFormat::Dxt3,
            Self::Dxt5 => VtfPixelFormat::Dxt5,
            Self::Bc4 | Self::Bc5 | Self::Bc7 => return None,
        };
        Some(format)
    }

    fn to_dds(self) -> Option<DdsFormat> {
        let format = match self {
            Self::Rgba8888 => DdsFormat::Masked(RawLayout::Rgba),
            Self::Bgra8888 => DdsFormat::BGRA32,
            Self::Rgb888 => DdsFormat::Masked(RawLayout::Rgb),
            Self::Bgr888 => DdsFormat::BGR24,
            Self::I8 => DdsFormat::L8,
            Self::Ia88 => DdsFormat::LA16,
            Self::A8 => DdsFormat::Masked(RawLayout::A),
            Self::Dxt1 => DdsFormat::FourCc(FourCC::DXT1),
            Self::Dxt3 => DdsFormat::FourCc(FourCC::DXT3),
            Self::Dxt5 => DdsFormat::FourCc(FourCC::DXT5),
            Self::Bc4 => DdsFormat::FourCc(FourCC::ATI1),
            Self::Bc5 => DdsFormat::FourCc(FourCC::ATI2),
            Self::Bc7 => DdsFormat::BC7,
            Self::Dxt1a => return None,
        };
        Some(format)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Info { input, json } => {
            cmd_info(&input, json)?;
        }
        Commands::Extract { input, output } => {
            cmd_extract(&input, &output)?;
        }
        Commands::Convert {
            input,
            output,
            format,
            vtf_version,
            no_mipmaps,
        } => {
            cmd_convert(&input, &output, format, vtf_version, !no_mipmaps)?;
        }
        Commands::Scan { dir } => {
            cmd_scan(&dir)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_texture(path: &Path) -> Result<(Vec<u8>, Texture)> {
    let data = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let texture = Texture::parse(&data).with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok((data, texture))
}

fn cmd_info(input: &Path, json: bool) -> Result<()> {
    let (data, texture) = read_texture(input)?;

    if json {
        let header = match &texture {
            Texture::Vtf(file) => serde_json::to_value(file.header())?,
            Texture::Dds(file) => serde_json::to_value(file.info())?,
        };
        let report = serde_json::json!({
            "container": texture.kind(),
            "file_size": data.len(),
            "format": texture.format(),
            "header": header,
            "layout": texture.layout(),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let format = texture.format();
    println!("{}: {} texture", input.display(), texture.kind());
    println!("  Dimensions: {}x{}", texture.width(), texture.height());
    println!(
        "  Format:     {} ({}, decodes to {})",
        texture.format_name(),
        format.method,
        format.mode
    );

    match &texture {
        Texture::Vtf(file) => {
            let header = file.header();
            let flags: Vec<_> = header.flags.names().collect();
            println!("  Version:    {}", header.version);
            println!("  Header:     {} bytes", header.header_size);
            println!("  Mipmaps:    {}", header.mipmap_count);
            println!("  Frames:     {}", header.frames);
            println!("  Faces:      {}", header.face_count());
            println!("  Depth:      {}", header.depth);
            if !flags.is_empty() {
                println!("  Flags:      {}", flags.join(" | "));
            }
            println!(
                "  Thumbnail:  {} {}x{}",
                header.low_res_format, header.low_res_width, header.low_res_height
            );
        }
        Texture::Dds(file) => {
            let info = file.info();
            println!("  Header:     {} bytes", info.data_offset);
            println!("  Mipmaps:    {}", info.mip_count);
            println!("  Array size: {}", info.array_size);
            println!("  Faces:      {}", info.faces);
            println!("  Depth:      {}", info.depth);
        }
    }

    let layout = texture.layout();
    println!("  Surfaces:   {}", layout.surfaces.len());
    for surface in &layout.surfaces {
        let kind = match surface.kind {
            SurfaceKind::Thumbnail => "thumbnail".to_string(),
            SurfaceKind::Level(level) => format!("mip {level}"),
        };
        println!(
            "    {:<10} layer {:<3} {:>5}x{:<5} @ {:>10} +{}",
            kind, surface.layer, surface.width, surface.height, surface.byte_offset, surface.byte_length
        );
    }

    let data_end = layout.data_end();
    println!("  Data end:   {} (file is {} bytes)", data_end, data.len());
    if data_end > data.len() {
        println!("  Warning: file is {} bytes short", data_end - data.len());
    }

    Ok(())
}

fn cmd_extract(input: &Path, output: &Path) -> Result<()> {
    println!("Extracting: {} -> {}", input.display(), output.display());

    let start = Instant::now();
    let (data, texture) = read_texture(input)?;
    let image = texture
        .decode(&data, &StandardCodec)
        .context("Failed to decode primary surface")?;

    to_dynamic(&image)?
        .save(output)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!(
        "Wrote {}x{} {} image in {:?}",
        image.width,
        image.height,
        image.mode,
        start.elapsed()
    );

    Ok(())
}

fn cmd_convert(
    input: &Path,
    output: &Path,
    format: Option<TextureFormat>,
    vtf_version: VtfVersion,
    mipmaps: bool,
) -> Result<()> {
    println!("Converting: {} -> {}", input.display(), output.display());

    let Some(kind) = ContainerKind::from_path(output) else {
        bail!("Output must end in .vtf or .dds: {}", output.display());
    };

    let dynamic = image::open(input).with_context(|| format!("Failed to open image {}", input.display()))?;
    let image = from_dynamic(&dynamic);
    debug!(width = image.width, height = image.height, mode = %image.mode, "loaded image");

    let options = match kind {
        ContainerKind::Vtf => {
            let mut options = VtfWriteOptions::default()
                .with_version(vtf_version)
                .with_mipmaps(mipmaps);
            if let Some(format) = format {
                let Some(pixel_format) = format.to_vtf() else {
                    bail!("{format:?} cannot be stored in a VTF file");
                };
                options = options.with_pixel_format(pixel_format);
            }
            WriteOptions::Vtf(options)
        }
        ContainerKind::Dds => {
            let mut options = DdsWriteOptions::default().with_mipmaps(mipmaps);
            if let Some(format) = format {
                let Some(dds_format) = format.to_dds() else {
                    bail!("{format:?} cannot be stored in a DDS file");
                };
                options = options.with_format(dds_format);
            }
            WriteOptions::Dds(options)
        }
    };

    let start = Instant::now();
    let bytes = options
        .write(&image, &ImageRsOps::new(), &StandardCodec)
        .context("Failed to encode texture")?;
    fs::write(output, &bytes).context("Failed to write output file")?;

    info!(bytes = bytes.len(), "wrote {}", output.display());
    println!("Wrote {} bytes in {:?}", bytes.len(), start.elapsed());

    Ok(())
}

/// Outcome of checking one file during a scan.
fn check_file(path: &Path) -> std::result::Result<(), (ErrorKind, String)> {
    let data = fs::read(path).map_err(|e| (ErrorKind::Io, e.to_string()))?;
    let texture = Texture::parse(&data).map_err(|e| (e.kind(), e.to_string()))?;
    for surface in &texture.layout().surfaces {
        texture
            .surface_bytes(&data, surface)
            .map_err(|e| (e.kind(), e.to_string()))?;
    }
    Ok(())
}

fn cmd_scan(dir: &Path) -> Result<()> {
    println!("Scanning: {}", dir.display());

    let paths: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| ContainerKind::from_path(path).is_some())
        .collect();

    if paths.is_empty() {
        println!("No .vtf or .dds files found");
        return Ok(());
    }

    let pb = ProgressBar::new(paths.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("#>-"),
    );

    let start = Instant::now();
    let failures: Vec<(PathBuf, ErrorKind, String)> = paths
        .par_iter()
        .filter_map(|path| {
            let result = check_file(path);
            pb.inc(1);
            result.err().map(|(kind, message)| (path.clone(), kind, message))
        })
        .collect();
    pb.finish_with_message("Done");

    let mut by_kind: HashMap<ErrorKind, Vec<(PathBuf, String)>> = HashMap::new();
    for (path, kind, message) in failures {
        by_kind.entry(kind).or_default().push((path, message));
    }
    let failed: usize = by_kind.values().map(Vec::len).sum();

    println!(
        "Checked {} files in {:?}: {} ok, {} failed",
        paths.len(),
        start.elapsed(),
        paths.len() - failed,
        failed
    );

    let mut kinds: Vec<_> = by_kind.into_iter().collect();
    kinds.sort_by_key(|(_, files)| std::cmp::Reverse(files.len()));
    for (kind, mut files) in kinds {
        files.sort();
        println!("\n{:?} ({}):", kind, files.len());
        for (path, message) in files {
            println!("  {}: {}", path.display(), message);
        }
    }

    Ok(())
}
