//! Command-line arguments and the session run they drive.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{bail, Context};
use clap::Parser;
use imagefx_core::{DownloadEncoding, Effect, EdgeParams, Session, SessionConfig};
use tracing::{info, warn};

/// Apply grayscale, blur or edge detection to one JPEG/PNG image.
///
/// The image is stretched to 1080x720 first. Every effect reads that
/// normalized image, never another effect's output.
#[derive(Debug, Parser)]
#[command(name = "imagefx", version, about)]
pub struct Args {
    /// JPEG or PNG file to load
    pub input: PathBuf,

    /// Write gray_image.png
    #[arg(long)]
    pub grayscale: bool,

    /// Write blurred_image.png using this odd kernel size (3-15 in the UI)
    #[arg(long, value_name = "KERNEL")]
    pub blur: Option<u32>,

    /// Write edge_image.png using LOW,HIGH thresholds
    #[arg(long, value_name = "LOW,HIGH")]
    pub edges: Option<Thresholds>,

    /// Apply every effect with its default parameters
    #[arg(long, conflicts_with_all = ["grayscale", "blur", "edges"])]
    pub all: bool,

    /// Directory to write results into
    #[arg(long, short, default_value = ".")]
    pub out_dir: PathBuf,

    /// Write the bare pixel buffer instead of an encoded PNG
    #[arg(long)]
    pub raw: bool,

    /// Ignore the EXIF orientation tag
    #[arg(long)]
    pub ignore_orientation: bool,
}

/// `LOW,HIGH` edge thresholds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds(pub EdgeParams);

impl FromStr for Thresholds {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (low, high) = s
            .split_once(',')
            .ok_or_else(|| format!("expected LOW,HIGH, got '{}'", s))?;
        let parse = |v: &str| {
            v.trim()
                .parse::<f32>()
                .map_err(|e| format!("invalid threshold '{}': {}", v.trim(), e))
        };
        Ok(Thresholds(EdgeParams::new(parse(low)?, parse(high)?)))
    }
}

impl Args {
    fn session_config(&self) -> SessionConfig {
        SessionConfig {
            apply_orientation: !self.ignore_orientation,
            download_encoding: if self.raw {
                DownloadEncoding::RawPixels
            } else {
                DownloadEncoding::Png
            },
            ..SessionConfig::default()
        }
    }
}

/// Run the session and return the paths written.
pub fn run(args: &Args) -> anyhow::Result<Vec<PathBuf>> {
    if !args.all && !args.grayscale && args.blur.is_none() && args.edges.is_none() {
        bail!("nothing to do: pass --grayscale, --blur, --edges or --all");
    }

    let bytes = fs::read(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let declared = args
        .input
        .file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string);

    let mut session = Session::with_config(args.session_config());
    let source = session
        .upload(&bytes, declared.as_deref())
        .with_context(|| format!("failed to load {}", args.input.display()))?;
    let (orig_w, orig_h) = source.original_dimensions();
    info!(orig_w, orig_h, "Loaded {}", args.input.display());

    if args.all {
        for effect in Effect::ALL {
            session.apply_default(effect)?;
        }
    } else {
        if args.grayscale {
            session.apply_grayscale()?;
        }
        if let Some(kernel_size) = args.blur {
            session.apply_blur(kernel_size)?;
        }
        if let Some(Thresholds(params)) = args.edges {
            session.apply_edges(params.low, params.high)?;
        }
    }

    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("failed to create {}", args.out_dir.display()))?;

    let mut written = Vec::new();
    for effect in Effect::ALL {
        let Some(download) = session.download(effect)? else {
            continue;
        };
        let path = args.out_dir.join(download.file_name);
        write_file(&path, &download.bytes)?;
        written.push(path);
    }

    if args.raw {
        warn!("Raw pixel buffers were written with a .png name; they are not PNG files");
    }
    Ok(written)
}

fn write_file(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    fs::write(path, bytes).with_context(|| format!("failed to write {}", path.display()))?;
    info!(len = bytes.len(), "Wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use imagefx_core::encode::encode_png;
    use imagefx_core::Channels;

    fn write_input(dir: &Path) -> PathBuf {
        let pixels: Vec<u8> = (0..40 * 30)
            .flat_map(|i| if i % 40 < 20 { [0, 0, 255] } else { [255, 255, 255] })
            .collect();
        let path = dir.join("square.png");
        fs::write(&path, encode_png(&pixels, 40, 30, Channels::Rgb).unwrap()).unwrap();
        path
    }

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("imagefx").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_thresholds_parse() {
        let t: Thresholds = "100, 200".parse().unwrap();
        assert_eq!(t.0, EdgeParams::new(100.0, 200.0));
        assert!("100".parse::<Thresholds>().is_err());
        assert!("a,b".parse::<Thresholds>().is_err());
    }

    #[test]
    fn test_all_conflicts_with_single_effects() {
        let result = Args::try_parse_from(["imagefx", "in.png", "--all", "--grayscale"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_nothing_to_do() {
        let args = parse(&["in.png"]);
        assert!(run(&args).is_err());
    }

    #[test]
    fn test_writes_requested_effects() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path());
        let out = dir.path().join("out");

        let args = parse(&[
            input.to_str().unwrap(),
            "--grayscale",
            "--edges",
            "200,100",
            "--out-dir",
            out.to_str().unwrap(),
        ]);
        let written = run(&args).unwrap();

        assert_eq!(
            written,
            vec![out.join("gray_image.png"), out.join("edge_image.png")]
        );
        let gray = image::open(out.join("gray_image.png")).unwrap();
        assert_eq!((gray.width(), gray.height()), (1080, 720));
        assert!(!out.join("blurred_image.png").exists());
    }

    #[test]
    fn test_raw_output_length() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path());

        let args = parse(&[
            input.to_str().unwrap(),
            "--blur",
            "5",
            "--raw",
            "-o",
            dir.path().to_str().unwrap(),
        ]);
        run(&args).unwrap();

        let bytes = fs::read(dir.path().join("blurred_image.png")).unwrap();
        assert_eq!(bytes.len(), 1080 * 720 * 3);
    }

    #[test]
    fn test_even_kernel_fails() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path());
        let args = parse(&[input.to_str().unwrap(), "--blur", "4"]);
        assert!(run(&args).is_err());
    }

    #[test]
    fn test_unsupported_extension_fails() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path());
        let renamed = dir.path().join("square.gif");
        fs::rename(&input, &renamed).unwrap();

        let args = parse(&[renamed.to_str().unwrap(), "--grayscale"]);
        assert!(run(&args).is_err());
    }
}
