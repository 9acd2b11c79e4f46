//! `fftacc` — validation harness for the memory-mapped FFT accelerator.
//!
//! ```text
//! USAGE:
//!   fftacc run [--sw]                Feed the bring-up tone, read back every lane
//!   fftacc encode <re> <im>          Pack raw components into a lane word
//!   fftacc decode <word> [--bp 8]    Unpack a lane word, raw and scaled
//!   fftacc lanes                     Print the lane address map
//!   fftacc vectors                   Print the generated input words
//! ```

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use fftacc_driver::{
    decode_scaled, select_backend, vectors::ToneSpec, Address, BackendSelection, ComplexSample,
    FftSession, Handshake, HarnessConfig, WireWord,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fftacc", about = "FFT accelerator validation harness", version)]
struct Cli {
    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Write the input tone to the write lane, then read and decode every read lane.
    Run {
        /// Use the software core instead of mapping /dev/mem.
        #[arg(long)]
        sw: bool,
        /// Print raw hex words only.
        #[arg(long)]
        raw: bool,
        #[command(flatten)]
        hw: HwArgs,
        #[command(flatten)]
        tone: ToneArgs,
    },
    /// Pack raw signed components into a lane word.
    Encode {
        /// Real component (signed 16-bit).
        #[arg(allow_hyphen_values = true)]
        re: i16,
        /// Imaginary component (signed 16-bit).
        #[arg(allow_hyphen_values = true)]
        im: i16,
    },
    /// Unpack a lane word (e.g. 0xFF4BFF4B).
    Decode {
        /// Lane word, hex with 0x prefix or decimal.
        #[arg(value_parser = parse_u32)]
        word: u32,
        /// Binary point for the scaled reading.
        #[arg(long, default_value_t = 8, allow_hyphen_values = true)]
        bp: i32,
    },
    /// Print the lane address map.
    Lanes {
        #[command(flatten)]
        hw: HwArgs,
    },
    /// Print the quantised input words.
    Vectors {
        #[command(flatten)]
        hw: HwArgs,
        #[command(flatten)]
        tone: ToneArgs,
    },
}

/// Accelerator build configuration, agreed with the hardware out-of-band.
#[derive(Args)]
struct HwArgs {
    /// Transform size N.
    #[arg(long, default_value_t = 8)]
    points: usize,
    /// Binary point position.
    #[arg(long, default_value_t = 8, allow_hyphen_values = true)]
    bp: i32,
    /// Component width in bits.
    #[arg(long, default_value_t = 16)]
    width: u32,
    /// Write lane address.
    #[arg(long, value_parser = parse_usize, default_value = "0x2000")]
    write_lane: usize,
    /// Read lane 0 address.
    #[arg(long, value_parser = parse_usize, default_value = "0x2008")]
    read_base: usize,
    /// Distance between read lanes.
    #[arg(long, default_value_t = 8)]
    stride: usize,
    /// Status register polled between the write and read phases.
    #[arg(long, value_parser = parse_usize)]
    status: Option<usize>,
    /// Ready bits of the status register.
    #[arg(long, value_parser = parse_u32, default_value = "0x1")]
    ready_mask: u32,
    /// Status reads before giving up.
    #[arg(long, default_value_t = 1000)]
    max_polls: u32,
    /// Physical memory device.
    #[arg(long, default_value = fftacc_driver::DEFAULT_DEVMEM_PATH)]
    devmem: String,
}

impl HwArgs {
    fn config(&self) -> HarnessConfig {
        let handshake = self.status.map_or(Handshake::None, |status| Handshake::Poll {
            status: Address::new(status),
            ready_mask: self.ready_mask,
            max_polls: self.max_polls,
        });
        HarnessConfig::default()
            .with_points(self.points)
            .with_binary_point(self.bp)
            .with_width(self.width)
            .with_write_lane(Address::new(self.write_lane))
            .with_read_lanes(Address::new(self.read_base), self.stride)
            .with_handshake(handshake)
            .with_devmem_path(&self.devmem)
    }
}

/// Input tone parameters.
#[derive(Args)]
struct ToneArgs {
    /// Tone frequency in Hz.
    #[arg(long, default_value_t = 16.0e6)]
    freq: f64,
    /// Sample rate in Hz.
    #[arg(long, default_value_t = 128.0e6)]
    sample_rate: f64,
}

impl ToneArgs {
    const fn spec(&self) -> ToneSpec {
        ToneSpec {
            freq_hz: self.freq,
            sample_rate_hz: self.sample_rate,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Cmd::Run { sw, raw, hw, tone } => cmd_run(sw, raw, &hw.config(), &tone.spec())?,
        Cmd::Encode { re, im } => cmd_encode(re, im),
        Cmd::Decode { word, bp } => cmd_decode(word, bp)?,
        Cmd::Lanes { hw } => cmd_lanes(&hw.config())?,
        Cmd::Vectors { hw, tone } => cmd_vectors(&hw.config(), &tone.spec())?,
    }

    Ok(())
}

fn cmd_run(sw: bool, raw: bool, config: &HarnessConfig, tone: &ToneSpec) -> Result<()> {
    config.validate()?;
    let selection = if sw {
        BackendSelection::Software
    } else {
        BackendSelection::DevMem
    };
    let backend = select_backend(selection, config).with_context(|| {
        format!("opening {selection:?} backend (re-run with --sw for the software core)")
    })?;
    println!("Backend : {}", backend.backend_type());

    let session = FftSession::new(backend, config)?;
    let inputs = tone.words(config.points, session.codec())?;

    println!(
        "Format  : {}   Points: {}",
        session.codec().format(),
        session.lanes().size()
    );
    println!();

    for point in session.run(&inputs)? {
        if raw {
            println!("Read {}: {}", point.index, point.word);
        } else {
            println!("{point}");
        }
    }
    Ok(())
}

fn cmd_encode(re: i16, im: i16) {
    let sample = ComplexSample::new(re, im);
    let word = sample.encode();
    println!("{sample} → {word}  ({:032b})", word.bits());
}

fn cmd_decode(word: u32, bp: i32) -> Result<()> {
    let word = WireWord::from_bits(word);
    let (re, im) = decode_scaled(word, bp)?;
    let sample = word.decode_raw();
    println!("Word   : {word}");
    println!("Fields : R:{:#06x} I:{:#06x}", word.real_field(), word.imag_field());
    println!("Raw    : {sample}");
    println!("Scaled : {re:+.6} {im:+.6}j  (bp {bp})");
    Ok(())
}

fn cmd_lanes(config: &HarnessConfig) -> Result<()> {
    let lanes = config.lane_map()?;
    println!("write lane   : {}", lanes.write_lane());
    for i in 0..lanes.size() {
        println!("read lane {i:<3}: {}", lanes.read_lane(i)?);
    }
    if let Some(status) = config.handshake.status_address() {
        println!("status       : {status}");
    }
    Ok(())
}

fn cmd_vectors(config: &HarnessConfig, tone: &ToneSpec) -> Result<()> {
    let codec = config.codec()?;
    for (n, word) in tone.words(config.points, &codec)?.iter().enumerate() {
        println!("{:>3}: {word}  {}", n + 1, codec.decode_raw(*word));
    }
    Ok(())
}

fn parse_u32(s: &str) -> Result<u32, String> {
    parse_usize(s).and_then(|v| u32::try_from(v).map_err(|e| e.to_string()))
}

fn parse_usize(s: &str) -> Result<usize, String> {
    let s = s.trim().replace('_', "");
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => usize::from_str_radix(hex, 16),
        None => s.parse(),
    }
    .map_err(|e| format!("invalid number {s:?}: {e}"))
}
