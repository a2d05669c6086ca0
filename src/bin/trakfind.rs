use anyhow::Context;
use clap::{Parser, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;
use trakfind::{
    AudioTrackLocator, BoxTreeDemuxer, DemuxLocator, Demuxer, MediaType, ScanMode, ScanOptions,
    ScanOutcome, SignatureScanner, StructuralScanner, locator::status_code,
};

#[derive(Parser, Debug)]
#[command(version, about = "Find the first audio track in MP4/ISOBMFF files")]
struct Args {
    /// MP4/ISOBMFF file path(s)
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Scan strategy: byte-signature search or structural box walk
    #[arg(long, value_enum, default_value_t = ModeArg::Signature)]
    mode: ModeArg,

    /// Output as JSON instead of human-readable text
    #[arg(long)]
    json: bool,

    /// Run every locator and fail if they disagree
    #[arg(long)]
    cross_check: bool,

    /// List each track's handler type
    #[arg(long)]
    show_handlers: bool,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum ModeArg {
    Signature,
    Strict,
}

impl From<ModeArg> for ScanMode {
    fn from(m: ModeArg) -> Self {
        match m {
            ModeArg::Signature => ScanMode::Signature,
            ModeArg::Strict => ScanMode::Strict,
        }
    }
}

#[derive(Debug, Serialize)]
struct TrackRow {
    index: usize,
    offset: u64,
    media_type: MediaType,

    #[serde(skip_serializing_if = "Option::is_none")]
    handler: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    handler_hex: Option<String>,
}

#[derive(Debug, Serialize)]
struct CrossCheck {
    signature: i32,
    strict: i32,
    demux: i32,
    agree: bool,
}

#[derive(Debug, Serialize)]
struct FileReport {
    file: String,
    bytes: usize,
    mode: ScanMode,
    status_code: i32,

    #[serde(skip_serializing_if = "Option::is_none")]
    outcome: Option<ScanOutcome>,

    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    tracks: Vec<TrackRow>,

    #[serde(skip_serializing_if = "Option::is_none")]
    cross_check: Option<CrossCheck>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();
    let opts = ScanOptions { mode: args.mode.into() };
    let locator = opts.locator();

    let mut reports = Vec::new();
    for path in &args.paths {
        let data = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        reports.push(analyze(path, &data, &opts, locator.as_ref(), &args));
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for r in &reports {
            print_human(r);
        }
    }

    let disagreements = reports
        .iter()
        .filter(|r| r.cross_check.as_ref().is_some_and(|c| !c.agree))
        .count();
    if disagreements > 0 {
        anyhow::bail!("{disagreements} file(s) where locators disagree");
    }
    Ok(())
}

fn analyze(path: &std::path::Path, data: &[u8], opts: &ScanOptions, locator: &dyn AudioTrackLocator, args: &Args) -> FileReport {
    let res = locator.find_audio_track(data);
    log::info!("{}: {} locator -> {:?}", path.display(), locator.name(), res);

    let mut report = FileReport {
        file: path.display().to_string(),
        bytes: data.len(),
        mode: opts.mode,
        status_code: status_code(res),
        outcome: res.ok().map(ScanOutcome::from),
        error: res.err().map(|e| e.to_string()),
        tracks: Vec::new(),
        cross_check: None,
    };

    if args.show_handlers {
        report.tracks = track_rows(data);
    }

    if args.cross_check {
        let signature = status_code(SignatureScanner.find_audio_track(data));
        let strict = status_code(StructuralScanner.find_audio_track(data));
        let demux = status_code(DemuxLocator::new(BoxTreeDemuxer).find_audio_track(data));
        let agree = signature == strict && strict == demux;
        if !agree {
            log::warn!("{}: signature={signature} strict={strict} demux={demux}", path.display());
        }
        report.cross_check = Some(CrossCheck { signature, strict, demux, agree });
    }

    report
}

fn track_rows(data: &[u8]) -> Vec<TrackRow> {
    let demux = BoxTreeDemuxer;
    let tree = match demux.open_from_buffer(data) {
        Ok(t) => t,
        Err(e) => {
            log::warn!("cannot list tracks: {e}");
            return Vec::new();
        }
    };
    tree.tracks
        .iter()
        .enumerate()
        .map(|(index, t)| TrackRow {
            index,
            offset: t.header.start,
            media_type: demux.stream_media_type(&tree, index),
            handler: t.handler.map(|h| h.handler_type.to_string()),
            handler_hex: t.handler.map(|h| hex::encode(h.handler_type.0)),
        })
        .collect()
}

fn print_human(r: &FileReport) {
    println!("File: {} ({} bytes)", r.file, r.bytes);
    let mode = match r.mode {
        ScanMode::Signature => "signature",
        ScanMode::Strict => "strict",
    };
    match (&r.outcome, &r.error) {
        (Some(ScanOutcome::Found(n)), _) => println!("  first audio track ({mode}): #{n}"),
        (Some(ScanOutcome::NotFound), _) => println!("  no audio track ({mode})"),
        (None, Some(e)) => println!("  {e}"),
        (None, None) => {}
    }
    for t in &r.tracks {
        println!(
            "  trak #{:<3} @ {:#010x}  {:<6} {:?}",
            t.index,
            t.offset,
            t.handler.as_deref().unwrap_or("-"),
            t.media_type
        );
    }
    if let Some(c) = &r.cross_check {
        println!(
            "  cross-check: signature={} strict={} demux={}{}",
            c.signature,
            c.strict,
            c.demux,
            if c.agree { "" } else { "  MISMATCH" }
        );
    }
}
