//! Dump a span of an audio CD as raw PCM.
//!
//! Usage: cargo run --example cdda_dump --features libcdio -- [device]
//!        [--tracks FIRST LAST] [--paranoia N] [--out FILE]

#![allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::uninlined_format_args
)]

use std::{
    env,
    fs::File,
    io::{self, BufWriter, Write},
    time::Instant,
};

use cdda_stream::{
    CddaConfig, CddaStream, CtrlValue, Span, StreamCtrl, StreamMode, CD_FRAMES_PER_SEC,
};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut config = CddaConfig::default();
    let mut output_file: Option<&str> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--tracks" => {
                if i + 2 >= args.len() {
                    eprintln!("Usage: --tracks <first> <last>");
                    std::process::exit(1);
                }
                config.span = Span::new(args[i + 1].parse()?, args[i + 2].parse()?);
                i += 3;
            }
            "--paranoia" => {
                let level = args.get(i + 1).ok_or("--paranoia needs a level")?;
                config.paranoia = level.parse()?;
                i += 2;
            }
            "--no-skip" => {
                config.no_skip = true;
                i += 1;
            }
            "--out" => {
                output_file = Some(args.get(i + 1).ok_or("--out needs a file")?);
                i += 2;
            }
            "--help" | "-h" => {
                println!("Usage: cdda_dump [device] [options]");
                println!();
                println!("Options:");
                println!("  device               CD device path (e.g., /dev/sr0)");
                println!("  --tracks FIRST LAST  Tracks to dump, 0 for the disc boundary");
                println!("  --paranoia N         Correction level 0-2");
                println!("  --no-skip            Never skip unreadable sectors");
                println!("  --out FILE           Write little-endian PCM to FILE");
                println!("  --help               Show this help");
                return Ok(());
            }
            arg if !arg.starts_with('-') && config.device.is_none() => {
                config.device = Some(arg.to_string());
                i += 1;
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                std::process::exit(1);
            }
        }
    }

    println!("Opening {}...", config.device_path());
    let mut stream = CddaStream::open(&config, StreamMode::Read)?;

    println!();
    println!("=== Disc ===");
    let drive = stream.drive();
    for track in 1..=drive.track_count() {
        let first = drive.track_first_sector(track)?;
        let last = drive.track_last_sector(track)?;
        let seconds = f64::from(last - first + 1) / f64::from(CD_FRAMES_PER_SEC);
        println!(
            "  Track {:2}: sectors {:6} - {:6} ({:2}:{:05.2}) {}",
            track,
            first,
            last,
            (seconds / 60.0) as u32,
            seconds % 60.0,
            if drive.track_is_audio(track) {
                "[AUDIO]"
            } else {
                "[DATA]"
            }
        );
    }

    let range = stream.range();
    println!();
    println!(
        "Range: sectors {} - {} ({} bytes, mode {:?})",
        range.start_sector,
        range.end_sector,
        stream.end_pos() - stream.start_pos(),
        stream.mode()
    );

    if let CtrlValue::Count(chapters) = stream.control(StreamCtrl::GetNumChapters)? {
        for chapter in 0..chapters {
            if let CtrlValue::Seconds(at) = stream.control(StreamCtrl::GetChapterTime(chapter))? {
                println!("  Chapter {:2} at {:8.2}s", chapter + 1, at);
            }
        }
    }

    let Some(path) = output_file else {
        stream.close();
        return Ok(());
    };

    stream.set_track_callback(|change| eprintln!("\nEntering track {}", change.track));

    let mut out = BufWriter::new(File::create(path)?);
    let mut buffer = vec![0u8; stream.sector_size()];
    let total = range.len();
    let started = Instant::now();
    let mut sectors: i64 = 0;

    loop {
        let n = stream.fill_buffer(&mut buffer)?;
        if n == 0 {
            break;
        }
        out.write_all(&buffer[..n])?;
        sectors += 1;

        if sectors % 100 == 0 {
            let rate = sectors as f64 / started.elapsed().as_secs_f64();
            print!(
                "\rProgress: {}% ({} sectors, {:.1} sectors/sec)  ",
                sectors * 100 / total.max(1),
                sectors,
                rate
            );
            io::stdout().flush()?;
        }
    }
    out.flush()?;

    println!(
        "\rCompleted: {} sectors in {:.1}s to {}     ",
        sectors,
        started.elapsed().as_secs_f64(),
        path
    );
    stream.close();

    Ok(())
}
