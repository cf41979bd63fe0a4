//! Command implementations

use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::app::{AppContainer, DefaultAppContainer, ExportRequest, ExportResponse, ShortRequest};
use crate::cli::args::{DemosArgs, DownloadArgs, ExportArgs, InspectArgs, PlanArgs, ShortArgs};
use crate::config::ShortclipConfig;
use crate::domain::model::{
    AspectRatio, CropRect, DownloadProgress, DownloadStatus, ExportPreset, FrameSize, TimeSpec,
    TimeWindow,
};
use crate::domain::rules::{AspectCropPlanner, WindowClamp};
use crate::ports::ProgressCallback;
use crate::utils::{format_file_size, to_pretty_json, MediaLibrary};

/// Pure planning output, also used for `--json`
#[derive(Debug, Serialize)]
struct PlanOutput {
    source: FrameSize,
    ratio: String,
    window: TimeWindow,
    crop: CropRect,
    full_frame: bool,
}

/// Execute the plan command; runs no external tools
pub fn plan(args: PlanArgs, config: &ShortclipConfig) -> Result<()> {
    let duration = parse_time("duration", &args.duration)?;
    let start = parse_optional_time("start", args.start.as_deref())?;
    let end = parse_optional_time("end", args.end.as_deref())?;
    let ratio: AspectRatio = args
        .ratio
        .parse()
        .with_context(|| format!("Invalid aspect ratio '{}'", args.ratio))?;

    let clamp = WindowClamp::new(&config.limits);
    let window = match (start, end) {
        (None, None) => clamp.default_window(duration),
        (Some(start), None) => clamp.open_ended(start, duration),
        (start, Some(end)) => clamp.clamp(start.unwrap_or(0.0), end, duration),
    }
    .context("Cannot build a trim window")?;

    let source = FrameSize::new(args.width, args.height).context("Invalid source frame")?;
    let crop = AspectCropPlanner::new(&config.limits)
        .plan(source, ratio)
        .context("Cannot plan the crop")?;

    let output = PlanOutput {
        source,
        ratio: ratio.to_string(),
        window,
        crop,
        full_frame: crop.is_full_frame(source),
    };

    if args.json {
        println!("{}", to_pretty_json(&output)?);
    } else {
        println!("Source: {} @ {}", output.source, output.ratio);
        println!("Window: {} ({:.3}s)", output.window, output.window.duration());
        if output.full_frame {
            println!("Crop:   {} (full frame)", output.crop);
        } else {
            println!("Crop:   {}", output.crop);
        }
    }
    Ok(())
}

/// Execute the inspect command
pub async fn inspect(args: InspectArgs, config: &ShortclipConfig) -> Result<()> {
    let container = DefaultAppContainer::from_config(config);
    let response = container
        .inspect_interactor()
        .execute(&args.input)
        .await
        .with_context(|| format!("Failed to inspect {}", args.input.display()))?;

    if args.json {
        println!("{}", to_pretty_json(&response)?);
    } else {
        print!("{}", response.summary.render_text(&args.input));
    }
    Ok(())
}

/// Execute the download command
pub async fn download(args: DownloadArgs, config: &ShortclipConfig) -> Result<()> {
    let out_dir = args.out_dir.unwrap_or_else(|| config.paths.cache_dir.clone());
    let container = DefaultAppContainer::from_config(config);
    let progress = progress_logger();
    let callback: &ProgressCallback = &progress;

    let result = container
        .download_interactor()
        .execute(&args.url, &out_dir, Some(callback))
        .await
        .context("Download failed")?;

    println!("Downloaded: {}", result.title);
    println!("Saved to:   {}", result.path.display());
    Ok(())
}

/// Execute the export command
pub async fn export(args: ExportArgs, mut config: ShortclipConfig) -> Result<()> {
    apply_preset(&mut config, args.preset.as_deref())?;
    let start = parse_optional_time("start", args.start.as_deref())?;
    let end = parse_optional_time("end", args.end.as_deref())?;
    let out_dir = args
        .out_dir
        .unwrap_or_else(|| config.paths.output_dir.clone());

    let container = DefaultAppContainer::from_config(&config);
    let request = ExportRequest::new(args.input.clone(), out_dir).with_window(start, end);
    let response = container
        .export_interactor()
        .execute(request)
        .await
        .with_context(|| format!("Failed to export a short from {}", args.input.display()))?;

    print_export(&response);
    Ok(())
}

/// Execute the short command: download, then export
pub async fn short(args: ShortArgs, mut config: ShortclipConfig) -> Result<()> {
    apply_preset(&mut config, args.preset.as_deref())?;
    let request = ShortRequest {
        url: args.url,
        start: parse_optional_time("start", args.start.as_deref())?,
        end: parse_optional_time("end", args.end.as_deref())?,
        cache_dir: config.paths.cache_dir.clone(),
        output_dir: args
            .out_dir
            .unwrap_or_else(|| config.paths.output_dir.clone()),
    };

    let container = DefaultAppContainer::from_config(&config);
    let progress = progress_logger();
    let callback: &ProgressCallback = &progress;
    let response = container
        .short_interactor()
        .execute(request, Some(callback))
        .await
        .context("Failed to create the short")?;

    println!("Source:     {}", response.source.title);
    print_export(&response.export);
    Ok(())
}

/// Execute the demos command
pub fn demos(args: DemosArgs, config: &ShortclipConfig) -> Result<()> {
    let dir = args.dir.unwrap_or_else(|| config.paths.media_dir.clone());
    let library = MediaLibrary::new(dir);
    let videos = library.scan();

    if args.json {
        println!("{}", to_pretty_json(&videos)?);
    } else if videos.is_empty() {
        println!("No demo videos found in {}", library.root().display());
    } else {
        for video in &videos {
            println!("{}\t{}", video.title, video.path.display());
        }
    }
    Ok(())
}

fn print_export(response: &ExportResponse) {
    let plan = &response.plan;
    println!("Window:     {} ({:.3}s)", plan.window, plan.window.duration());
    match plan.crop {
        Some(crop) => println!("Crop:       {}", crop),
        None => println!("Crop:       none"),
    }
    println!("Output:     {}", response.report.output.display());
    println!("Size:       {}", format_file_size(response.report.file_size));
    println!("Took:       {:.1}s", response.report.elapsed.as_secs_f64());
}

fn apply_preset(config: &mut ShortclipConfig, preset: Option<&str>) -> Result<()> {
    if let Some(preset) = preset {
        config.export.preset = ExportPreset::parse(preset).context("Invalid --preset")?;
    }
    Ok(())
}

fn parse_time(name: &str, value: &str) -> Result<f64> {
    let time = TimeSpec::parse(value)
        .with_context(|| format!("Invalid {} time '{}'", name, value))?;
    Ok(time.as_seconds())
}

fn parse_optional_time(name: &str, value: Option<&str>) -> Result<Option<f64>> {
    value.map(|value| parse_time(name, value)).transpose()
}

/// Progress callback logging every tenth of the download
fn progress_logger() -> impl Fn(DownloadProgress) + Send + Sync {
    let last_decile = AtomicU64::new(0);
    move |progress: DownloadProgress| {
        if progress.status == DownloadStatus::Finished {
            info!("download finished, processing");
            return;
        }
        let decile = (progress.fraction * 10.0).floor() as u64;
        if decile > last_decile.fetch_max(decile, Ordering::Relaxed) {
            info!(
                percent = decile * 10,
                downloaded = %format_file_size(progress.downloaded_bytes),
                "downloading"
            );
        }
    }
}
