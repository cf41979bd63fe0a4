// Domain rules - Business logic and policies

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::domain::errors::*;
use crate::domain::model::*;

/// Slack used when comparing a window length against the minimum, so that
/// windows like `9.6..10.1` are not rejected over float noise.
const DURATION_EPSILON: f64 = 1e-9;

/// Clamps a requested trim window to the bounds of a source video
#[derive(Debug, Clone, Copy)]
pub struct WindowClamp {
    min_duration: f64,
}

impl Default for WindowClamp {
    fn default() -> Self {
        Self::new(&PlanLimits::default())
    }
}

impl WindowClamp {
    pub fn new(limits: &PlanLimits) -> Self {
        Self {
            min_duration: limits.min_window_secs.max(0.0),
        }
    }

    /// Turn a requested `(start, end)` pair into a valid window of a source
    /// that lasts `source_duration` seconds.
    ///
    /// The pair may be given in either order. Bounds are clamped into the
    /// source, checked, then rounded to the millisecond unless rounding would
    /// invalidate the window. Re-clamping a window this
    /// function returned yields the same window.
    pub fn clamp(
        &self,
        requested_start: f64,
        requested_end: f64,
        source_duration: f64,
    ) -> Result<TimeWindow, PlanError> {
        if !source_duration.is_finite() || source_duration <= 0.0 {
            return Err(PlanError::InvalidSource {
                duration: source_duration,
            });
        }
        if requested_start.is_nan() {
            return Err(PlanError::InvalidTimestamp { bound: "start" });
        }
        if requested_end.is_nan() {
            return Err(PlanError::InvalidTimestamp { bound: "end" });
        }

        let (low, high) = if requested_start <= requested_end {
            (requested_start, requested_end)
        } else {
            (requested_end, requested_start)
        };

        let start = low.max(0.0);
        let end = high.min(source_duration);
        self.check(start, end, source_duration)?;

        // The source end is kept as-is; only interior bounds are rounded.
        // A window that rounding would collapse keeps its exact bounds.
        let rounded_start = round_millis(start);
        let rounded_end = if end >= source_duration {
            source_duration
        } else {
            round_millis(end).min(source_duration)
        };
        let (start, end) = if self.check(rounded_start, rounded_end, source_duration).is_ok() {
            (rounded_start, rounded_end)
        } else {
            (start, end)
        };

        debug!(start, end, source_duration, "clamped trim window");
        Ok(TimeWindow::from_clamped(start, end))
    }

    fn check(&self, start: f64, end: f64, source_duration: f64) -> Result<(), PlanError> {
        if start >= source_duration || end <= start {
            return Err(PlanError::EmptyWindow { start, end });
        }
        let duration = end - start;
        if duration + DURATION_EPSILON < self.min_duration {
            return Err(PlanError::WindowTooShort {
                duration,
                minimum: self.min_duration,
            });
        }
        Ok(())
    }

    /// Window offered when only a start is known: up to
    /// [`DEFAULT_CLIP_SECS`] from `start`, cut at the end of the source.
    pub fn open_ended(&self, start: f64, source_duration: f64) -> Result<TimeWindow, PlanError> {
        self.clamp(start, start + DEFAULT_CLIP_SECS, source_duration)
    }

    /// Window preselected for a freshly loaded source
    pub fn default_window(&self, source_duration: f64) -> Result<TimeWindow, PlanError> {
        self.open_ended(0.0, source_duration)
    }
}

fn round_millis(seconds: f64) -> f64 {
    (seconds * 1000.0).round() / 1000.0
}

/// Plans the centered crop that brings a frame to a target aspect ratio
#[derive(Debug, Clone, Copy)]
pub struct AspectCropPlanner {
    min_crop_px: u32,
}

impl Default for AspectCropPlanner {
    fn default() -> Self {
        Self::new(&PlanLimits::default())
    }
}

impl AspectCropPlanner {
    pub fn new(limits: &PlanLimits) -> Self {
        Self {
            min_crop_px: limits.min_crop_px.max(1),
        }
    }

    /// Largest centered rectangle of `source` with the `target` ratio.
    ///
    /// A source wider than the target keeps its full height; otherwise it
    /// keeps its full width. The free side is rounded half-up.
    pub fn plan(&self, source: FrameSize, target: AspectRatio) -> Result<CropRect, PlanError> {
        let (width, height) = (source.width() as u128, source.height() as u128);
        let (num, den) = (target.width() as u128, target.height() as u128);

        let (crop_width, crop_height) = if width * den > height * num {
            (round_div(height * num, den), height)
        } else {
            (width, round_div(width * den, num))
        };

        // Rounding may overshoot by a pixel; pull back inside the frame.
        let crop_width = crop_width.min(width);
        let crop_height = crop_height.min(height);

        let minimum = self.min_crop_px as u128;
        if crop_width < minimum || crop_height < minimum {
            return Err(PlanError::CropTooSmall {
                width: crop_width as u32,
                height: crop_height as u32,
                minimum: self.min_crop_px,
            });
        }

        let x = (width - crop_width) / 2;
        let y = (height - crop_height) / 2;
        let crop = CropRect::new(x as u32, y as u32, crop_width as u32, crop_height as u32);

        debug!(%source, %target, %crop, "planned center crop");
        Ok(crop)
    }

    /// Same as [`plan`](Self::plan), starting from unvalidated dimensions
    pub fn plan_for_dimensions(
        &self,
        width: i64,
        height: i64,
        target: AspectRatio,
    ) -> Result<CropRect, PlanError> {
        self.plan(FrameSize::new(width, height)?, target)
    }

    /// Crop `source` to the ratio of `output`, then scale to `output` if the
    /// crop is not already that size.
    pub fn plan_for_output(&self, source: FrameSize, output: FrameSize) -> Result<CropPlan, PlanError> {
        let crop = self.plan(source, AspectRatio::of(output))?;
        let scale = (crop.size() != output).then_some(output);
        Ok(CropPlan { crop, scale })
    }
}

fn round_div(numerator: u128, denominator: u128) -> u128 {
    (2 * numerator + denominator) / (2 * denominator)
}

/// Builds complete export plans from probed metadata and a requested window
#[derive(Debug, Clone)]
pub struct ExportPlanner {
    clamp: WindowClamp,
    cropper: AspectCropPlanner,
    settings: ExportSettings,
    available_cpus: usize,
}

impl ExportPlanner {
    pub fn new(limits: &PlanLimits, settings: ExportSettings) -> Self {
        Self {
            clamp: WindowClamp::new(limits),
            cropper: AspectCropPlanner::new(limits),
            settings,
            available_cpus: num_cpus::get(),
        }
    }

    /// Override the detected CPU count
    pub fn with_available_cpus(mut self, cpus: usize) -> Self {
        self.available_cpus = cpus;
        self
    }

    /// Plan the export of `metadata.path` into `output_dir`.
    ///
    /// Without an `end`, the window runs for the default clip length from `start`.
    pub fn plan(
        &self,
        metadata: &MediaMetadata,
        start: f64,
        end: Option<f64>,
        output_dir: &Path,
    ) -> Result<ExportPlan, DomainError> {
        let window = match end {
            Some(end) => self.clamp.clamp(start, end, metadata.duration)?,
            None => self.clamp.open_ended(start, metadata.duration)?,
        };

        let source_size = metadata.frame_size()?;
        let output_size = self.settings.output_size()?;
        let crop_plan = self.cropper.plan_for_output(source_size, output_size)?;
        let crop = (!crop_plan.crop.is_full_frame(source_size)).then_some(crop_plan.crop);

        let fps = metadata
            .fps
            .filter(|fps| fps.is_finite() && *fps > 0.0)
            .unwrap_or(self.settings.fallback_fps);

        let output = output_dir.join(output_file_name(&metadata.path, &window)?);

        Ok(ExportPlan {
            input: metadata.path.clone(),
            output,
            window,
            source_size,
            crop,
            scale: crop_plan.scale,
            fps,
            preset: self.settings.preset,
            audio_bitrate: self.settings.audio_bitrate.clone(),
            threads: self.settings.max_threads.max(1).min(self.available_cpus.max(1)),
        })
    }
}

/// `short_<stem>_<start>_<end>.mp4`, with whole seconds
pub fn output_file_name(input: &Path, window: &TimeWindow) -> Result<PathBuf, DomainError> {
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy())
        .filter(|stem| !stem.is_empty())
        .ok_or_else(|| {
            DomainError::BadArgs(format!("Input path has no file name: {}", input.display()))
        })?;
    Ok(PathBuf::from(format!(
        "short_{}_{}_{}.mp4",
        stem,
        window.start() as u64,
        window.end() as u64
    )))
}

#[cfg(test)]
mod tests;
