// Adapters - External system implementations

pub mod download_ytdlp;
pub mod exec_ffmpeg;
pub mod probe_ffprobe;

// Re-export adapters
pub use download_ytdlp::YtDlpAdapter;
pub use exec_ffmpeg::FFmpegAdapter;
pub use probe_ffprobe::FFprobeAdapter;
