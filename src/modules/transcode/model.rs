use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Playback speed multiplier applied by the speed-up transform.
pub const SPEED_FACTOR: f64 = 1.4;
/// Constant video bitrate targeted by the two-pass encode.
pub const VIDEO_BITRATE_KBPS: u32 = 1400;

#[cfg(windows)]
const NULL_SINK: &str = "NUL";
#[cfg(not(windows))]
const NULL_SINK: &str = "/dev/null";

/// Encoder parameters derived from a source file; never user-facing.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscodeSpec {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub speed_factor: f64,
    pub video_bitrate_kbps: u32,
}

impl TranscodeSpec {
    /// `<output_dir>/<stem>_1.4x<.ext>`
    pub fn for_input(input_path: &Path, output_dir: &Path) -> Self {
        let mut file_name: OsString = input_path
            .file_stem()
            .map(OsString::from)
            .unwrap_or_default();
        file_name.push(format!("_{}x", SPEED_FACTOR));
        if let Some(ext) = input_path.extension() {
            file_name.push(".");
            file_name.push(ext);
        }

        Self {
            input_path: input_path.to_path_buf(),
            output_path: output_dir.join(file_name),
            speed_factor: SPEED_FACTOR,
            video_bitrate_kbps: VIDEO_BITRATE_KBPS,
        }
    }

    pub fn output_dir(&self) -> &Path {
        self.output_path.parent().unwrap_or_else(|| Path::new("."))
    }

    /// Prefix for the statistics file pass 1 writes and pass 2 reads.
    fn pass_log_prefix(&self) -> PathBuf {
        let mut prefix = self.output_path.clone().into_os_string();
        prefix.push(".passlog");
        PathBuf::from(prefix)
    }

    /// Full argument list for encoder pass 1 or 2. Paths are passed as-is.
    pub fn pass_args(&self, pass: u8) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "-y".into(),
            "-i".into(),
            self.input_path.clone().into_os_string(),
            "-filter:v".into(),
            format!("setpts=PTS/{}", self.speed_factor).into(),
            "-af".into(),
            format!("atempo={}", self.speed_factor).into(),
            "-b:v".into(),
            format!("{}k", self.video_bitrate_kbps).into(),
            "-pass".into(),
            pass.to_string().into(),
            "-passlogfile".into(),
            self.pass_log_prefix().into_os_string(),
        ];

        if pass == 1 {
            // analysis only: no audio, output discarded
            args.extend(["-an", "-f", "mp4", NULL_SINK].map(OsString::from));
        } else {
            args.push(self.output_path.clone().into_os_string());
        }
        args
    }
}
