use clap::Parser;

use crate::preprocessing::GridLineParams;

#[derive(Parser, Debug)]
#[command(name = "paste-ocr-server")]
#[command(about = "Local OCR server for pasted clipboard images")]
#[command(version)]
pub struct Args {
    /// Host address to bind to
    #[arg(long, env = "OCR_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "OCR_PORT", default_value = "9292")]
    pub port: u16,

    /// Maximum pasted image size in bytes (default: 20MB)
    #[arg(long, env = "OCR_MAX_FILE_SIZE", default_value = "20971520")]
    pub max_file_size: usize,

    /// Engine used when the request does not name one
    #[arg(long, env = "OCR_DEFAULT_ENGINE")]
    pub default_engine: Option<String>,

    /// Path to tessdata directory (uses TESSDATA_PREFIX env var if not set)
    #[arg(long, env = "TESSDATA_PREFIX")]
    pub tessdata_path: Option<String>,

    /// Shortest run in pixels treated as a table gridline
    #[arg(long, env = "OCR_GRID_MIN_RUN_PX", default_value_t = GridLineParams::DEFAULT.min_run_px)]
    pub grid_min_run_px: u32,

    /// Fraction of the image side a run must span to count as a gridline
    #[arg(long, env = "OCR_GRID_RUN_RATIO", default_value_t = GridLineParams::DEFAULT.run_ratio)]
    pub grid_run_ratio: f64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub max_file_size: usize,
    pub default_engine: Option<String>,
    pub tessdata_path: Option<String>,
    pub grid_lines: GridLineParams,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 9292,
            max_file_size: 20 * 1024 * 1024,
            default_engine: None,
            tessdata_path: None,
            grid_lines: GridLineParams::DEFAULT,
        }
    }
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            max_file_size: args.max_file_size,
            default_engine: args.default_engine,
            tessdata_path: args.tessdata_path,
            grid_lines: GridLineParams {
                min_run_px: args.grid_min_run_px,
                run_ratio: args.grid_run_ratio,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_default_to_grid_constants() {
        let args = Args::parse_from(["paste-ocr-server"]);
        let config = Config::from(args);
        assert_eq!(config.grid_lines, GridLineParams::DEFAULT);
        assert_eq!(config.port, 9292);
    }

    #[test]
    fn test_args_override_grid_params() {
        let args = Args::parse_from([
            "paste-ocr-server",
            "--grid-min-run-px",
            "40",
            "--grid-run-ratio",
            "0.6",
        ]);
        let config = Config::from(args);
        assert_eq!(config.grid_lines.min_run_px, 40);
        assert!((config.grid_lines.run_ratio - 0.6).abs() < f64::EPSILON);
    }
}
