// Copyright (c) 2026 rezky_nightky

use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::records::DEFAULT_SKIP_ROWS;
use crate::runtime::SpiralConfig;

pub const DEFAULT_PARAMS_USAGE: &str = "DEFAULT PARAMS USAGE:\n  rainspiral daily_HKO_RF_ALL.csv --seed 7 --arms 3 --rmin 0.15 --rmax 1.10 --spiral-k 0.085 --dtheta 0.04 --jitter 0.035 --particles 50 --tail 48 --frames-per-month 26 --months 24 --rain-low 50 --rain-high 300 --interval-ms 15";

pub fn color_enabled_stdout() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if matches!(std::env::var("CLICOLOR").ok().as_deref(), Some("0")) {
        return false;
    }
    std::io::stdout().is_terminal()
}

fn colorize_help_detail(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 64);
    for chunk in text.split_inclusive('\n') {
        let (line, nl) = chunk
            .strip_suffix('\n')
            .map(|l| (l, "\n"))
            .unwrap_or((chunk, ""));

        let is_heading =
            !line.starts_with(' ') && line.ends_with(':') && line == line.to_ascii_uppercase();

        if is_heading {
            out.push_str("\x1b[1;36m");
            out.push_str(line);
            out.push_str("\x1b[0m");
        } else if let Some(rest) = line.strip_prefix("      Example:") {
            out.push_str("      \x1b[32mExample:\x1b[0m");
            out.push_str(rest);
        } else if let Some(rest) = line.strip_prefix("  rainspiral") {
            out.push_str("  \x1b[1;34mrainspiral\x1b[0m");
            out.push_str(rest);
        } else if let Some(rest) = line.strip_prefix("  -") {
            out.push_str("  \x1b[33m-");
            out.push_str(rest);
            out.push_str("\x1b[0m");
        } else {
            out.push_str(line);
        }
        out.push_str(nl);
    }
    out
}

pub fn default_params_usage_for_help() -> String {
    if color_enabled_stdout() {
        colorize_help_detail(DEFAULT_PARAMS_USAGE)
    } else {
        DEFAULT_PARAMS_USAGE.to_string()
    }
}

#[derive(Parser, Debug, Clone)]
#[command(name = "rainspiral", version, disable_version_flag = true)]
pub struct Args {
    #[arg(
        value_name = "CSV",
        required_unless_present_any = ["help_detail", "info", "version"],
        help = "Daily rainfall CSV (year, month, day, value, completeness)"
    )]
    pub input: Option<PathBuf>,

    #[arg(
        long = "skip-rows",
        default_value_t = DEFAULT_SKIP_ROWS,
        help_heading = "INPUT",
        help = "Lines before the first data row"
    )]
    pub skip_rows: usize,

    #[arg(
        short = 'n',
        long = "months",
        default_value_t = 24,
        help_heading = "INPUT",
        help = "Play at most this many months (min 1)"
    )]
    pub months: usize,

    #[arg(
        long = "rain-low",
        default_value_t = 50.0,
        help_heading = "INPUT",
        help = "Monthly total (mm) at or below which rainfall counts as none"
    )]
    pub rain_low: f64,

    #[arg(
        long = "rain-high",
        default_value_t = 300.0,
        help_heading = "INPUT",
        help = "Monthly total (mm) at or above which rainfall is saturated"
    )]
    pub rain_high: f64,

    #[arg(
        long = "seed",
        default_value_t = 7,
        help_heading = "FIELD",
        help = "Seed of the particle field"
    )]
    pub seed: u64,

    #[arg(
        long = "arms",
        default_value_t = 3,
        help_heading = "FIELD",
        help = "Number of spiral arms (min 1 max 64)"
    )]
    pub arms: usize,

    #[arg(
        long = "particles",
        default_value_t = 50,
        help_heading = "FIELD",
        help = "Size of the particle pool (min 1 max 10000)"
    )]
    pub particles: usize,

    #[arg(
        long = "rmin",
        default_value_t = 0.15,
        help_heading = "FIELD",
        help = "Inner base radius"
    )]
    pub r_min: f64,

    #[arg(
        long = "rmax",
        default_value_t = 1.10,
        help_heading = "FIELD",
        help = "Outer radius of the nominal field"
    )]
    pub r_max: f64,

    #[arg(
        long = "spiral-k",
        default_value_t = 0.085,
        help_heading = "FIELD",
        help = "Radial growth per radian of spiral"
    )]
    pub spiral_k: f64,

    #[arg(
        long = "dtheta",
        default_value_t = 0.04,
        help_heading = "FIELD",
        help = "Base angular speed per frame (radians)"
    )]
    pub dtheta: f64,

    #[arg(
        long = "jitter",
        default_value_t = 0.035,
        help_heading = "FIELD",
        help = "Per-particle angular speed jitter (+/-)"
    )]
    pub jitter: f64,

    #[arg(
        long = "tail",
        default_value_t = 48,
        help_heading = "ANIMATION",
        help = "Trail length in frames (min 1 max 1000)"
    )]
    pub tail: usize,

    #[arg(
        long = "frames-per-month",
        default_value_t = 26,
        help_heading = "ANIMATION",
        help = "Frames drawn for every month (min 1 max 10000)"
    )]
    pub frames_per_month: usize,

    #[arg(
        long = "interval-ms",
        default_value_t = 15,
        help_heading = "ANIMATION",
        help = "Pause between frames in milliseconds (max 10000)"
    )]
    pub interval_ms: u64,

    #[arg(
        long = "headless",
        help_heading = "ANIMATION",
        help = "Run without a terminal and log a summary per month"
    )]
    pub headless: bool,

    #[arg(
        long = "colormode",
        help_heading = "APPEARANCE",
        help = "Force color mode (allowed: 0,16,8/256,24/32). Default: 24-bit if supported (COLORTERM), else 8-bit"
    )]
    pub colormode: Option<u16>,

    #[arg(
        long = "charset",
        default_value = "auto",
        help_heading = "APPEARANCE",
        help = "Glyphs for points: auto, unicode, ascii"
    )]
    pub charset: String,

    #[arg(
        short = 'V',
        long = "verbose",
        action = clap::ArgAction::Count,
        help_heading = "GENERAL",
        help = "More log output on stderr (repeat for more)"
    )]
    pub verbose: u8,

    #[arg(
        short = 'q',
        long = "quiet",
        help_heading = "GENERAL",
        help = "Only log errors"
    )]
    pub quiet: bool,

    #[arg(
        long = "help-detail",
        help_heading = "HELP",
        help = "Show detailed help for all parameters and exit"
    )]
    pub help_detail: bool,

    #[arg(
        long = "info",
        short = 'i',
        help_heading = "HELP",
        help = "Print version info and exit"
    )]
    pub info: bool,

    #[arg(
        long = "version",
        short = 'v',
        help_heading = "HELP",
        help = "Print version and exit"
    )]
    pub version: bool,
}

impl Args {
    pub fn spiral_config(&self) -> SpiralConfig {
        SpiralConfig {
            seed: self.seed,
            n_arms: self.arms,
            r_min: self.r_min,
            r_max: self.r_max,
            spiral_k: self.spiral_k,
            base_dtheta: self.dtheta,
            jitter: self.jitter,
            n_particles_max: self.particles,
            tail_max: self.tail,
            frames_per_month: self.frames_per_month,
            month_limit: self.months,
            rain_low_mm: self.rain_low,
            rain_high_mm: self.rain_high,
            frame_interval: Duration::from_millis(self.interval_ms),
        }
    }
}

pub fn print_help_detail() {
    let block = format!(
        "{}\n\nUSAGE:\n  rainspiral [OPTIONS] <CSV>\n\nINPUT:\n  <CSV>\n      Daily rainfall export; days are summed into monthly totals.\n      Example: rainspiral daily_HKO_RF_ALL.csv\n\n  --skip-rows <n>\n      Lines before the first data row (title, notes, header).\n      Example: rainspiral data.csv --skip-rows 1\n\n  -n, --months <n>\n      Play at most this many months.\n      Example: rainspiral data.csv --months 120\n\n  --rain-low <mm>, --rain-high <mm>\n      Normalization window for monthly totals.\n      Example: rainspiral data.csv --rain-low 20 --rain-high 500\n\nFIELD:\n  --seed <n>\n      Seed of the particle field; equal seeds give equal fields.\n      Example: rainspiral data.csv --seed 42\n\n  --arms <n>\n      Number of interleaved spiral arms.\n      Example: rainspiral data.csv --arms 5\n\n  --particles <n>\n      Size of the particle pool.\n      Example: rainspiral data.csv --particles 80\n\n  --rmin, --rmax, --spiral-k, --dtheta, --jitter\n      Spiral geometry and angular speed.\n      Example: rainspiral data.csv --spiral-k 0.05 --dtheta 0.03\n\nANIMATION:\n  --tail <frames>\n      Trail length in frames.\n      Example: rainspiral data.csv --tail 24\n\n  --frames-per-month <n>\n      Frames drawn for every month.\n      Example: rainspiral data.csv --frames-per-month 60\n\n  --interval-ms <ms>\n      Pause between frames.\n      Example: rainspiral data.csv --interval-ms 33\n\n  --headless\n      Run without a terminal; log a line per month.\n      Example: rainspiral data.csv --headless -V\n\nAPPEARANCE:\n  --colormode <0|16|8|24>\n      Force color mode; otherwise auto-detected from COLORTERM/TERM.\n      Example: rainspiral data.csv --colormode 24\n\n  --charset <auto|unicode|ascii>\n      Glyphs used for points.\n      Example: rainspiral data.csv --charset ascii\n\nKEYS:\n  q, Esc, Ctrl-C\n      Stop the animation.\n",
        DEFAULT_PARAMS_USAGE
    );

    if color_enabled_stdout() {
        print!("{}", colorize_help_detail(&block));
    } else {
        print!("{}", block);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn defaults_match_engine_defaults() {
        let args = Args::try_parse_from(["rainspiral", "rain.csv"]).unwrap();
        assert_eq!(args.spiral_config(), SpiralConfig::default());
        assert_eq!(args.skip_rows, 4);
        assert!(!args.headless);
    }

    #[test]
    fn flags_reach_the_config() {
        let args = Args::try_parse_from([
            "rainspiral",
            "rain.csv",
            "--seed",
            "42",
            "--arms",
            "5",
            "--months",
            "6",
            "--interval-ms",
            "0",
            "-VV",
        ])
        .unwrap();
        let cfg = args.spiral_config();
        assert_eq!(cfg.seed, 42);
        assert_eq!(cfg.n_arms, 5);
        assert_eq!(cfg.month_limit, 6);
        assert_eq!(cfg.frame_interval, Duration::ZERO);
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn input_required_unless_informational() {
        assert!(Args::try_parse_from(["rainspiral"]).is_err());
        assert!(Args::try_parse_from(["rainspiral", "--info"]).is_ok());
    }

    #[test]
    fn help_detail_headings_are_colorized() {
        let out = colorize_help_detail("FIELD:\n  --seed <n>\n");
        assert!(out.starts_with("\x1b[1;36mFIELD:\x1b[0m\n"));
    }
}
