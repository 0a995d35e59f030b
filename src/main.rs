// Copyright (c) 2026 rezky_nightky

mod cell;
mod charset;
mod color;
mod config;
mod driver;
mod error;
mod field;
mod frame;
mod headless;
mod palette;
mod records;
mod rng;
mod runtime;
mod scheduler;
mod terminal;
mod trail;

use std::env;

#[cfg(unix)]
use std::thread;

use clap::builder::styling::{AnsiColor as ClapAnsiColor, Color as ClapColor};
use clap::builder::styling::{Effects as ClapEffects, Style as ClapStyle};
use clap::builder::Styles as ClapStyles;
use clap::{CommandFactory, FromArgMatches};

#[cfg(unix)]
use signal_hook::consts::{SIGHUP, SIGINT, SIGTERM};
#[cfg(unix)]
use signal_hook::iterator::Signals;

use crate::charset::charset_from_str;
use crate::config::{
    color_enabled_stdout, default_params_usage_for_help, print_help_detail, Args,
};
use crate::driver::{AnimationDriver, CancelToken, RenderSink};
use crate::error::Result;
use crate::field::ParticleField;
use crate::headless::HeadlessSink;
use crate::records::load_monthly_totals;
use crate::runtime::ColorMode;
use crate::terminal::{restore_terminal_best_effort, TerminalSink};

const HELP_TEMPLATE_PLAIN: &str = "\
{before-help}{about-with-newline}
USAGE:
  {usage}

{all-args}{after-help}";

const HELP_TEMPLATE_COLOR: &str = "\
{before-help}{about-with-newline}
\x1b[1;36mUSAGE:\x1b[0m
  {usage}

{all-args}{after-help}";

fn build_info() -> &'static str {
    env!("RAINSPIRAL_BUILD")
}

fn git_sha() -> &'static str {
    env!("RAINSPIRAL_GIT_SHA")
}

fn clap_styles() -> ClapStyles {
    ClapStyles::styled()
        .header(
            ClapStyle::new()
                .effects(ClapEffects::BOLD)
                .fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Cyan))),
        )
        .usage(
            ClapStyle::new()
                .effects(ClapEffects::BOLD)
                .fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Green))),
        )
        .literal(ClapStyle::new().fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Yellow))))
        .placeholder(ClapStyle::new().fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Magenta))))
}

fn require_f64_range(name: &str, v: f64, min: f64, max: f64) -> f64 {
    if !v.is_finite() {
        eprintln!("failed to apply {} {} (must be a finite number)", name, v);
        std::process::exit(1);
    }
    if v < min || v > max {
        eprintln!("failed to apply {} {} (min {} max {})", name, v, min, max);
        std::process::exit(1);
    }
    v
}

fn require_usize_range(name: &str, v: usize, min: usize, max: usize) -> usize {
    if v < min || v > max {
        eprintln!("failed to apply {} {} (min {} max {})", name, v, min, max);
        std::process::exit(1);
    }
    v
}

fn default_to_ascii() -> bool {
    let lang = env::var("LANG").unwrap_or_default();
    !lang.to_ascii_uppercase().contains("UTF")
}

fn detect_color_mode_auto() -> ColorMode {
    let colorterm = env::var("COLORTERM")
        .unwrap_or_default()
        .to_ascii_lowercase();
    if colorterm.contains("truecolor") || colorterm.contains("24bit") {
        return ColorMode::TrueColor;
    }

    let term = env::var("TERM").unwrap_or_default().to_ascii_lowercase();
    if term == "dumb" {
        return ColorMode::Mono;
    }
    ColorMode::Color256
}

fn detect_color_mode(args: &Args) -> ColorMode {
    if let Some(m) = args.colormode {
        return match m {
            0 => ColorMode::Mono,
            16 => ColorMode::Color16,
            8 | 256 => ColorMode::Color256,
            24 | 32 => ColorMode::TrueColor,
            _ => {
                eprintln!("invalid --colormode: {} (allowed: 0,16,8/256,24/32)", m);
                std::process::exit(1);
            }
        };
    }

    detect_color_mode_auto()
}

fn init_logging(args: &Args) {
    // RUST_LOG wins over the flags when set
    let level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

/// Publishes SIGINT/SIGTERM/SIGHUP to `cancel` so the driver winds down
/// and the terminal is restored on the normal path.
fn install_signal_handlers(cancel: &CancelToken) {
    #[cfg(unix)]
    {
        match Signals::new([SIGINT, SIGTERM, SIGHUP]) {
            Ok(mut signals) => {
                let cancel = cancel.clone();
                thread::spawn(move || {
                    if let Some(sig) = signals.forever().next() {
                        log::debug!("signal {} received, stopping", sig);
                        cancel.cancel();
                    }
                });
            }
            Err(e) => log::warn!("failed to install signal handlers: {}", e),
        }
    }

    #[cfg(windows)]
    {
        let cancel = cancel.clone();
        if let Err(e) = ctrlc::set_handler(move || cancel.cancel()) {
            log::warn!("failed to install Ctrl-C handler: {}", e);
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let cfg = args.spiral_config();
    cfg.validate()?;

    let Some(input) = &args.input else {
        return Ok(());
    };
    let records = load_monthly_totals(input, args.skip_rows)?;

    let field = ParticleField::generate(&cfg);
    let mut per_arm = vec![0usize; field.n_arms];
    for p in &field.particles {
        per_arm[p.arm_index] += 1;
    }
    log::info!(
        "field: seed {}, {} particles over arms {:?}, r_min {}, k {}, dtheta {}",
        cfg.seed,
        field.particles.len(),
        per_arm,
        field.r_min,
        field.spiral_k,
        field.base_dtheta
    );

    let cancel = CancelToken::new();
    install_signal_handlers(&cancel);

    let mut sink: Box<dyn RenderSink> = if args.headless {
        Box::new(HeadlessSink::new())
    } else {
        let charset = charset_from_str(&args.charset, default_to_ascii()).unwrap_or_else(|e| {
            eprintln!("{}", e);
            std::process::exit(1);
        });
        Box::new(TerminalSink::new(
            detect_color_mode(args),
            charset,
            cancel.clone(),
        )?)
    };

    let summary = AnimationDriver::new(&cfg, &field, sink.as_mut(), cancel).run(&records)?;
    drop(sink);

    if args.headless {
        println!(
            "played {} months, {} frames, {} points{}",
            summary.months,
            summary.frames,
            summary.points,
            if summary.cancelled { " (cancelled)" } else { "" }
        );
    }
    Ok(())
}

fn main() {
    std::panic::set_hook(Box::new(|info| {
        restore_terminal_best_effort();
        eprintln!("{}", info);
    }));

    let mut cmd = Args::command();
    cmd = cmd.styles(clap_styles());
    cmd = cmd.before_help(default_params_usage_for_help());
    let help_template = if color_enabled_stdout() {
        HELP_TEMPLATE_COLOR
    } else {
        HELP_TEMPLATE_PLAIN
    };
    cmd = cmd.help_template(help_template);

    let matches = cmd.get_matches();
    let args = Args::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    if args.help_detail {
        print_help_detail();
        return;
    }

    if args.version {
        println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        return;
    }

    if args.info {
        println!("Version: v{}", env!("CARGO_PKG_VERSION"));
        println!("Build: {}", build_info());
        if !git_sha().is_empty() {
            println!("Commit: {}", git_sha());
        }
        println!("License: {}", env!("CARGO_PKG_LICENSE"));
        return;
    }

    init_logging(&args);

    require_usize_range("--arms", args.arms, 1, 64);
    require_usize_range("--particles", args.particles, 1, 10_000);
    require_usize_range("--tail", args.tail, 1, 1000);
    require_usize_range("--frames-per-month", args.frames_per_month, 1, 10_000);
    require_usize_range("--months", args.months, 1, usize::MAX);
    require_usize_range("--interval-ms", args.interval_ms as usize, 0, 10_000);
    require_f64_range("--rmin", args.r_min, 0.0, 10.0);
    require_f64_range("--rmax", args.r_max, 0.0, 10.0);
    require_f64_range("--spiral-k", args.spiral_k, -1.0, 1.0);
    require_f64_range("--dtheta", args.dtheta, -1.0, 1.0);
    require_f64_range("--jitter", args.jitter, 0.0, 1.0);
    require_f64_range("--rain-low", args.rain_low, 0.0, 10_000.0);
    require_f64_range("--rain-high", args.rain_high, 0.0, 10_000.0);

    if let Err(e) = run(&args) {
        restore_terminal_best_effort();
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
