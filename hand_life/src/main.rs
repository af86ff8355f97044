//! hand_life — interactive entry point.

use hand_life::app::{run, AppConfig};
use life_grid::{Geometry, Palette};
use std::io::{self, Write};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║        Hand Life — Game of Life, gestures, OSC voices        ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    #[cfg(feature = "leap")]
    println!("  Hands: LeapMotion hardware");
    #[cfg(not(feature = "leap"))]
    println!("  Hands: keyboard/mouse simulation  (use --features leap for hardware)");
    println!();

    let args: Vec<String> = std::env::args().collect();
    let camera = args.iter().any(|a| a == "--camera");

    let mut cfg = if args.iter().any(|a| a == "--quick") {
        println!("  Quick-start: 100×100 grid, vibrant floral, OSC → 127.0.0.1:9000\n");
        AppConfig::default()
    } else {
        configure_interactively()
    };
    cfg.camera = cfg.camera || camera;

    println!();
    println!("  Opening window…  S start · P pause · Q quit");
    println!();

    if let Err(e) = run(cfg) {
        log::error!("{e}");
        std::process::exit(1);
    }
}

fn configure_interactively() -> AppConfig {
    let defaults = AppConfig::default();

    let palette = pick_palette();

    let cols: u32 = read_line("  Grid columns (default 100): ")
        .trim().parse().unwrap_or(100).clamp(10, 400);
    let rows: u32 = read_line("  Grid rows (default 100): ")
        .trim().parse().unwrap_or(100).clamp(10, 400);
    let cell_px: u32 = read_line("  Cell size px (default 10): ")
        .trim().parse().unwrap_or(10).clamp(2, 40);

    let mut sound = defaults.sound.clone();
    sound.pitch_min = read_line("  Lowest pitch, octaves (default -3): ")
        .trim().parse().unwrap_or(sound.pitch_min);
    sound.pitch_max = read_line("  Highest pitch, octaves (default 7): ")
        .trim().parse().unwrap_or(sound.pitch_max);
    let finite = sound.pitch_min.is_finite() && sound.pitch_max.is_finite();
    if !finite || sound.pitch_max <= sound.pitch_min {
        println!("    ⚠  invalid range, using -3..7");
        sound.pitch_min = -3.0;
        sound.pitch_max = 7.0;
    }

    let osc_target = match read_line("  OSC target host:port (default 127.0.0.1:9000): ").trim() {
        ""     => defaults.osc_target.clone(),
        target => target.to_string(),
    };

    let camera = matches!(
        read_line("  Hand control? y/N: ").trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    );

    AppConfig {
        geometry: Geometry::new(cols, rows, cell_px),
        palette,
        sound,
        osc_target,
        camera,
        ..defaults
    }
}

fn pick_palette() -> Palette {
    let all = Palette::all();
    println!("  Palette:");
    for (i, p) in all.iter().enumerate() {
        println!("    {}. {}", i + 1, p.name);
    }
    let choice: usize = read_line("  Choice (default 5): ").trim().parse().unwrap_or(5);
    all.into_iter()
        .nth(choice.saturating_sub(1))
        .unwrap_or_default()
}

fn read_line(prompt: &str) -> String {
    print!("{}", prompt);
    io::stdout().flush().ok();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf
}
