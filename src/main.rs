mod args;

use args::{Args, Mode};
use nightrain_detect::capture::ScreenshotSource;
use nightrain_detect::{Config, DetectResult, HpBarDetector, ScaleSearch};
use std::path::Path;

fn main() {
    let Some(args) = Args::parse() else {
        return;
    };

    let default_level = if args.debug_mode { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    if let Err(e) = run(args) {
        log::error!("❌ {e}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> DetectResult<()> {
    let config = match &args.config_path {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    match args.mode {
        Mode::HpBar { region, frames } => {
            let mut detector = HpBarDetector::from_config(&config)?;
            for frame_path in &frames {
                let source = ScreenshotSource::open(frame_path)?;
                let reading = detector.detect(&source, Some(&region))?;
                println!(
                    "{}: sample={} stabilized={} streak={}",
                    frame_path.display(),
                    format_length(reading.sample.length),
                    format_length(reading.estimate.length),
                    reading.estimate.stable_streak
                );
            }
        }
        Mode::Match { template, target } => {
            let search = ScaleSearch::new(config.scale_range()?);
            let template_image = load_rgb(&template)?;
            let target_image = load_rgb(&target)?;
            match search.search_rgb(&target_image, &template_image, None)? {
                Some(found) => println!("✅ {} found at {}", template.display(), found),
                None => println!("⚠️ {} larger than target at every scale", template.display()),
            }
        }
    }
    Ok(())
}

fn load_rgb(path: &Path) -> DetectResult<image::RgbImage> {
    Ok(image::open(path)?.to_rgb8())
}

fn format_length(length: Option<u32>) -> String {
    length.map_or_else(|| "-".to_string(), |l| l.to_string())
}
