use nightrain_detect::capture::Region;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub enum Mode {
    /// Track the HP bar at `region` across screenshots, in order
    HpBar {
        region: Region,
        frames: Vec<PathBuf>,
    },
    /// Locate `template` inside `target`
    Match { template: PathBuf, target: PathBuf },
}

#[derive(Debug)]
pub struct Args {
    pub mode: Mode,
    pub config_path: Option<PathBuf>,
    pub debug_mode: bool,
}

impl Args {
    pub fn parse() -> Option<Self> {
        let args: Vec<String> = env::args().collect();

        let mut hpbar_region: Option<Region> = None;
        let mut template: Option<PathBuf> = None;
        let mut config_path: Option<PathBuf> = None;
        let mut debug_mode = false;
        let mut files: Vec<PathBuf> = Vec::new();

        for arg in args.iter().skip(1) {
            if arg == "--help" || arg == "-h" {
                print_help();
                return None;
            } else if arg == "--version" || arg == "-v" {
                println!(
                    "nightrain-detect v{} ({})",
                    env!("APP_VERSION_DISPLAY"),
                    env!("APP_BUILD_YEAR")
                );
                return None;
            } else if arg == "--debug" {
                debug_mode = true;
            } else if let Some(val) = arg.strip_prefix("--hpbar=") {
                match Region::parse(val) {
                    Some(region) => hpbar_region = Some(region),
                    None => {
                        eprintln!("❌ Invalid region '{}', expected x,y,w,h", val);
                        return None;
                    }
                }
            } else if let Some(val) = arg.strip_prefix("--match=") {
                template = Some(PathBuf::from(val));
            } else if let Some(val) = arg.strip_prefix("--config=") {
                config_path = Some(PathBuf::from(val));
            } else if arg.starts_with('-') {
                eprintln!("❌ Unknown argument: {}", arg);
                print_help();
                return None;
            } else {
                files.push(PathBuf::from(arg));
            }
        }

        let mode = match (hpbar_region, template) {
            (Some(region), None) if !files.is_empty() => Mode::HpBar {
                region,
                frames: files,
            },
            (None, Some(template)) if files.len() == 1 => Mode::Match {
                template,
                target: files.remove(0),
            },
            _ => {
                eprintln!("❌ Expected either --hpbar=x,y,w,h <screenshots...> or --match=<template> <target>");
                print_help();
                return None;
            }
        };

        Some(Args {
            mode,
            config_path,
            debug_mode,
        })
    }
}

fn print_help() {
    println!("🎯 Nightrain overlay detection tool");
    println!();
    println!("USAGE:");
    println!("    nightrain-detect [FLAGS] <files...>");
    println!();
    println!("FLAGS:");
    println!("    --hpbar=x,y,w,h     Track the HP bar at this region across the given screenshots");
    println!("    --match=<template>  Find the template inside the given target image");
    println!("    --config=<file>     Load detector settings from a YAML file");
    println!("    --debug             Enable debug logging");
    println!("    --help, -h          Show this help message");
    println!("    --version, -v       Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    nightrain-detect --hpbar=120,980,0,18 frame-001.png frame-002.png frame-003.png");
    println!("    nightrain-detect --match=icons/day2.png screenshot.png");
    println!("    nightrain-detect --config=detector.yaml --debug --match=icon.png shot.png");
}
