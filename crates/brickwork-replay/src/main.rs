use std::path::PathBuf;
use std::process;

use brickwork_catalog::defaults::builtin_catalog;
use brickwork_editor::EditorConfig;
use brickwork_persist::{DirStore, KeyValueStore, MemoryStore};
use brickwork_replay::report::{self, Report};
use brickwork_replay::runner::Replay;
use brickwork_replay::script::Script;

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("ERROR: {message}");
    process::exit(1);
}

fn next_path(args: &[String], i: usize, flag: &str) -> PathBuf {
    match args.get(i) {
        Some(value) => PathBuf::from(value),
        None => fail(format!("{flag} needs a path")),
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();

    let mut script_path: Option<PathBuf> = None;
    let mut store_dir: Option<PathBuf> = None;
    let mut config_path: Option<PathBuf> = None;
    let mut output_path: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--script" => {
                i += 1;
                script_path = Some(next_path(&args, i, "--script"));
            }
            "--store" => {
                i += 1;
                store_dir = Some(next_path(&args, i, "--store"));
            }
            "--config" => {
                i += 1;
                config_path = Some(next_path(&args, i, "--config"));
            }
            "--output" => {
                i += 1;
                output_path = Some(next_path(&args, i, "--output"));
            }
            "--help" | "-h" => {
                eprintln!("Usage: brick-replay --script <path> [OPTIONS]");
                eprintln!("  --script <path>   JSON list of editor steps to replay");
                eprintln!("  --store <dir>     Persist saves under this directory (default: in memory)");
                eprintln!("  --config <path>   RON editor config override");
                eprintln!("  --output <path>   Write the final report as JSON");
                process::exit(0);
            }
            other => fail(format!("Unknown argument: {other}")),
        }
        i += 1;
    }

    let Some(script_path) = script_path else {
        fail("--script is required (see --help)");
    };
    let script = Script::load(&script_path).unwrap_or_else(|e| fail(e));

    let config = match &config_path {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|raw| EditorConfig::from_ron_str(&raw).map_err(|e| e.to_string()))
            .unwrap_or_else(|e| fail(format!("{}: {e}", path.display()))),
        None => EditorConfig::default(),
    };

    let mut store: Box<dyn KeyValueStore> = match &store_dir {
        Some(dir) => Box::new(DirStore::open(dir).unwrap_or_else(|e| fail(e))),
        None => Box::new(MemoryStore::new()),
    };

    let catalog = builtin_catalog();
    log::info!("Loaded {} piece kinds, {} prefabs", catalog.len(), catalog.prefabs().len());

    let mut replay = Replay::new(catalog, config, store.as_mut(), script.camera.viewport());
    let steps = replay.run(&script).unwrap_or_else(|e| fail(e));
    let report = Report::from_editor(replay.editor(), steps);

    println!("\n## Replay Results\n");
    println!("{}", report::format_markdown(&report));

    if let Some(ref path) = output_path {
        if let Err(e) = report::save_report(path, &report) {
            fail(format!("failed to save report: {e}"));
        }
        log::info!("Saved report to {}", path.display());
    }

    log::info!("Replay complete.");
}
