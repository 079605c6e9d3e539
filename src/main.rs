use std::sync::{Arc, Mutex};

use anchorwatch::{AnchorEvent, AnchorWatch, AnchorWatchConfig, Fix};

/// Runs a recorded track through a fresh anchor watch and returns every event
fn replay(fixes: &[Fix], config: AnchorWatchConfig) -> Result<Vec<AnchorEvent>, Box<dyn std::error::Error>> {
    let mut watch = AnchorWatch::with_config(config)?;
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    watch.add_watcher(move |event: &AnchorEvent| {
        if let Ok(mut events) = sink.lock() {
            events.push(event.clone());
        }
    });

    let mut rejected = 0;
    for fix in fixes {
        if watch.update_fix(*fix).is_err() {
            rejected += 1;
        }
    }
    if rejected > 0 {
        log::warn!("{} of {} fixes rejected", rejected, fixes.len());
    }
    if let Some(radius) = watch.radius() {
        log::info!("Final swing radius {:.1} m", radius);
    }

    let events = events.lock().map_err(|_| "event buffer poisoned")?;
    Ok(events.clone())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();
    let program = args.first().map_or("anchorwatch", |s| s.as_str());

    if args.len() == 3 && args[1] == "--write-config" {
        AnchorWatchConfig::default().save_to_file(&args[2])?;
        return Ok(());
    }

    if args.len() < 2 || args.len() > 3 {
        eprintln!("Usage: {} <track.json> [config.json]", program);
        eprintln!("   or: {} --write-config <config.json>", program);
        return Err("Invalid arguments".into());
    }

    let config = match args.get(2) {
        Some(path) => AnchorWatchConfig::load_from_file(path)?,
        None => AnchorWatchConfig::default(),
    };
    let track = std::fs::read_to_string(&args[1])?;
    let fixes: Vec<Fix> = serde_json::from_str(&track)?;

    for event in replay(&fixes, config)? {
        println!("{}", serde_json::to_string(&event)?);
    }

    Ok(())
}
