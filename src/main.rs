//! Skyhop entry point
//!
//! Headless native runner: plays a run with the autopilot for a fixed number
//! of ticks, records the result, and prints the final frame as JSON.
//!
//! Usage: skyhop [--seed N] [--ticks N] [--settings PATH] [--frames PATH]

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::fs::File;
    use std::io::BufWriter;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    use skyhop::Game;
    use skyhop::highscores::{format_date, now_timestamp};
    use skyhop::persistence::JsonFileStore;
    use skyhop::renderer::JsonLinesSink;
    use skyhop::settings::Settings;

    /// Five minutes at 60 Hz
    const DEFAULT_TICKS: u64 = 60 * 60 * 5;

    struct Args {
        seed: Option<u64>,
        ticks: u64,
        settings: PathBuf,
        frames: Option<PathBuf>,
    }

    fn parse_args() -> Result<Args, String> {
        let mut args = Args {
            seed: None,
            ticks: DEFAULT_TICKS,
            settings: PathBuf::from("skyhop.json"),
            frames: None,
        };
        let mut it = std::env::args().skip(1);
        while let Some(flag) = it.next() {
            let mut value = || it.next().ok_or_else(|| format!("{flag} needs a value"));
            match flag.as_str() {
                "--seed" => {
                    args.seed = Some(value()?.parse().map_err(|e| format!("bad seed: {e}"))?);
                }
                "--ticks" => {
                    args.ticks = value()?.parse().map_err(|e| format!("bad tick count: {e}"))?;
                }
                "--settings" => args.settings = PathBuf::from(value()?),
                "--frames" => args.frames = Some(PathBuf::from(value()?)),
                other => return Err(format!("unknown argument {other}")),
            }
        }
        Ok(args)
    }

    fn clock_seed() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
    }

    pub fn run() -> Result<(), String> {
        let args = parse_args()?;
        let settings = Settings::load(&args.settings);
        let seed = args.seed.or(settings.seed).unwrap_or_else(clock_seed);

        let store = JsonFileStore::open(&settings.score_path);
        let mut game = Game::new(&settings, store, seed).map_err(|e| e.to_string())?;
        game.set_idle_mode(true);

        let mut frames = match &args.frames {
            Some(path) => {
                let file = File::create(path).map_err(|e| format!("{}: {e}", path.display()))?;
                Some(JsonLinesSink::new(BufWriter::new(file)))
            }
            None => None,
        };

        log::info!("Skyhop (headless) seed {seed}, {} ticks", args.ticks);
        for _ in 0..args.ticks {
            game.step();
            if let Some(sink) = frames.as_mut() {
                game.render(sink);
            }
        }

        let state = &game.state;
        log::info!(
            "Finished: score {}, high {}, {} respawn(s), {} platforms created",
            state.run.current_score,
            state.run.high_score,
            state.run.runs,
            state.generator.created()
        );

        let now = now_timestamp();
        for (rank, entry) in game.scoreboard().entries.iter().enumerate() {
            log::info!(
                "#{:<2} {:>5}  {:<24} {}",
                rank + 1,
                entry.score,
                entry.name,
                format_date(now, entry.timestamp)
            );
        }

        let snapshot = serde_json::to_string_pretty(&game.snapshot()).map_err(|e| e.to_string())?;
        println!("{snapshot}");
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    if let Err(err) = native::run() {
        log::error!("{err}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is embedded by a host; there is no standalone web entry point
}
