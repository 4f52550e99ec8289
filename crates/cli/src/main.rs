#![deny(unsafe_code)]
//! CLI binary for glyph-dust.
//!
//! Subcommands:
//! - `render`: run the scene N frames with a scripted pointer, write PNG
//! - `sample`: run the glyph sampler and report the points
//! - `schema`: print the field parameter schema and scene defaults

mod error;

use clap::{Parser, Subcommand};
use error::CliError;
use glyph_dust_core::{Engine, Viewport, Xorshift64};
use glyph_dust_field::{FieldParams, ParticleField};
use glyph_dust_sampler::GlyphSampler;
use glyph_dust_scene::frame_loop::{self, FixedStep, FrameScheduler, Realtime, FRAME_INTERVAL};
use glyph_dust_scene::{BuiltinFont, InputEvent, Layout, Scene, SceneConfig};
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "glyph-dust", about = "Particle text disintegration renderer")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args)]
struct ViewportArgs {
    /// Viewport width in CSS pixels.
    #[arg(short = 'W', long, default_value_t = 800.0)]
    width: f64,

    /// Viewport height in CSS pixels.
    #[arg(short = 'H', long, default_value_t = 600.0)]
    height: f64,

    /// Device pixel ratio.
    #[arg(long, default_value_t = 1.0)]
    dpr: f64,

    /// Scene config JSON file. Missing keys take their defaults.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the scene for N frames and write a PNG snapshot.
    Render {
        #[command(flatten)]
        viewport: ViewportArgs,

        /// Number of frames to run.
        #[arg(short, long, default_value_t = 90)]
        frames: u64,

        /// PRNG seed, overriding the config.
        #[arg(long)]
        seed: Option<u64>,

        /// Field parameters as a JSON string, overlaid on the config.
        #[arg(long, default_value = "{}")]
        params: String,

        /// Hold the pointer at "X,Y" (CSS pixels).
        #[arg(long, conflicts_with = "sweep")]
        pointer: Option<String>,

        /// Sweep the pointer left to right across the vertical center.
        #[arg(long)]
        sweep: bool,

        /// Frame at which the pointer leaves the page.
        #[arg(long)]
        leave_at: Option<u64>,

        /// Resize the viewport to "WxH" (CSS pixels) during the run.
        #[arg(long)]
        resize: Option<String>,

        /// Frame at which the resize happens. Defaults to the first frame.
        #[arg(long, requires = "resize")]
        resize_at: Option<u64>,

        /// Pace frames to wall-clock 60 Hz instead of running headless.
        #[arg(long)]
        realtime: bool,

        /// Output file path.
        #[arg(short, long, default_value = "glyph-dust.png")]
        output: PathBuf,
    },
    /// Sample the headline and report the point set.
    Sample {
        #[command(flatten)]
        viewport: ViewportArgs,

        /// Headline text, overriding the config.
        #[arg(long)]
        text: Option<String>,
    },
    /// Print the field parameter schema and the default scene config.
    Schema,
}

/// Pointer behavior over a scripted run.
#[derive(Debug, Clone, Copy, PartialEq)]
enum PointerScript {
    Idle,
    Fixed { x: f64, y: f64 },
    Sweep { width: f64, y: f64, frames: u64 },
}

impl PointerScript {
    fn position(&self, frame: u64) -> Option<(f64, f64)> {
        match *self {
            PointerScript::Idle => None,
            PointerScript::Fixed { x, y } => Some((x, y)),
            PointerScript::Sweep { width, y, frames } => {
                let span = frames.saturating_sub(1).max(1) as f64;
                Some((width * frame as f64 / span, y))
            }
        }
    }
}

/// Events for one frame of a scripted run.
fn scripted_events(
    pointer: PointerScript,
    leave_at: Option<u64>,
    resize: Option<(u64, InputEvent)>,
    frame: u64,
) -> Vec<InputEvent> {
    let mut events = Vec::new();
    if let Some((at, event)) = resize {
        if at == frame {
            events.push(event);
        }
    }
    match leave_at {
        Some(at) if frame == at => events.push(InputEvent::PointerLeave),
        Some(at) if frame > at => {}
        _ => {
            if let Some((x, y)) = pointer.position(frame) {
                events.push(InputEvent::PointerMove { x, y });
            }
        }
    }
    events
}

fn parse_pair(input: &str, separator: char, what: &str) -> Result<(f64, f64), CliError> {
    let bad = || CliError::Input(format!("invalid {what} {input:?}, expected A{separator}B"));
    let (a, b) = input.split_once(separator).ok_or_else(bad)?;
    let a: f64 = a.trim().parse().map_err(|_| bad())?;
    let b: f64 = b.trim().parse().map_err(|_| bad())?;
    if !a.is_finite() || !b.is_finite() {
        return Err(bad());
    }
    Ok((a, b))
}

fn load_config(path: Option<&Path>) -> Result<SceneConfig, CliError> {
    match path {
        None => Ok(SceneConfig::default()),
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .map_err(|e| CliError::Io(format!("reading {}: {e}", path.display())))?;
            Ok(SceneConfig::from_json_str(&text)?)
        }
    }
}

fn viewport(args: &ViewportArgs) -> Result<Viewport, CliError> {
    Ok(Viewport::new(args.width, args.height, args.dpr)?)
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn,glyph_dust=info"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Schema => {
            let field = ParticleField::new(&[], FieldParams::default(), &mut Xorshift64::new(0));
            let info = serde_json::json!({
                "field": field.param_schema(),
                "defaults": serde_json::to_value(SceneConfig::default())?,
            });
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
        Command::Sample { viewport: args, text } => {
            let mut config = load_config(args.config.as_deref())?;
            if let Some(text) = text {
                config.headline = text;
            }
            config.validate()?;
            let vp = viewport(&args)?;
            let layout = Layout::compute(&vp, &config);
            let sampler = GlyphSampler::new(config.sampler);
            let points = sampler.sample(&vp, std::slice::from_ref(layout.headline()))?;

            let bbox = points.iter().fold(None, |acc: Option<(f64, f64, f64, f64)>, p| {
                Some(match acc {
                    None => (p.x, p.y, p.x, p.y),
                    Some((x0, y0, x1, y1)) => (x0.min(p.x), y0.min(p.y), x1.max(p.x), y1.max(p.y)),
                })
            });

            if cli.json {
                let info = serde_json::json!({
                    "headline": config.headline,
                    "font_size": layout.headline().style.size,
                    "text_width": layout.headline_width(),
                    "device_step": sampler.device_step(vp.dpr()),
                    "count": points.len(),
                    "bbox": bbox.map(|(x0, y0, x1, y1)| serde_json::json!({
                        "min_x": x0, "min_y": y0, "max_x": x1, "max_y": y1,
                    })),
                    "points": points.iter().map(|p| [p.x, p.y]).collect::<Vec<_>>(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("points: {}", points.len());
                println!("font size: {}", layout.headline().style.size);
                println!("text width: {:.1}", layout.headline_width());
                match bbox {
                    Some((x0, y0, x1, y1)) => println!("bbox: ({x0}, {y0}) - ({x1}, {y1})"),
                    None => println!("bbox: none"),
                }
            }
        }
        Command::Render {
            viewport: args,
            frames,
            seed,
            params,
            pointer,
            sweep,
            leave_at,
            resize,
            resize_at,
            realtime,
            output,
        } => {
            let params: serde_json::Value = serde_json::from_str(&params)
                .map_err(|e| CliError::Input(format!("invalid --params JSON: {e}")))?;

            let mut config = load_config(args.config.as_deref())?;
            if let Some(seed) = seed {
                config.seed = seed;
            }
            config.field = config.field.merged_with(&params);

            let vp = viewport(&args)?;
            let script = match (pointer, sweep) {
                (Some(at), _) => {
                    let (x, y) = parse_pair(&at, ',', "--pointer")?;
                    PointerScript::Fixed { x, y }
                }
                (None, true) => PointerScript::Sweep {
                    width: vp.css_width(),
                    y: vp.center().y,
                    frames,
                },
                (None, false) => PointerScript::Idle,
            };
            let resize = match resize {
                Some(size) => {
                    let (width, height) = parse_pair(&size, 'x', "--resize")?;
                    let event = InputEvent::Resize {
                        width,
                        height,
                        dpr: vp.dpr(),
                    };
                    Some((resize_at.unwrap_or(0), event))
                }
                None => None,
            };

            let seed = config.seed;
            let mut scene = Scene::start(config, vp, Some(&BuiltinFont))?;
            info!(agents = scene.field().len(), frames, "scene ready");

            let mut scheduler: Box<dyn FrameScheduler> = if realtime {
                Box::new(Realtime::new(FRAME_INTERVAL, Some(frames)))
            } else {
                Box::new(FixedStep::frames(FRAME_INTERVAL, frames))
            };
            let mut input = |frame: u64, _now: Duration| scripted_events(script, leave_at, resize, frame);
            frame_loop::run(&mut scene, scheduler.as_mut(), &mut input)?;

            glyph_dust_scene::snapshot::write_png(&scene, &output)?;

            let (w, h) = (scene.viewport().css_width(), scene.viewport().css_height());
            if cli.json {
                let info = serde_json::json!({
                    "width": w,
                    "height": h,
                    "dpr": scene.viewport().dpr(),
                    "frames": scene.frames(),
                    "seed": seed,
                    "agents": scene.field().len(),
                    "displaced": scene.field().displaced_count(),
                    "generation": scene.field().generation(),
                    "output": output.display().to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                eprintln!(
                    "rendered {w}x{h} ({} frames, {} agents, seed {seed}) -> {}",
                    scene.frames(),
                    scene.field().len(),
                    output.display()
                );
            }
        }
    }

    Ok(())
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_pair_accepts_both_separators() {
        assert_eq!(parse_pair("10, 20.5", ',', "--pointer").unwrap(), (10.0, 20.5));
        assert_eq!(parse_pair("400x300", 'x', "--resize").unwrap(), (400.0, 300.0));
    }

    #[test]
    fn parse_pair_rejects_garbage() {
        for bad in ["", "10", "a,b", "1,inf", "1;2"] {
            let err = parse_pair(bad, ',', "--pointer").unwrap_err();
            assert_eq!(err.exit_code(), 12, "{bad:?}");
        }
    }

    #[test]
    fn sweep_crosses_the_viewport() {
        let script = PointerScript::Sweep {
            width: 800.0,
            y: 300.0,
            frames: 5,
        };
        assert_eq!(script.position(0), Some((0.0, 300.0)));
        assert_eq!(script.position(2), Some((400.0, 300.0)));
        assert_eq!(script.position(4), Some((800.0, 300.0)));
        assert_eq!(PointerScript::Idle.position(3), None);
    }

    #[test]
    fn pointer_leaves_and_stays_gone() {
        let script = PointerScript::Fixed { x: 1.0, y: 2.0 };
        assert_eq!(
            scripted_events(script, Some(2), None, 1),
            vec![InputEvent::PointerMove { x: 1.0, y: 2.0 }]
        );
        assert_eq!(scripted_events(script, Some(2), None, 2), vec![InputEvent::PointerLeave]);
        assert!(scripted_events(script, Some(2), None, 3).is_empty());
    }

    #[test]
    fn resize_fires_on_its_frame_only() {
        let resize = InputEvent::Resize {
            width: 400.0,
            height: 300.0,
            dpr: 1.0,
        };
        let at = Some((3, resize));
        assert!(scripted_events(PointerScript::Idle, None, at, 2).is_empty());
        assert_eq!(scripted_events(PointerScript::Idle, None, at, 3), vec![resize]);
    }

    #[test]
    fn missing_config_file_is_an_io_error() {
        let err = load_config(Some(Path::new("/nonexistent/glyph-dust.json"))).unwrap_err();
        assert_eq!(err.exit_code(), 11);
    }

    #[test]
    fn config_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.json");
        std::fs::write(&path, r#"{"headline": "500", "label": null}"#).unwrap();
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.headline, "500");
        assert!(config.label.is_none());
    }

    #[test]
    fn invalid_config_file_is_an_input_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.json");
        std::fs::write(&path, r#"{"sampler": {"stride": -1}}"#).unwrap();
        assert_eq!(load_config(Some(&path)).unwrap_err().exit_code(), 12);
    }

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("glyph-dust").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn render_writes_a_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        let out = path.to_str().unwrap();
        run(parse(&["render", "-W", "64", "-H", "48", "--frames", "3", "-o", out])).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn oversized_render_is_a_scene_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("huge.png");
        let out = path.to_str().unwrap();
        let err = run(parse(&["render", "-W", "1e6", "-H", "1e6", "-o", out])).unwrap_err();
        assert_eq!(err.exit_code(), 10);
        assert!(!path.exists());
    }

    #[test]
    fn sample_runs_for_custom_text() {
        run(parse(&["--json", "sample", "-W", "320", "-H", "240", "--text", "500"])).unwrap();
    }
}
