use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use mandala_viz::audio::{load_audio, AudioData};
use mandala_viz::cli::{ask_yes_no, Args};
use mandala_viz::config::PipelineConfig;
use mandala_viz::pipeline::{
    render_pipeline, write_signal_json, OutputPaths, PipelineError, RenderOutcome, RenderScope,
};
use mandala_viz::themes::ThemeProfile;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Theme validation happens here, before any audio is touched.
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{:#}", err);
            let code = err
                .downcast_ref::<PipelineError>()
                .map(|e| e.kind().exit_code())
                .unwrap_or(1);
            ExitCode::from(code as u8)
        }
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let config = args.pipeline_config().map_err(PipelineError::from)?;
    let profile = args.theme.profile();
    log::info!("Theme {}: {}", args.theme.number(), args.theme.description());

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();

    let do_preview = match args.preview_choice() {
        Some(choice) => choice,
        None => prompt(
            &mut input,
            &mut output,
            &format!("Run quick {}-second preview?", config.preview_seconds),
        )?,
    };

    if !config.ffmpeg.is_available() {
        log::warn!(
            "{} did not run; encoding will fail",
            config.ffmpeg.program().display()
        );
    }

    log::info!("Loading audio from {}", args.audio.display());
    let audio = load_audio(&args.audio)
        .map_err(PipelineError::from)
        .with_context(|| format!("Loading {}", args.audio.display()))?;

    if !do_preview {
        let paths = OutputPaths::for_scope(&profile, &config.output_dir, RenderScope::Full);
        render(args, &audio, &profile, RenderScope::Full, &paths, &config)?;
        println!("Full version processed directly.");
        return Ok(());
    }

    let scope = RenderScope::Preview {
        seconds: config.preview_seconds,
    };
    let preview_paths = OutputPaths::for_scope(&profile, &config.output_dir, scope);
    let preview = render(args, &audio, &profile, scope, &preview_paths, &config)?;

    if args.yes || prompt(&mut input, &mut output, "Happy with this preview?")? {
        println!("Processing full version...");
        output.flush().map_err(PipelineError::from)?;
        let paths = preview.paths.promoted();
        render(args, &audio, &profile, RenderScope::Full, &paths, &config)?;
    } else {
        println!("Exiting without processing full version.");
    }
    Ok(())
}

/// Terminal I/O failures count as an unavailable resource.
fn prompt<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    question: &str,
) -> Result<bool, PipelineError> {
    Ok(ask_yes_no(input, output, question)?)
}

fn render(
    args: &Args,
    audio: &AudioData,
    profile: &ThemeProfile,
    scope: RenderScope,
    paths: &OutputPaths,
    config: &PipelineConfig,
) -> anyhow::Result<RenderOutcome> {
    let outcome = render_pipeline(&args.audio, audio, profile, scope, paths, config)
        .with_context(|| format!("Rendering {} version", scope.label()))?;

    let stats = &outcome.stats;
    log::info!(
        "{} frames, {} bursts, {} particles spawned, at most {} alive",
        stats.frames,
        stats.bursts,
        stats.spawned,
        stats.peak_particles
    );

    if let Some(path) = &args.dump_intensity {
        write_signal_json(path, &outcome.signal)?;
        log::info!("Intensity signal written to {}", path.display());
    }
    Ok(outcome)
}
