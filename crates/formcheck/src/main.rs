use std::{env, path::PathBuf, process};

use formcheck::config::Config;
use formcheck::exercise::{ExerciseKind, Metrics};
use formcheck::playback::{self, AnnotatedFrame, FrameSink, PngDirectory, StopSignal};
use formcheck::recording::Recording;
use formcheck::session::Session;
use itertools::Itertools;

const USAGE: &str = "usage: formcheck <exercise> <recording.jsonl> [output-dir]";

fn main() -> anyhow::Result<()> {
    formcheck::init_logger!();

    let mut args = env::args_os().skip(1);
    let (Some(exercise), Some(recording), output, None) =
        (args.next(), args.next(), args.next(), args.next())
    else {
        eprintln!("{USAGE}");
        eprintln!(
            "supported exercises: {}",
            ExerciseKind::ALL.iter().map(|kind| kind.id()).join(", ")
        );
        process::exit(2);
    };
    let kind: ExerciseKind = exercise.to_string_lossy().parse()?;

    let config = Config::from_env();
    let recording = Recording::load(PathBuf::from(recording))?;
    let (frames, replay) = recording.into_replay(config.canvas);
    let mut session = Session::new(kind, replay, config.tracking_options());

    let mut output = output.map(PngDirectory::create).transpose()?;
    let sink = move |frame: AnnotatedFrame| {
        log::debug!("frame {}: {}", frame.index, frame.metrics.limbs.iter().join("; "));
        if let Some(output) = &mut output {
            output.show(frame);
        }
    };

    let summary = playback::run(frames, &mut session, sink, &StopSignal::new())?;
    print_summary(session.info().name, summary.frames, &summary.metrics);
    Ok(())
}

fn print_summary(name: &str, frames: u64, metrics: &Metrics) {
    println!("{name}: {} reps in {frames} frames", metrics.reps());
    for limb in &metrics.limbs {
        println!("  {limb}");
    }
}
