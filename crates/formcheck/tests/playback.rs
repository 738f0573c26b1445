use std::{
    path::Path,
    sync::{Arc, Mutex},
};

use formcheck::exercise::{ExerciseKind, Stage, TrackingOptions};
use formcheck::playback::{run, AnnotatedFrame, StopSignal};
use formcheck::pose::{LandmarkIdx, NUM_LANDMARKS};
use formcheck::recording::Recording;
use formcheck::session::Session;

/// One recording line with the left leg bent to `knee_angle`, or without a person.
fn line(knee_angle: Option<f32>) -> String {
    let Some(angle) = knee_angle else {
        return r#"{"landmarks": null}"#.to_string();
    };
    let mut points = vec![[0.5, 0.5, 0.0, 0.1]; NUM_LANDMARKS];
    let (knee, hip) = ([0.5, 0.6], [0.5, 0.3]);
    let rad = angle.to_radians();
    let ankle = [knee[0] + 0.3 * rad.sin(), knee[1] - 0.3 * rad.cos()];
    for (idx, [x, y]) in [
        (LandmarkIdx::LeftHip, hip),
        (LandmarkIdx::LeftKnee, knee),
        (LandmarkIdx::LeftAnkle, ankle),
    ] {
        points[idx as usize] = [x, y, 0.0, 0.99];
    }
    serde_json::json!({ "landmarks": points }).to_string()
}

fn recording(angles: &[Option<f32>]) -> Recording {
    let text = angles.iter().map(|&angle| line(angle)).collect::<Vec<_>>().join("\n");
    Recording::parse(text.as_bytes(), Path::new("")).unwrap()
}

type Seen = Arc<Mutex<Vec<(u64, u32, Stage)>>>;

fn collecting_sink() -> (Seen, impl FnMut(AnnotatedFrame) + Send + 'static) {
    let seen = Seen::default();
    let sink = {
        let seen = seen.clone();
        move |frame: AnnotatedFrame| {
            assert_eq!((frame.image.width(), frame.image.height()), (160, 120));
            let limb = &frame.metrics.limbs[0];
            seen.lock().unwrap().push((frame.index, limb.count, limb.stage));
        }
    };
    (seen, sink)
}

#[test]
fn frames_arrive_in_order() {
    let angles = [
        Some(170.0),
        Some(120.0),
        Some(80.0),
        None,
        Some(165.0),
        Some(60.0),
        Some(175.0),
    ];
    let (frames, replay) = recording(&angles).into_replay((160, 120));
    let mut session = Session::new(ExerciseKind::Squat, replay, TrackingOptions::default());
    let (seen, sink) = collecting_sink();

    let summary = run(frames, &mut session, sink, &StopSignal::new()).unwrap();
    assert_eq!(summary.frames, 7);
    assert!(!summary.stopped);
    assert_eq!(summary.metrics.reps(), 2);

    use Stage::*;
    assert_eq!(
        *seen.lock().unwrap(),
        [
            (1, 0, Up),
            (2, 0, Up),
            (3, 0, Down),
            (4, 0, Down),
            (5, 1, Up),
            (6, 1, Down),
            (7, 2, Up),
        ]
    );
}

#[test]
fn stop_signal_is_honored() {
    let angles = [Some(170.0); 10];
    let (frames, replay) = recording(&angles).into_replay((160, 120));
    let mut session = Session::new(ExerciseKind::Squat, replay, TrackingOptions::default());
    let (seen, sink) = collecting_sink();

    let stop = StopSignal::new();
    let frames = {
        let stop = stop.clone();
        frames.enumerate().map(move |(i, frame)| {
            if i == 3 {
                stop.stop();
            }
            frame
        })
    };

    let summary = run(frames, &mut session, sink, &stop).unwrap();
    assert!(summary.stopped);
    assert_eq!(summary.frames, 4);
    let indices: Vec<u64> = seen.lock().unwrap().iter().map(|&(i, ..)| i).collect();
    assert_eq!(indices, [1, 2, 3, 4]);
}
