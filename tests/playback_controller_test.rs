//! Playback controller behaviour against instrumented audio backends

mod test_helpers;

use head_gesture_player::{
    constants::NO_TRACKS_NAME,
    gesture::Gesture,
    playback::{AudioBackend, PlaybackController, PlaybackStatus},
    presentation::{apply_command, Command},
    Error, Result,
};
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use test_helpers::{music_dir_with, silent_controller};

/// Calls observed by [`RecordingBackend`]
#[derive(Default)]
struct Calls {
    loaded: Vec<PathBuf>,
    pauses: u32,
    resumes: u32,
    stops: u32,
    shutdowns: u32,
    busy: bool,
}

/// Backend recording every call into shared state
struct RecordingBackend {
    calls: Rc<RefCell<Calls>>,
    fail_on: Option<&'static str>,
}

impl RecordingBackend {
    fn new() -> (Self, Rc<RefCell<Calls>>) {
        let calls = Rc::new(RefCell::new(Calls::default()));
        (
            Self {
                calls: Rc::clone(&calls),
                fail_on: None,
            },
            calls,
        )
    }
}

impl AudioBackend for RecordingBackend {
    fn load_and_play(&mut self, path: &Path, _volume: f32) -> Result<()> {
        if self.fail_on.is_some_and(|name| path.ends_with(name)) {
            return Err(Error::Audio(format!("cannot decode {}", path.display())));
        }
        let mut calls = self.calls.borrow_mut();
        calls.loaded.push(path.to_path_buf());
        calls.busy = true;
        Ok(())
    }

    fn pause(&mut self) {
        self.calls.borrow_mut().pauses += 1;
    }

    fn resume(&mut self) {
        self.calls.borrow_mut().resumes += 1;
    }

    fn stop(&mut self) {
        let mut calls = self.calls.borrow_mut();
        calls.stops += 1;
        calls.busy = false;
    }

    fn set_volume(&mut self, _volume: f32) {}

    fn is_busy(&self) -> bool {
        self.calls.borrow().busy
    }

    fn shutdown(&mut self) {
        self.calls.borrow_mut().shutdowns += 1;
    }

    fn name(&self) -> &str {
        "recording"
    }
}

#[test]
fn test_shutdown_happens_once() {
    let music = music_dir_with(&["a.mp3"]);
    let (backend, calls) = RecordingBackend::new();
    let mut controller = PlaybackController::new(music.path(), Box::new(backend), 0.5);

    controller.shutdown();
    controller.shutdown();
    assert_eq!(calls.borrow().shutdowns, 1);

    drop(controller);
    assert_eq!(calls.borrow().shutdowns, 1);
}

#[test]
fn test_drop_shuts_down() {
    let music = music_dir_with(&["a.mp3"]);
    let (backend, calls) = RecordingBackend::new();
    {
        let mut controller = PlaybackController::new(music.path(), Box::new(backend), 0.5);
        controller.play();
    }
    assert_eq!(calls.borrow().shutdowns, 1);
}

#[test]
fn test_pause_then_resume_does_not_reload() {
    let music = music_dir_with(&["a.mp3"]);
    let (backend, calls) = RecordingBackend::new();
    let mut controller = PlaybackController::new(music.path(), Box::new(backend), 0.5);

    controller.handle_gesture(Gesture::Up);
    controller.handle_gesture(Gesture::Down);
    controller.handle_gesture(Gesture::Up);

    let calls = calls.borrow();
    assert_eq!(calls.loaded.len(), 1);
    assert_eq!(calls.pauses, 1);
    assert_eq!(calls.resumes, 1);
    assert_eq!(controller.current_track_info().status, PlaybackStatus::Playing);
}

#[test]
fn test_track_change_stops_and_plays() {
    let music = music_dir_with(&["a.mp3", "b.mp3", "c.mp3"]);
    let (backend, calls) = RecordingBackend::new();
    let mut controller = PlaybackController::new(music.path(), Box::new(backend), 0.5);

    controller.handle_gesture(Gesture::Right);
    controller.handle_gesture(Gesture::Right);
    controller.handle_gesture(Gesture::Right);

    let calls = calls.borrow();
    let names: Vec<_> = calls
        .loaded
        .iter()
        .map(|path| path.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, ["b.mp3", "c.mp3", "a.mp3"]);
    assert_eq!(calls.stops, 3);
}

#[test]
fn test_playback_error_is_logged_not_raised() {
    let music = music_dir_with(&["a.mp3", "broken.mp3"]);
    let (mut backend, _calls) = RecordingBackend::new();
    backend.fail_on = Some("broken.mp3");
    let mut controller = PlaybackController::new(music.path(), Box::new(backend), 0.5);

    controller.next();
    let info = controller.current_track_info();
    assert_eq!(info.name, "broken.mp3");
    assert_eq!(info.status, PlaybackStatus::Stopped);
    assert!(controller
        .recent_logs()
        .last()
        .unwrap()
        .starts_with("Error playing music: "));

    // The controller keeps working afterwards
    controller.next();
    assert_eq!(controller.current_track_info().status, PlaybackStatus::Playing);
}

#[test]
fn test_only_supported_files_are_tracks() {
    let music = music_dir_with(&["song.MP3", "b.wav", "c.ogg", "cover.jpg", "notes.txt", "noext"]);
    fs::create_dir(music.path().join("nested.mp3")).unwrap();
    let controller = silent_controller(&music);
    assert_eq!(controller.track_count(), 3);
}

#[test]
fn test_empty_library_gestures_are_harmless() {
    let music = music_dir_with(&[]);
    let mut controller = silent_controller(&music);
    for gesture in Gesture::ACTIONABLE {
        controller.handle_gesture(gesture);
    }

    let info = controller.current_track_info();
    assert_eq!(info.name, NO_TRACKS_NAME);
    assert_eq!(info.status, PlaybackStatus::Stopped);
    assert!(controller
        .recent_logs()
        .iter()
        .any(|line| line == "No tracks available"));
}

#[test]
fn test_shuffle_is_seeded() {
    let names = ["a.mp3", "b.mp3", "c.mp3", "d.mp3", "e.mp3"];
    let music = music_dir_with(&names);

    let picks = |seed: u64| {
        let mut controller = PlaybackController::new(
            music.path(),
            Box::new(head_gesture_player::playback::NullBackend::new()),
            0.5,
        )
        .with_seed(seed);
        (0..10)
            .map(|_| {
                controller.shuffle();
                controller.current_track_info().index
            })
            .collect::<Vec<_>>()
    };

    let first = picks(3);
    assert_eq!(first, picks(3));
    assert!(first.iter().all(|&index| (1..=names.len()).contains(&index)));
}

#[test]
fn test_set_music_dir_switches_library() {
    let first = music_dir_with(&["a.mp3"]);
    let second = music_dir_with(&["x.mp3", "y.mp3"]);
    let mut controller = silent_controller(&first);
    controller.play();

    controller.set_music_dir(second.path());
    let info = controller.current_track_info();
    assert_eq!(info.name, "x.mp3");
    assert_eq!(info.total, 2);
    assert_eq!(info.status, PlaybackStatus::Stopped);
}

#[test]
fn test_set_music_dir_to_missing_folder_keeps_library() {
    let music = music_dir_with(&["a.mp3"]);
    let mut controller = silent_controller(&music);

    controller.set_music_dir(music.path().join("does-not-exist"));
    assert_eq!(controller.track_count(), 1);
    assert!(controller
        .recent_logs()
        .last()
        .unwrap()
        .starts_with("Cannot use music folder"));
}

#[test]
fn test_reload_picks_up_new_files() {
    let music = music_dir_with(&["a.mp3"]);
    let mut controller = silent_controller(&music);
    fs::write(music.path().join("b.ogg"), b"").unwrap();

    assert!(apply_command(&mut controller, Command::Reload));
    assert_eq!(controller.track_count(), 2);
    assert_eq!(
        controller.recent_logs().last().unwrap(),
        "Reloaded tracks: found 2 music files"
    );
}

#[test]
fn test_quit_command_returns_false() {
    let music = music_dir_with(&["a.mp3"]);
    let mut controller = silent_controller(&music);
    assert!(!apply_command(&mut controller, Command::Quit));
    assert!(apply_command(&mut controller, Command::TogglePlayPause));
    assert_eq!(controller.current_track_info().status, PlaybackStatus::Playing);
}

#[test]
fn test_total_logged_counts_evicted_lines() {
    let music = music_dir_with(&["a.mp3"]);
    let mut controller = silent_controller(&music).with_log_capacity(3);
    let before = controller.total_logged();
    for i in 0..10 {
        controller.add_log(format!("entry {i}"));
    }
    assert_eq!(controller.total_logged(), before + 10);
    assert_eq!(controller.recent_logs(), ["entry 7", "entry 8", "entry 9"]);
}

#[test]
fn test_default_log_cap_is_one_hundred() {
    let music = music_dir_with(&["a.mp3"]);
    let mut controller = silent_controller(&music);
    for i in 0..150 {
        controller.add_log(format!("entry {i}"));
    }

    let logs = controller.recent_logs();
    assert_eq!(logs.len(), 100);
    assert_eq!(logs.first().unwrap(), "entry 50");
    assert_eq!(logs.last().unwrap(), "entry 149");
}
