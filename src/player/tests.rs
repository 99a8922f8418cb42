use super::*;
use std::sync::mpsc;
use std::time::{Duration, Instant};

fn wait_for<F: Fn(&PlaybackInfo) -> bool>(handle: &PlaybackHandle, pred: F) -> bool {
    let deadline = Instant::now() + Duration::from_secs(2);
    while Instant::now() < deadline {
        if let Ok(info) = handle.lock() {
            if pred(&info) {
                return true;
            }
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    false
}

#[test]
fn bind_emits_connected_and_unbind_emits_disconnected() {
    let (tx, rx) = mpsc::channel();
    let binding = PlayerService::bind(vec![None, None], tx);

    assert_eq!(
        rx.recv_timeout(Duration::from_secs(2)).unwrap(),
        PlayerEvent::Connected
    );

    binding.unbind();
    assert_eq!(
        rx.recv_timeout(Duration::from_secs(2)).unwrap(),
        PlayerEvent::Disconnected
    );
}

#[test]
fn dropping_an_unreleased_binding_still_disconnects() {
    let (tx, rx) = mpsc::channel();
    {
        let _binding = PlayerService::bind(vec![None], tx);
        assert_eq!(
            rx.recv_timeout(Duration::from_secs(2)).unwrap(),
            PlayerEvent::Connected
        );
    }
    assert_eq!(
        rx.recv_timeout(Duration::from_secs(2)).unwrap(),
        PlayerEvent::Disconnected
    );
}

#[test]
fn play_publishes_index_and_playing() {
    let (tx, _rx) = mpsc::channel();
    let binding = PlayerService::bind(vec![None, None, None], tx);
    let handle = binding.playback_handle();

    binding.send(PlayerCmd::Play(1)).unwrap();
    assert!(wait_for(&handle, |i| i.index == Some(1) && i.playing));

    binding.send(PlayerCmd::TogglePause).unwrap();
    assert!(wait_for(&handle, |i| !i.playing && i.index == Some(1)));

    binding.send(PlayerCmd::Stop).unwrap();
    assert!(wait_for(&handle, |i| i.index.is_none() && !i.playing));

    binding.unbind();
}

#[test]
fn next_walks_the_queue() {
    let (tx, _rx) = mpsc::channel();
    let binding = PlayerService::bind(vec![None, None, None], tx);
    let handle = binding.playback_handle();

    binding.send(PlayerCmd::Play(0)).unwrap();
    assert!(wait_for(&handle, |i| i.index == Some(0)));

    binding.send(PlayerCmd::Next).unwrap();
    assert!(wait_for(&handle, |i| i.index == Some(1)));

    binding.send(PlayerCmd::Prev).unwrap();
    assert!(wait_for(&handle, |i| i.index == Some(0)));

    binding.unbind();
}

#[test]
fn no_loop_stops_after_the_last_track_ends() {
    let (tx, _rx) = mpsc::channel();
    let binding = PlayerService::bind(vec![Some(Duration::from_millis(50))], tx);
    let handle = binding.playback_handle();

    binding.send(PlayerCmd::SetLoopMode(LoopMode::NoLoop)).unwrap();
    binding.send(PlayerCmd::Play(0)).unwrap();
    assert!(wait_for(&handle, |i| i.index == Some(0) && i.playing));

    // The metadata clock runs the 50ms track out within a few ticks.
    assert!(wait_for(&handle, |i| i.index.is_none() && !i.playing));

    binding.unbind();
}

#[test]
fn set_queue_drops_out_of_range_indices() {
    let (tx, _rx) = mpsc::channel();
    let binding = PlayerService::bind(vec![None, None], tx);
    let handle = binding.playback_handle();

    binding.send(PlayerCmd::SetQueue(vec![1, 99])).unwrap();
    binding.send(PlayerCmd::Play(1)).unwrap();
    assert!(wait_for(&handle, |i| i.index == Some(1)));

    // The only other queue entry was out of range, so NoLoop Next
    // cannot move anywhere.
    binding.send(PlayerCmd::SetLoopMode(LoopMode::NoLoop)).unwrap();
    binding.send(PlayerCmd::Next).unwrap();
    std::thread::sleep(Duration::from_millis(100));
    assert_eq!(handle.lock().unwrap().index, Some(1));

    binding.unbind();
}
