use inkframe_core::{MockFileSystem, TickAction};
use inkframe_scenario_harness::{ScenarioHarness, ScriptedBattery};

fn two_photo_card() -> MockFileSystem {
    let mut fs = MockFileSystem::new();
    fs.add_file("/first.jpg", b"jpeg-bytes");
    fs.add_file("/second.jpg", b"jpeg-bytes");
    fs
}

#[test]
fn ten_idle_seconds_advance_exactly_once() {
    let mut harness = ScenarioHarness::start(two_photo_card(), ScriptedBattery::at_percent(80));
    assert_eq!(harness.slideshow().current_index(), 0);

    let mut renders = 0;
    for _ in 0..100 {
        harness.advance_ms(100);
        if harness.tick_idle() == TickAction::Rendered {
            renders += 1;
        }
    }
    assert_eq!(renders, 1);
    assert_eq!(harness.slideshow().current_index(), 1);
    assert_eq!(harness.renderer().last_image(), Some("/second.jpg"));
}

#[test]
fn the_show_keeps_cycling_while_idle() {
    let mut harness = ScenarioHarness::start(two_photo_card(), ScriptedBattery::at_percent(80));

    // Three intervals: 0 -> 1 -> 0 -> 1.
    for expected in [1, 0, 1] {
        let deadline = harness.now() + 10_000;
        while harness.now() < deadline {
            harness.advance_ms(100);
            harness.tick_idle();
        }
        assert_eq!(harness.slideshow().current_index(), expected);
    }
}

#[test]
fn pausing_stops_the_cycle_and_resuming_restarts_it() {
    let mut harness = ScenarioHarness::start(two_photo_card(), ScriptedBattery::at_percent(80));

    harness.press_toggle();
    assert!(!harness.slideshow().policy().is_enabled());

    // Paused: nothing advances for well over an interval.
    for _ in 0..150 {
        harness.advance_ms(100);
        harness.tick_idle();
    }
    assert_eq!(harness.slideshow().current_index(), 0);

    harness.press_toggle();
    assert!(harness.slideshow().policy().is_enabled());

    // Resumed: the next interval advances again.
    for _ in 0..100 {
        harness.advance_ms(100);
        harness.tick_idle();
    }
    assert_eq!(harness.slideshow().current_index(), 1);
}

#[test]
fn toggle_feedback_is_a_fast_status_bar_update() {
    let mut harness = ScenarioHarness::start(two_photo_card(), ScriptedBattery::at_percent(80));
    harness.renderer_mut().clear_log();

    harness.press_toggle();
    let pushes = harness.renderer().pushes();
    assert_eq!(pushes.len(), 1);
    assert!(matches!(
        pushes[0],
        inkframe_scenario_harness::Push::Region {
            quality: inkframe_core::RefreshQuality::Fast,
            ..
        }
    ));
    assert!(harness.renderer().screen_contains("Auto OFF (Paused)"));
}
