use inkframe_core::{
    render_storage_error, Catalog, MockFileSystem, PanelRenderer, ScanError, Slideshow, TickAction,
};
use inkframe_scenario_harness::{
    save_framebuffer_png, DiscardSink, RecordingRenderer, ScenarioHarness, ScriptedBattery,
};

#[test]
fn missing_card_surfaces_a_persistent_storage_error() {
    let mut fs = MockFileSystem::unmounted();
    let result = Catalog::scan(&mut fs, "/", true, 100);
    assert_eq!(result.unwrap_err(), ScanError::StorageUnavailable);

    // The platform loop renders the error screen and parks.
    let mut renderer = RecordingRenderer::new();
    render_storage_error(&mut renderer);
    assert!(renderer.screen_contains("Storage unavailable"));
    assert!(renderer.screen_contains("Check the SD card"));
}

#[test]
fn one_bad_photo_does_not_take_down_the_show() {
    let mut fs = MockFileSystem::new();
    fs.add_file("/ok1.jpg", b"jpeg-bytes");
    fs.add_file("/broken.jpg", b"jpeg-bytes");
    fs.add_file("/ok2.jpg", b"jpeg-bytes");

    let mut harness = ScenarioHarness::start(fs, ScriptedBattery::at_percent(80));
    harness.renderer_mut().fail_path("/broken.jpg");

    harness.press_next();
    assert_eq!(harness.slideshow().current_index(), 1);
    assert!(harness.renderer().screen_contains("Cannot display broken.jpg"));

    // The broken file stays in the catalog and navigation moves on.
    assert_eq!(harness.slideshow().catalog().len(), 3);
    harness.press_next();
    assert_eq!(harness.slideshow().current_index(), 2);
    assert_eq!(harness.renderer().last_image(), Some("/ok2.jpg"));
}

#[test]
fn deleted_file_renders_an_error_but_keeps_the_catalog_entry() {
    let mut fs = MockFileSystem::new();
    fs.add_file("/a.jpg", b"jpeg-bytes");
    fs.add_file("/b.jpg", b"jpeg-bytes");

    let mut harness = ScenarioHarness::start(fs, ScriptedBattery::at_percent(80));
    harness.fs_mut().remove_file("/b.jpg");

    harness.press_next();
    assert_eq!(harness.slideshow().current_index(), 1);
    assert!(harness.renderer().screen_contains("Cannot display b.jpg"));
    assert_eq!(harness.slideshow().catalog().len(), 2);
}

/// End-to-end through the real renderer: decode a synthesized photo,
/// draw the status bar, and dump the frame for eyeballing.
#[test]
fn full_pipeline_renders_a_real_photo_and_status_bar() {
    let mut photo = Vec::new();
    let gradient = image::GrayImage::from_fn(64, 48, |x, _y| image::Luma([(x * 4) as u8]));
    image::DynamicImage::ImageLuma8(gradient)
        .write_to(
            &mut std::io::Cursor::new(&mut photo),
            image::ImageFormat::Png,
        )
        .unwrap();

    let mut fs = MockFileSystem::new();
    fs.add_file("/gradient.jpg", &photo);
    fs.add_file("/other.jpg", &photo);

    let mut catalog_fs = fs;
    let catalog = Catalog::scan(&mut catalog_fs, "/", true, 100).unwrap();
    let mut show = Slideshow::new(catalog, 0);
    let mut battery = ScriptedBattery::at_percent(80);
    let mut renderer = PanelRenderer::new(DiscardSink);
    show.start(0, &mut battery, &mut catalog_fs, &mut renderer);

    // The photo area and the status bar both carry ink.
    assert!(renderer.frame().black_pixels_in_rows(0, 440) > 10_000);
    assert!(renderer.frame().black_pixels_in_rows(440, 40) > 0);

    // Ticking through an auto-advance keeps producing frames.
    let mut now = 0;
    let mut rendered = false;
    while now < 12_000 {
        now += 100;
        if show.tick(
            now,
            inkframe_core::ButtonStates::NONE,
            &mut battery,
            &mut catalog_fs,
            &mut renderer,
        ) == TickAction::Rendered
        {
            rendered = true;
        }
    }
    assert!(rendered);

    let out = std::env::temp_dir().join("inkframe-scenario/gradient-frame.png");
    save_framebuffer_png(renderer.frame(), &out).unwrap();
    assert!(out.metadata().unwrap().len() > 0);
}
