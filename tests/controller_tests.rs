use std::rc::Rc;

use pageview::test_utils::{
    DEFAULT_PAGE_HEIGHT, DEFAULT_PAGE_WIDTH, FakeChrome, FakeContainer, FakeOpener, RenderHold,
};
use pageview::viewer::{
    BusyPolicy, DisplayState, GENERIC_LOAD_FAILURE, PageViewerController, ViewerConfig, Viewport,
};
use tokio::task::LocalSet;

type TestViewer = PageViewerController<FakeOpener, FakeContainer, FakeChrome>;

fn viewer_with(opener: FakeOpener, policy: BusyPolicy, width: f32) -> Rc<TestViewer> {
    Rc::new(PageViewerController::new(
        opener,
        FakeContainer::new(width, 800.0),
        FakeChrome::default(),
        ViewerConfig::default().with_busy_policy(policy),
    ))
}

fn viewer(opener: FakeOpener) -> Rc<TestViewer> {
    viewer_with(opener, BusyPolicy::Restart, 1040.0)
}

fn slot_widths(viewer: &TestViewer) -> Vec<u32> {
    viewer.with_slots(|slots| slots.iter().map(|s| s.viewport.width_px()).collect())
}

/// Let local tasks run until `done` holds
async fn run_until(done: impl Fn() -> bool) {
    for _ in 0..1_000 {
        if done() {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("condition not reached");
}

#[tokio::test]
async fn load_renders_every_page_and_reports_ready() {
    let viewer = viewer(FakeOpener::new().with_document("doc.pdf", 3));

    viewer.load_document("doc.pdf").await;

    assert_eq!(viewer.display_state(), DisplayState::Ready);
    assert_eq!(viewer.page_count(), 3);
    assert_eq!(viewer.current_page(), 1);
    assert_eq!(viewer.slot_pages(), vec![1, 2, 3]);
    assert!(!viewer.is_rendering());

    let labels: Vec<String> = viewer.with_slots(|slots| slots.iter().map(|s| s.label.clone()).collect());
    assert_eq!(labels, vec!["Page 1", "Page 2", "Page 3"]);

    let chrome = viewer.chrome();
    assert!(!chrome.loading);
    assert_eq!(chrome.error, None);
    assert_eq!(chrome.page_info, Some((1, 3)));
    assert_eq!(chrome.nav_enabled, Some((false, true)));
    assert_eq!(chrome.zoom_label.as_deref(), Some("100%"));
}

#[tokio::test]
async fn open_failure_shows_the_backend_message() {
    let viewer = viewer(FakeOpener::new().failing_open("bad.pdf", "Invalid PDF structure"));

    viewer.load_document("bad.pdf").await;

    assert_eq!(
        viewer.display_state(),
        DisplayState::Error("Invalid PDF structure".to_string())
    );
    assert_eq!(viewer.chrome().error.as_deref(), Some("Invalid PDF structure"));
    assert!(!viewer.chrome().loading);
    assert_eq!(viewer.slot_count(), 0);
}

#[tokio::test]
async fn open_failure_without_detail_uses_generic_message() {
    let viewer = viewer(FakeOpener::new().failing_open("bad.pdf", ""));

    viewer.load_document("bad.pdf").await;

    assert_eq!(viewer.chrome().error.as_deref(), Some(GENERIC_LOAD_FAILURE));
}

#[tokio::test]
async fn successful_load_clears_previous_error() {
    let viewer = viewer(
        FakeOpener::new()
            .failing_open("bad.pdf", "broken")
            .with_document("good.pdf", 2),
    );

    viewer.load_document("bad.pdf").await;
    viewer.load_document("good.pdf").await;

    assert_eq!(viewer.chrome().error, None);
    assert_eq!(viewer.display_state(), DisplayState::Ready);
    assert_eq!(viewer.slot_pages(), vec![1, 2]);
}

#[tokio::test]
async fn failed_pages_leave_the_others_rendered() {
    let viewer = viewer(
        FakeOpener::new()
            .with_document("doc.pdf", 4)
            .failing_render("doc.pdf", 2)
            .failing_fetch("doc.pdf", 3),
    );

    viewer.load_document("doc.pdf").await;

    assert_eq!(viewer.slot_pages(), vec![1, 4]);
    assert_eq!(viewer.display_state(), DisplayState::Ready);
    assert_eq!(viewer.page_count(), 4);
}

#[tokio::test]
async fn zoom_steps_rerender_at_the_new_scale() {
    let viewer = viewer(FakeOpener::new().with_document("doc.pdf", 2));
    viewer.load_document("doc.pdf").await;

    viewer.zoom_in().await;

    assert_eq!(viewer.scale(), 1.25);
    assert_eq!(viewer.chrome().zoom_label.as_deref(), Some("125%"));
    assert_eq!(slot_widths(&viewer), vec![625, 625]);

    viewer.zoom_out().await;
    viewer.zoom_out().await;
    assert_eq!(viewer.scale(), 0.75);
    assert_eq!(slot_widths(&viewer), vec![375, 375]);
}

#[tokio::test]
async fn zoom_stays_within_bounds_and_skips_needless_renders() {
    let opener = FakeOpener::new().with_document("doc.pdf", 1);
    let log = opener.log();
    let viewer = viewer(opener);
    viewer.load_document("doc.pdf").await;

    for _ in 0..20 {
        viewer.zoom_in().await;
    }
    assert_eq!(viewer.scale(), 3.0);
    let renders = log.borrow().rasterized.len();

    viewer.zoom_in().await;
    assert_eq!(viewer.scale(), 3.0);
    assert_eq!(log.borrow().rasterized.len(), renders);

    for _ in 0..20 {
        viewer.zoom_out().await;
    }
    assert_eq!(viewer.scale(), 0.5);
    assert_eq!(viewer.zoom_label(), "50%");
}

#[tokio::test]
async fn zoom_fit_matches_container_width() {
    let viewer = viewer_with(
        FakeOpener::new().with_document("doc.pdf", 2),
        BusyPolicy::Restart,
        1040.0,
    );
    viewer.load_document("doc.pdf").await;

    viewer.zoom_fit().await;

    assert_eq!(viewer.scale(), 2.0);
    assert_eq!(viewer.chrome().zoom_label.as_deref(), Some("200%"));
    assert_eq!(slot_widths(&viewer), vec![1000, 1000]);
}

#[tokio::test]
async fn zoom_fit_at_the_fitted_scale_keeps_existing_pages() {
    let opener = FakeOpener::new().with_document("doc.pdf", 2);
    let log = opener.log();
    let viewer = viewer(opener);
    viewer.load_document("doc.pdf").await;

    viewer.zoom_fit().await;
    let renders = log.borrow().rasterized.len();
    assert_eq!(renders, 4);

    viewer.zoom_fit().await;

    assert_eq!(viewer.scale(), 2.0);
    assert_eq!(log.borrow().rasterized.len(), renders);
    assert_eq!(viewer.chrome().zoom_label.as_deref(), Some("200%"));
}

#[tokio::test]
async fn zoom_fit_on_narrow_container_clamps_to_minimum() {
    let viewer = viewer_with(
        FakeOpener::new().with_document("doc.pdf", 1),
        BusyPolicy::Restart,
        240.0,
    );
    viewer.load_document("doc.pdf").await;

    viewer.zoom_fit().await;

    assert_eq!(viewer.scale(), 0.5);
}

#[tokio::test]
async fn zoom_fit_uses_page_one_width() {
    let viewer = viewer(FakeOpener::new().with_pages("doc.pdf", vec![(250.0, 400.0), (1000.0, 400.0)]));
    viewer.load_document("doc.pdf").await;

    viewer.zoom_fit().await;

    assert_eq!(viewer.scale(), 3.0);
}

#[tokio::test]
async fn zoom_fit_without_document_does_nothing() {
    let viewer = viewer(FakeOpener::new());
    viewer.zoom_fit().await;
    assert_eq!(viewer.scale(), 1.0);
}

#[tokio::test]
async fn navigation_stays_within_document() {
    let viewer = viewer(FakeOpener::new().with_document("doc.pdf", 3));
    viewer.load_document("doc.pdf").await;

    for _ in 0..5 {
        viewer.next_page();
    }
    assert_eq!(viewer.current_page(), 3);
    assert_eq!(viewer.chrome().nav_enabled, Some((true, false)));

    for _ in 0..5 {
        viewer.prev_page();
    }
    assert_eq!(viewer.current_page(), 1);
    assert_eq!(viewer.chrome().page_info, Some((1, 3)));

    // 700px page + 24px label + 16px gap per slot
    let step = DEFAULT_PAGE_HEIGHT + 40.0;
    assert_eq!(
        viewer.container().scroll_history(),
        vec![step, 2.0 * step, step, 0.0]
    );
}

#[tokio::test]
async fn go_to_page_clamps() {
    let viewer = viewer(FakeOpener::new().with_document("doc.pdf", 3));
    viewer.load_document("doc.pdf").await;

    viewer.go_to_page(99);
    assert_eq!(viewer.current_page(), 3);

    viewer.go_to_page(0);
    assert_eq!(viewer.current_page(), 1);
}

#[tokio::test]
async fn navigation_before_load_is_ignored() {
    let viewer = viewer(FakeOpener::new());
    viewer.next_page();
    viewer.prev_page();
    assert_eq!(viewer.current_page(), 1);
    assert_eq!(viewer.display_state(), DisplayState::Idle);
}

#[tokio::test]
async fn retry_reloads_the_last_url_from_scratch() {
    let opener = FakeOpener::new().with_document("doc.pdf", 2);
    let log = opener.log();
    let viewer = viewer(opener);

    viewer.retry().await;
    assert!(log.borrow().opened.is_empty());

    viewer.load_document("doc.pdf").await;
    viewer.zoom_in().await;
    viewer.next_page();

    viewer.retry().await;

    assert_eq!(log.borrow().opened, vec!["doc.pdf", "doc.pdf"]);
    assert_eq!(viewer.scale(), 1.0);
    assert_eq!(viewer.current_page(), 1);
    assert_eq!(slot_widths(&viewer), vec![500, 500]);
}

#[tokio::test]
async fn render_single_page_redraws_in_place() {
    let viewer = viewer(FakeOpener::new().with_document("doc.pdf", 3));
    viewer.load_document("doc.pdf").await;
    let created = viewer.container().surfaces_created;

    viewer.render_single_page(2).await;

    assert_eq!(viewer.container().surfaces_created, created);
    let draws: Vec<u32> = viewer.with_slots(|slots| {
        slots
            .iter()
            .map(|s| s.surface().map(|surface| surface.draws).unwrap_or(0))
            .collect()
    });
    assert_eq!(draws, vec![1, 2, 1]);
    assert!(!viewer.is_rendering());
}

#[tokio::test]
async fn render_single_page_ignores_missing_pages() {
    let opener = FakeOpener::new()
        .with_document("doc.pdf", 3)
        .failing_render("doc.pdf", 2);
    let log = opener.log();
    let viewer = viewer(opener);
    viewer.load_document("doc.pdf").await;
    let renders = log.borrow().rasterized.len();

    viewer.render_single_page(0).await;
    viewer.render_single_page(4).await;
    viewer.render_single_page(2).await;

    assert_eq!(log.borrow().rasterized.len(), renders);
    assert_eq!(viewer.slot_pages(), vec![1, 3]);
}

#[tokio::test]
async fn restart_policy_reruns_the_pass_with_latest_scale() {
    let hold = RenderHold::closed();
    let opener = FakeOpener::new()
        .with_document("doc.pdf", 3)
        .with_hold(hold.clone());
    let log = opener.log();
    let viewer = viewer_with(opener, BusyPolicy::Restart, 1040.0);

    LocalSet::new()
        .run_until(async {
            let load = tokio::task::spawn_local({
                let viewer = Rc::clone(&viewer);
                async move { viewer.load_document("doc.pdf").await }
            });
            run_until(|| viewer.is_rendering()).await;

            let zoom = tokio::task::spawn_local({
                let viewer = Rc::clone(&viewer);
                async move { viewer.zoom_in().await }
            });
            run_until(|| viewer.scale() == 1.25).await;

            // The label follows the request immediately; pixels follow the pass.
            assert_eq!(viewer.chrome().zoom_label.as_deref(), Some("125%"));
            assert!(viewer.is_rendering());

            hold.release_all();
            load.await.unwrap();
            zoom.await.unwrap();
        })
        .await;

    assert_eq!(viewer.slot_pages(), vec![1, 2, 3]);
    assert_eq!(slot_widths(&viewer), vec![625, 625, 625]);
    assert_eq!(viewer.display_state(), DisplayState::Ready);
    assert!(!viewer.is_rendering());

    let log = log.borrow();
    let rasterized = &log.rasterized;
    assert_eq!(rasterized.len(), 4);
    assert_eq!(
        rasterized[0],
        (1, Viewport::new(DEFAULT_PAGE_WIDTH, DEFAULT_PAGE_HEIGHT))
    );
}

#[tokio::test]
async fn drop_policy_discards_requests_while_rendering() {
    let hold = RenderHold::closed();
    let opener = FakeOpener::new()
        .with_document("doc.pdf", 3)
        .with_hold(hold.clone());
    let log = opener.log();
    let viewer = viewer_with(opener, BusyPolicy::Drop, 1040.0);

    LocalSet::new()
        .run_until(async {
            let load = tokio::task::spawn_local({
                let viewer = Rc::clone(&viewer);
                async move { viewer.load_document("doc.pdf").await }
            });
            run_until(|| viewer.is_rendering()).await;

            // Returns without waiting: the request is dropped.
            viewer.zoom_in().await;
            viewer.render_all().await;
            assert!(viewer.is_rendering());

            hold.release_all();
            load.await.unwrap();
        })
        .await;

    assert_eq!(viewer.scale(), 1.25);
    assert_eq!(viewer.slot_pages(), vec![1, 2, 3]);
    assert_eq!(slot_widths(&viewer), vec![500, 500, 500]);
    assert_eq!(log.borrow().rasterized.len(), 3);
}

#[tokio::test]
async fn concurrent_render_requests_never_duplicate_slots() {
    let hold = RenderHold::closed();
    let opener = FakeOpener::new()
        .with_document("doc.pdf", 3)
        .with_hold(hold.clone());
    let viewer = viewer_with(opener, BusyPolicy::Restart, 1040.0);

    LocalSet::new()
        .run_until(async {
            let load = tokio::task::spawn_local({
                let viewer = Rc::clone(&viewer);
                async move { viewer.load_document("doc.pdf").await }
            });
            run_until(|| viewer.is_rendering()).await;

            let extra: Vec<_> = (0..3)
                .map(|_| {
                    let viewer = Rc::clone(&viewer);
                    tokio::task::spawn_local(async move { viewer.render_all().await })
                })
                .collect();

            for _ in 0..6 {
                hold.release(1);
                tokio::task::yield_now().await;
                assert!(viewer.slot_count() <= 3);
            }
            hold.release_all();
            load.await.unwrap();
            for task in extra {
                task.await.unwrap();
            }
        })
        .await;

    assert_eq!(viewer.slot_pages(), vec![1, 2, 3]);
}

#[tokio::test]
async fn single_page_refresh_is_skipped_during_a_pass() {
    let hold = RenderHold::closed();
    let opener = FakeOpener::new()
        .with_document("doc.pdf", 2)
        .with_hold(hold.clone());
    let log = opener.log();
    let viewer = viewer(opener);

    LocalSet::new()
        .run_until(async {
            let load = tokio::task::spawn_local({
                let viewer = Rc::clone(&viewer);
                async move { viewer.load_document("doc.pdf").await }
            });
            run_until(|| viewer.is_rendering()).await;

            viewer.render_single_page(1).await;

            hold.release_all();
            load.await.unwrap();
        })
        .await;

    assert_eq!(log.borrow().rasterized.len(), 2);
    assert_eq!(viewer.slot_pages(), vec![1, 2]);
}

async fn reload_during_render(policy: BusyPolicy) -> Rc<TestViewer> {
    let hold = RenderHold::closed();
    let opener = FakeOpener::new()
        .with_document("first.pdf", 3)
        .with_document("second.pdf", 2)
        .with_hold(hold.clone());
    let viewer = viewer_with(opener, policy, 1040.0);

    LocalSet::new()
        .run_until(async {
            let first = tokio::task::spawn_local({
                let viewer = Rc::clone(&viewer);
                async move { viewer.load_document("first.pdf").await }
            });
            run_until(|| viewer.is_rendering()).await;

            let second = tokio::task::spawn_local({
                let viewer = Rc::clone(&viewer);
                async move { viewer.load_document("second.pdf").await }
            });
            run_until(|| viewer.last_url().as_deref() == Some("second.pdf")).await;
            assert_eq!(viewer.slot_count(), 0);

            hold.release_all();
            first.await.unwrap();
            second.await.unwrap();
        })
        .await;

    viewer
}

#[tokio::test]
async fn reload_during_render_shows_only_the_new_document() {
    for policy in [BusyPolicy::Restart, BusyPolicy::Drop] {
        let viewer = reload_during_render(policy).await;

        assert_eq!(viewer.slot_pages(), vec![1, 2], "{policy:?}");
        assert_eq!(viewer.page_count(), 2, "{policy:?}");
        assert_eq!(viewer.display_state(), DisplayState::Ready, "{policy:?}");
        assert_eq!(viewer.last_url().as_deref(), Some("second.pdf"));
        assert!(!viewer.is_rendering());
    }
}
