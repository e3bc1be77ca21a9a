use pageview::test_utils::{FakeChrome, FakeContainer, FakeOpener};
use pageview::viewer::{PageViewerController, SlotSpacing, ViewerConfig};

type TestViewer = PageViewerController<FakeOpener, FakeContainer, FakeChrome>;

/// Slots of height 200 stacked without labels or gaps: midpoints at
/// 100, 300 and 500.
async fn flush_slots(opener: FakeOpener) -> TestViewer {
    let config = ViewerConfig {
        spacing: SlotSpacing {
            label_height: 0.0,
            gap: 0.0,
        },
        ..ViewerConfig::default()
    };
    let viewer = PageViewerController::new(
        opener,
        FakeContainer::new(1040.0, 200.0),
        FakeChrome::default(),
        config,
    );
    viewer.load_document("doc.pdf").await;
    viewer
}

fn three_pages() -> FakeOpener {
    FakeOpener::new().with_pages("doc.pdf", vec![(300.0, 200.0); 3])
}

fn scroll(viewer: &TestViewer, offset: f32) {
    viewer.container_mut().user_scroll(offset);
    viewer.handle_scroll();
}

#[tokio::test]
async fn slot_nearest_the_center_becomes_current() {
    let viewer = flush_slots(three_pages()).await;
    let midpoints: Vec<f32> = viewer.slot_boxes().iter().map(|b| b.midpoint()).collect();
    assert_eq!(midpoints, vec![100.0, 300.0, 500.0]);

    // center = 180 + 200 / 2 = 280
    scroll(&viewer, 180.0);
    assert_eq!(viewer.current_page(), 2);
    assert_eq!(viewer.chrome().page_info, Some((2, 3)));
    assert_eq!(viewer.chrome().nav_enabled, Some((true, true)));

    scroll(&viewer, 400.0);
    assert_eq!(viewer.current_page(), 3);

    scroll(&viewer, 0.0);
    assert_eq!(viewer.current_page(), 1);
}

#[tokio::test]
async fn equidistant_slots_resolve_to_the_first() {
    let viewer = flush_slots(three_pages()).await;
    scroll(&viewer, 400.0);

    // center = 100 + 100 = 200, halfway between pages 1 and 2
    scroll(&viewer, 100.0);
    assert_eq!(viewer.current_page(), 1);
}

#[tokio::test]
async fn scroll_sync_skips_over_failed_pages() {
    let viewer = flush_slots(three_pages().failing_render("doc.pdf", 2)).await;
    assert_eq!(viewer.slot_pages(), vec![1, 3]);

    // second slot (page 3) has its midpoint at 300
    scroll(&viewer, 200.0);
    assert_eq!(viewer.current_page(), 3);
}

#[tokio::test]
async fn scroll_without_slots_keeps_current_page() {
    let viewer = flush_slots(FakeOpener::new().failing_open("doc.pdf", "")).await;
    scroll(&viewer, 500.0);
    assert_eq!(viewer.current_page(), 1);
}

#[tokio::test]
async fn programmatic_scroll_matches_scroll_sync() {
    let viewer = flush_slots(three_pages()).await;

    viewer.next_page();
    viewer.handle_scroll();

    // slot 2 top at 200: center 300 is its own midpoint
    assert_eq!(viewer.container().scroll_top, 200.0);
    assert_eq!(viewer.current_page(), 2);
}

#[tokio::test]
async fn zoom_realigns_the_scroll_position_with_the_current_page() {
    let viewer = flush_slots(three_pages()).await;
    scroll(&viewer, 400.0);
    assert_eq!(viewer.current_page(), 3);

    viewer.zoom_in().await;

    // slots are now 250 high: page 3 starts at 500, center 600
    assert_eq!(viewer.container().scroll_top, 500.0);
    assert_eq!(viewer.current_page(), 3);
}

#[tokio::test]
async fn reload_returns_to_the_first_page() {
    let viewer = flush_slots(three_pages()).await;
    scroll(&viewer, 400.0);

    viewer.retry().await;

    assert_eq!(viewer.container().scroll_top, 0.0);
    assert_eq!(viewer.current_page(), 1);
    assert_eq!(viewer.chrome().page_info, Some((1, 3)));
}
