//! End-to-end tests driving the headless viewer the way the browser does.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp
)]

mod fixtures;

use bubbleview::{BubbleView, BubbleviewError, LoadError, ViewerConfig};
use fixtures::{bubble_row, bubble_workbook, XlsxBuilder, HEADER};

fn viewer() -> BubbleView {
    BubbleView::new_headless(ViewerConfig::default()).unwrap()
}

#[test]
fn test_fresh_viewer_is_empty() {
    let view = viewer();
    assert!(!view.is_loaded());
    assert_eq!(view.visible_count(), 0);
    assert!(view.plan().is_none());
    assert!(!view.svg().contains("<circle"));
}

#[test]
fn test_increase_clamps_to_dataset_length() {
    let mut view = viewer();
    view.load(&bubble_workbook(22)).unwrap();
    assert!(view.is_loaded());
    assert_eq!(view.visible_count(), 15);
    assert!(view.svg().contains(">15 of 22 shown</text>"));

    view.increase().unwrap();
    assert_eq!(view.visible_count(), 20);
    view.increase().unwrap();
    assert_eq!(view.visible_count(), 22);
    view.increase().unwrap();
    assert_eq!(view.visible_count(), 22);
    assert_eq!(view.svg().matches("<circle").count(), 22);
}

#[test]
fn test_twenty_records_increase_to_twenty() {
    let mut view = viewer();
    view.load(&bubble_workbook(20)).unwrap();
    view.increase().unwrap();
    assert_eq!(view.visible_count(), 20);
}

#[test]
fn test_set_step_then_decrease() {
    let mut view = viewer();
    view.load(&bubble_workbook(20)).unwrap();
    view.set_step(10).unwrap();
    assert_eq!(view.visible_count(), 15);
    view.decrease().unwrap();
    assert_eq!(view.visible_count(), 10);
    view.decrease().unwrap();
    assert_eq!(view.visible_count(), 10);
}

#[test]
fn test_invalid_step_is_rejected() {
    let mut view = viewer();
    assert!(matches!(
        view.set_step(3),
        Err(BubbleviewError::InvalidStep(3))
    ));
}

#[test]
fn test_arrow_keys() {
    let mut view = viewer();
    view.key("ArrowUp").unwrap();
    assert_eq!(view.visible_count(), 0);

    view.load(&bubble_workbook(40)).unwrap();
    view.key("ArrowRight").unwrap();
    view.key("ArrowUp").unwrap();
    assert_eq!(view.visible_count(), 25);
    view.key("ArrowDown").unwrap();
    view.key("ArrowLeft").unwrap();
    view.key("PageDown").unwrap();
    assert_eq!(view.visible_count(), 15);
}

#[test]
fn test_startup_404_then_manual_upload() {
    let mut view = viewer();
    view.fail_startup_fetch(Some(404), "Not Found").unwrap();
    assert!(!view.is_loaded());
    assert_eq!(
        view.error(),
        Some("default data file not found (status: 404). Please load a file manually.")
    );

    view.load(&bubble_workbook(5)).unwrap();
    assert!(view.is_loaded());
    assert_eq!(view.error(), None);
    assert_eq!(view.visible_count(), 5);
}

#[test]
fn test_failed_load_after_success_clears_chart() {
    let mut view = viewer();
    view.load(&bubble_workbook(10)).unwrap();
    assert!(view.svg().contains("<circle"));

    let bad = XlsxBuilder::new().add_row(["X", "Y"]).add_row([1.0, 2.0]).build();
    let err = view.load(&bad).unwrap_err();
    assert!(matches!(
        err,
        BubbleviewError::Load(LoadError::SchemaMissing { .. })
    ));
    assert!(!view.is_loaded());
    assert_eq!(view.total_count(), 0);
    assert!(!view.svg().contains("<circle"));
    assert!(view.error().unwrap().starts_with("Error reading file: "));

    view.increase().unwrap();
    assert_eq!(view.visible_count(), 0);
}

#[test]
fn test_hover_shows_wrapped_note() {
    let note = "a b c d e f g h i j k l m n o p q r s t u v w x y z";
    let xlsx = XlsxBuilder::new()
        .add_row(HEADER)
        .add_row(bubble_row(0, None))
        .add_row(bubble_row(1, Some(note)))
        .build();
    let mut view = viewer();
    view.load(&xlsx).unwrap();

    let bubble = view.plan().unwrap().bubbles[1].clone();
    view.pointer_move(bubble.cx, bubble.cy).unwrap();
    assert_eq!(view.state().hovered(), Some(1));

    let svg = view.svg();
    assert!(svg.contains(">a b c d e f g h i j k l m n o p q r s t</text>"));
    assert!(svg.contains(">u v w x y z</text>"));
    assert_eq!(svg.matches("class=\"tooltip\"").count(), 3);

    view.pointer_leave().unwrap();
    assert_eq!(view.state().hovered(), None);
    assert!(!view.svg().contains("class=\"tooltip\""));
}

#[test]
fn test_pointer_outside_bubbles_clears_hover() {
    let mut view = viewer();
    view.load(&bubble_workbook(3)).unwrap();
    let bubble = view.plan().unwrap().bubbles[0].clone();
    view.pointer_move(bubble.cx, bubble.cy).unwrap();
    assert!(view.state().hovered().is_some());
    view.pointer_move(700.0, 440.0).unwrap();
    assert_eq!(view.state().hovered(), None);
}

#[test]
fn test_custom_initial_window() {
    let config = ViewerConfig {
        initial_visible: 3,
        initial_step: 1,
        ..ViewerConfig::default()
    };
    let mut view = BubbleView::new_headless(config).unwrap();
    view.load(&bubble_workbook(10)).unwrap();
    assert_eq!(view.visible_count(), 3);
    view.increase().unwrap();
    assert_eq!(view.visible_count(), 4);
}
