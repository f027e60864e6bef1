use rstest::rstest;
use tessella::index::{ListIndex, SegmentIndex, SegmentReference};
use tessella_tests::{list_args, representation_context};

fn three_entry_index() -> SegmentIndex {
    ListIndex::new(list_args(3), &representation_context())
        .unwrap()
        .into()
}

#[test]
fn window_resolves_intersecting_entries() {
    let index = three_entry_index();

    // duration=4, 3 entries: [5, 10] touches the intervals [4, 8) and [8, 12).
    let segments = index.segments(5.0, 10.0);
    assert_eq!(segments.len(), 2);
    assert_eq!(segments[0].time, 4);
    assert_eq!(segments[1].time, 8);
    assert_eq!(segments[0].id, "1");
    assert_eq!(segments[1].id, "2");
    assert_eq!(
        segments[0].url.as_str(),
        "https://cdn.example.com/video/480p/seg_1.mp4"
    );
}

#[rstest]
#[case::full_window(0.0, 100.0, 3)]
#[case::first_entry_only(0.0, 3.9, 1)]
#[case::inverted(10.0, 5.0, 0)]
#[case::past_the_end(50.0, 60.0, 0)]
#[case::point_query(5.0, 5.0, 1)]
fn window_entry_counts(#[case] from: f64, #[case] to: f64, #[case] expected: usize) {
    let index = three_entry_index();
    assert_eq!(index.segments(from, to).len(), expected);
}

#[test]
fn entry_ids_are_unique_and_positional() {
    let index = three_entry_index();
    let ids: Vec<String> = index
        .segments(0.0, 100.0)
        .into_iter()
        .map(|s| s.id)
        .collect();
    assert_eq!(ids, vec!["0", "1", "2"]);
}

#[rstest]
#[case(0.0, false)]
#[case(11.9, false)]
#[case(12.0, true)]
#[case(1e6, true)]
fn refresh_needed_only_outside_the_enumeration(#[case] to: f64, #[case] expected: bool) {
    let index = three_entry_index();
    assert_eq!(index.should_refresh(to), expected);
}

#[test]
fn positions_and_discontinuities() {
    let index = three_entry_index();
    assert_eq!(index.first_position(), Some(0.0));
    assert_eq!(index.last_position(), Some(12.0));
    assert_eq!(index.check_discontinuity(6.0), None);
}

#[test]
fn init_segment_has_the_fixed_id() {
    let index = three_entry_index();
    let init = index.init_segment().unwrap();
    assert_eq!(init.id, SegmentReference::INIT_ID);
    assert!(init.is_init);
    assert_eq!(
        init.url.as_str(),
        "https://cdn.example.com/video/480p/init.mp4"
    );
}

#[test]
fn presentation_time_offset_shifts_the_window() {
    let mut args = list_args(3);
    args.presentation_time_offset = 4;
    let index = ListIndex::new(args, &representation_context()).unwrap();

    // [8, 12] maps onto scaled [4, 8]: entries 1 and 2.
    let segments = index.segments(8.0, 12.0);
    assert_eq!(segments.len(), 2);
    assert_eq!(segments[0].time, 4);
}

#[test]
fn high_timescale_windows_resolve_the_same_entries() {
    let mut args = list_args(3);
    args.timescale = 90_000;
    args.duration = 360_000;
    let index = ListIndex::new(args, &representation_context()).unwrap();

    let segments = index.segments(5.0, 10.0);
    assert_eq!(segments.len(), 2);
    assert_eq!(segments[0].time, 360_000);
    assert_eq!(segments[1].time, 720_000);
}

#[test]
fn update_is_wholesale_and_addressed_from_fresh_state() {
    let mut index = three_entry_index();
    let refreshed: SegmentIndex = ListIndex::new(list_args(5), &representation_context())
        .unwrap()
        .into();

    index.update(refreshed);
    assert_eq!(index.segments(0.0, 100.0).len(), 5);
    assert!(!index.should_refresh(19.9));
}
