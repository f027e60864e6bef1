use rstest::rstest;
use tessella::index::{SegmentIndex, TemplateIndex};
use tessella_tests::{representation_context, template_args};

fn template_index() -> SegmentIndex {
    TemplateIndex::new(template_args(), &representation_context())
        .unwrap()
        .into()
}

#[test]
fn window_expands_numbers_and_times() {
    let index = template_index();

    // duration=4, start_number=1, period_start=0.
    let segments = index.segments(0.0, 9.0);
    let numbers: Vec<u64> = segments.iter().filter_map(|s| s.number).collect();
    let times: Vec<u64> = segments.iter().map(|s| s.time).collect();
    assert_eq!(numbers, vec![1, 2, 3]);
    assert_eq!(times, vec![0, 4, 8]);
}

#[test]
fn tokens_substitute_into_the_resolved_url() {
    let index = template_index();

    let segments = index.segments(4.0, 5.0);
    assert_eq!(
        segments[0].url.as_str(),
        "https://cdn.example.com/video/480p/video-480p-2-4.m4s"
    );
}

#[rstest]
#[case::collapsed(5.0, 5.0)]
#[case::inverted(9.0, 3.0)]
fn degenerate_windows_are_empty(#[case] from: f64, #[case] to: f64) {
    assert!(template_index().segments(from, to).is_empty());
}

#[rstest]
#[case(0.0, 9.0)]
#[case(3.0, 25.0)]
#[case(100.0, 141.0)]
fn numbers_increase_strictly(#[case] from: f64, #[case] to: f64) {
    let segments = template_index().segments(from, to);
    assert!(!segments.is_empty());
    let numbers: Vec<u64> = segments.iter().filter_map(|s| s.number).collect();
    assert!(numbers.windows(2).all(|w| w[0] < w[1]));
    for segment in &segments {
        assert_eq!(segment.time, (segment.number.unwrap() - 1) * 4);
    }
}

#[test]
fn window_length_matches_the_grid() {
    // to > from: one reference per started duration step.
    let segments = template_index().segments(0.0, 9.0);
    assert_eq!(segments.len(), (9.0f64 / 4.0).ceil() as usize);
}

#[test]
fn never_requests_a_refresh() {
    let index = template_index();
    assert!(!index.should_refresh(0.0));
    assert!(!index.should_refresh(1e9));
}

#[test]
fn bounds_are_inherently_unknown() {
    let index = template_index();
    assert_eq!(index.first_position(), None);
    assert_eq!(index.last_position(), None);
    assert_eq!(index.check_discontinuity(8.0), None);
}

#[test]
fn period_start_converts_to_period_relative_numbers() {
    let mut context = representation_context();
    context.period_start = 20.0;
    let index = TemplateIndex::new(template_args(), &context).unwrap();

    let segments = index.segments(20.0, 29.0);
    let numbers: Vec<u64> = segments.iter().filter_map(|s| s.number).collect();
    let times: Vec<u64> = segments.iter().map(|s| s.time).collect();
    assert_eq!(numbers, vec![1, 2, 3]);
    assert_eq!(times, vec![20, 24, 28]);
}

#[test]
fn start_number_offsets_numbering_only() {
    let mut args = template_args();
    args.start_number = Some(100);
    let index = TemplateIndex::new(args, &representation_context()).unwrap();

    let segments = index.segments(0.0, 9.0);
    let numbers: Vec<u64> = segments.iter().filter_map(|s| s.number).collect();
    assert_eq!(numbers, vec![100, 101, 102]);
    assert_eq!(segments[0].time, 0);
}
