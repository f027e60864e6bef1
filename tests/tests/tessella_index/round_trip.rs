//! Rebuilding an index from its own resolved state must resolve
//! identically.

use tessella::index::{ListIndex, TemplateIndex};
use tessella_tests::{list_args, representation_context, template_args};

#[test]
fn list_state_round_trips() {
    let original = ListIndex::new(list_args(4), &representation_context()).unwrap();
    let rebuilt = ListIndex::from_state(original.state().clone()).unwrap();

    assert_eq!(original.segments(0.0, 100.0), rebuilt.segments(0.0, 100.0));
    assert_eq!(original.segments(5.0, 10.0), rebuilt.segments(5.0, 10.0));
    assert_eq!(original.init_segment(), rebuilt.init_segment());
    assert_eq!(original.last_position(), rebuilt.last_position());
}

#[test]
fn template_state_round_trips() {
    let original = TemplateIndex::new(template_args(), &representation_context()).unwrap();
    let rebuilt = TemplateIndex::from_state(original.state().clone()).unwrap();

    assert_eq!(original.segments(0.0, 9.0), rebuilt.segments(0.0, 9.0));
    assert_eq!(original.segments(3.0, 25.0), rebuilt.segments(3.0, 25.0));
    assert_eq!(original.init_segment(), rebuilt.init_segment());
}

#[test]
fn resolution_is_deterministic() {
    let index = TemplateIndex::new(template_args(), &representation_context()).unwrap();
    assert_eq!(index.segments(0.0, 40.0), index.segments(0.0, 40.0));
}
