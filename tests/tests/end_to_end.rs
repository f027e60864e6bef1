//! Manifest refresh through index resolution into the buffer queue: the
//! full data path the core exists for.

use std::{sync::Arc, time::Duration};

use bytes::Bytes;
use tessella::buffer::{
    testing::MockMediaSource, BufferRegistry, MediaType, SegmentPayload, SinkCapabilities,
    SinkOptions,
};
use tessella::index::{ListIndex, SegmentIndex};
use tessella_tests::{list_args, representation_context};

#[tokio::test]
async fn resolved_window_feeds_the_audio_buffer_in_order() {
    let media_source = Arc::new(MockMediaSource::new());
    let registry = BufferRegistry::new(media_source.clone(), SinkCapabilities::new());

    let index: SegmentIndex = ListIndex::new(list_args(3), &representation_context())
        .unwrap()
        .into();
    let queue = registry
        .create(MediaType::Audio, "audio/mp4", &SinkOptions::default())
        .unwrap();
    let probe = media_source.last_probe().unwrap();

    // One append per resolved reference, bounded by its nominal interval.
    let references = index.segments(0.0, 100.0);
    assert_eq!(references.len(), 3);

    let handles: Vec<_> = references
        .iter()
        .map(|reference| {
            let start = reference.time as f64 / reference.timescale as f64;
            let end = (reference.time + reference.duration) as f64 / reference.timescale as f64;
            let bytes = Bytes::from(reference.url.as_str().as_bytes().to_vec());
            queue.enqueue_append(SegmentPayload::new(bytes).with_time_range(start, end))
        })
        .collect();
    for handle in handles {
        handle.await.unwrap();
    }

    let appended = probe.appended();
    assert_eq!(appended.len(), 3);
    // Submission order survives all the way into the sink.
    for (reference, data) in references.iter().zip(&appended) {
        assert_eq!(&data[..], reference.url.as_str().as_bytes());
    }
    assert!(!probe.overlap_detected());
}

#[tokio::test]
async fn manifest_refresh_extends_the_reachable_window() {
    let media_source = Arc::new(MockMediaSource::new());
    let registry = BufferRegistry::new(media_source.clone(), SinkCapabilities::new());
    let queue = registry
        .create(MediaType::Audio, "audio/mp4", &SinkOptions::default())
        .unwrap();
    let probe = media_source.last_probe().unwrap();

    let mut index: SegmentIndex = ListIndex::new(list_args(2), &representation_context())
        .unwrap()
        .into();

    // The static enumeration cannot serve t=10; the manifest collaborator
    // refreshes and swaps the state wholesale.
    assert!(index.should_refresh(10.0));
    let refreshed = ListIndex::new(list_args(4), &representation_context()).unwrap();
    index.update(refreshed.into());
    assert!(!index.should_refresh(10.0));

    for reference in index.segments(8.0, 15.0) {
        queue
            .enqueue_append(SegmentPayload::new(Bytes::from(reference.id.clone())))
            .await
            .unwrap();
    }
    assert_eq!(probe.appended().len(), 2);

    registry.dispose_all();
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(!registry.has(MediaType::Audio));
}
