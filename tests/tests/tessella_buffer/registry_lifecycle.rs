use std::{sync::Arc, time::Duration};

use tessella::buffer::{
    testing::{MockMediaSource, MockSink, SinkCall},
    BufferError, BufferEvent, BufferRegistry, MediaType, ReadyState, SinkCapabilities,
    SinkCapability, SinkOptions,
};

fn custom_capability() -> SinkCapability {
    SinkCapability::new(|_context| {
        let (sink, _probe) = MockSink::new();
        Box::new(sink)
    })
}

fn registry() -> (BufferRegistry, Arc<MockMediaSource>) {
    super::init_tracing();
    let media_source = Arc::new(MockMediaSource::new());
    let capabilities = SinkCapabilities::new()
        .with_text(custom_capability())
        .with_overlay(custom_capability().requiring_render_target());
    let registry = BufferRegistry::new(media_source.clone(), capabilities);
    (registry, media_source)
}

#[tokio::test]
async fn create_is_exclusive_per_type_until_dispose() {
    let (registry, _) = registry();

    registry
        .create(MediaType::Audio, "audio/mp4", &SinkOptions::default())
        .unwrap();
    let err = registry
        .create(MediaType::Audio, "audio/mp4", &SinkOptions::default())
        .unwrap_err();
    assert!(matches!(err, BufferError::AlreadyExists(MediaType::Audio)));

    registry.dispose(MediaType::Audio);
    registry
        .create(MediaType::Audio, "audio/mp4", &SinkOptions::default())
        .unwrap();
}

#[tokio::test]
async fn unregistered_and_unknown_types_are_rejected() {
    let (registry, _) = registry();

    let err = registry
        .create(MediaType::Image, "image/jpeg", &SinkOptions::default())
        .unwrap_err();
    assert!(matches!(err, BufferError::FeatureNotActivated(MediaType::Image)));

    let err = "closed-captions".parse::<MediaType>().unwrap_err();
    assert!(matches!(err, BufferError::UnknownType(_)));
}

#[tokio::test]
async fn overlay_requires_a_render_target() {
    let (registry, _) = registry();

    let err = registry
        .create(MediaType::Overlay, "overlay/png", &SinkOptions::default())
        .unwrap_err();
    assert!(matches!(err, BufferError::InvalidOptions { .. }));

    registry
        .create(
            MediaType::Overlay,
            "overlay/png",
            &SinkOptions::default().with_render_target("player-osd"),
        )
        .unwrap();
}

#[tokio::test]
async fn native_sinks_attach_through_the_media_source() {
    let (registry, media_source) = registry();

    registry
        .create(MediaType::Audio, "audio/mp4; codecs=\"mp4a.40.2\"", &SinkOptions::default())
        .unwrap();
    registry
        .create(MediaType::Video, "video/mp4; codecs=\"avc1.64001f\"", &SinkOptions::default())
        .unwrap();

    assert_eq!(
        media_source.created_codecs(),
        vec![
            "audio/mp4; codecs=\"mp4a.40.2\"".to_string(),
            "video/mp4; codecs=\"avc1.64001f\"".to_string(),
        ]
    );
}

#[tokio::test]
async fn dispose_on_closed_media_source_skips_the_abort() {
    let (registry, media_source) = registry();

    registry
        .create(MediaType::Video, "video/mp4", &SinkOptions::default())
        .unwrap();
    let probe = media_source.last_probe().unwrap();

    media_source.set_ready_state(ReadyState::Ended);
    registry.dispose(MediaType::Video);
    tokio::time::sleep(Duration::from_millis(20)).await;

    assert!(!probe.calls().contains(&SinkCall::Abort));
    assert!(registry.get(MediaType::Video).is_none());
}

#[tokio::test]
async fn dispose_all_clears_every_slot_and_is_idempotent() {
    let (registry, _) = registry();

    registry
        .create(MediaType::Audio, "audio/mp4", &SinkOptions::default())
        .unwrap();
    registry
        .create(MediaType::Text, "text/vtt", &SinkOptions::default())
        .unwrap();

    registry.dispose_all();
    for ty in MediaType::ALL {
        assert!(!registry.has(ty));
    }
    registry.dispose_all();
}

#[tokio::test]
async fn available_types_reflect_registered_capabilities() {
    let (registry, _) = registry();
    assert_eq!(
        registry.available_types(),
        vec![
            MediaType::Audio,
            MediaType::Video,
            MediaType::Text,
            MediaType::Overlay,
        ]
    );
}

#[tokio::test]
async fn registry_publishes_lifecycle_events() {
    let (tx, mut rx) = tokio::sync::broadcast::channel(8);
    let media_source = Arc::new(MockMediaSource::new());
    let registry =
        BufferRegistry::new(media_source, SinkCapabilities::new()).with_events(tx);

    registry
        .create(MediaType::Audio, "audio/mp4", &SinkOptions::default())
        .unwrap();
    registry.dispose(MediaType::Audio);

    assert!(matches!(
        rx.recv().await.unwrap(),
        BufferEvent::SlotCreated { media_type: MediaType::Audio, .. }
    ));
    assert!(matches!(
        rx.recv().await.unwrap(),
        BufferEvent::SlotDisposed { media_type: MediaType::Audio }
    ));
}
