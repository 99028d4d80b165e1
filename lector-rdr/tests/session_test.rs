//! Tests for the playback state machine
//!
//! Walks every (state, event) pair of the transition table; unlisted
//! pairs must be no-ops that leave the state untouched.

use lector_core::{ElementId, Rect, Viewport};
use lector_rdr::page::LineMetrics;
use lector_rdr::{
    BoundaryUnit, ClickEvent, EngineErrorCode, EngineEvent, MemoryPage, NullEngine, PlaybackState,
    ReaderConfig, ReaderSession,
};
use std::sync::Arc;

const TEXT: &str = "Hello world, this is a test.";
const ELEMENT: ElementId = ElementId(1);

async fn idle_session() -> ReaderSession<MemoryPage> {
    let mut page = MemoryPage::new();
    page.insert(ELEMENT, TEXT);
    let mut session =
        ReaderSession::new(ReaderConfig::default(), Arc::new(NullEngine::new()), page).unwrap();
    session
        .handle_click(ClickEvent::on_page(ELEMENT, TEXT))
        .await;
    session
}

async fn playing_session() -> ReaderSession<MemoryPage> {
    let mut session = idle_session().await;
    session.play().await;
    session.handle_engine_event(EngineEvent::Started);
    assert_eq!(session.state(), PlaybackState::Playing);
    session
}

async fn paused_session() -> ReaderSession<MemoryPage> {
    let mut session = playing_session().await;
    session.pause().await;
    assert_eq!(session.state(), PlaybackState::Paused);
    session
}

#[tokio::test]
async fn test_play_without_selection_is_noop() {
    let page = MemoryPage::new();
    let mut session =
        ReaderSession::new(ReaderConfig::default(), Arc::new(NullEngine::new()), page).unwrap();

    session.play().await;
    assert_eq!(session.state(), PlaybackState::Idle);
    assert!(session.utterance().is_none());
}

#[tokio::test]
async fn test_play_builds_utterance_and_waits_for_start() {
    let mut session = idle_session().await;
    session.play().await;

    // Playing is entered on the engine's start signal, not on submit
    assert_eq!(session.state(), PlaybackState::Idle);
    let utterance = session.utterance().unwrap();
    assert_eq!(utterance.text, TEXT);
    assert_eq!(utterance.rate, 1.5);
    assert_eq!(utterance.pitch, 1.0);
    assert_eq!(utterance.volume, 1.0);
    assert_eq!(utterance.voice, None);

    session.handle_engine_event(EngineEvent::Started);
    assert_eq!(session.state(), PlaybackState::Playing);
}

#[tokio::test]
async fn test_pause_only_from_playing() {
    let mut session = idle_session().await;
    session.pause().await;
    assert_eq!(session.state(), PlaybackState::Idle);

    let mut session = playing_session().await;
    session.pause().await;
    assert_eq!(session.state(), PlaybackState::Paused);

    // Pause again: no-op
    session.pause().await;
    assert_eq!(session.state(), PlaybackState::Paused);
}

#[tokio::test]
async fn test_resume_from_paused_applies_pending_speed() {
    let mut session = paused_session().await;
    session.set_speed(2.0);

    session.play().await;
    assert_eq!(session.state(), PlaybackState::Playing);
    assert_eq!(session.utterance().unwrap().rate, 2.0);
}

#[tokio::test]
async fn test_stop_resets_offset_and_highlight() {
    let mut session = playing_session().await;
    session.handle_engine_event(EngineEvent::Boundary {
        unit: BoundaryUnit::Word,
        char_index: 6,
    });
    assert!(session.char_index() > 0);
    assert!(session.page().word_text(ELEMENT).is_some());

    session.stop().await;
    assert_eq!(session.state(), PlaybackState::Idle);
    assert_eq!(session.char_index(), 0);
    assert!(session.utterance().is_none());
    assert_eq!(session.page().rendered_text(ELEMENT).unwrap(), TEXT);
}

#[tokio::test]
async fn test_stop_from_paused() {
    let mut session = paused_session().await;
    session.stop().await;
    assert_eq!(session.state(), PlaybackState::Idle);
}

#[tokio::test]
async fn test_stop_when_idle_is_noop() {
    let mut session = idle_session().await;
    session.stop().await;
    assert_eq!(session.state(), PlaybackState::Idle);
}

#[tokio::test]
async fn test_end_clears_highlight_and_goes_idle() {
    let mut session = playing_session().await;
    session.handle_engine_event(EngineEvent::Boundary {
        unit: BoundaryUnit::Word,
        char_index: 0,
    });
    session.handle_engine_event(EngineEvent::Ended);

    assert_eq!(session.state(), PlaybackState::Idle);
    assert!(session.utterance().is_none());
    assert_eq!(session.page().rendered_text(ELEMENT).unwrap(), TEXT);
}

#[tokio::test]
async fn test_end_while_paused_is_noop() {
    let mut session = paused_session().await;
    session.handle_engine_event(EngineEvent::Ended);
    assert_eq!(session.state(), PlaybackState::Paused);
}

#[tokio::test]
async fn test_every_error_code_resets_to_idle() {
    for code in [
        EngineErrorCode::Interrupted,
        EngineErrorCode::NotAllowed,
        EngineErrorCode::AudioBusy,
        EngineErrorCode::Other("synthesis-failed".to_string()),
    ] {
        let mut session = playing_session().await;
        session.handle_engine_event(EngineEvent::Errored(code.clone()));
        assert_eq!(session.state(), PlaybackState::Idle);

        let mut session = paused_session().await;
        session.handle_engine_event(EngineEvent::Errored(code));
        assert_eq!(session.state(), PlaybackState::Idle);
    }
}

#[tokio::test]
async fn test_late_interrupted_after_stop_is_noop() {
    let mut session = playing_session().await;
    session.stop().await;

    // The cancelled utterance's error callback arrives afterwards
    session.handle_engine_event(EngineEvent::Errored(EngineErrorCode::Interrupted));
    assert_eq!(session.state(), PlaybackState::Idle);
    assert_eq!(session.char_index(), 0);
}

#[tokio::test]
async fn test_boundary_drives_highlight() {
    let mut session = playing_session().await;
    session.handle_engine_event(EngineEvent::Boundary {
        unit: BoundaryUnit::Word,
        char_index: 6,
    });

    assert_eq!(session.char_index(), 6);
    assert_eq!(session.page().word_text(ELEMENT).unwrap(), "world,");
}

#[tokio::test]
async fn test_sentence_boundary_ignored() {
    let mut session = playing_session().await;
    session.handle_engine_event(EngineEvent::Boundary {
        unit: BoundaryUnit::Sentence,
        char_index: 6,
    });
    assert_eq!(session.char_index(), 0);
    assert!(session.page().word_text(ELEMENT).is_none());
}

#[tokio::test]
async fn test_stray_boundary_after_stop_ignored() {
    let mut session = playing_session().await;
    session.stop().await;

    session.handle_engine_event(EngineEvent::Boundary {
        unit: BoundaryUnit::Word,
        char_index: 13,
    });
    assert_eq!(session.char_index(), 0);
    assert!(session.page().word_text(ELEMENT).is_none());
}

#[tokio::test]
async fn test_boundary_scrolls_offscreen_line_into_view() {
    let mut page = MemoryPage::new().with_viewport(Viewport::new(800.0, 600.0));
    page.insert(ELEMENT, TEXT);
    page.set_metrics(
        ELEMENT,
        LineMetrics {
            // Fully below the 800x600 viewport fold
            rect: Rect::new(650.0, 0.0, 670.0, 300.0),
            offset_top: 1650.0,
        },
    );
    let mut session =
        ReaderSession::new(ReaderConfig::default(), Arc::new(NullEngine::new()), page).unwrap();
    session
        .handle_click(ClickEvent::on_page(ELEMENT, TEXT))
        .await;
    session.play().await;
    session.handle_engine_event(EngineEvent::Started);

    session.handle_engine_event(EngineEvent::Boundary {
        unit: BoundaryUnit::Word,
        char_index: 6,
    });

    // 1650 - 600/2 + 20/2, centering the line
    let scroll = session.page().last_scroll().unwrap();
    assert_eq!(scroll.top, 1360.0);
    assert!(scroll.smooth);
}

#[tokio::test]
async fn test_boundary_with_visible_line_does_not_scroll() {
    let mut page = MemoryPage::new().with_viewport(Viewport::new(800.0, 600.0));
    page.insert(ELEMENT, TEXT);
    page.set_metrics(
        ELEMENT,
        LineMetrics {
            rect: Rect::new(100.0, 0.0, 120.0, 300.0),
            offset_top: 100.0,
        },
    );
    let mut session =
        ReaderSession::new(ReaderConfig::default(), Arc::new(NullEngine::new()), page).unwrap();
    session
        .handle_click(ClickEvent::on_page(ELEMENT, TEXT))
        .await;
    session.play().await;
    session.handle_engine_event(EngineEvent::Started);

    session.handle_engine_event(EngineEvent::Boundary {
        unit: BoundaryUnit::Word,
        char_index: 6,
    });

    assert!(session.page().word_text(ELEMENT).is_some());
    assert_eq!(session.page().last_scroll(), None);
}

#[tokio::test]
async fn test_failed_selection_mark_drops_selection() {
    let mut session = idle_session().await;
    assert!(session.selection().is_some());

    // A click whose element vanished between capture and handling
    session
        .handle_click(ClickEvent::on_page(ElementId(99), "ghost text"))
        .await;

    assert!(session.selection().is_none());
    assert_eq!(session.page().selected(), None);
    assert_eq!(session.page().affordance(), None);
}

#[tokio::test]
async fn test_boundary_while_paused_ignored() {
    let mut session = paused_session().await;
    session.handle_engine_event(EngineEvent::Boundary {
        unit: BoundaryUnit::Word,
        char_index: 13,
    });
    assert!(session.page().word_text(ELEMENT).is_none());
}

#[tokio::test]
async fn test_speed_clamped_to_slider_range() {
    let mut session = idle_session().await;
    session.set_speed(9.0);
    assert_eq!(session.speed(), 2.5);
    session.set_speed(0.05);
    assert_eq!(session.speed(), 0.5);
}

#[tokio::test]
async fn test_speed_change_mutates_unsubmitted_utterance_only() {
    // Built but not yet started: the rate is still mutable
    let mut session = idle_session().await;
    session.play().await;
    session.set_speed(2.0);
    assert_eq!(session.utterance().unwrap().rate, 2.0);

    // Once playing, the live utterance keeps its submitted rate
    session.handle_engine_event(EngineEvent::Started);
    session.set_speed(0.8);
    assert_eq!(session.speed(), 0.8);
    assert_eq!(session.utterance().unwrap().rate, 2.0);
}

#[tokio::test]
async fn test_speed_persists_across_utterances() {
    let mut session = playing_session().await;
    session.set_speed(2.2);
    session.stop().await;

    session.play().await;
    assert_eq!(session.utterance().unwrap().rate, 2.2);
}

#[tokio::test]
async fn test_voice_change_rejected_during_playback() {
    let mut session = playing_session().await;
    session.set_voices(vec![lector_rdr::Voice::new("Alice", "en-US")]);
    session.set_voice(Some("Alice".to_string()));
    assert!(session.utterance().unwrap().voice.is_none());

    session.pause().await;
    session.set_voice(Some("Alice".to_string()));
    assert!(session.utterance().unwrap().voice.is_none());
}

#[tokio::test]
async fn test_voice_applied_on_next_utterance() {
    let mut session = idle_session().await;
    session.set_voices(vec![
        lector_rdr::Voice::new("Alice", "en-US"),
        lector_rdr::Voice::new("Bob", "fr-FR"),
    ]);
    session.set_voice(Some("Bob".to_string()));

    session.play().await;
    assert_eq!(session.utterance().unwrap().voice.as_deref(), Some("Bob"));
}

#[tokio::test]
async fn test_unknown_voice_falls_back_to_default() {
    let mut session = idle_session().await;
    session.set_voices(vec![lector_rdr::Voice::new("Alice", "en-US")]);
    session.set_voice(Some("Nobody".to_string()));

    session.play().await;
    assert!(session.utterance().unwrap().voice.is_none());
}
