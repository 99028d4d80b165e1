//! Reader adapter
//!
//! Binds the session to its collaborators. Every input (page clicks,
//! widget controls, shell messages, engine callbacks) lands on one
//! mpsc queue and is processed by a single task, which is all the
//! concurrency model this system needs: the page is single-threaded
//! and the engine only issues ordered callbacks. After each event the
//! adapter broadcasts a fresh widget snapshot for the host to render.

use crate::bridge::{ShellMessage, StatusReply};
use crate::config::ReaderConfig;
use crate::engine::{EngineEvent, SpeechEngine};
use crate::error::ReaderError;
use crate::page::PageAccess;
use crate::selection::ClickEvent;
use crate::session::ReaderSession;
use crate::widget::WidgetView;
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, warn};

const EVENT_BUFFER_SIZE: usize = 256;
const REFRESH_BUFFER_SIZE: usize = 64;

/// One unit of work for the session task
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// A page click, classified by target
    Click(ClickEvent),
    /// Widget play button
    Play,
    /// Widget pause button
    Pause,
    /// Widget stop button
    Stop,
    /// Speed slider moved
    SetSpeed(f32),
    /// Voice selector changed (`None` = default voice)
    SetVoice(Option<String>),
    /// Widget dismiss button
    Dismiss,
    /// Extension icon toggle
    ToggleWidget,
    /// Callback forwarded from the speech engine
    Engine(EngineEvent),
}

/// Owns the session and pumps [`SessionEvent`]s through it
pub struct ReaderAdapter<P: PageAccess + 'static> {
    engine: Arc<dyn SpeechEngine>,
    session: Arc<tokio::sync::Mutex<ReaderSession<P>>>,
    voice_retry_delay: Duration,
    event_tx: mpsc::Sender<SessionEvent>,
    event_rx: Mutex<Option<mpsc::Receiver<SessionEvent>>>,
    refresh_tx: broadcast::Sender<WidgetView>,
    is_running: Arc<RwLock<bool>>,
    processing_handle: Mutex<Option<tokio::task::JoinHandle<()>>>,
}

impl<P: PageAccess + 'static> ReaderAdapter<P> {
    /// Create a new reader adapter
    pub fn new(
        config: ReaderConfig,
        engine: Arc<dyn SpeechEngine>,
        page: P,
    ) -> Result<Self, ReaderError> {
        let voice_retry_delay = Duration::from_millis(config.voice_retry_delay_ms);
        let session = ReaderSession::new(config, Arc::clone(&engine), page)?;
        let (event_tx, event_rx) = mpsc::channel(EVENT_BUFFER_SIZE);
        let (refresh_tx, _) = broadcast::channel(REFRESH_BUFFER_SIZE);

        Ok(Self {
            engine,
            session: Arc::new(tokio::sync::Mutex::new(session)),
            voice_retry_delay,
            event_tx,
            event_rx: Mutex::new(Some(event_rx)),
            refresh_tx,
            is_running: Arc::new(RwLock::new(false)),
            processing_handle: Mutex::new(None),
        })
    }

    /// Start the processing task and poll the voice catalog
    pub async fn start(&self) -> Result<(), ReaderError> {
        {
            let mut is_running = self.is_running.write();
            if *is_running {
                return Err(ReaderError::Session(
                    "Reader adapter already running".to_string(),
                ));
            }
            *is_running = true;
        }

        let Some(mut event_rx) = self.event_rx.lock().take() else {
            *self.is_running.write() = false;
            return Err(ReaderError::Session(
                "Reader adapter cannot be restarted".to_string(),
            ));
        };

        info!("Starting reader adapter");

        // Eager voice poll; catalogs often populate asynchronously, so
        // an empty result schedules one delayed re-read.
        match self.engine.list_voices().await {
            Ok(voices) if voices.is_empty() => {
                debug!("Voice catalog empty, scheduling re-poll");
                let tx = self.event_tx.clone();
                let delay = self.voice_retry_delay;
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    let _ = tx.send(SessionEvent::Engine(EngineEvent::VoicesChanged)).await;
                });
            }
            Ok(voices) => self.session.lock().await.set_voices(voices),
            Err(e) => warn!("Failed to read voice catalog: {}", e),
        }

        let session = Arc::clone(&self.session);
        let engine = Arc::clone(&self.engine);
        let refresh_tx = self.refresh_tx.clone();
        let is_running = Arc::clone(&self.is_running);

        let handle = tokio::spawn(async move {
            while let Some(event) = event_rx.recv().await {
                if !*is_running.read() {
                    break;
                }

                match event {
                    SessionEvent::Engine(EngineEvent::VoicesChanged) => {
                        // Re-read the catalog outside the session lock
                        match engine.list_voices().await {
                            Ok(voices) if !voices.is_empty() => {
                                session.lock().await.set_voices(voices)
                            }
                            Ok(_) => debug!("Voice catalog still empty"),
                            Err(e) => warn!("Failed to re-read voice catalog: {}", e),
                        }
                    }
                    event => {
                        let mut session = session.lock().await;
                        match event {
                            SessionEvent::Click(click) => session.handle_click(click).await,
                            SessionEvent::Play => session.play().await,
                            SessionEvent::Pause => session.pause().await,
                            SessionEvent::Stop => session.stop().await,
                            SessionEvent::SetSpeed(speed) => session.set_speed(speed),
                            SessionEvent::SetVoice(voice) => session.set_voice(voice),
                            SessionEvent::Dismiss => session.hide_widget().await,
                            SessionEvent::ToggleWidget => session.toggle_widget().await,
                            SessionEvent::Engine(engine_event) => {
                                session.handle_engine_event(engine_event)
                            }
                        }
                    }
                }

                // Nobody listening is fine; hosts subscribe lazily
                let _ = refresh_tx.send(session.lock().await.widget_view());
            }
            debug!("Reader event queue closed");
        });

        *self.processing_handle.lock() = Some(handle);

        info!("Reader adapter started");
        Ok(())
    }

    /// Stop the processing task
    pub async fn stop(&self) -> Result<(), ReaderError> {
        {
            let mut is_running = self.is_running.write();
            if !*is_running {
                return Ok(());
            }
            *is_running = false;
        }

        let handle = self.processing_handle.lock().take();
        if let Some(handle) = handle {
            handle.abort();
            let _ = tokio::time::timeout(Duration::from_secs(1), handle).await;
        }

        info!("Reader adapter stopped");
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        *self.is_running.read()
    }

    /// Queue one event for the session task
    pub async fn push(&self, event: SessionEvent) -> Result<(), ReaderError> {
        self.event_tx
            .send(event)
            .await
            .map_err(|e| ReaderError::Session(format!("Event queue closed: {}", e)))
    }

    /// Sender handle for hosts that forward engine callbacks directly
    pub fn events(&self) -> mpsc::Sender<SessionEvent> {
        self.event_tx.clone()
    }

    /// Subscribe to widget refreshes
    pub fn subscribe(&self) -> broadcast::Receiver<WidgetView> {
        self.refresh_tx.subscribe()
    }

    /// Handle a shell message; only `getStatus` produces a reply, which
    /// is computed synchronously from current state rather than queued
    pub async fn handle_shell(&self, message: ShellMessage) -> Option<StatusReply> {
        match message {
            ShellMessage::Toggle => {
                if let Err(e) = self.push(SessionEvent::ToggleWidget).await {
                    warn!("Failed to queue widget toggle: {}", e);
                }
                None
            }
            ShellMessage::GetStatus => Some(self.status().await),
        }
    }

    /// Current status payload
    pub async fn status(&self) -> StatusReply {
        self.session.lock().await.status_reply()
    }

    /// Current widget snapshot
    pub async fn widget_view(&self) -> WidgetView {
        self.session.lock().await.widget_view()
    }

    /// Shared session handle, mainly for tests and embedders
    pub fn session(&self) -> Arc<tokio::sync::Mutex<ReaderSession<P>>> {
        Arc::clone(&self.session)
    }
}
