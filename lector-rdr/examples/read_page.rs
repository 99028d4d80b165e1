//! Basic page reading example
//!
//! Drives a reader session over an in-memory page with the silent
//! engine, simulating the callbacks a real speech engine would emit.

use lector_core::ElementId;
use lector_rdr::{
    BoundaryUnit, ClickEvent, EngineEvent, MemoryPage, NullEngine, ReaderConfig, ReaderSession,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let paragraph = ElementId(1);
    let text = "Hello world, this is a test.";

    let mut page = MemoryPage::new();
    page.insert(paragraph, text);

    let mut session = ReaderSession::new(ReaderConfig::default(), Arc::new(NullEngine::new()), page)?;

    // Click the paragraph, then press play
    session.show_widget();
    session.handle_click(ClickEvent::on_page(paragraph, text)).await;
    session.play().await;

    // What the platform engine would send back
    session.handle_engine_event(EngineEvent::Started);
    session.handle_engine_event(EngineEvent::Boundary {
        unit: BoundaryUnit::Word,
        char_index: 0,
    });

    println!(
        "word highlight: {:?}",
        session.page().word_text(paragraph)
    );
    println!("status: {}", session.status_reply().status);

    session.stop().await;
    println!(
        "after stop, content restored: {:?}",
        session.page().rendered_text(paragraph)
    );

    Ok(())
}
