//! Open a PDF, place a few annotations and print the resulting overlay
//!
//! Usage: cargo run -p viewer --example annotate -- <file.pdf>

use doc_core::LopdfRenderer;
use overlay::{ElementKind, Point};
use viewer::{Viewer, ViewerError};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let path = std::env::args()
        .nth(1)
        .ok_or("usage: annotate <file.pdf>")?;
    let bytes = std::fs::read(&path)?;

    let mut viewer = Viewer::new(LopdfRenderer::new());
    viewer.open(&bytes);

    if let Some(error) = &viewer.state().error {
        eprintln!("{}: {}", path, error);
        std::process::exit(1);
    }

    println!(
        "{}: {} pages",
        path,
        viewer.state().page_count.unwrap_or_default()
    );

    viewer.toggle_edit_mode();
    let note = viewer.add_element(ElementKind::Text)?;
    viewer.update_element_content(&note.id, "Reviewed");
    viewer.add_element(ElementKind::SignatureRequest)?;

    let pad = viewer.open_signature_pad()?;
    pad.begin_stroke(Point::new(20.0, 120.0));
    pad.extend_stroke(Point::new(80.0, 60.0));
    pad.extend_stroke(Point::new(140.0, 130.0));
    pad.end_stroke();
    viewer.save_signature()?;

    viewer.begin_drag(note.id.clone())?;
    viewer.end_drag(Point::new(40.0, 0.0));

    if let Some(surface) = viewer.render_current_page() {
        let surface = surface?;
        println!(
            "page {} at {:.0}x{:.0}",
            surface.page_number, surface.width, surface.height
        );
    }

    let overlay = viewer.overlay().ok_or(ViewerError::NotEditing)?;
    println!("{}", serde_json::to_string_pretty(&overlay)?);

    Ok(())
}
