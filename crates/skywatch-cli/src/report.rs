//! Human-readable rendering of classified operations.

use std::fmt::Write;

use skywatch_core::models::FEET_PER_METER;
use skywatch_core::{Confidence, EventKind, TrackEvent};

const RULE: &str = "================================================================================";
const LIGHT_RULE: &str =
    "--------------------------------------------------------------------------------";

/// Render the analysis report: landings, takeoffs, then a summary with
/// high-confidence counts.
pub fn render_report(events: &[TrackEvent]) -> String {
    let mut landings: Vec<&TrackEvent> = events
        .iter()
        .filter(|e| e.kind == EventKind::Landing)
        .collect();
    let mut takeoffs: Vec<&TrackEvent> = events
        .iter()
        .filter(|e| e.kind == EventKind::Takeoff)
        .collect();
    landings.sort_by_key(|e| e.date);
    takeoffs.sort_by_key(|e| e.date);

    let mut out = String::new();
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "TRACK TERMINATION ANALYSIS");
    let _ = writeln!(out, "{RULE}");

    let _ = writeln!(out, "\nPOTENTIAL LANDINGS DETECTED: {}", landings.len());
    let _ = writeln!(out, "{LIGHT_RULE}");
    for event in &landings {
        render_event(&mut out, event);
    }

    let _ = writeln!(out, "\nPOTENTIAL TAKEOFFS DETECTED: {}", takeoffs.len());
    let _ = writeln!(out, "{LIGHT_RULE}");
    for event in &takeoffs {
        render_event(&mut out, event);
    }

    let high = |events: &[&TrackEvent]| {
        events
            .iter()
            .filter(|e| e.confidence == Confidence::High)
            .count()
    };
    let _ = writeln!(out, "\n{RULE}");
    let _ = writeln!(out, "SUMMARY");
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "Likely landings: {}", high(&landings));
    let _ = writeln!(out, "Likely takeoffs: {}", high(&takeoffs));
    let _ = writeln!(out, "Total operations: {}", landings.len() + takeoffs.len());

    out
}

fn render_event(out: &mut String, event: &TrackEvent) {
    let (boundary_label, delta_label) = match event.kind {
        EventKind::Landing => ("Final", "Descended"),
        EventKind::Takeoff => ("Initial", "Climbed"),
    };

    let _ = writeln!(out, "\n{} {}", event.date, event.event_time.format("%H:%M:%S"));
    let _ = writeln!(out, "  Aircraft: {} ({})", event.callsign, event.icao24);
    let _ = writeln!(
        out,
        "  {} altitude: {:.0}m ({:.0}ft)",
        boundary_label,
        event.boundary_altitude_m,
        event.boundary_altitude_m * FEET_PER_METER
    );
    let _ = writeln!(
        out,
        "  {} distance from airport: {:.1}km",
        boundary_label, event.boundary_distance_km
    );
    let _ = writeln!(
        out,
        "  {}: {:.0}m over {} detections",
        delta_label, event.altitude_delta_m, event.detections
    );
    let _ = writeln!(out, "  Confidence: {}", event.confidence);
}
