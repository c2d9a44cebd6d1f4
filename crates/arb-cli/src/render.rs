//! Human-readable terminal output.

use arb_engine::{ApplyOutcome, FrameSuggestion};
use arb_framenet::{Corpus, Frame, InheritanceGraph};
use colored::Colorize;

pub fn suggestions(suggestions: &[FrameSuggestion]) {
    println!(
        "{:>4}  {:>6}  {:>5}  {:<28} roles",
        "#", "score", "conf", "frame"
    );
    for (rank, s) in suggestions.iter().enumerate() {
        let name = format!("{} ({})", s.frame.name, s.frame.id);
        let roles = if s.exact {
            "exact (lexical unit)".cyan().to_string()
        } else {
            s.role_assignments
                .iter()
                .map(|(role, id)| format!("{role}={id}"))
                .collect::<Vec<_>>()
                .join(", ")
        };
        println!(
            "{:>4}  {:>6.3}  {:>5.2}  {:<28} {}",
            rank + 1,
            s.score,
            s.confidence,
            name,
            roles
        );
    }
}

pub fn outcome(outcome: &ApplyOutcome) {
    if outcome.success {
        println!("{} {}", "applied".green().bold(), outcome.frame.bold());
        for (role, entity) in &outcome.roles {
            println!("  {} {role} ← entity {entity}", "→".cyan());
        }
        if let Some(state) = &outcome.state {
            println!(
                "  {} state={} version={} at {}",
                "→".yellow(),
                state.state,
                state.version,
                state.created_at.to_rfc3339()
            );
        }
    } else {
        println!(
            "{} {}: {}",
            "rejected".red().bold(),
            outcome.frame.bold(),
            outcome.error.as_deref().unwrap_or("unknown error")
        );
    }
}

pub fn frame_list(frames: &[&Frame]) {
    if frames.is_empty() {
        println!("  {}", "(none)".dimmed());
        return;
    }
    for frame in frames {
        println!("  {} {} ({})", "→".cyan(), frame.name, frame.id);
    }
}

pub fn frame_detail<C: Corpus + ?Sized>(corpus: &C, frame: &Frame, units: &[String]) {
    println!("{} ({})", frame.name.green().bold(), frame.id);
    if !frame.definition.is_empty() {
        println!("  {}", frame.definition);
    }

    println!("{}", "Elements".bold());
    for element in &frame.elements {
        let kind = if element.core_type.is_required() {
            element.core_type.as_str().yellow()
        } else {
            element.core_type.as_str().normal()
        };
        println!("  {:<20} {:<18} {}", element.name, kind, element.id);
    }

    println!("{}", "Relations".bold());
    for relation in &frame.relations {
        let kind = relation.kind.as_deref().unwrap_or("?");
        match relation.super_frame.as_ref() {
            Some(target) => match corpus.frame_by_ref(target) {
                Some(resolved) => println!("  {kind} → {} ({})", resolved.name, resolved.id),
                None => println!("  {kind} → {target} {}", "(unresolved)".red()),
            },
            None => println!("  {kind} → {}", "(missing super frame)".red()),
        }
    }

    let ancestors = InheritanceGraph::new(corpus).ancestor_frames(frame);
    if !ancestors.is_empty() {
        let chain: Vec<&str> = ancestors.iter().map(|f| f.name.as_str()).collect();
        println!("{} {}", "Inherits".bold(), chain.join(" → "));
    }

    if !units.is_empty() {
        println!("{} {}", "Lexical units".bold(), units.join(", "));
    }
}
