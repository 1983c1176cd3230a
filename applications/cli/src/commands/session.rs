//! Session commands: resume and theme

use super::{flush, Context};
use crate::error::{CliError, Result};
use chrono::{DateTime, Utc};
use lectern_core::date::format_time;
use lectern_core::{LastSession, StateStore, Theme};
use lectern_playback::{PlaybackEvent, ResumeOutcome};
use tracing::debug;

/// Pick up the last session if it is still within the resume window
pub async fn resume(ctx: &Context) -> Result<()> {
    let Some(session) = ctx.store.load_last_session().await else {
        println!("Nothing to resume.");
        return Ok(());
    };

    let library = ctx.library().await;
    let (mut controller, handle) = ctx.controller(library);
    let now = Utc::now();
    let outcome = controller.resume(&session, now)?;

    for event in controller.drain_events() {
        match event {
            PlaybackEvent::Error { message } => eprintln!("{message}"),
            other => debug!(event = ?other, "Playback event"),
        }
    }

    match skipped_message(outcome, &session, now) {
        Some(message) => println!("{message}"),
        None => {
            if let Some(lecture) = controller.current_lecture() {
                println!(
                    "Resuming \"{}\" at {} of {}",
                    lecture.title,
                    format_time(session.position),
                    format_time(lecture.duration)
                );
            }
        }
    }

    flush(controller, handle).await;
    Ok(())
}

/// Show the theme, or set it to `light`, `dark` or the opposite (`toggle`)
pub async fn theme(ctx: &Context, value: Option<&str>) -> Result<()> {
    let current = ctx.store.load_theme().await.unwrap_or_default();

    let Some(value) = value else {
        println!("{current}");
        return Ok(());
    };

    let next = parse_theme_arg(value, current)?;
    ctx.store
        .save_theme(next)
        .await
        .map_err(|e| CliError::Config(format!("could not save theme: {e}")))?;
    println!("Theme set to {next}");
    Ok(())
}

/// Why the last session was not picked up, if it wasn't
fn skipped_message(outcome: ResumeOutcome, session: &LastSession, now: DateTime<Utc>) -> Option<String> {
    match outcome {
        ResumeOutcome::Started => None,
        ResumeOutcome::Stale => {
            let age = now.signed_duration_since(session.timestamp);
            Some(format!(
                "Last session ({}) is {}h old; not resuming.",
                session.lecture_id,
                age.num_hours()
            ))
        }
        ResumeOutcome::MissingLecture => Some(format!(
            "Last session lecture {} is no longer in the catalog; not resuming.",
            session.lecture_id
        )),
    }
}

fn parse_theme_arg(value: &str, current: Theme) -> Result<Theme> {
    if value.eq_ignore_ascii_case("toggle") {
        return Ok(current.toggled());
    }
    Theme::from_str(&value.to_lowercase())
        .ok_or_else(|| CliError::BadArgument(format!("unknown theme '{value}' (light, dark, toggle)")))
}
