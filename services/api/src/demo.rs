use crate::infra::{InMemoryHostChannel, InMemoryNotificationFeed};
use appointment_eval::booking::{
    is_slot_available, BookingService, DocumentCandidate, DraftStore, FieldUpdate, FormField,
    InMemoryKeyValueStore, SubmitOutcome, TIME_SLOTS,
};
use appointment_eval::error::AppError;
use appointment_eval::evaluation::{
    cnp, ActionLogReplay, DetailTag, EvaluationResult, EvaluationSession, Notification,
};
use chrono::{Duration, Local, NaiveDate};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

const DEMO_DOCTOR: &str = "Dr. Tudor Andrei";

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Play the session the way a hurried user would, making the usual mistakes.
    #[arg(long)]
    pub(crate) careless: bool,
    /// Override the current date (YYYY-MM-DD) used for date validation.
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Args, Debug)]
pub(crate) struct ReplayArgs {
    /// CSV export with `kind,value` columns, one action per row
    #[arg(long)]
    pub(crate) log: PathBuf,
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

struct DemoStep {
    label: String,
    score: u32,
}

struct DemoRun {
    steps: Vec<DemoStep>,
    result: EvaluationResult,
    notifications: Vec<Notification>,
    booked: Option<String>,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let run = play_script(args.careless, today)?;

    println!("Appointment booking exercise demo");
    println!(
        "Mode: {}",
        if args.careless { "careless" } else { "careful" }
    );
    println!("\nLive score");
    for step in &run.steps {
        println!("- {:<48} {:>3}", step.label, step.score);
    }

    if let Some(id) = &run.booked {
        println!("\nBooked appointment {id}");
    }

    if !run.notifications.is_empty() {
        println!("\nNotifications shown");
        for notification in &run.notifications {
            println!("- [{:?}] {}", notification.level, notification.message);
        }
    }

    render_result(&run.result);
    Ok(())
}

pub(crate) fn run_replay(args: ReplayArgs) -> Result<(), AppError> {
    let actions = ActionLogReplay::from_path(&args.log)?;
    let mut session = offline_session();

    println!("Replaying {} action(s) from {}", actions.len(), args.log.display());
    for action in actions {
        let kind = action.kind().label();
        session.record(action);
        println!("- {:<24} {:>3}", kind, session.current_score());
    }

    let result = session.finalize().clone();
    render_result(&result);
    Ok(())
}

pub(crate) fn run_cnp_validate(id: &str) {
    let id = id.trim();
    if cnp::validate(id) {
        println!("{id}: valid");
        return;
    }

    match id.get(..12).map(str::as_bytes).and_then(cnp::control_digit) {
        Some(expected) if id.len() == 13 => {
            println!("{id}: invalid (control digit should be {expected})")
        }
        _ => println!("{id}: invalid (a CNP has exactly 13 digits)"),
    }
}

fn offline_session() -> EvaluationSession {
    let drafts = Arc::new(DraftStore::new(Arc::new(InMemoryKeyValueStore::default())));
    EvaluationSession::new(
        Arc::new(InMemoryHostChannel::default()),
        Arc::new(InMemoryNotificationFeed::default()),
        drafts,
    )
}

fn play_script(careless: bool, today: NaiveDate) -> Result<DemoRun, AppError> {
    let host = Arc::new(InMemoryHostChannel::default());
    let feed = Arc::new(InMemoryNotificationFeed::default());
    let mut booking = BookingService::new(Arc::new(InMemoryKeyValueStore::default()), feed.clone());
    let mut session = EvaluationSession::new(host, feed.clone(), booking.drafts());
    let mut steps = Vec::new();
    let mut note = |label: &str, session: &EvaluationSession| {
        steps.push(DemoStep {
            label: label.to_string(),
            score: session.current_score(),
        })
    };

    if careless {
        booking.update_field(FieldUpdate::FullName("Ion".to_string()));
        booking.blur_field(&mut session, FormField::FullName);
        note("typed a single name", &session);

        booking.update_field(FieldUpdate::Cnp("1234567890037".to_string()));
        booking.blur_field(&mut session, FormField::Cnp);
        note("typed a CNP with a wrong control digit", &session);

        booking.submit(&mut session, today)?;
        note("submitted the incomplete form", &session);

        booking.pick_document(
            &mut session,
            DocumentCandidate::new("Buget 2024.xlsx", 8_178_893, "application/vnd.ms-excel"),
        );
        note("picked a spreadsheet", &session);

        booking.pick_document(
            &mut session,
            DocumentCandidate::new("factura_curent.pdf", 204_800, "application/pdf"),
        );
        note("picked an invoice", &session);

        session.request_hint();
        note("asked for a hint", &session);
    }

    let (date, time) = first_open_slot(DEMO_DOCTOR, today + Duration::days(7));
    for update in [
        FieldUpdate::FullName("Popescu Ion".to_string()),
        FieldUpdate::Cnp("1960529460012".to_string()),
        FieldUpdate::Specialization("Pediatrics".to_string()),
        FieldUpdate::Doctor(DEMO_DOCTOR.to_string()),
        FieldUpdate::AppointmentDate(Some(date)),
        FieldUpdate::AppointmentTime(time.to_string()),
        FieldUpdate::Symptoms("Fever and sore throat for three days".to_string()),
        FieldUpdate::TermsAccepted(true),
    ] {
        booking.update_field(update);
    }
    booking.blur_field(&mut session, FormField::Cnp);
    note("filled in the form correctly", &session);

    booking.pick_document(
        &mut session,
        DocumentCandidate::new("act de identitate.jpg", 1_258_291, "image/jpeg"),
    );
    note("picked the identity card", &session);

    let outcome = booking.submit(&mut session, today)?;
    note("submitted the form", &session);

    let booked = match outcome {
        SubmitOutcome::Booked { appointment } => Some(appointment.id),
        SubmitOutcome::Rejected { .. } => None,
    };
    let result = session.finalize().clone();

    Ok(DemoRun {
        steps,
        result,
        notifications: feed.notifications(),
        booked,
    })
}

fn first_open_slot(doctor: &str, from: NaiveDate) -> (NaiveDate, &'static str) {
    let mut date = from;
    loop {
        if let Some(slot) = TIME_SLOTS
            .iter()
            .copied()
            .find(|slot| is_slot_available(doctor, date, slot))
        {
            return (date, slot);
        }
        date += Duration::days(1);
    }
}

fn render_result(result: &EvaluationResult) {
    println!(
        "\nFinal score: {}/{} ({} of {} tasks)",
        result.score, result.max_score, result.tasks_completed, result.total_tasks
    );
    println!("{}", result.feedback);
    for detail in &result.details {
        let marker = match detail.tag {
            DetailTag::Correct => '+',
            DetailTag::Incorrect => '-',
        };
        println!("  {marker} {}", detail.text);
    }
}
