use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use serde_json::json;
use shiftdesk_agent::{Completion, CompletionRequest, LlmProvider, ProviderError};
use shiftdesk_core::types::{Assignment, NewEmployee, NewShift, Shift, ShiftType};
use shiftdesk_scheduler::client::NO_PROVIDER;
use shiftdesk_scheduler::proposal::COPY_FORWARD_NOTE;
use shiftdesk_scheduler::{
    prepare_snapshot, AiClient, AiSettings, PlanningSnapshot, ProposalGenerator, ProposalSource,
    ScheduleRequest, ScheduleWindow,
};
use shiftdesk_store::{AssignmentStore, Database, ShiftStore, SqliteStore, StoreError};

struct Fixed(String);

#[async_trait]
impl LlmProvider for Fixed {
    fn name(&self) -> &str {
        "fixed"
    }
    async fn complete(&self, req: &CompletionRequest) -> Result<Completion, ProviderError> {
        Ok(Completion {
            content: self.0.clone(),
            model: req.model.clone(),
            tokens_in: 0,
            tokens_out: 0,
        })
    }
}

struct Failing;

#[async_trait]
impl LlmProvider for Failing {
    fn name(&self) -> &str {
        "failing"
    }
    async fn complete(&self, _req: &CompletionRequest) -> Result<Completion, ProviderError> {
        Err(ProviderError::Api {
            status: 401,
            message: "invalid api key".into(),
        })
    }
}

struct Slow;

#[async_trait]
impl LlmProvider for Slow {
    fn name(&self) -> &str {
        "slow"
    }
    async fn complete(&self, _req: &CompletionRequest) -> Result<Completion, ProviderError> {
        tokio::time::sleep(Duration::from_secs(10)).await;
        Err(ProviderError::Unavailable("unreachable".into()))
    }
}

fn generator(provider: Option<Arc<dyn LlmProvider>>) -> ProposalGenerator {
    ProposalGenerator::new(AiClient::new(
        provider,
        AiSettings {
            model: "test".into(),
            max_tokens: 256,
            temperature: 0.0,
            timeout: Duration::from_millis(50),
        },
    ))
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
}

fn person(n: u32) -> NewEmployee {
    NewEmployee {
        first_name: format!("P{n}"),
        last_name: "Test".into(),
        email: format!("p{n}@example.com"),
        phone: None,
        start_date: None,
        department_id: None,
        avatar_url: None,
    }
}

fn add_shift(s: &SqliteStore<'_>, name: &str, d: u32, from: u32, to: u32) -> Result<Shift, StoreError> {
    s.create_shift(&NewShift {
        name: name.into(),
        date: day(d),
        start_time: NaiveTime::from_hms_opt(from, 0, 0).unwrap(),
        end_time: NaiveTime::from_hms_opt(to, 0, 0).unwrap(),
        shift_type: ShiftType::Morning,
    })
}

/// Two employees and two shifts in the week of 2025-03-10.
fn seeded() -> (Database, PlanningSnapshot) {
    let db = Database::open_in_memory().unwrap();
    let snap = db
        .with_transaction(|s| {
            s.create_employee(&person(1))?;
            s.create_employee(&person(2))?;
            add_shift(s, "Morning", 10, 9, 17)?;
            add_shift(s, "Evening", 10, 17, 23)?;
            let req = ScheduleRequest {
                weeks: 1,
                start_date: Some(day(10)),
            };
            prepare_snapshot(s, &req, day(1))
        })
        .unwrap();
    (db, snap)
}

#[tokio::test]
async fn without_provider_the_heuristic_runs() {
    let (_db, snap) = seeded();
    let out = generator(None).propose(&snap).await;

    assert!(out.success);
    assert_eq!(out.source, ProposalSource::Fallback);
    assert_eq!(out.ai_error.as_deref(), Some(NO_PROVIDER));
    assert_eq!(out.proposed_assignments.len(), 2);
    assert_eq!(out.window.end, day(16));
    assert!(out.raw_response.is_none());
}

#[tokio::test]
async fn valid_ai_reply_is_used_and_filtered() {
    let (_db, snap) = seeded();
    let morning = snap.window_shifts[0].id;
    let reply = json!({
        "summary": "One person is enough",
        "assignments": [
            { "shift_id": morning, "employee_id": "2", "reason": "has capacity" },
            { "shift_id": 999, "employee_id": 1, "reason": "not in window" }
        ]
    });
    let text = format!("```json\n{reply}\n```");
    let out = generator(Some(Arc::new(Fixed(text.clone())))).propose(&snap).await;

    assert!(out.success);
    assert_eq!(out.source, ProposalSource::Ai);
    assert_eq!(out.summary, "One person is enough");
    assert_eq!(out.proposed_assignments.len(), 1);
    assert_eq!(out.proposed_assignments[0].employee_id, 2);
    assert_eq!(out.warnings.len(), 1);
    assert_eq!(out.raw_response.as_deref(), Some(text.as_str()));
    assert!(out.ai_error.is_none());
}

#[tokio::test]
async fn unusable_reply_falls_back() {
    let (_db, snap) = seeded();
    let out = generator(Some(Arc::new(Fixed("Sorry, no.".into()))))
        .propose(&snap)
        .await;

    assert_eq!(out.source, ProposalSource::Fallback);
    assert_eq!(out.raw_response.as_deref(), Some("Sorry, no."));
    assert!(out.ai_error.is_some());
}

#[tokio::test]
async fn provider_error_is_metadata() {
    let (_db, snap) = seeded();
    let out = generator(Some(Arc::new(Failing))).propose(&snap).await;

    assert!(out.success);
    assert_eq!(out.source, ProposalSource::Fallback);
    assert!(out.ai_error.unwrap().contains("invalid api key"));
}

#[tokio::test]
async fn timeout_is_treated_like_an_error() {
    let (_db, snap) = seeded();
    let out = generator(Some(Arc::new(Slow))).propose(&snap).await;

    assert_eq!(out.source, ProposalSource::Fallback);
    assert!(out.ai_error.unwrap().contains("timed out"));
}

#[tokio::test]
async fn empty_window_is_filled_from_last_week() {
    let db = Database::open_in_memory().unwrap();
    let snap = db
        .with_transaction(|s| {
            let e = s.create_employee(&person(1))?;
            let src = add_shift(s, "Morning", 3, 9, 17)?;
            s.create_assignment(e.id, src.id)?;
            let req = ScheduleRequest {
                weeks: 1,
                start_date: None,
            };
            // 2025-03-05 is a Wednesday, so the window starts 2025-03-10
            prepare_snapshot(s, &req, day(5))
        })
        .unwrap();

    assert_eq!(snap.window.start, day(10));
    assert_eq!(snap.window_shifts.len(), 1);
    assert_eq!(snap.clone_map.len(), 1);

    // clones are persisted, proposals are not
    let out = generator(None).propose(&snap).await;
    assert!(out.success);
    assert_eq!(out.cloned_shifts, snap.clone_map);
    let (shifts, assignments) = db
        .with_transaction(|s| Ok::<_, StoreError>((s.list_shifts()?, s.list_assignments()?)))
        .unwrap();
    assert_eq!(shifts.len(), 2);
    assert_eq!(assignments.len(), 1);
}

#[tokio::test]
async fn weeks_are_clamped_into_the_window() {
    let db = Database::open_in_memory().unwrap();
    let snap = db
        .with_transaction(|s| {
            let req = ScheduleRequest {
                weeks: 10,
                start_date: Some(day(3)),
            };
            prepare_snapshot(s, &req, day(1))
        })
        .unwrap();
    assert_eq!(snap.window.end, day(30));

    let out = generator(None).propose(&snap).await;
    assert!(!out.success);
    assert_eq!(out.source, ProposalSource::None);
}

#[tokio::test]
async fn copy_forward_runs_when_the_heuristic_finds_nobody() {
    let start = day(10);
    let source = Shift {
        id: 1,
        name: "Morning".into(),
        date: day(3),
        start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        end_time: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
        shift_type: ShiftType::Morning,
    };
    let clone = Shift {
        id: 2,
        date: start,
        ..source.clone()
    };
    let snap = PlanningSnapshot {
        window: ScheduleWindow {
            start,
            end: day(16),
        },
        employees: Vec::new(),
        shifts: vec![source, clone.clone()],
        window_shifts: vec![clone],
        assignments: vec![Assignment {
            id: 1,
            employee_id: 7,
            shift_id: 1,
        }],
        clone_map: BTreeMap::from([(2, 1)]),
    };

    let out = generator(None).propose(&snap).await;
    assert!(out.success);
    assert_eq!(out.source, ProposalSource::CopyForward);
    assert_eq!(out.summary, COPY_FORWARD_NOTE);
    assert_eq!(out.proposed_assignments[0].employee_id, 7);
    assert_eq!(
        out.proposed_assignments[0].reason,
        "Copied from Morning on 2025-03-03"
    );
}
