use super::common::*;
use crate::candidates::domain::{CandidateId, NewCandidate, Stage};
use crate::candidates::repository::{CandidateRepository, RepositoryError};
use crate::candidates::service::CandidateServiceError;
use crate::jobs::JobId;

#[test]
fn list_searches_name_and_email_case_insensitively() {
    let (service, _) = build_service();

    assert_eq!(
        names(&service.list("ALAN").expect("list")),
        vec!["Alan Turing"]
    );
    assert_eq!(
        names(&service.list("grace.hopper@").expect("list")),
        vec!["Grace Hopper"]
    );
    assert_eq!(service.list("  ").expect("list").len(), 4);
}

#[test]
fn board_groups_filtered_candidates() {
    let (service, _) = build_service();

    let columns = service.board("a").expect("board");

    assert_eq!(columns.len(), 6);
    let total: usize = columns.iter().map(|column| column.candidates.len()).sum();
    assert_eq!(total, 4);
}

#[test]
fn move_stage_persists_and_records_timeline() {
    let (service, repository) = build_service();
    let id = CandidateId::from("c1");

    let updated = service.move_stage(&id, "offer").expect("move succeeds");
    assert_eq!(updated.stage, Stage::Offer);

    let stored = repository.fetch(&id).expect("fetch").expect("present");
    assert_eq!(stored.stage, Stage::Offer);

    let columns = service.board("").expect("board");
    assert_eq!(
        names(&columns[Stage::Offer.index()].candidates),
        vec!["Ada Lovelace"]
    );

    let timeline = service.timeline(&id).expect("timeline");
    assert_eq!(timeline.len(), 1);
    assert_eq!(timeline[0].event, "Moved to stage: Offer");
}

#[test]
fn move_stage_rejects_unknown_stage_without_writing() {
    let (service, repository) = build_service();
    let id = CandidateId::from("c1");

    match service.move_stage(&id, "bogus") {
        Err(CandidateServiceError::InvalidStage(err)) => assert_eq!(err.0, "bogus"),
        other => panic!("expected invalid stage, got {other:?}"),
    }

    let stored = repository.fetch(&id).expect("fetch").expect("present");
    assert_eq!(stored.stage, Stage::Applied);
    assert!(repository.events(&id).expect("events").is_empty());
}

#[test]
fn move_stage_to_current_stage_records_nothing() {
    let (service, repository) = build_service();
    let id = CandidateId::from("c2");

    service.move_stage(&id, "tech").expect("no-op move succeeds");

    assert!(repository.events(&id).expect("events").is_empty());
}

#[test]
fn move_stage_for_missing_candidate_is_not_found() {
    let (service, _) = build_service();

    let result = service.move_stage(&CandidateId::from("ghost"), "hired");

    assert!(matches!(
        result,
        Err(CandidateServiceError::Repository(RepositoryError::NotFound))
    ));
}

#[test]
fn profile_includes_job_title_or_placeholder() {
    let (service, repository) = build_service();

    let profile = service.get(&CandidateId::from("c1")).expect("profile");
    assert_eq!(profile.job_title, "Compiler Engineer");

    let mut orphan = candidate("c9", "Barbara Liskov", Stage::Screen);
    orphan.job_id = JobId::from("deleted-job");
    repository.insert(orphan).expect("insert");

    let profile = service.get(&CandidateId::from("c9")).expect("profile");
    assert_eq!(profile.job_title, "N/A");
}

#[test]
fn timeline_is_newest_first() {
    let (service, _) = build_service();

    let registered = service
        .register(NewCandidate {
            name: " Margaret Hamilton ".to_string(),
            email: "Margaret@Example.com".to_string(),
            job_id: JobId::from("job-1"),
        })
        .expect("register");
    assert_eq!(registered.stage, Stage::Applied);
    assert_eq!(registered.email, "margaret@example.com");

    service
        .move_stage(&registered.id, "screen")
        .expect("screen");
    service.move_stage(&registered.id, "tech").expect("tech");

    let events: Vec<String> = service
        .timeline(&registered.id)
        .expect("timeline")
        .into_iter()
        .map(|event| event.event)
        .collect();
    assert_eq!(
        events,
        vec![
            "Moved to stage: Tech Interview".to_string(),
            "Moved to stage: Screen".to_string(),
            "Applied".to_string(),
        ]
    );
}

#[test]
fn register_requires_existing_job() {
    let (service, _) = build_service();

    let result = service.register(NewCandidate {
        name: "Ken Thompson".to_string(),
        email: "ken@example.com".to_string(),
        job_id: JobId::from("nope"),
    });

    assert!(matches!(result, Err(CandidateServiceError::UnknownJob(_))));
}

#[test]
fn timeline_for_missing_candidate_is_not_found() {
    let (service, _) = build_service();

    assert!(matches!(
        service.timeline(&CandidateId::from("ghost")),
        Err(CandidateServiceError::Repository(RepositoryError::NotFound))
    ));
}
