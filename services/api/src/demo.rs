use crate::infra::{seed_sample_data, Platform, SampleData};
use clap::Args;
use talentflow::assessments::{AnswerSet, AssessmentServiceError, SubmissionError};
use talentflow::config::ListingConfig;
use talentflow::error::AppError;
use talentflow::jobs::{JobQuery, Viewer};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Skip the assessment submission portion of the demo.
    #[arg(long)]
    pub(crate) skip_assessment: bool,
    /// Print the final board and pipeline as JSON instead of text.
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let platform = Platform::in_memory(ListingConfig::default());
    let sample = seed_sample_data(&platform)?;

    println!("TalentFlow demo");
    print_job_board(&platform, "Job board (HR view)")?;

    if let [first, .., last] = sample.jobs.as_slice() {
        platform.jobs.reorder(last, first)?;
        print_job_board(&platform, "Job board after dragging the last job to the top")?;
    }

    demo_pipeline(&platform, &sample)?;

    if !args.skip_assessment {
        demo_assessment(&platform, &sample)?;
    }

    if args.json {
        let page = platform
            .jobs
            .list(&JobQuery::default(), Viewer::Candidate)?;
        let columns = platform.candidates.board("")?;
        let payload = serde_json::json!({ "jobs": page, "columns": columns });
        match serde_json::to_string_pretty(&payload) {
            Ok(json) => println!("\n{}", json),
            Err(err) => println!("\nJSON payload unavailable: {}", err),
        }
    }

    Ok(())
}

fn print_job_board(platform: &Platform, heading: &str) -> Result<(), AppError> {
    let page = platform.jobs.list(&JobQuery::default(), Viewer::Hr)?;
    println!("\n{} ({} jobs)", heading, page.total);
    for job in &page.jobs {
        println!(
            "  {:>2}. {} [{}] slug={} tags={}",
            job.position,
            job.title,
            job.status.label(),
            job.slug,
            job.tags.join(",")
        );
    }
    Ok(())
}

fn demo_pipeline(platform: &Platform, sample: &SampleData) -> Result<(), AppError> {
    println!("\nCandidate pipeline");
    print_columns(platform)?;

    let Some(candidate_id) = sample.candidates.first() else {
        return Ok(());
    };

    let moved = platform.candidates.move_stage(candidate_id, "screen")?;
    println!("\nMoved {} to {}", moved.name, moved.stage.label());

    match platform.candidates.move_stage(candidate_id, "interview") {
        Ok(_) => println!("  Unexpected: unknown stage accepted"),
        Err(err) => println!("  Rejected move: {}", err),
    }

    print_columns(platform)?;

    let profile = platform.candidates.get(candidate_id)?;
    println!("\nTimeline for {} ({})", profile.candidate.name, profile.job_title);
    for event in platform.candidates.timeline(candidate_id)? {
        println!(
            "  {} {}: {}",
            event.occurred_at.format("%Y-%m-%d %H:%M:%S"),
            event.event,
            event.notes
        );
    }
    Ok(())
}

fn print_columns(platform: &Platform) -> Result<(), AppError> {
    for column in platform.candidates.board("")? {
        let names: Vec<&str> = column
            .candidates
            .iter()
            .map(|candidate| candidate.name.as_str())
            .collect();
        println!("  {:<10} {}", column.label, names.join(", "));
    }
    Ok(())
}

fn demo_assessment(platform: &Platform, sample: &SampleData) -> Result<(), AppError> {
    let Some(job_id) = sample.jobs.first() else {
        return Ok(());
    };

    let preview = platform.assessments.preview(job_id)?;
    println!("\nAssessment preview: {}", preview.title);
    for section in &preview.sections {
        println!("  {} ({} items)", section.title, section.items.len());
    }

    let incomplete = answers(&[("q-rust", "Yes"), ("q-years", "55")]);
    match platform.assessments.submit(job_id, incomplete) {
        Ok(receipt) => println!("  Unexpected acceptance: {}", receipt.message),
        Err(AssessmentServiceError::Submission(SubmissionError::ValidationFailed(failures))) => {
            println!("  Submission rejected:");
            for failure in failures {
                println!("    {}: {}", failure.question_id, failure.reason.message());
            }
        }
        Err(err) => return Err(err.into()),
    }

    let complete = answers(&[
        ("q-rust", "Yes"),
        ("q-project", "An ingestion pipeline built on tokio"),
        ("q-years", "6"),
    ]);
    let receipt = platform.assessments.submit(job_id, complete)?;
    println!("  {}", receipt.message);
    println!(
        "  Submissions stored: {}",
        platform.submissions.submissions().len()
    );
    Ok(())
}

fn answers(pairs: &[(&str, &str)]) -> AnswerSet {
    pairs
        .iter()
        .map(|(id, value)| ((*id).into(), (*value).into()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_runs_end_to_end() {
        run_demo(DemoArgs::default()).expect("demo completes");
    }

    #[test]
    fn demo_stores_exactly_one_submission() {
        let platform = Platform::in_memory(ListingConfig::default());
        let sample = seed_sample_data(&platform).expect("sample data loads");

        demo_assessment(&platform, &sample).expect("assessment demo completes");

        let stored = platform.submissions.submissions();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].answers.len(), 3);
    }
}
