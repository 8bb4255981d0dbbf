//! End-to-end runs of command definitions against real processes

#![cfg(unix)]

use async_trait::async_trait;
use command_orchestration::{
    CommandDefinition, CommandRegistry, CommandRunner, Error, MemorySink, OutputSink, ProcessStep,
    ProjectContext, PromptRequester, RunOutcome, StatusHistory, StepResult,
};
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Answers prompts from a fixed table and counts requests
#[derive(Default)]
struct Answers {
    values: HashMap<String, String>,
    asked: AtomicUsize,
}

impl Answers {
    fn with(token: &str, value: &str) -> Self {
        let mut values = HashMap::new();
        values.insert(token.to_string(), value.to_string());
        Self {
            values,
            asked: AtomicUsize::new(0),
        }
    }

    fn asked(&self) -> usize {
        self.asked.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PromptRequester for Answers {
    async fn request(&self, token: &str, _command: &str) -> Option<String> {
        self.asked.fetch_add(1, Ordering::SeqCst);
        self.values.get(token).cloned()
    }
}

fn sh(script: &str) -> ProcessStep {
    ProcessStep::new("sh", ["-c", script])
}

fn runner_in(dir: &Path, answers: Arc<Answers>) -> (CommandRunner, Arc<StatusHistory>) {
    let context = ProjectContext::new()
        .with_project_root(dir)
        .with_file(dir.join("main.go"));
    let status = Arc::new(StatusHistory::new());
    let runner = CommandRunner::local(Arc::new(context), answers).with_status_reporter(status.clone());
    (runner, status)
}

fn sink() -> (Arc<MemorySink>, Option<Arc<dyn OutputSink>>) {
    let sink = Arc::new(MemorySink::new());
    let shared: Arc<dyn OutputSink> = sink.clone();
    (sink, Some(shared))
}

fn completed(outcome: RunOutcome) -> command_orchestration::RunReport {
    match outcome {
        RunOutcome::Completed(report) => report,
        other => panic!("expected completed run, got {:?}", other),
    }
}

#[smol_potat::test]
async fn test_sequential_steps_fail_fast() {
    let dir = tempfile::tempdir().unwrap();
    let (runner, _) = runner_in(dir.path(), Arc::new(Answers::default()));
    let marker = dir.path().join("marker");

    let command = CommandDefinition::new("Two Steps", sh("exit 1"))
        .then(ProcessStep::new("touch", [marker.to_string_lossy().into_owned()]));

    let report = completed(runner.run(&command, None).await.unwrap());

    assert!(!report.success);
    assert_eq!(report.steps.len(), 1);
    assert!(!marker.exists());
}

#[smol_potat::test]
async fn test_all_steps_run_on_success() {
    let dir = tempfile::tempdir().unwrap();
    let (runner, status) = runner_in(dir.path(), Arc::new(Answers::default()));
    let (sink, shared) = sink();

    let command = CommandDefinition::new("Echo Twice", ProcessStep::new("echo", ["one"]))
        .then(ProcessStep::new("echo", ["two"]));

    let report = completed(runner.run(&command, shared).await.unwrap());

    assert!(report.success);
    assert_eq!(report.steps.len(), 2);
    assert_eq!(report.steps[1].output, vec!["two".to_string()]);

    let lines = sink.lines();
    assert_eq!(lines[0], "one");
    assert_eq!(lines[1], "");
    assert!(lines[2].starts_with("echo one successful at: "));
    assert_eq!(lines[3], "two");
    assert_eq!(sink.refresh_count(), 2);

    let entries = status.entries();
    assert_eq!(entries.len(), 2);
    assert!(entries[1].starts_with("echo two successful at: "));
    assert!(entries[1].ends_with(" two"));
}

#[smol_potat::test]
async fn test_working_dir_resolved_per_run() {
    let dir = tempfile::tempdir().unwrap();
    let sub = dir.path().join("pkg");
    std::fs::create_dir(&sub).unwrap();
    let (runner, _) = runner_in(dir.path(), Arc::new(Answers::default()));
    let (sink, shared) = sink();

    let command = CommandDefinition::new("Where", ProcessStep::new("pwd", Vec::<String>::new()))
        .in_dir("{ProjPath}/pkg")
        .waiting(true);

    let report = completed(runner.run(&command, shared).await.unwrap());

    let printed = Path::new(&report.steps[0].output[0]).canonicalize().unwrap();
    assert_eq!(printed, sub.canonicalize().unwrap());
    assert!(sink.lines()[0].ends_with("(from: {ProjPath}/pkg)"));
    // The test process itself never moved
    assert_ne!(std::env::current_dir().unwrap().canonicalize().unwrap(), printed);
}

#[smol_potat::test]
async fn test_missing_dir_falls_back_to_project_root() {
    let dir = tempfile::tempdir().unwrap();
    let (runner, _) = runner_in(dir.path(), Arc::new(Answers::default()));
    let (sink, shared) = sink();

    let command = CommandDefinition::new("Where", ProcessStep::new("pwd", Vec::<String>::new()))
        .in_dir("{ProjPath}/does-not-exist")
        .waiting(true);

    let report = completed(runner.run(&command, shared).await.unwrap());

    assert!(report.success);
    let printed = Path::new(&report.steps[0].output[0]).canonicalize().unwrap();
    assert_eq!(printed, dir.path().canonicalize().unwrap());
    assert!(
        sink.lines()
            .iter()
            .any(|l| l.starts_with("Could not change to directory"))
    );
}

#[smol_potat::test]
async fn test_stale_project_root_runs_in_inherited_dir() {
    let dir = tempfile::tempdir().unwrap();
    let gone = dir.path().join("moved-away");
    let (runner, status) = runner_in(&gone, Arc::new(Answers::default()));
    let (sink, shared) = sink();

    let command = CommandDefinition::new("Hello", ProcessStep::new("echo", ["hi"])).waiting(true);

    let report = completed(runner.run(&command, shared).await.unwrap());

    assert!(report.success);
    assert_eq!(report.steps[0].output, vec!["hi".to_string()]);
    let lines = sink.lines();
    assert!(lines[0].starts_with(&format!("Could not change to directory {}", gone.display())));
    assert!(status.last().unwrap().starts_with("echo hi successful at: "));
}

#[smol_potat::test]
async fn test_single_step_runs_in_background() {
    let dir = tempfile::tempdir().unwrap();
    let (runner, status) = runner_in(dir.path(), Arc::new(Answers::default()));
    let (sink, shared) = sink();

    let command = CommandDefinition::new("Slow", sh("sleep 1; echo done"));

    let started = Instant::now();
    let outcome = runner.run(&command, shared).await.unwrap();
    assert!(started.elapsed() < Duration::from_millis(900));

    let RunOutcome::Background(run) = outcome else {
        panic!("expected background run");
    };
    assert_eq!(run.command(), "Slow");

    let report = run.wait().await.expect("background report");
    assert!(report.success);
    assert!(started.elapsed() >= Duration::from_secs(1));
    assert_eq!(report.steps[0].output, vec!["done".to_string()]);

    let lines = sink.lines();
    assert_eq!(lines[0], "done");
    assert_eq!(lines[1], "");
    assert!(lines[2].contains(" successful at: "));
    assert!(status.last().unwrap().ends_with(" done"));
}

#[smol_potat::test]
async fn test_streaming_appends_before_exit() {
    let dir = tempfile::tempdir().unwrap();
    let (runner, _) = runner_in(dir.path(), Arc::new(Answers::default()));
    let (sink, shared) = sink();

    let command = CommandDefinition::new("Stream", sh("echo first; sleep 1; echo second"));

    let RunOutcome::Background(run) = runner.run(&command, shared).await.unwrap() else {
        panic!("expected background run");
    };

    let deadline = Instant::now() + Duration::from_millis(800);
    while sink.lines().is_empty() && Instant::now() < deadline {
        smol::Timer::after(Duration::from_millis(20)).await;
    }
    assert_eq!(sink.lines(), vec!["first".to_string()]);

    let report = run.wait().await.unwrap();
    assert!(report.success);
    assert_eq!(&sink.lines()[..2], &["first".to_string(), "second".to_string()]);
}

#[smol_potat::test]
async fn test_cancelled_prompt_spawns_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let answers = Arc::new(Answers::default());
    let (runner, status) = runner_in(dir.path(), answers.clone());
    let marker = dir.path().join("marker");

    let command = CommandDefinition::new(
        "Touch Prompt",
        ProcessStep::new("touch", [format!("{}{{PromptString1}}", marker.display())]),
    )
    .waiting(true);

    let outcome = runner.run(&command, None).await.unwrap();

    assert!(matches!(outcome, RunOutcome::Cancelled { ref token } if token == "PromptString1"));
    assert_eq!(answers.asked(), 1);
    assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
    assert!(status.entries().is_empty());
}

#[smol_potat::test]
async fn test_prompt_value_is_bound() {
    let dir = tempfile::tempdir().unwrap();
    let answers = Arc::new(Answers::with("PromptString1", "fix parser"));
    let (runner, _) = runner_in(dir.path(), answers.clone());

    let command = CommandDefinition::new("Echo prompt", ProcessStep::new("echo", ["{PromptString1}"])).waiting(true);

    let report = completed(runner.run(&command, None).await.unwrap());

    assert_eq!(report.steps[0].command_line, "echo fix parser");
    assert_eq!(report.steps[0].output, vec!["fix parser".to_string()]);
    assert_eq!(runner.prompts().value("PromptString1").as_deref(), Some("fix parser"));
}

#[smol_potat::test]
async fn test_suppression_applies_to_one_run() {
    let dir = tempfile::tempdir().unwrap();
    let answers = Arc::new(Answers::with("PromptString1", "asked"));
    let (runner, _) = runner_in(dir.path(), answers.clone());

    let command = CommandDefinition::new("Echo prompt", ProcessStep::new("echo", ["{PromptString1}"])).waiting(true);

    runner.prompts().preset("PromptString1", "preset");
    runner.prompts().suppress_next();
    let first = completed(runner.run(&command, None).await.unwrap());
    assert_eq!(first.steps[0].output, vec!["preset".to_string()]);
    assert_eq!(answers.asked(), 0);

    let second = completed(runner.run(&command, None).await.unwrap());
    assert_eq!(second.steps[0].output, vec!["asked".to_string()]);
    assert_eq!(answers.asked(), 1);
}

#[smol_potat::test]
async fn test_exec_error_and_failure_status() {
    let dir = tempfile::tempdir().unwrap();
    let (runner, status) = runner_in(dir.path(), Arc::new(Answers::default()));

    let missing = CommandDefinition::new(
        "Missing",
        ProcessStep::new("definitely-not-a-real-program-4321", Vec::<String>::new()),
    )
    .waiting(true);
    let report = completed(runner.run(&missing, None).await.unwrap());
    assert!(matches!(report.steps[0].result, StepResult::ExecError(_)));
    let last = status.last().unwrap();
    assert!(last.contains(" exec error at: "), "{}", last);
    assert!(last.contains("command not found"), "{}", last);

    let failing = CommandDefinition::new("Fail", sh("exit 3")).waiting(true);
    let report = completed(runner.run(&failing, None).await.unwrap());
    assert!(report.steps[0].status_line().ends_with(" with error: exit status 3"));
    assert!(status.last().unwrap().contains(" failed at: "));
}

#[smol_potat::test]
async fn test_output_file_positions_marked_up() {
    let dir = tempfile::tempdir().unwrap();
    let (runner, _) = runner_in(dir.path(), Arc::new(Answers::default()));
    let (sink, shared) = sink();

    let command = CommandDefinition::new("Vet", ProcessStep::new("echo", ["main.go:42:7 undefined: foo"])).waiting(true);
    completed(runner.run(&command, shared).await.unwrap());

    let expected = format!(
        r#"<a href="file://{}/main.go#L42C7">main.go:42:7</a> undefined: foo"#,
        dir.path().display()
    );
    assert_eq!(sink.lines()[0], expected);
}

#[smol_potat::test]
async fn test_run_named_miss_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let (runner, status) = runner_in(dir.path(), Arc::new(Answers::default()));
    let registry = CommandRegistry::new(Vec::new());

    let err = runner.run_named(&registry, "Nope", None).await.unwrap_err();

    assert!(matches!(err, Error::CommandNotFound(ref name) if name == "Nope"));
    assert_eq!(status.last().as_deref(), Some("command not found: Nope"));
}
