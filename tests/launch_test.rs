use awsim_launch::config::{LaunchArgs, MemoryConfigLoader, AWSIM_PATH, LANELET2_MAP_PATH};
use awsim_launch::model::{LaunchEntry, OutputMode};
use awsim_launch::orchestrator::{Orchestrator, ParameterSources};
use awsim_launch::runtime::{launch, log_file_name, LaunchError};
use awsim_launch::supervisor::mock::MockSupervisor;
use awsim_launch::supervisor::{
    DryRunSupervisor, LaunchReport, LocalSupervisor, ProcessExit, ProcessSupervisor, SupervisorError,
};
use std::time::Duration;

const EMPTY_PARAMS: &str = "/**:\n  ros__parameters: {}\n";

fn orchestrator() -> Orchestrator<MemoryConfigLoader> {
    let loader = MemoryConfigLoader::new()
        .with_document("/p.yaml", EMPTY_PARAMS)
        .with_document("/l.yaml", EMPTY_PARAMS)
        .with_document("/m.yaml", EMPTY_PARAMS);
    Orchestrator::new(loader, ParameterSources::new("/p.yaml", "/l.yaml", "/m.yaml"))
}

fn args() -> LaunchArgs {
    LaunchArgs::new()
        .with(LANELET2_MAP_PATH, "/maps/town.osm")
        .with(AWSIM_PATH, "/opt/awsim/run.sh")
}

/// The supervisor receives the complete plan exactly once.
#[tokio::test]
async fn test_launch_hands_plan_to_supervisor() {
    let mock = MockSupervisor::new();
    mock.expect_execute().return_ok(LaunchReport::default());

    let report = launch(&orchestrator(), &args(), &mock).await.expect("launch failed");
    assert!(report.success());

    let received = mock.received();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].len(), 4);
    assert!(matches!(received[0].entries()[3], LaunchEntry::Process(ref cmd) if cmd.command == "/opt/awsim/run.sh"));
    mock.verify();
}

/// A broken config never reaches the supervisor.
#[tokio::test]
async fn test_config_error_skips_supervisor() {
    let loader = MemoryConfigLoader::new().with_document("/p.yaml", EMPTY_PARAMS);
    let orchestrator = Orchestrator::new(loader, ParameterSources::new("/p.yaml", "/l.yaml", "/m.yaml"));
    let mock = MockSupervisor::new();

    let result = launch(&orchestrator, &args(), &mock).await;

    assert!(matches!(result, Err(LaunchError::Config(_))));
    assert!(mock.received().is_empty());
    mock.verify();
}

#[tokio::test]
async fn test_supervisor_error_is_propagated() {
    let mock = MockSupervisor::new();
    mock.expect_execute().return_err(SupervisorError::Custom("no ros2".into()));

    let result = launch(&orchestrator(), &args(), &mock).await;

    assert!(matches!(result, Err(LaunchError::Supervisor(SupervisorError::Custom(_)))));
    mock.verify();
}

#[tokio::test]
async fn test_dry_run_renders_every_entry() {
    let plan = orchestrator().build_plan(&args()).unwrap();
    let dry_run = DryRunSupervisor::default();

    let lines = dry_run.render(&plan);
    assert_eq!(lines.len(), 4);
    assert_eq!(
        lines[1].to_string(),
        "ros2 run awsim_map_loader lanelet2_map_loader --ros-args \
         -r __node:=lanelet2_map_loader -r __ns:=/AWSIM \
         -p lanelet2_map_path:=/maps/town.osm \
         -r /map/map_projector_info:=map/map_projector_info \
         -r output/lanelet2_map:=map/vector_map"
    );
    assert_eq!(lines[3].to_string(), "sh -c /opt/awsim/run.sh");
    assert_eq!(lines[3].output, OutputMode::Screen);

    let report = dry_run.execute(plan).await.unwrap();
    assert!(report.exits.is_empty());
}

/// Runs the real supervisor with `echo` standing in for `ros2` and a shell
/// command standing in for the simulator.
#[tokio::test]
async fn test_local_supervisor_runs_plan() {
    let args = LaunchArgs::new()
        .with(LANELET2_MAP_PATH, "/maps/town.osm")
        .with(AWSIM_PATH, "echo simulator; exit 7");
    let plan = orchestrator().build_plan(&args).unwrap();

    let logs = tempfile::tempdir().unwrap();

    let report = LocalSupervisor::new("echo")
        .with_log_dir(logs.path())
        .execute(plan)
        .await
        .unwrap();

    assert!(!report.interrupted);
    assert_eq!(report.exits.len(), 4);
    assert!(report.exits[..3].iter().all(ProcessExit::success));
    assert_eq!(report.exits[3].code, Some(7));
    assert!(!report.success());
}

/// Node output lands in one log file per node; the simulator writes to the terminal only.
#[tokio::test]
async fn test_local_supervisor_writes_node_logs() {
    let plan = orchestrator().build_plan(&args()).unwrap();
    let logs = tempfile::tempdir().unwrap();

    LocalSupervisor::new("echo")
        .with_log_dir(logs.path())
        .execute_until(plan, std::future::pending())
        .await
        .unwrap();

    let loader_log = std::fs::read_to_string(logs.path().join(log_file_name("lanelet2_map_loader"))).unwrap();
    assert!(loader_log.starts_with("run awsim_map_loader lanelet2_map_loader --ros-args"));
    assert!(logs.path().join(log_file_name("map_based_prediction")).exists());
    assert!(logs.path().join(log_file_name("map_projection_loader")).exists());
    assert!(!logs.path().join(log_file_name("/opt/awsim/run.sh")).exists());
}

/// A shutdown request stops whatever is still running and marks the run interrupted.
#[tokio::test]
async fn test_local_supervisor_stops_on_shutdown_request() {
    let args = LaunchArgs::new()
        .with(LANELET2_MAP_PATH, "/maps/town.osm")
        .with(AWSIM_PATH, "exec sleep 30");
    let plan = orchestrator().build_plan(&args).unwrap();
    let logs = tempfile::tempdir().unwrap();
    let (stop, stopped) = tokio::sync::oneshot::channel::<()>();

    let supervisor = LocalSupervisor::new("echo").with_log_dir(logs.path());
    let run = tokio::spawn(async move {
        supervisor
            .execute_until(plan, async {
                let _ = stopped.await;
            })
            .await
    });
    tokio::time::sleep(Duration::from_millis(200)).await;
    stop.send(()).unwrap();

    let report = tokio::time::timeout(Duration::from_secs(10), run)
        .await
        .expect("supervisor did not stop")
        .unwrap()
        .unwrap();

    assert!(report.interrupted);
    assert_eq!(report.exits.len(), 4);
    assert!(report.exits[..3].iter().all(ProcessExit::success));
    assert_eq!(report.exits[3].code, None);
}

#[tokio::test]
async fn test_local_supervisor_reports_spawn_failure() {
    let plan = orchestrator().build_plan(&args()).unwrap();

    let logs = tempfile::tempdir().unwrap();

    let result = LocalSupervisor::new("/definitely/not/ros2")
        .with_log_dir(logs.path())
        .execute(plan)
        .await;

    assert!(matches!(result, Err(SupervisorError::Spawn { ref label, .. }) if label == "map_based_prediction"));
}
