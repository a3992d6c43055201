//! Rendering launch entries into concrete command lines.
//!
//! Workers become `ros2 run` invocations with `--ros-args`; bare processes go
//! through `sh -c` when they ask for a shell.

use crate::model::{LaunchEntry, OutputMode, ParamValue, ShellCommand, WorkerSpec};
use serde_yaml::Value;
use std::fmt;

/// Default program used to start ROS 2 nodes.
pub const DEFAULT_ROS2_BIN: &str = "ros2";

/// A program plus its arguments, ready to spawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub label: String,
    pub program: String,
    pub args: Vec<String>,
    pub output: OutputMode,
}

impl CommandLine {
    pub fn for_entry(entry: &LaunchEntry, ros2_bin: &str) -> Self {
        match entry {
            LaunchEntry::Worker(worker) => Self::for_worker(worker, ros2_bin),
            LaunchEntry::Process(cmd) => Self::for_process(cmd),
        }
    }

    pub fn for_worker(worker: &WorkerSpec, ros2_bin: &str) -> Self {
        let mut args = vec![
            "run".to_string(),
            worker.package.clone(),
            worker.executable.clone(),
            "--ros-args".to_string(),
            "-r".to_string(),
            format!("__node:={}", worker.name),
        ];
        if !worker.namespace.is_empty() {
            args.push("-r".to_string());
            args.push(format!("__ns:={}", absolute_namespace(&worker.namespace)));
        }
        for (name, value) in worker.parameters.iter() {
            let mut flat = Vec::new();
            flatten(name, value, &mut flat);
            for (name, value) in flat {
                args.push("-p".to_string());
                args.push(format!("{}:={}", name, value));
            }
        }
        for rule in &worker.remappings {
            args.push("-r".to_string());
            args.push(rule.to_string());
        }

        Self {
            label: worker.name.clone(),
            program: ros2_bin.to_string(),
            args,
            output: worker.output,
        }
    }

    pub fn for_process(cmd: &ShellCommand) -> Self {
        let (program, args) = if cmd.shell {
            ("sh".to_string(), vec!["-c".to_string(), cmd.command.clone()])
        } else {
            let mut parts = cmd.command.split_whitespace().map(str::to_string);
            (parts.next().unwrap_or_default(), parts.collect())
        };
        Self {
            label: cmd.command.clone(),
            program,
            args,
            output: OutputMode::Screen,
        }
    }

    pub fn to_command(&self) -> tokio::process::Command {
        let mut command = tokio::process::Command::new(&self.program);
        command.args(&self.args);
        command
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " '{}'", arg.replace('\'', r"'\''"))?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

fn absolute_namespace(namespace: &str) -> String {
    if namespace.starts_with('/') {
        namespace.to_string()
    } else {
        format!("/{}", namespace)
    }
}

/// Nested mappings become dotted parameter names.
fn flatten(name: &str, value: &ParamValue, out: &mut Vec<(String, String)>) {
    match value {
        Value::Mapping(mapping) => {
            for (key, inner) in mapping {
                let key = match key {
                    Value::String(s) => s.clone(),
                    other => render_value(other),
                };
                flatten(&format!("{}.{}", name, key), inner, out);
            }
        }
        Value::Tagged(tagged) => flatten(name, &tagged.value, out),
        _ => out.push((name.to_string(), render_value(value))),
    }
}

/// Renders a value the way `-p name:=value` expects it: YAML, flow style.
fn render_value(value: &ParamValue) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => render_string(s),
        Value::Sequence(items) => {
            let items: Vec<String> = items.iter().map(render_value).collect();
            format!("[{}]", items.join(", "))
        }
        Value::Mapping(mapping) => {
            let pairs: Vec<String> = mapping
                .iter()
                .map(|(k, v)| format!("{}: {}", render_value(k), render_value(v)))
                .collect();
            format!("{{{}}}", pairs.join(", "))
        }
        Value::Tagged(tagged) => render_value(&tagged.value),
    }
}

// Quote anything YAML would not read back as the same plain string. Single
// quotes cannot carry line breaks or control characters, so those strings get
// an escaped double-quoted scalar.
fn render_string(s: &str) -> String {
    if s.chars().any(char::is_control) {
        return double_quoted(s);
    }
    let reads_back = matches!(serde_yaml::from_str::<Value>(s), Ok(Value::String(ref parsed)) if parsed == s);
    if reads_back && !s.contains([',', '[', ']', '{', '}']) {
        s.to_string()
    } else {
        format!("'{}'", s.replace('\'', "''"))
    }
}

fn double_quoted(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ParameterSet, RemappingRule};

    fn worker(parameters: ParameterSet) -> WorkerSpec {
        WorkerSpec {
            package: "awsim_map_loader".into(),
            executable: "lanelet2_map_loader".into(),
            name: "lanelet2_map_loader".into(),
            namespace: "AWSIM".into(),
            output: OutputMode::Both,
            parameters,
            remappings: vec![
                RemappingRule::new("/map/map_projector_info", "map/map_projector_info"),
                RemappingRule::new("output/lanelet2_map", "map/vector_map"),
            ],
        }
    }

    #[test]
    fn test_worker_command_line() {
        let params: ParameterSet = [("lanelet2_map_path", "/maps/town.osm")].into_iter().collect();
        let line = CommandLine::for_worker(&worker(params), DEFAULT_ROS2_BIN);

        assert_eq!(line.program, "ros2");
        assert_eq!(
            line.args,
            vec![
                "run",
                "awsim_map_loader",
                "lanelet2_map_loader",
                "--ros-args",
                "-r",
                "__node:=lanelet2_map_loader",
                "-r",
                "__ns:=/AWSIM",
                "-p",
                "lanelet2_map_path:=/maps/town.osm",
                "-r",
                "/map/map_projector_info:=map/map_projector_info",
                "-r",
                "output/lanelet2_map:=map/vector_map",
            ]
        );
        assert_eq!(line.output, OutputMode::Both);
    }

    #[test]
    fn test_shell_process_runs_through_sh() {
        let line = CommandLine::for_process(&ShellCommand::shell("/opt/awsim/run.sh --flag"));
        assert_eq!(line.program, "sh");
        assert_eq!(line.args, vec!["-c", "/opt/awsim/run.sh --flag"]);
        assert_eq!(line.to_string(), "sh -c '/opt/awsim/run.sh --flag'");
    }

    #[test]
    fn test_non_shell_process_is_split() {
        let cmd = ShellCommand {
            command: "/opt/awsim/run.sh --flag".into(),
            shell: false,
        };
        let line = CommandLine::for_process(&cmd);
        assert_eq!(line.program, "/opt/awsim/run.sh");
        assert_eq!(line.args, vec!["--flag"]);
    }

    #[test]
    fn test_render_values() {
        assert_eq!(render_value(&Value::from(true)), "true");
        assert_eq!(render_value(&Value::from(3)), "3");
        assert_eq!(render_value(&Value::from(0.5)), "0.5");
        assert_eq!(render_value(&Value::from("plain")), "plain");
        assert_eq!(render_value(&Value::from("")), "''");
        assert_eq!(render_value(&Value::from("true")), "'true'");
        assert_eq!(render_value(&Value::from("10")), "'10'");
        assert_eq!(render_value(&Value::from("it's")), "it's");
        assert_eq!(render_value(&Value::from("a: b")), "'a: b'");
        assert_eq!(render_value(&Value::from(vec![1.0, 2.5])), "[1.0, 2.5]");
        assert_eq!(render_value(&Value::from(vec!["car", "bus"])), "[car, bus]");
    }

    #[test]
    fn test_multiline_strings_are_escaped() {
        let text = "first line\nsecond\t\"quoted\" \\ end\u{7}";
        let rendered = render_value(&Value::from(text));
        assert_eq!(rendered, r#""first line\nsecond\t\"quoted\" \\ end\u0007""#);
        assert!(!rendered.contains('\n'));

        let parsed: Value = serde_yaml::from_str(&rendered).unwrap();
        assert_eq!(parsed, Value::from(text));
    }

    #[test]
    fn test_nested_parameters_are_flattened() {
        let nested: Value = serde_yaml::from_str("lateral: {enable: true, threshold: 0.3}").unwrap();
        let mut out = Vec::new();
        flatten("lane_change_detection", &nested, &mut out);
        assert_eq!(
            out,
            vec![
                ("lane_change_detection.lateral.enable".to_string(), "true".to_string()),
                ("lane_change_detection.lateral.threshold".to_string(), "0.3".to_string()),
            ]
        );
    }

    #[test]
    fn test_empty_namespace_is_omitted() {
        let mut unnamespaced = worker(ParameterSet::new());
        unnamespaced.namespace.clear();
        let line = CommandLine::for_worker(&unnamespaced, "ros2");
        assert!(!line.args.iter().any(|a| a.starts_with("__ns:=")));
    }
}
