//! Runtime launch arguments.
//!
//! Arguments arrive as `name:=value` pairs (or CLI flags that map onto the same
//! names). Values are never interpreted: an empty path is still a path as far
//! as this crate is concerned, and the process receiving it decides.

use std::collections::BTreeMap;
use tracing::warn;

/// Path of the lanelet2 map handed to the map loader and map projection nodes.
pub const LANELET2_MAP_PATH: &str = "lanelet2_map_path";

/// Command line that starts the simulator.
pub const AWSIM_PATH: &str = "AWSIM_path";

/// A launch argument this launcher knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaunchArgument {
    pub name: &'static str,
    pub description: &'static str,
}

pub const DECLARED_ARGUMENTS: &[LaunchArgument] = &[
    LaunchArgument {
        name: LANELET2_MAP_PATH,
        description: "Path to the lanelet2 map file (.osm)",
    },
    LaunchArgument {
        name: AWSIM_PATH,
        description: "Command line that starts the AWSIM simulator, run through a shell",
    },
];

pub fn is_declared(name: &str) -> bool {
    DECLARED_ARGUMENTS.iter().any(|arg| arg.name == name)
}

/// Runtime values for launch arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchArgs {
    values: BTreeMap<String, String>,
}

impl LaunchArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        if !is_declared(&name) {
            warn!(argument = %name, "Launch argument is not declared by this launcher");
        }
        self.values.insert(name, value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Value of `name`, or the empty string when it was never supplied.
    pub fn resolve(&self, name: &str) -> String {
        match self.get(name) {
            Some(value) => value.to_string(),
            None => {
                warn!(argument = name, "Launch argument not set, passing an empty value");
                String::new()
            }
        }
    }
}

/// A single `name:=value` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub name: String,
    pub value: String,
}

impl std::str::FromStr for Assignment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, value) = s
            .split_once(":=")
            .ok_or_else(|| format!("expected `name:=value`, got `{}`", s))?;
        if name.is_empty() {
            return Err(format!("missing argument name in `{}`", s));
        }
        Ok(Self {
            name: name.to_string(),
            value: value.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_assignment() {
        let a: Assignment = "lanelet2_map_path:=/maps/town.osm".parse().unwrap();
        assert_eq!(a.name, "lanelet2_map_path");
        assert_eq!(a.value, "/maps/town.osm");
    }

    #[test]
    fn test_parse_assignment_keeps_value_verbatim() {
        let a: Assignment = "AWSIM_path:=/opt/awsim/run.sh --headless a:=b".parse().unwrap();
        assert_eq!(a.value, "/opt/awsim/run.sh --headless a:=b");

        let empty: Assignment = "AWSIM_path:=".parse().unwrap();
        assert_eq!(empty.value, "");
    }

    #[test]
    fn test_parse_assignment_rejects_malformed() {
        assert!("lanelet2_map_path=/maps".parse::<Assignment>().is_err());
        assert!(":=/maps".parse::<Assignment>().is_err());
    }

    #[test]
    fn test_absent_argument_resolves_empty() {
        let args = LaunchArgs::new().with(AWSIM_PATH, "/opt/awsim/run.sh");
        assert_eq!(args.resolve(AWSIM_PATH), "/opt/awsim/run.sh");
        assert_eq!(args.resolve(LANELET2_MAP_PATH), "");
        assert_eq!(args.get(LANELET2_MAP_PATH), None);
    }

    #[test]
    fn test_later_value_replaces_earlier() {
        let args = LaunchArgs::new()
            .with(LANELET2_MAP_PATH, "/a.osm")
            .with(LANELET2_MAP_PATH, "/b.osm");
        assert_eq!(args.get(LANELET2_MAP_PATH), Some("/b.osm"));
    }

    #[test]
    fn test_declared_arguments() {
        assert!(is_declared(LANELET2_MAP_PATH));
        assert!(is_declared(AWSIM_PATH));
        assert!(!is_declared("use_sim_time"));
    }
}
