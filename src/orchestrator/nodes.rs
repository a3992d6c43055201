//! The fixed set of nodes started next to the simulator.

/// Namespace every node runs in unless overridden.
pub const DEFAULT_NAMESPACE: &str = "AWSIM";

/// Static identity and wiring of one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeDescriptor {
    pub package: &'static str,
    pub executable: &'static str,
    pub name: &'static str,
    /// Parameter file, relative to the package share directory.
    pub params_file: &'static str,
    /// `(declared, effective)` topic pairs.
    pub remappings: &'static [(&'static str, &'static str)],
    /// Whether the node receives the `lanelet2_map_path` launch argument.
    pub takes_map_path: bool,
}

impl NodeDescriptor {
    /// File name of the parameter file, without its directory.
    pub fn params_file_name(&self) -> &'static str {
        self.params_file.rsplit('/').next().unwrap_or(self.params_file)
    }
}

pub const PREDICTION: NodeDescriptor = NodeDescriptor {
    package: "awsim_map_based_prediction",
    executable: "map_based_prediction",
    name: "map_based_prediction",
    params_file: "config/map_based_prediction.param.yaml",
    remappings: &[
        ("/vector_map", "map/vector_map"),
        ("/traffic_signals", "perception/traffic_light_recognition/traffic_signals"),
        ("~/output/objects", "perception/object_recognition/objects"),
        ("~/input/objects", "perception/object_recognition/tracking/objects"),
    ],
    takes_map_path: false,
};

pub const MAP_LOADER: NodeDescriptor = NodeDescriptor {
    package: "awsim_map_loader",
    executable: "lanelet2_map_loader",
    name: "lanelet2_map_loader",
    params_file: "config/lanelet2_map_loader.param.yaml",
    remappings: &[
        ("/map/map_projector_info", "map/map_projector_info"),
        ("output/lanelet2_map", "map/vector_map"),
    ],
    takes_map_path: true,
};

pub const MAP_PROJECTION: NodeDescriptor = NodeDescriptor {
    package: "awsim_map_projection_loader",
    executable: "awsim_map_projection_loader_node",
    name: "map_projection_loader",
    params_file: "config/map_projection_loader.param.yaml",
    remappings: &[("/map/map_projector_info", "map/map_projector_info")],
    takes_map_path: true,
};

/// Start order of the managed nodes. The simulator always follows them.
pub const NODES: [NodeDescriptor; 3] = [PREDICTION, MAP_LOADER, MAP_PROJECTION];
