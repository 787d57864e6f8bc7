use crate::detection::domain::detection_parameters::DetectionParameters;

/// A labelled parameter set shown as one tile of the comparison grid.
#[derive(Clone, Debug, PartialEq)]
pub struct ComparisonPreset {
    pub parameters: DetectionParameters,
    pub label: String,
}

impl ComparisonPreset {
    /// Builds a preset labelled `SF: <scale>, MN: <neighbors>`.
    pub fn new(scale_factor: f64, min_neighbors: i32, min_size: i32) -> Self {
        let parameters = DetectionParameters::new(scale_factor, min_neighbors, min_size);
        let label = format!(
            "SF: {:.1}, MN: {}",
            parameters.scale_factor, parameters.min_neighbors
        );
        Self { parameters, label }
    }

    /// The four presets of the comparison grid, in tile order: a sensitive
    /// baseline, the viewer default, a coarse scale step and a strict
    /// neighbour threshold.
    pub fn standard_set() -> Vec<ComparisonPreset> {
        vec![
            ComparisonPreset::new(1.1, 3, 30),
            ComparisonPreset::new(1.3, 5, 30),
            ComparisonPreset::new(1.5, 3, 30),
            ComparisonPreset::new(1.3, 8, 30),
        ]
    }
}
