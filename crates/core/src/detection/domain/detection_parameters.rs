use serde::{Deserialize, Serialize};

use crate::shared::constants::{
    INITIAL_MIN_NEIGHBORS, INITIAL_MIN_SIZE, INITIAL_SCALE_FACTOR, MIN_NEIGHBORS_FLOOR,
    MIN_SCALE_FACTOR, MIN_SIZE_CONTROL_MAX, MIN_SIZE_FLOOR, NEIGHBORS_CONTROL_MAX,
    SCALE_CONTROL_MAX,
};

/// Raw integer positions of the three parameter controls.
///
/// The scale control is expressed in tenths (13 means 1.3).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ControlValues {
    pub scale: i32,
    pub neighbors: i32,
    pub min_size: i32,
}

impl ControlValues {
    /// Negative positions mean the controls could not be read, e.g. after
    /// the user closed their window.
    pub fn is_detached(&self) -> bool {
        self.scale < 0 || self.neighbors < 0 || self.min_size < 0
    }
}

/// Arguments to one multi-scale cascade search.
///
/// Every constructor clamps to the valid range: `scale_factor >= 1.1`,
/// `min_neighbors >= 1`, and square `min_size` with sides `>= 20`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionParameters {
    pub scale_factor: f64,
    pub min_neighbors: i32,
    pub min_size: (i32, i32),
}

impl DetectionParameters {
    pub fn new(scale_factor: f64, min_neighbors: i32, min_size: i32) -> Self {
        Self {
            scale_factor: clamp_scale(scale_factor),
            min_neighbors: min_neighbors.max(MIN_NEIGHBORS_FLOOR),
            min_size: square(min_size),
        }
    }

    /// Derives parameters from raw control positions.
    pub fn from_controls(controls: ControlValues) -> Self {
        Self {
            scale_factor: scale_from_control(controls.scale),
            min_neighbors: neighbors_from_control(controls.neighbors),
            min_size: min_size_from_control(controls.min_size),
        }
    }

    /// Control positions that reproduce these parameters.
    pub fn to_controls(&self) -> ControlValues {
        ControlValues {
            scale: (self.scale_factor * 10.0).round() as i32,
            neighbors: self.min_neighbors,
            min_size: self.min_size.0,
        }
    }

    /// Brings an arbitrary value, e.g. one read back from a settings file,
    /// into the range the controls can represent. `min_size` is made square
    /// from its width.
    pub fn clamped(self) -> Self {
        let max_scale = SCALE_CONTROL_MAX as f64 / 10.0;
        Self {
            scale_factor: clamp_scale(self.scale_factor).min(max_scale),
            min_neighbors: self
                .min_neighbors
                .clamp(MIN_NEIGHBORS_FLOOR, NEIGHBORS_CONTROL_MAX),
            min_size: square(self.min_size.0.min(MIN_SIZE_CONTROL_MAX)),
        }
    }

    /// Replaces the parameters with the ones derived from `controls` and
    /// reports whether anything changed. Detached controls leave the
    /// parameters untouched.
    pub fn update_from_controls(&mut self, controls: ControlValues) -> bool {
        if controls.is_detached() {
            return false;
        }
        let next = Self::from_controls(controls);
        let changed = next != *self;
        *self = next;
        changed
    }
}

impl Default for DetectionParameters {
    fn default() -> Self {
        Self::new(INITIAL_SCALE_FACTOR, INITIAL_MIN_NEIGHBORS, INITIAL_MIN_SIZE)
    }
}

impl std::fmt::Display for DetectionParameters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "scale_factor={:.1} min_neighbors={} min_size={}x{}",
            self.scale_factor, self.min_neighbors, self.min_size.0, self.min_size.1
        )
    }
}

pub fn scale_from_control(raw: i32) -> f64 {
    clamp_scale(raw as f64 / 10.0)
}

pub fn neighbors_from_control(raw: i32) -> i32 {
    raw.max(MIN_NEIGHBORS_FLOOR)
}

pub fn min_size_from_control(raw: i32) -> (i32, i32) {
    square(raw)
}

fn clamp_scale(scale_factor: f64) -> f64 {
    if scale_factor.is_nan() {
        return MIN_SCALE_FACTOR;
    }
    scale_factor.max(MIN_SCALE_FACTOR)
}

fn square(side: i32) -> (i32, i32) {
    let side = side.max(MIN_SIZE_FLOOR);
    (side, side)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[rstest]
    #[case::typical(13, 1.3)]
    #[case::upper_bound(20, 2.0)]
    #[case::below_floor(5, 1.1)]
    #[case::zero(0, 1.1)]
    #[case::negative(-4, 1.1)]
    #[case::at_floor(11, 1.1)]
    fn test_scale_from_control(#[case] raw: i32, #[case] expected: f64) {
        assert_relative_eq!(scale_from_control(raw), expected);
    }

    #[rstest]
    #[case::zero(0, 1)]
    #[case::one(1, 1)]
    #[case::twenty(20, 20)]
    #[case::negative(-3, 1)]
    fn test_neighbors_from_control(#[case] raw: i32, #[case] expected: i32) {
        assert_eq!(neighbors_from_control(raw), expected);
    }

    #[rstest]
    #[case::below_floor(10, (20, 20))]
    #[case::typical(50, (50, 50))]
    #[case::upper_bound(100, (100, 100))]
    #[case::zero(0, (20, 20))]
    fn test_min_size_from_control(#[case] raw: i32, #[case] expected: (i32, i32)) {
        assert_eq!(min_size_from_control(raw), expected);
    }

    #[test]
    fn test_clamping_laws_hold_for_all_control_positions() {
        for raw in -10..=120 {
            let params = DetectionParameters::from_controls(ControlValues {
                scale: raw,
                neighbors: raw,
                min_size: raw,
            });
            assert!(params.scale_factor >= MIN_SCALE_FACTOR);
            assert!(params.min_neighbors >= 1);
            assert!(params.min_size.0 >= 20 && params.min_size.1 >= 20);
            assert_eq!(params.min_size.0, params.min_size.1);
        }
    }

    #[test]
    fn test_new_clamps_scale_at_or_below_one() {
        assert_relative_eq!(DetectionParameters::new(1.0, 3, 30).scale_factor, 1.1);
        assert_relative_eq!(DetectionParameters::new(0.5, 3, 30).scale_factor, 1.1);
        assert_relative_eq!(DetectionParameters::new(f64::NAN, 3, 30).scale_factor, 1.1);
    }

    #[test]
    fn test_default_matches_initial_viewer_parameters() {
        let params = DetectionParameters::default();
        assert_relative_eq!(params.scale_factor, 1.3);
        assert_eq!(params.min_neighbors, 5);
        assert_eq!(params.min_size, (30, 30));
    }

    #[test]
    fn test_to_controls_round_trips_defaults() {
        let params = DetectionParameters::default();
        let controls = params.to_controls();
        assert_eq!(
            controls,
            ControlValues {
                scale: 13,
                neighbors: 5,
                min_size: 30
            }
        );
        assert_eq!(DetectionParameters::from_controls(controls), params);
    }

    #[test]
    fn test_clamped_fixes_out_of_range_fields() {
        let raw = DetectionParameters {
            scale_factor: 0.9,
            min_neighbors: 0,
            min_size: (5, 40),
        };
        let params = raw.clamped();
        assert_relative_eq!(params.scale_factor, 1.1);
        assert_eq!(params.min_neighbors, 1);
        assert_eq!(params.min_size, (20, 20));
    }

    #[test]
    fn test_clamped_caps_at_control_range() {
        let raw = DetectionParameters {
            scale_factor: 3.5,
            min_neighbors: 40,
            min_size: (150, 60),
        };
        let params = raw.clamped();
        assert_relative_eq!(params.scale_factor, 2.0);
        assert_eq!(params.min_neighbors, 20);
        assert_eq!(params.min_size, (100, 100));
        // Every clamped value survives a trip through the controls.
        assert_eq!(DetectionParameters::from_controls(params.to_controls()), params);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let params: DetectionParameters =
            serde_json::from_str(r#"{ "scale_factor": 1.5 }"#).unwrap();
        assert_relative_eq!(params.scale_factor, 1.5);
        assert_eq!(params.min_neighbors, 5);
        assert_eq!(params.min_size, (30, 30));
    }

    #[rstest]
    #[case::scale(ControlValues { scale: -1, neighbors: 5, min_size: 30 })]
    #[case::neighbors(ControlValues { scale: 13, neighbors: -1, min_size: 30 })]
    #[case::all(ControlValues { scale: -1, neighbors: -1, min_size: -1 })]
    fn test_detached_controls_keep_parameters(#[case] controls: ControlValues) {
        let mut params = DetectionParameters::new(1.5, 8, 60);
        assert!(controls.is_detached());
        assert!(!params.update_from_controls(controls));
        assert_eq!(params, DetectionParameters::new(1.5, 8, 60));
    }

    #[test]
    fn test_update_from_controls_reports_change() {
        let mut params = DetectionParameters::default();
        let same = params.to_controls();
        assert!(!params.update_from_controls(same));
        assert!(params.update_from_controls(ControlValues {
            scale: 15,
            neighbors: 5,
            min_size: 30,
        }));
        assert_relative_eq!(params.scale_factor, 1.5);
    }

    #[test]
    fn test_display_uses_one_decimal() {
        let params = DetectionParameters::new(1.3, 5, 30);
        assert_eq!(
            params.to_string(),
            "scale_factor=1.3 min_neighbors=5 min_size=30x30"
        );
    }
}
