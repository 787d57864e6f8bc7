use crate::detection::domain::detection_parameters::ControlValues;

/// User-adjustable controls bound to the detection parameters.
///
/// Values are sampled once per loop iteration; only the latest position of
/// each control matters. Controls that can no longer be read report
/// negative positions (see [`ControlValues::is_detached`]).
pub trait ParameterControls {
    fn sample(&mut self) -> Result<ControlValues, Box<dyn std::error::Error>>;

    fn close(&mut self);
}
