pub mod cascade_face_detector;
pub mod classifier_resolver;
