pub mod shared {
    pub mod constants;
    pub mod detected_face;
    pub mod frame;
    pub mod mat_interop;
    pub mod settings;
}

pub mod detection {
    pub mod domain {
        pub mod comparison_preset;
        pub mod detection_parameters;
        pub mod face_detector;
    }
    pub mod infrastructure;
}

pub mod capture {
    pub mod domain {
        pub mod frame_source;
    }
    pub mod infrastructure;
}

pub mod annotation {
    pub mod domain {
        pub mod annotation;
        pub mod frame_annotator;
    }
    pub mod infrastructure;
}

pub mod display {
    pub mod domain {
        pub mod frame_display;
        pub mod parameter_controls;
    }
    pub mod infrastructure;
}

pub mod pipeline {
    pub mod compare_parameters_use_case;
    pub mod grid;
    pub mod live_viewer_use_case;
    pub mod session_logger;
}
