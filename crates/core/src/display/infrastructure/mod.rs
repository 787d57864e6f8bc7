pub mod highgui_controls;
pub mod highgui_display;
