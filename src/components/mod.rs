pub mod controls;
pub mod diagram;
pub mod mobile;
pub mod project_overlay;
pub mod upcoming_modal;
