pub mod composite;
pub mod frame;
pub mod pixmap;
pub mod recording;
pub mod surface;
