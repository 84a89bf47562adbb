//! Host device adapters: camera, photo storage, telephony hand-off.

pub mod camera;
pub mod capture_dir;
pub mod handoff;
