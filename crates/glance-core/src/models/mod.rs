//! 도메인 모델.

pub mod analysis;
pub mod command;
pub mod frame;
pub mod scene;
pub mod text;
