//! 열분해 공정 디지털 트윈 코어. 계산 로직을 라이브러리로 분리해 CLI와 대시보드 어댑터가 함께 쓴다.

pub mod app;
pub mod composition;
pub mod config;
pub mod cost;
pub mod error;
pub mod fleet;
pub mod process;
pub mod profile;
pub mod reactor;
pub mod snapshot;

pub use error::{TwinError, TwinResult};
