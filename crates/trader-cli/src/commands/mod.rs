//! CLI 명령어 구현 모듈.

pub mod account;
pub mod market;
pub mod paper;
