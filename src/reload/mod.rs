//! 重载策略模块
//!
//! 提供即时与周期性两种重载策略，以及执行周期重载的调度器

pub mod scheduler;
pub mod strategy;

pub use scheduler::ReloadScheduler;
pub use strategy::ReloadStrategy;
