//! 应用生命周期与运行模式

pub mod modes;
pub mod shutdown;
