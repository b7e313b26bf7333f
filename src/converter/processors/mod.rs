//! 编译前后的处理器模块

pub mod batch_processor;
pub mod timing_validator;
