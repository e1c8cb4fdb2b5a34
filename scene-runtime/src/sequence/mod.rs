//! # Sequence 模块
//!
//! 演出序列状态机：片段与推进引擎。
//!
//! ## 模块结构
//!
//! - [`segment`]：目标 × 效果的配对（演出最小单元）
//! - [`engine`]：带游标的推进状态机

pub mod engine;
pub mod segment;

pub use engine::Sequence;
pub use segment::Segment;
