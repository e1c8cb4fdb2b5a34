//! # Actor 模块
//!
//! 可被演出序列驱动的实体实现：
//!
//! - [`SpriteActor`]：通用 2D 实体，带运动学与凸多边形碰撞
//! - [`DialogBox`]：附加文本能力的对话框
//!
//! 两者都实现 [`crate::target::Target`]，通过
//! [`crate::target::TargetRef`] 交给序列引擎驱动。

pub mod dialog;
pub mod sprite;

pub use dialog::DialogBox;
pub use sprite::SpriteActor;
