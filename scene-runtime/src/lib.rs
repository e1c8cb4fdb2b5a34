//! # Scene Runtime
//!
//! 脚本化演出序列（过场动画）的核心运行时库。
//!
//! ## 架构概述
//!
//! `scene-runtime` 是纯逻辑核心，不依赖任何 IO 或渲染引擎。
//! 宿主层（Host）以固定或可变步长驱动序列，每帧读取实体状态绘制：
//!
//! ```text
//! Host                          Runtime
//!   │                              │
//!   │──── tick(dt) ──────────────►│  推进当前片段，最多衔接一次
//!   │──── raise_signal(id) ──────►│  满足等待外部信号的片段
//!   │──── advance() ─────────────►│  跳过：当前片段直接定格到终态
//!   │                              │
//!   │◄─── Target 状态（位置/透明度/文本/可见性）
//!   │                              │
//! ```
//!
//! ## 核心类型
//!
//! - [`Sequence`]：片段序列引擎，持有演出光标
//! - [`Segment`]：实体与效果的配对，一次只有一个片段处于活动状态
//! - [`Effect`]：声明式效果描述（移动、淡入淡出、文本、等待等）
//! - [`TargetRef`]：实体的共享句柄，宿主与序列各持一份
//!
//! ## 使用示例
//!
//! ```ignore
//! use scene_runtime::{Effect, Rect, Segment, Sequence, SpriteActor, TargetRef};
//!
//! let world = Rect::of_size(800.0, 600.0);
//! let hero = SpriteActor::new(0.0, 0.0);
//! let hero = std::rc::Rc::new(std::cell::RefCell::new(hero));
//!
//! let mut sequence = Sequence::new();
//! sequence.add_segment(Segment::new(
//!     TargetRef::plain(&hero),
//!     Effect::move_to_screen_center(&world, 2.0),
//! ));
//! sequence.start();
//!
//! // 主循环
//! loop {
//!     sequence.tick(dt);
//!     if sequence.is_finished() {
//!         break;
//!     }
//! }
//! ```
//!
//! ## 模块结构
//!
//! - [`effect`]：效果描述与构造函数
//! - [`sequence`]：片段与序列引擎
//! - [`target`]：实体抽象与共享句柄
//! - [`actor`]：实体实现（运动学、碰撞、对话框）
//! - [`script`]：外部 JSON 演出脚本的解析与装配
//! - [`geometry`]：2D 几何与 SAT 碰撞检测
//! - [`easing`]：插值缓动曲线
//! - [`error`]：错误类型定义

pub mod actor;
pub mod easing;
pub mod effect;
pub mod error;
pub mod geometry;
pub mod script;
pub mod sequence;
pub mod target;

mod running;

// 重导出核心类型
pub use actor::{DialogBox, SpriteActor};
pub use easing::Easing;
pub use effect::{Anchor, Effect, SignalId};
pub use error::{ScriptError, ScriptResult};
pub use geometry::{MinTranslation, Polygon, Rect, Vec2, overlap_convex_polygons};
pub use script::{Cast, ScriptStep, build_sequence, parse_steps};
pub use sequence::{Segment, Sequence};
pub use target::{Target, TargetRef, TextTarget};

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_public_api_accessible() {
        // 验证所有公共类型都可以正常使用
        let world = Rect::of_size(800.0, 600.0);

        let mut hero = SpriteActor::new(0.0, 0.0);
        hero.set_size(64.0, 64.0);
        let hero = Rc::new(RefCell::new(hero));

        let mut sequence = Sequence::new();
        sequence.add_segment(Segment::new(
            TargetRef::plain(&hero),
            Effect::move_to_screen_center(&world, 1.0),
        ));
        sequence.start();
        sequence.tick(1.0);

        assert!(sequence.is_finished());
        assert_eq!(hero.borrow().position(), Vec2::new(368.0, 0.0));
    }
}
