//! # Effect 模块
//!
//! 定义作用于目标对象的效果描述符。
//!
//! ## 设计原则
//!
//! - **纯数据**：`Effect` 只描述"做什么"，不持有任何目标引用，
//!   绑定到目标之前不产生任何副作用
//! - **可序列化**：演出脚本可以整体存为 JSON（见 [`crate::script`]）
//! - **解释分离**：每个描述符的完成判定、逐帧变化和强制完成语义
//!   由 crate 内部的解释器实现，效果本身可独立于任何渲染目标做单元测试
//!
//! ## 效果一览
//!
//! | 变体 | 类型 | 完成判定 |
//! |------|------|----------|
//! | `Move` / `FadeIn` / `FadeOut` | 时间插值 | 已流逝时间 ≥ duration |
//! | `Pause` | 零变化 | 已流逝时间 ≥ duration |
//! | `WaitForSignal` | 零变化 | 收到匹配信号 |
//! | `SetText` / `Show` / `Hide` | 离散一次性 | 绑定时立即生效并完成 |
//! | `Then` | 组合 | 后件完成 |

use serde::{Deserialize, Serialize};

use crate::easing::Easing;
use crate::geometry::Rect;

/// 信号标识符
///
/// 用于 `WaitForSignal` 效果：该效果不产生任何变化，
/// 只有外部（例如按键）触发匹配信号后才视为完成。
pub type SignalId = String;

/// 锚点：`Move` 的目标坐标指的是目标包围盒上的哪个点
///
/// 例如 `BottomRight` 配合 `(0, 0)` 表示把目标的右下角移动到原点，
/// 即目标整体移出屏幕左侧。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Anchor {
    /// 左下角（默认）
    #[default]
    BottomLeft,
    /// 底边中点
    Bottom,
    /// 右下角
    BottomRight,
    /// 左边中点
    Left,
    /// 中心
    Center,
    /// 右边中点
    Right,
    /// 左上角
    TopLeft,
    /// 顶边中点
    Top,
    /// 右上角
    TopRight,
}

impl Anchor {
    /// 锚点相对于包围盒左下角的偏移
    pub(crate) fn offset(self, width: f32, height: f32) -> (f32, f32) {
        let fx = match self {
            Anchor::BottomLeft | Anchor::Left | Anchor::TopLeft => 0.0,
            Anchor::Bottom | Anchor::Center | Anchor::Top => 0.5,
            Anchor::BottomRight | Anchor::Right | Anchor::TopRight => 1.0,
        };
        let fy = match self {
            Anchor::BottomLeft | Anchor::Bottom | Anchor::BottomRight => 0.0,
            Anchor::Left | Anchor::Center | Anchor::Right => 0.5,
            Anchor::TopLeft | Anchor::Top | Anchor::TopRight => 1.0,
        };
        (width * fx, height * fy)
    }
}

/// 效果描述符
///
/// 一个片段（Segment）携带一个 `Effect`，在片段启动时绑定到目标上。
/// 强制完成（跳过）时效果直接跳到终态：`Move` 落在精确目标点，
/// 淡入淡出落在终点透明度，离散效果保持已生效状态。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Effect {
    /// 在 `duration` 秒内把目标的 `anchor` 点移动到 `(x, y)`
    Move {
        x: f32,
        y: f32,
        #[serde(default)]
        anchor: Anchor,
        duration: f32,
        #[serde(default)]
        easing: Easing,
    },

    /// 等待 `duration` 秒，不产生任何变化
    Pause { duration: f32 },

    /// 等待外部信号，开放式等待（只能由信号或跳过解除）
    WaitForSignal { id: SignalId },

    /// 设置目标文本（离散一次性；目标必须支持文本能力）
    SetText { text: String },

    /// 显示目标（离散一次性）
    Show,

    /// 隐藏目标（离散一次性）
    Hide,

    /// 在 `duration` 秒内把透明度渐变到 1.0（起点为绑定时的当前值）
    FadeIn {
        duration: f32,
        #[serde(default)]
        easing: Easing,
    },

    /// 在 `duration` 秒内把透明度渐变到 0.0（起点为绑定时的当前值）
    FadeOut {
        duration: f32,
        #[serde(default)]
        easing: Easing,
    },

    /// 先运行前件到完成，再绑定并运行后件；整体的完成判定是后件完成
    Then(Box<Effect>, Box<Effect>),
}

impl Effect {
    /// 移动到 `(x, y)`（锚点为左下角）
    pub fn move_to(x: f32, y: f32, duration: f32) -> Self {
        Self::move_to_aligned(x, y, Anchor::BottomLeft, duration)
    }

    /// 移动到 `(x, y)`，坐标指向给定锚点
    pub fn move_to_aligned(x: f32, y: f32, anchor: Anchor, duration: f32) -> Self {
        Self::Move {
            x,
            y,
            anchor,
            duration,
            easing: Easing::default(),
        }
    }

    /// 等待指定秒数
    pub fn pause(duration: f32) -> Self {
        Self::Pause { duration }
    }

    /// 等待外部信号
    pub fn wait_for_signal(id: impl Into<SignalId>) -> Self {
        Self::WaitForSignal { id: id.into() }
    }

    /// 设置文本
    pub fn set_text(text: impl Into<String>) -> Self {
        Self::SetText { text: text.into() }
    }

    /// 显示
    pub fn show() -> Self {
        Self::Show
    }

    /// 隐藏
    pub fn hide() -> Self {
        Self::Hide
    }

    /// 淡入
    pub fn fade_in(duration: f32) -> Self {
        Self::FadeIn {
            duration,
            easing: Easing::default(),
        }
    }

    /// 淡出
    pub fn fade_out(duration: f32) -> Self {
        Self::FadeOut {
            duration,
            easing: Easing::default(),
        }
    }

    /// 顺序组合：`self` 完成后运行 `next`
    pub fn then(self, next: Effect) -> Self {
        Self::Then(Box::new(self), Box::new(next))
    }

    /// 设置缓动曲线（仅对携带缓动参数的变体生效）
    pub fn with_easing(mut self, value: Easing) -> Self {
        match &mut self {
            Self::Move { easing, .. }
            | Self::FadeIn { easing, .. }
            | Self::FadeOut { easing, .. } => *easing = value,
            _ => {}
        }
        self
    }

    // ── 屏幕对齐移动（对应原作的演出动作库；世界边界显式传入）──

    /// 移动到屏幕左下角
    pub fn move_to_screen_left(world: &Rect, duration: f32) -> Self {
        Self::move_to_aligned(world.x, world.y, Anchor::BottomLeft, duration)
    }

    /// 移动到屏幕底边中点
    pub fn move_to_screen_center(world: &Rect, duration: f32) -> Self {
        Self::move_to_aligned(world.x + world.width / 2.0, world.y, Anchor::Bottom, duration)
    }

    /// 移动到屏幕右下角
    pub fn move_to_screen_right(world: &Rect, duration: f32) -> Self {
        Self::move_to_aligned(world.x + world.width, world.y, Anchor::BottomRight, duration)
    }

    /// 移出屏幕左侧（右下角贴到屏幕左边缘）
    pub fn move_to_outside_left(world: &Rect, duration: f32) -> Self {
        Self::move_to_aligned(world.x, world.y, Anchor::BottomRight, duration)
    }

    /// 移出屏幕右侧（左下角贴到屏幕右边缘）
    pub fn move_to_outside_right(world: &Rect, duration: f32) -> Self {
        Self::move_to_aligned(world.x + world.width, world.y, Anchor::BottomLeft, duration)
    }

    /// 该效果（递归地）是否需要目标具备文本能力
    pub fn requires_text(&self) -> bool {
        match self {
            Self::SetText { .. } => true,
            Self::Then(first, second) => first.requires_text() || second.requires_text(),
            _ => false,
        }
    }
}
