//! # Running 模块
//!
//! 效果描述符的解释器：把纯数据的 [`Effect`] 绑定到目标后产生的
//! 运行期状态。
//!
//! ## 生命周期
//!
//! ```text
//! bind(effect, target)          捕获起点值、解析锚点终点，
//!                               离散效果立即生效
//!   │
//!   ▼
//! advance(dt, target) × N       逐帧推进；计时类效果在终点截断，
//!                               多余时间作为返回值流入组合的后件
//!   │
//!   ▼
//! complete(target)              显式终态跳转（强制完成），幂等；
//!                               不依赖"喂入巨大 dt"之类的数值约定
//! ```
//!
//! 完成判定 `is_finished` 一旦为真就保持为真：计时器只增不减，
//! 信号旗标只置位不复位。

use crate::easing::Easing;
use crate::effect::{Effect, SignalId};
use crate::geometry::Vec2;
use crate::target::TargetRef;

/// 绑定到目标后的运行期效果状态
#[derive(Debug)]
pub(crate) enum RunningEffect {
    /// 位置插值
    Move {
        from: Vec2,
        to: Vec2,
        duration: f32,
        easing: Easing,
        elapsed: f32,
    },
    /// 透明度插值
    Fade {
        from: f32,
        to: f32,
        duration: f32,
        easing: Easing,
        elapsed: f32,
    },
    /// 计时等待，零变化
    Pause { duration: f32, elapsed: f32 },
    /// 开放式等待，完成判定由外部信号置位
    WaitForSignal { id: SignalId, signaled: bool },
    /// 离散一次性效果，绑定时已生效
    OneShot,
    /// 顺序组合：前件完成后绑定后件
    Then {
        first: Box<RunningEffect>,
        next: Box<Effect>,
        second: Option<Box<RunningEffect>>,
    },
}

impl RunningEffect {
    /// 把效果绑定到目标
    ///
    /// 捕获插值起点（当前位置/透明度）、按目标尺寸解析 `Move` 的锚点
    /// 终点；离散效果立即生效。时长不大于零的计时效果直接跳到终态。
    pub(crate) fn bind(effect: &Effect, target: &TargetRef) -> Self {
        match effect {
            Effect::Move {
                x,
                y,
                anchor,
                duration,
                easing,
            } => {
                let (from, size) = target.with(|t| (t.position(), t.size()));
                let (ox, oy) = anchor.offset(size.x, size.y);
                let to = Vec2::new(x - ox, y - oy);
                if *duration <= 0.0 {
                    target.with(|t| t.set_position(to));
                }
                Self::Move {
                    from,
                    to,
                    duration: duration.max(0.0),
                    easing: *easing,
                    elapsed: 0.0,
                }
            }

            Effect::FadeIn { duration, easing } => Self::bind_fade(target, 1.0, *duration, *easing),
            Effect::FadeOut { duration, easing } => {
                Self::bind_fade(target, 0.0, *duration, *easing)
            }

            Effect::Pause { duration } => Self::Pause {
                duration: duration.max(0.0),
                elapsed: 0.0,
            },

            Effect::WaitForSignal { id } => Self::WaitForSignal {
                id: id.clone(),
                signaled: false,
            },

            Effect::SetText { text } => {
                // 能力检查在 Segment / script 构造期完成；
                // 运行到这里目标必然具备文本能力
                target.with_text(|t| t.set_text(text));
                Self::OneShot
            }

            Effect::Show => {
                target.with(|t| t.set_visible(true));
                Self::OneShot
            }

            Effect::Hide => {
                target.with(|t| t.set_visible(false));
                Self::OneShot
            }

            Effect::Then(first, second) => {
                let first = Box::new(Self::bind(first, target));
                // 前件在绑定时即完成（离散效果）则立刻绑定后件
                let bound_second = if first.is_finished() {
                    Some(Box::new(Self::bind(second, target)))
                } else {
                    None
                };
                Self::Then {
                    first,
                    next: second.clone(),
                    second: bound_second,
                }
            }
        }
    }

    fn bind_fade(target: &TargetRef, to: f32, duration: f32, easing: Easing) -> Self {
        let from = target.with(|t| t.opacity());
        if duration <= 0.0 {
            target.with(|t| t.set_opacity(to));
        }
        Self::Fade {
            from,
            to,
            duration: duration.max(0.0),
            easing,
            elapsed: 0.0,
        }
    }

    /// 逐帧推进
    ///
    /// 返回未被本效果消耗的时间：计时类效果在终点截断后把剩余 dt
    /// 交还调用者，使组合效果的后件能在同一帧内继续推进。
    pub(crate) fn advance(&mut self, dt: f32, target: &TargetRef) -> f32 {
        match self {
            Self::Move {
                from,
                to,
                duration,
                easing,
                elapsed,
            } => {
                let remaining = (*duration - *elapsed).max(0.0);
                if dt >= remaining {
                    *elapsed = *duration;
                    let end = *to;
                    target.with(|t| t.set_position(end));
                    dt - remaining
                } else {
                    *elapsed += dt;
                    let t01 = easing.apply(*elapsed / *duration);
                    let pos = from.lerp(*to, t01);
                    target.with(|t| t.set_position(pos));
                    0.0
                }
            }

            Self::Fade {
                from,
                to,
                duration,
                easing,
                elapsed,
            } => {
                let remaining = (*duration - *elapsed).max(0.0);
                if dt >= remaining {
                    *elapsed = *duration;
                    let end = *to;
                    target.with(|t| t.set_opacity(end));
                    dt - remaining
                } else {
                    *elapsed += dt;
                    let t01 = easing.apply(*elapsed / *duration);
                    let opacity = *from + (*to - *from) * t01;
                    target.with(|t| t.set_opacity(opacity));
                    0.0
                }
            }

            Self::Pause { duration, elapsed } => {
                let remaining = (*duration - *elapsed).max(0.0);
                if dt >= remaining {
                    *elapsed = *duration;
                    dt - remaining
                } else {
                    *elapsed += dt;
                    0.0
                }
            }

            Self::WaitForSignal { signaled, .. } => {
                if *signaled {
                    dt
                } else {
                    0.0
                }
            }

            Self::OneShot => dt,

            Self::Then {
                first,
                next,
                second,
            } => match second {
                Some(running) => running.advance(dt, target),
                None => {
                    let leftover = first.advance(dt, target);
                    if !first.is_finished() {
                        return 0.0;
                    }
                    let mut bound = Box::new(Self::bind(next, target));
                    let rest = bound.advance(leftover, target);
                    *second = Some(bound);
                    rest
                }
            },
        }
    }

    /// 完成判定
    pub(crate) fn is_finished(&self) -> bool {
        match self {
            Self::Move {
                duration, elapsed, ..
            }
            | Self::Fade {
                duration, elapsed, ..
            }
            | Self::Pause { duration, elapsed } => elapsed >= duration,
            Self::WaitForSignal { signaled, .. } => *signaled,
            Self::OneShot => true,
            Self::Then { second, .. } => second.as_ref().is_some_and(|s| s.is_finished()),
        }
    }

    /// 强制完成：目标直接跳到效果的终态
    ///
    /// 对已完成的效果调用是无操作（幂等）。组合效果先完成前件、
    /// 再绑定并完成后件，保证后件的起点捕获发生在前件终态之后。
    pub(crate) fn complete(&mut self, target: &TargetRef) {
        match self {
            Self::Move {
                to,
                duration,
                elapsed,
                ..
            } => {
                *elapsed = *duration;
                let end = *to;
                target.with(|t| t.set_position(end));
            }

            Self::Fade {
                to,
                duration,
                elapsed,
                ..
            } => {
                *elapsed = *duration;
                let end = *to;
                target.with(|t| t.set_opacity(end));
            }

            Self::Pause { duration, elapsed } => {
                *elapsed = *duration;
            }

            Self::WaitForSignal { signaled, .. } => {
                *signaled = true;
            }

            Self::OneShot => {}

            Self::Then {
                first,
                next,
                second,
            } => {
                if second.is_none() {
                    first.complete(target);
                    *second = Some(Box::new(Self::bind(next, target)));
                }
                if let Some(running) = second {
                    running.complete(target);
                }
            }
        }
    }

    /// 触发信号；匹配的开放式等待置位完成旗标
    pub(crate) fn raise_signal(&mut self, signal: &str) {
        match self {
            Self::WaitForSignal { id, signaled } => {
                if id == signal {
                    *signaled = true;
                }
            }
            Self::Then { first, second, .. } => match second {
                Some(running) => running.raise_signal(signal),
                None => first.raise_signal(signal),
            },
            _ => {}
        }
    }

    /// 当前正在等待的信号（若有）
    pub(crate) fn pending_signal(&self) -> Option<&SignalId> {
        match self {
            Self::WaitForSignal { id, signaled } if !signaled => Some(id),
            Self::Then { first, second, .. } => match second {
                Some(running) => running.pending_signal(),
                None => first.pending_signal(),
            },
            _ => None,
        }
    }
}
