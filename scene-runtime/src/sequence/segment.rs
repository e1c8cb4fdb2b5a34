//! # Segment 模块
//!
//! 演出的最小单元：一个目标与一个效果的配对。

use crate::effect::Effect;
use crate::running::RunningEffect;
use crate::target::TargetRef;

/// 演出片段
///
/// 构造后配对关系不可变；`start` 把效果绑定到目标并开始运行，
/// 重复 `start` 会丢弃旧绑定重新开始。同一时刻一个目标最多被一个
/// 活动效果改写，这一不变量由持有片段的 [`Sequence`] 串行化保证。
///
/// [`Sequence`]: crate::sequence::Sequence
pub struct Segment {
    target: TargetRef,
    effect: Effect,
    running: Option<RunningEffect>,
}

impl Segment {
    /// 创建片段
    ///
    /// # Panics
    ///
    /// 效果需要文本能力而目标不具备时 panic：这是演出构造期的
    /// 程序错误，不是可恢复的运行期状况。需要错误返回值的路径
    /// （外部脚本数据）走 [`crate::script::build_sequence`]。
    pub fn new(target: TargetRef, effect: Effect) -> Self {
        assert!(
            !effect.requires_text() || target.supports_text(),
            "文本效果要求目标实现 TextTarget：{effect:?}"
        );
        Self {
            target,
            effect,
            running: None,
        }
    }

    /// 启动片段：绑定效果并开始运行
    ///
    /// 离散效果（`SetText` / `Show` / `Hide`）在绑定的同一时刻生效。
    pub fn start(&mut self) {
        self.running = Some(RunningEffect::bind(&self.effect, &self.target));
    }

    /// 逐帧推进已绑定的效果；未启动时无操作
    pub fn tick(&mut self, dt: f32) {
        if let Some(running) = &mut self.running {
            running.advance(dt, &self.target);
        }
    }

    /// 片段是否已完成（未启动的片段视为未完成）
    pub fn is_finished(&self) -> bool {
        self.running.as_ref().is_some_and(RunningEffect::is_finished)
    }

    /// 强制完成：目标直接跳到效果终态
    ///
    /// 幂等；对已完成或未启动的片段调用不产生额外变化。
    pub fn finish(&mut self) {
        if let Some(running) = &mut self.running {
            running.complete(&self.target);
        }
    }

    /// 向运行中的效果投递信号
    pub fn raise_signal(&mut self, signal: &str) {
        if let Some(running) = &mut self.running {
            running.raise_signal(signal);
        }
    }

    /// 当前正在等待的信号（若有）
    pub fn pending_signal(&self) -> Option<&str> {
        self.running
            .as_ref()
            .and_then(RunningEffect::pending_signal)
            .map(String::as_str)
    }

    /// 片段携带的效果描述符
    pub fn effect(&self) -> &Effect {
        &self.effect
    }
}
