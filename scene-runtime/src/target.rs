//! # Target 模块
//!
//! 定义效果作用的目标对象抽象。
//!
//! ## 设计说明
//!
//! - [`Target`] 是所有可演出对象的最小状态面：位置、尺寸、透明度、可见性
//! - [`TextTarget`] 是文本能力的扩展 trait；文本效果只能绑定到实现了
//!   该 trait 的目标上，能力检查发生在构造期而不是运行期向下转型
//! - [`TargetRef`] 是片段持有的不透明句柄。单线程协作式模型下使用
//!   `Rc<RefCell<...>>` 共享：宿主保留自己的句柄以观察状态，
//!   片段通过句柄施加变化。句柄始终有效，"目标缺失"在类型层面不可表达

use std::cell::RefCell;
use std::rc::Rc;

use crate::geometry::Vec2;

/// 可演出对象的状态面
///
/// 效果解释器只通过这些访问器读写目标，不假设目标的具体类型。
pub trait Target {
    /// 当前位置（包围盒左下角）
    fn position(&self) -> Vec2;

    /// 设置位置
    fn set_position(&mut self, position: Vec2);

    /// 包围盒尺寸（用于锚点换算）
    fn size(&self) -> Vec2;

    /// 当前透明度 (0.0 - 1.0)
    fn opacity(&self) -> f32;

    /// 设置透明度
    fn set_opacity(&mut self, opacity: f32);

    /// 是否可见
    fn is_visible(&self) -> bool;

    /// 设置可见性
    fn set_visible(&mut self, visible: bool);
}

/// 文本能力
///
/// 对话框等携带文本的目标实现此 trait，`SetText` 效果要求它。
pub trait TextTarget: Target {
    /// 当前文本
    fn text(&self) -> String;

    /// 设置文本
    fn set_text(&mut self, text: &str);
}

/// 目标句柄
///
/// 片段持有的共享引用。构造期即区分是否具备文本能力：
/// [`TargetRef::text`] 只接受 `T: TextTarget`，因此把文本效果绑定到
/// 普通目标在构造时就会被拒绝。
#[derive(Clone)]
pub enum TargetRef {
    /// 普通目标
    Plain(Rc<RefCell<dyn Target>>),
    /// 具备文本能力的目标
    Text(Rc<RefCell<dyn TextTarget>>),
}

impl TargetRef {
    /// 从普通目标创建句柄
    pub fn plain<T: Target + 'static>(target: &Rc<RefCell<T>>) -> Self {
        Self::Plain(target.clone() as Rc<RefCell<dyn Target>>)
    }

    /// 从文本目标创建句柄
    pub fn text<T: TextTarget + 'static>(target: &Rc<RefCell<T>>) -> Self {
        Self::Text(target.clone() as Rc<RefCell<dyn TextTarget>>)
    }

    /// 是否具备文本能力
    pub fn supports_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }

    /// 以 `Target` 视角访问目标
    pub(crate) fn with<R>(&self, f: impl FnOnce(&mut dyn Target) -> R) -> R {
        match self {
            Self::Plain(target) => f(&mut *target.borrow_mut()),
            Self::Text(target) => f(&mut *target.borrow_mut()),
        }
    }

    /// 以 `TextTarget` 视角访问目标；普通目标返回 `None`
    pub(crate) fn with_text<R>(&self, f: impl FnOnce(&mut dyn TextTarget) -> R) -> Option<R> {
        match self {
            Self::Plain(_) => None,
            Self::Text(target) => Some(f(&mut *target.borrow_mut())),
        }
    }
}

impl std::fmt::Debug for TargetRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Plain(_) => f.write_str("TargetRef::Plain"),
            Self::Text(_) => f.write_str("TargetRef::Text"),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::ProbeTarget;
    use super::*;

    #[test]
    fn test_capability_tagging() {
        let probe = ProbeTarget::new(Vec2::new(10.0, 10.0));

        let plain = TargetRef::plain(&probe);
        assert!(!plain.supports_text());
        assert!(plain.with_text(|t| t.set_text("x")).is_none());

        let text = TargetRef::text(&probe);
        assert!(text.supports_text());
        assert!(text.with_text(|t| t.set_text("你好")).is_some());
        assert_eq!(probe.borrow().text, "你好");
    }

    #[test]
    fn test_shared_handle_sees_mutation() {
        let probe = ProbeTarget::new(Vec2::new(4.0, 4.0));
        let handle = TargetRef::plain(&probe);

        handle.with(|t| t.set_position(Vec2::new(7.0, 8.0)));
        // 宿主保留的 Rc 与句柄指向同一对象
        assert_eq!(probe.borrow().position, Vec2::new(7.0, 8.0));
    }
}
