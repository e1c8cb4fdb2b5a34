//! # Script 模块
//!
//! 把序列化的演出脚本绑定到已注册的目标上。
//!
//! ## 设计说明
//!
//! - [`Cast`] 是显式的目标注册表：宿主以名字注册目标及其能力，
//!   替代按类型名反射查找
//! - [`ScriptStep`] 是一行脚本数据：目标名 + 效果描述符，可整体
//!   从 JSON 反序列化
//! - [`build_sequence`] 在构建期完成所有校验（目标存在、文本能力
//!   匹配、非空），因此比直接构造 [`Segment`] 多一条可恢复的错误
//!   路径——适合加载外部数据
//!
//! ## 使用示例
//!
//! ```ignore
//! let mut cast = Cast::new();
//! cast.add("turtle", &turtle);
//! cast.add_text("dialog", &dialog);
//!
//! let steps = parse_steps(&std::fs::read_to_string("intro.json")?)?;
//! let mut scene = build_sequence(&cast, &steps)?;
//! scene.start();
//! ```

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::effect::Effect;
use crate::error::{ScriptError, ScriptResult};
use crate::sequence::{Segment, Sequence};
use crate::target::{Target, TargetRef, TextTarget};

/// 目标注册表
///
/// 名字到句柄的显式映射；句柄在注册时就带上了能力信息。
#[derive(Default)]
pub struct Cast {
    members: HashMap<String, TargetRef>,
}

impl Cast {
    /// 创建空注册表
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册普通目标
    pub fn add<T: Target + 'static>(&mut self, name: impl Into<String>, target: &Rc<RefCell<T>>) {
        self.members.insert(name.into(), TargetRef::plain(target));
    }

    /// 注册具备文本能力的目标
    pub fn add_text<T: TextTarget + 'static>(
        &mut self,
        name: impl Into<String>,
        target: &Rc<RefCell<T>>,
    ) {
        self.members.insert(name.into(), TargetRef::text(target));
    }

    /// 按名字查找句柄
    pub fn get(&self, name: &str) -> Option<&TargetRef> {
        self.members.get(name)
    }

    /// 已注册的目标数量
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// 一行演出脚本：目标名 + 效果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptStep {
    /// 目标在 [`Cast`] 中的注册名
    pub target: String,
    /// 作用于目标的效果
    pub effect: Effect,
}

impl ScriptStep {
    /// 创建脚本行
    pub fn new(target: impl Into<String>, effect: Effect) -> Self {
        Self {
            target: target.into(),
            effect,
        }
    }
}

/// 从 JSON 解析脚本行列表
pub fn parse_steps(json: &str) -> ScriptResult<Vec<ScriptStep>> {
    serde_json::from_str(json).map_err(|e| ScriptError::InvalidScript {
        message: e.to_string(),
    })
}

/// 把脚本行绑定到注册表，构建可运行的序列
///
/// 所有校验都发生在这里：目标必须已注册、文本效果的目标必须具备
/// 文本能力、脚本不能为空。校验通过后构造出的 [`Sequence`] 在运行
/// 期不会再产生这些错误。
pub fn build_sequence(cast: &Cast, steps: &[ScriptStep]) -> ScriptResult<Sequence> {
    if steps.is_empty() {
        return Err(ScriptError::EmptyScript);
    }

    let mut sequence = Sequence::new();
    for step in steps {
        let target = cast
            .get(&step.target)
            .ok_or_else(|| ScriptError::UnknownTarget {
                name: step.target.clone(),
            })?;

        if step.effect.requires_text() && !target.supports_text() {
            return Err(ScriptError::TextNotSupported {
                name: step.target.clone(),
            });
        }

        sequence.add_segment(Segment::new(target.clone(), step.effect.clone()));
    }
    Ok(sequence)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Vec2;
    use crate::target::test_support::ProbeTarget;

    /// 取出构建错误；`Sequence` 不可比较，断言只针对错误值
    fn build_err(cast: &Cast, steps: &[ScriptStep]) -> ScriptError {
        match build_sequence(cast, steps) {
            Ok(_) => panic!("构建应当失败"),
            Err(e) => e,
        }
    }

    fn cast_with_two_members() -> (Cast, Rc<RefCell<ProbeTarget>>, Rc<RefCell<ProbeTarget>>) {
        let turtle = ProbeTarget::new(Vec2::new(100.0, 50.0));
        let dialog = ProbeTarget::new(Vec2::new(600.0, 200.0));
        let mut cast = Cast::new();
        cast.add("turtle", &turtle);
        cast.add_text("dialog", &dialog);
        (cast, turtle, dialog)
    }

    #[test]
    fn test_build_and_run() {
        let (cast, turtle, dialog) = cast_with_two_members();
        let steps = vec![
            ScriptStep::new("turtle", Effect::move_to(10.0, 0.0, 1.0)),
            ScriptStep::new("dialog", Effect::set_text("你好")),
        ];

        let mut scene = build_sequence(&cast, &steps).unwrap();
        assert_eq!(scene.len(), 2);

        scene.start();
        scene.tick(1.0);
        scene.tick(0.0);
        assert!(scene.is_finished());
        assert_eq!(turtle.borrow().position, Vec2::new(10.0, 0.0));
        assert_eq!(dialog.borrow().text, "你好");
    }

    #[test]
    fn test_unknown_target() {
        let (cast, _, _) = cast_with_two_members();
        let steps = vec![ScriptStep::new("starfish", Effect::show())];

        assert_eq!(
            build_err(&cast, &steps),
            ScriptError::UnknownTarget {
                name: "starfish".to_string()
            }
        );
    }

    #[test]
    fn test_text_effect_requires_capability() {
        let (cast, _, _) = cast_with_two_members();
        // turtle 以普通目标注册，文本效果在构建期被拒绝
        let steps = vec![ScriptStep::new(
            "turtle",
            Effect::pause(1.0).then(Effect::set_text("hi")),
        )];

        assert_eq!(
            build_err(&cast, &steps),
            ScriptError::TextNotSupported {
                name: "turtle".to_string()
            }
        );
    }

    #[test]
    fn test_empty_script() {
        let (cast, _, _) = cast_with_two_members();
        assert_eq!(build_err(&cast, &[]), ScriptError::EmptyScript);
    }

    #[test]
    fn test_invalid_json() {
        let err = parse_steps("not json").unwrap_err();
        assert!(matches!(err, ScriptError::InvalidScript { .. }));
    }

    #[test]
    fn test_parse_steps_from_json() {
        let json = r#"[
            {"target": "background", "effect": {"FadeIn": {"duration": 1.0}}},
            {"target": "dialog", "effect": {"SetText": {"text": "hi"}}},
            {"target": "background", "effect": {"WaitForSignal": {"id": "continue"}}},
            {"target": "dialog", "effect": "Hide"}
        ]"#;

        let steps = parse_steps(json).unwrap();
        insta::assert_debug_snapshot!(steps, @r#"
        [
            ScriptStep {
                target: "background",
                effect: FadeIn {
                    duration: 1.0,
                    easing: Linear,
                },
            },
            ScriptStep {
                target: "dialog",
                effect: SetText {
                    text: "hi",
                },
            },
            ScriptStep {
                target: "background",
                effect: WaitForSignal {
                    id: "continue",
                },
            },
            ScriptStep {
                target: "dialog",
                effect: Hide,
            },
        ]
        "#);
    }

    #[test]
    fn test_step_roundtrip() {
        let step = ScriptStep::new("turtle", Effect::move_to(400.0, 0.0, 2.0));
        let json = serde_json::to_string(&step).unwrap();
        let back: ScriptStep = serde_json::from_str(&json).unwrap();
        assert_eq!(step, back);
    }
}
