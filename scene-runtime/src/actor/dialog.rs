//! 对话框实体：在 [`SpriteActor`] 之上附加可显示文本。

use crate::geometry::Vec2;
use crate::target::{Target, TextTarget};

use super::SpriteActor;

/// 对话框
///
/// 演出序列中唯一承载文本的实体类型。位置、透明度等状态全部
/// 委托给内部的 [`SpriteActor`]，文本由宿主在渲染时读取。
pub struct DialogBox {
    base: SpriteActor,
    text: String,
}

impl DialogBox {
    /// 在给定位置创建对话框
    pub fn new(x: f32, y: f32) -> Self {
        let mut base = SpriteActor::new(x, y);
        base.set_size(600.0, 120.0);
        Self {
            base,
            text: String::new(),
        }
    }

    /// 调整对话框尺寸
    pub fn set_dialog_size(&mut self, width: f32, height: f32) {
        self.base.set_size(width, height);
    }

    /// 修改内部实体（定位、包围等操作）
    pub fn base_mut(&mut self) -> &mut SpriteActor {
        &mut self.base
    }
}

impl Target for DialogBox {
    fn position(&self) -> Vec2 {
        self.base.position()
    }

    fn set_position(&mut self, position: Vec2) {
        self.base.set_position(position);
    }

    fn size(&self) -> Vec2 {
        self.base.size()
    }

    fn opacity(&self) -> f32 {
        self.base.opacity()
    }

    fn set_opacity(&mut self, opacity: f32) {
        self.base.set_opacity(opacity);
    }

    fn is_visible(&self) -> bool {
        self.base.is_visible()
    }

    fn set_visible(&mut self, visible: bool) {
        self.base.set_visible(visible);
    }
}

impl TextTarget for DialogBox {
    fn text(&self) -> String {
        self.text.clone()
    }

    fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
    }
}
