//! # Engine 模块
//!
//! 演出序列的核心状态机。
//!
//! ## 执行模型
//!
//! ```text
//! NotStarted ──start()──► Running(0)
//! Running(i) ──tick: 片段 i 完成且 i < last──► Running(i+1)
//! Running(last) 且片段完成 ──► is_finished() == true（终态）
//! ```
//!
//! 推进步骤的顺序是唯一有讲究的地方：先对旧片段 `finish()`
//! （把进行中的插值钉到终态），再对新片段 `start()`。调用者在任何
//! 时刻最多观察到一个活动片段，强制完成的结果不会被下一个片段的
//! 绑定覆盖。

use crate::sequence::Segment;

/// 演出序列：带游标的有序片段列表
///
/// # 使用示例
///
/// ```ignore
/// let mut scene = Sequence::new();
/// scene.add_segment(Segment::new(TargetRef::plain(&bg), Effect::fade_in(1.0)));
/// scene.add_segment(Segment::new(TargetRef::plain(&turtle), Effect::move_to(400.0, 0.0, 2.0)));
/// scene.start();
///
/// loop {
///     scene.tick(dt);
///     if scene.is_finished() {
///         break;
///     }
/// }
/// ```
#[derive(Default)]
pub struct Sequence {
    segments: Vec<Segment>,
    /// `None` = 未启动；启动后为当前片段下标，只增不减，
    /// 永不超过 `segments.len() - 1`
    cursor: Option<usize>,
}

impl Sequence {
    /// 创建空序列
    pub fn new() -> Self {
        Self::default()
    }

    /// 按演出顺序追加片段
    pub fn add_segment(&mut self, segment: Segment) {
        self.segments.push(segment);
    }

    /// 清空片段并回到未启动状态
    pub fn clear_segments(&mut self) {
        self.segments.clear();
        self.cursor = None;
    }

    /// 片段数量
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// 当前片段下标（未启动时为 `None`）
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// 启动序列，立即开始第一个片段
    ///
    /// # Panics
    ///
    /// 空序列无法启动——这是构造期的程序错误。
    pub fn start(&mut self) {
        assert!(!self.segments.is_empty(), "无法启动空的演出序列");
        self.cursor = Some(0);
        self.segments[0].start();
    }

    /// 每帧推进
    ///
    /// 先推进当前片段的效果，然后做至多一次推进检查：当前片段已
    /// 完成且不是最后一个时，完成旧片段、启动下一个。未启动时无
    /// 操作。
    pub fn tick(&mut self, dt: f32) {
        let Some(index) = self.cursor else {
            return;
        };

        self.segments[index].tick(dt);

        if self.segments[index].is_finished() && !self.is_last_segment() {
            self.load_next_segment(index);
        }
    }

    /// 外部驱动的跳过：强制完成当前片段并启动下一个
    ///
    /// 已在最后一个片段上（无论其是否完成）或未启动时是无操作，
    /// 游标不会越界。
    pub fn advance(&mut self) {
        let Some(index) = self.cursor else {
            return;
        };
        if self.is_last_segment() {
            return;
        }
        self.load_next_segment(index);
    }

    /// 推进步骤：完成旧片段必须严格先于启动新片段
    fn load_next_segment(&mut self, index: usize) {
        self.segments[index].finish();
        let next = index + 1;
        self.cursor = Some(next);
        self.segments[next].start();
    }

    /// 当前片段是否已完成
    pub fn is_segment_finished(&self) -> bool {
        self.cursor
            .is_some_and(|index| self.segments[index].is_finished())
    }

    /// 当前是否已在最后一个片段上
    pub fn is_last_segment(&self) -> bool {
        self.cursor
            .is_some_and(|index| index + 1 >= self.segments.len())
    }

    /// 整个序列是否已完成（终态；一旦为真保持为真）
    pub fn is_finished(&self) -> bool {
        self.is_last_segment() && self.is_segment_finished()
    }

    /// 向当前片段投递信号
    pub fn raise_signal(&mut self, signal: &str) {
        if let Some(index) = self.cursor {
            self.segments[index].raise_signal(signal);
        }
    }

    /// 当前片段正在等待的信号（若有）
    pub fn pending_signal(&self) -> Option<&str> {
        self.cursor
            .and_then(|index| self.segments[index].pending_signal())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::Effect;
    use crate::geometry::Vec2;
    use crate::target::test_support::ProbeTarget;
    use crate::target::TargetRef;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn actor() -> Rc<RefCell<ProbeTarget>> {
        ProbeTarget::new(Vec2::new(100.0, 50.0))
    }

    #[test]
    fn test_start_begins_first_segment() {
        let a = actor();
        let mut scene = Sequence::new();
        scene.add_segment(Segment::new(TargetRef::plain(&a), Effect::move_to(10.0, 0.0, 1.0)));

        assert_eq!(scene.cursor(), None);
        assert!(!scene.is_finished());

        scene.start();
        assert_eq!(scene.cursor(), Some(0));

        scene.tick(0.5);
        assert_eq!(a.borrow().position, Vec2::new(5.0, 0.0));
    }

    #[test]
    #[should_panic(expected = "空的演出序列")]
    fn test_start_empty_panics() {
        Sequence::new().start();
    }

    #[test]
    fn test_tick_before_start_is_noop() {
        let a = actor();
        let mut scene = Sequence::new();
        scene.add_segment(Segment::new(TargetRef::plain(&a), Effect::move_to(10.0, 0.0, 1.0)));

        scene.tick(5.0);
        assert_eq!(scene.cursor(), None);
        assert_eq!(a.borrow().position, Vec2::ZERO);
    }

    #[test]
    fn test_cursor_is_monotone_and_bounded() {
        let a = actor();
        let mut scene = Sequence::new();
        for _ in 0..3 {
            scene.add_segment(Segment::new(TargetRef::plain(&a), Effect::pause(1.0)));
        }
        scene.start();

        let mut last_cursor = 0;
        for _ in 0..10 {
            scene.tick(0.7);
            let cursor = scene.cursor().unwrap();
            assert!(cursor >= last_cursor);
            assert!(cursor <= 2);
            last_cursor = cursor;
        }
        assert_eq!(last_cursor, 2);
        assert!(scene.is_finished());
    }

    #[test]
    fn test_finished_is_terminal() {
        let a = actor();
        let mut scene = Sequence::new();
        scene.add_segment(Segment::new(TargetRef::plain(&a), Effect::pause(0.5)));
        scene.start();

        assert!(!scene.is_finished());
        scene.tick(1.0);
        assert!(scene.is_finished());

        // 终态保持
        scene.tick(1.0);
        scene.advance();
        assert!(scene.is_finished());
        assert_eq!(scene.cursor(), Some(0));
    }

    #[test]
    fn test_one_advance_per_tick() {
        // 三个片段：[Pause(1s) on A, SetText on A, Show on B]
        // 一次 dt=1.5 的 tick：Pause 完成，SetText 立即生效并完成，
        // Show 尚未启动——B 的可见性保持不变，序列未完成。
        let a = actor();
        let b = actor();
        b.borrow_mut().visible = false;

        let mut scene = Sequence::new();
        scene.add_segment(Segment::new(TargetRef::plain(&a), Effect::pause(1.0)));
        scene.add_segment(Segment::new(TargetRef::text(&a), Effect::set_text("hi")));
        scene.add_segment(Segment::new(TargetRef::plain(&b), Effect::show()));
        scene.start();

        scene.tick(1.5);
        assert_eq!(a.borrow().text, "hi");
        assert!(!b.borrow().visible);
        assert_eq!(scene.cursor(), Some(1));
        assert!(!scene.is_finished());

        // 下一帧启动 Show；最后片段是离散效果，绑定即完成
        scene.tick(0.0);
        assert!(b.borrow().visible);
        assert_eq!(scene.cursor(), Some(2));
        assert!(scene.is_finished());
    }

    #[test]
    fn test_skip_snaps_move_to_destination_before_next_starts() {
        let a = actor();
        let b = actor();
        b.borrow_mut().opacity = 0.0;

        let mut scene = Sequence::new();
        scene.add_segment(Segment::new(TargetRef::plain(&a), Effect::move_to(100.0, 0.0, 10.0)));
        scene.add_segment(Segment::new(TargetRef::plain(&b), Effect::fade_in(1.0)));
        scene.add_segment(Segment::new(TargetRef::plain(&b), Effect::hide()));
        scene.start();

        scene.tick(0.5);
        assert_eq!(a.borrow().position, Vec2::new(5.0, 0.0));

        // 中途跳过：A 必须落在终点坐标而不是插值中点
        scene.advance();
        assert_eq!(a.borrow().position, Vec2::new(100.0, 0.0));
        assert_eq!(scene.cursor(), Some(1));
    }

    #[test]
    fn test_skip_on_last_segment_is_noop() {
        let a = actor();
        let mut scene = Sequence::new();
        scene.add_segment(Segment::new(TargetRef::plain(&a), Effect::pause(0.1)));
        scene.add_segment(Segment::new(TargetRef::plain(&a), Effect::move_to(50.0, 0.0, 10.0)));
        scene.start();

        scene.tick(0.2); // 进入最后一个片段
        scene.tick(1.0);
        assert_eq!(scene.cursor(), Some(1));
        assert!(!scene.is_finished());
        let mid = a.borrow().position;

        scene.advance();
        assert_eq!(scene.cursor(), Some(1));
        assert_eq!(a.borrow().position, mid);
        assert!(!scene.is_finished());
    }

    #[test]
    fn test_exactly_one_segment_active() {
        // 两个片段作用于同一目标：推进瞬间旧片段先钉到终态，
        // 新片段再捕获起点，不存在两个效果同时改写目标的时刻。
        let a = actor();
        let mut scene = Sequence::new();
        scene.add_segment(Segment::new(TargetRef::plain(&a), Effect::move_to(10.0, 0.0, 1.0)));
        scene.add_segment(Segment::new(TargetRef::plain(&a), Effect::move_to(0.0, 0.0, 1.0)));
        scene.start();

        scene.tick(1.0);
        // 旧片段终点即新片段起点
        assert_eq!(a.borrow().position, Vec2::new(10.0, 0.0));

        scene.tick(0.5);
        assert_eq!(a.borrow().position, Vec2::new(5.0, 0.0));
    }

    #[test]
    fn test_signal_driven_segment() {
        let a = actor();
        let mut scene = Sequence::new();
        scene.add_segment(Segment::new(
            TargetRef::plain(&a),
            Effect::wait_for_signal("continue"),
        ));
        scene.add_segment(Segment::new(TargetRef::plain(&a), Effect::hide()));
        scene.start();

        scene.tick(10.0);
        assert_eq!(scene.cursor(), Some(0));
        assert_eq!(scene.pending_signal(), Some("continue"));

        scene.raise_signal("continue");
        scene.tick(0.0);
        assert_eq!(scene.cursor(), Some(1));
        assert!(!a.borrow().visible);
    }

    #[test]
    fn test_story_sequence_end_to_end() {
        // 原作开场演出的缩影：背景淡入、角色入场、对话框出现、
        // 等待继续信号、角色退场、背景淡出。
        let background = actor();
        background.borrow_mut().opacity = 0.0;
        let turtle = actor();
        let dialog = actor();
        dialog.borrow_mut().visible = false;

        let mut scene = Sequence::new();
        scene.add_segment(Segment::new(TargetRef::plain(&background), Effect::fade_in(1.0)));
        scene.add_segment(Segment::new(TargetRef::plain(&turtle), Effect::move_to(350.0, 0.0, 2.0)));
        scene.add_segment(Segment::new(
            TargetRef::text(&dialog),
            Effect::show().then(Effect::set_text("I've got to collect them all!")),
        ));
        scene.add_segment(Segment::new(
            TargetRef::plain(&background),
            Effect::wait_for_signal("continue"),
        ));
        scene.add_segment(Segment::new(TargetRef::plain(&dialog), Effect::hide()));
        scene.add_segment(Segment::new(TargetRef::plain(&background), Effect::fade_out(1.0)));
        scene.start();

        let dt = 1.0 / 30.0;
        let mut elapsed = 0.0;
        while !scene.is_finished() && elapsed < 30.0 {
            scene.tick(dt);
            elapsed += dt;
            if scene.pending_signal() == Some("continue") {
                // 模拟玩家在等待点按键
                scene.raise_signal("continue");
            }
        }

        assert!(scene.is_finished());
        assert_eq!(background.borrow().opacity, 0.0);
        assert_eq!(turtle.borrow().position, Vec2::new(350.0, 0.0));
        assert_eq!(dialog.borrow().text, "I've got to collect them all!");
        assert!(!dialog.borrow().visible);
    }
}
