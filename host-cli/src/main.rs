//! 演出序列命令行宿主
//!
//! 以固定步长驱动 `scene-runtime`，把对话文本打印到终端。
//! 不带参数时播放内置演示；`--script` 可加载外部 JSON 演出脚本。
//!
//! ## 用法
//!
//! ```bash
//! cargo run -p host-cli
//! cargo run -p host-cli -- --auto
//! cargo run -p host-cli -- --script intro.json --fps 60
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use scene_runtime::{
    Cast, DialogBox, Effect, Rect, Segment, Sequence, SpriteActor, Target, TargetRef, TextTarget,
    build_sequence, parse_steps,
};
use std::cell::RefCell;
use std::io::BufRead;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "scene-host")]
#[command(about = "演出序列命令行宿主 - 在终端播放过场动画")]
#[command(version)]
struct Cli {
    /// 模拟帧率
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// 自动模式：等待外部信号的片段直接放行，帧间不等待真实时间
    #[arg(long)]
    auto: bool,

    /// 演出脚本（JSON）；省略时播放内置演示
    #[arg(long)]
    script: Option<PathBuf>,

    /// 最长运行秒数，超出后逐段跳到结尾
    #[arg(long, default_value_t = 120.0)]
    max_seconds: f32,
}

/// 演出中的全部实体；宿主与序列各持一份句柄
struct Stage {
    world: Rect,
    background: Rc<RefCell<SpriteActor>>,
    turtle: Rc<RefCell<SpriteActor>>,
    dialog: Rc<RefCell<DialogBox>>,
    continue_key: Rc<RefCell<SpriteActor>>,
}

impl Stage {
    fn new() -> Self {
        let world = Rect::of_size(800.0, 600.0);

        let mut background = SpriteActor::new(0.0, 0.0);
        background.set_size(800.0, 600.0);
        background.set_opacity(0.0);

        let mut turtle = SpriteActor::new(0.0, 0.0);
        turtle.set_size(64.0, 64.0);
        turtle.set_position(scene_runtime::Vec2::new(-64.0, 0.0));

        let mut dialog = DialogBox::new(100.0, 0.0);
        dialog.set_dialog_size(600.0, 200.0);
        dialog.set_visible(false);

        let mut continue_key = SpriteActor::new(668.0, 0.0);
        continue_key.set_size(32.0, 32.0);
        continue_key.set_visible(false);

        Self {
            world,
            background: Rc::new(RefCell::new(background)),
            turtle: Rc::new(RefCell::new(turtle)),
            dialog: Rc::new(RefCell::new(dialog)),
            continue_key: Rc::new(RefCell::new(continue_key)),
        }
    }

    /// 注册表：外部脚本按名字引用这些实体
    fn cast(&self) -> Cast {
        let mut cast = Cast::new();
        cast.add("background", &self.background);
        cast.add("turtle", &self.turtle);
        cast.add_text("dialog", &self.dialog);
        cast.add("key", &self.continue_key);
        cast
    }

    /// 内置演示：开场过场动画
    fn demo_sequence(&self) -> Sequence {
        let world = &self.world;
        let mut scene = Sequence::new();

        scene.add_segment(Segment::new(
            TargetRef::plain(&self.background),
            Effect::fade_in(1.0),
        ));
        scene.add_segment(Segment::new(
            TargetRef::plain(&self.turtle),
            Effect::move_to_screen_center(world, 2.0),
        ));
        scene.add_segment(Segment::new(TargetRef::text(&self.dialog), Effect::show()));
        scene.add_segment(Segment::new(
            TargetRef::text(&self.dialog),
            Effect::set_text("I want to be the very best . . . Starfish Collector!"),
        ));
        scene.add_segment(Segment::new(
            TargetRef::plain(&self.continue_key),
            Effect::show(),
        ));
        scene.add_segment(Segment::new(
            TargetRef::plain(&self.background),
            Effect::wait_for_signal("continue"),
        ));
        scene.add_segment(Segment::new(
            TargetRef::plain(&self.continue_key),
            Effect::hide(),
        ));
        scene.add_segment(Segment::new(
            TargetRef::text(&self.dialog),
            Effect::set_text("I've got to collect them all!"),
        ));
        scene.add_segment(Segment::new(
            TargetRef::plain(&self.continue_key),
            Effect::show(),
        ));
        scene.add_segment(Segment::new(
            TargetRef::plain(&self.background),
            Effect::wait_for_signal("continue"),
        ));
        scene.add_segment(Segment::new(
            TargetRef::plain(&self.continue_key),
            Effect::hide(),
        ));
        scene.add_segment(Segment::new(TargetRef::text(&self.dialog), Effect::hide()));
        scene.add_segment(Segment::new(
            TargetRef::plain(&self.turtle),
            Effect::move_to_outside_right(world, 2.0),
        ));
        scene.add_segment(Segment::new(
            TargetRef::plain(&self.background),
            Effect::fade_out(2.0),
        ));

        scene
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let cli = Cli::parse();
    let stage = Stage::new();

    let mut scene = match &cli.script {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("无法读取演出脚本: {}", path.display()))?;
            let steps = parse_steps(&json).context("演出脚本解析失败")?;
            build_sequence(&stage.cast(), &steps).context("演出脚本装配失败")?
        }
        None => stage.demo_sequence(),
    };

    info!(segments = scene.len(), fps = cli.fps, "开始播放演出序列");
    scene.start();
    play(&mut scene, &stage, &cli)?;
    info!("演出结束");
    Ok(())
}

/// 主循环：固定步长推进，等待信号时读取标准输入
fn play(scene: &mut Sequence, stage: &Stage, cli: &Cli) -> Result<()> {
    let dt = 1.0 / cli.fps as f32;
    let mut elapsed = 0.0_f32;
    let mut last_cursor = scene.cursor();
    let mut last_line = String::new();

    while !scene.is_finished() {
        // 超时后不再等待任何输入：逐段定格收尾，信号等待直接放行
        let timed_out = elapsed > cli.max_seconds;
        if timed_out {
            scene.advance();
        }

        if let Some(id) = scene.pending_signal() {
            let id = id.to_string();
            if !cli.auto && !timed_out {
                wait_for_enter()?;
            }
            scene.raise_signal(&id);
        }

        scene.tick(dt);
        elapsed += dt;

        if scene.cursor() != last_cursor {
            last_cursor = scene.cursor();
            debug!(cursor = ?last_cursor, "进入下一片段");
        }

        // 对话文本变化时打印一行
        let dialog = stage.dialog.borrow();
        if dialog.is_visible() && dialog.text() != last_line && !dialog.text().is_empty() {
            last_line = dialog.text();
            println!("{last_line}");
        }
        drop(dialog);

        if !cli.auto && !timed_out {
            std::thread::sleep(Duration::from_secs_f32(dt));
        }
    }
    Ok(())
}

fn wait_for_enter() -> Result<()> {
    println!("[按回车继续]");
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("读取标准输入失败")?;
    Ok(())
}
