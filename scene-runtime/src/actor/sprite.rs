//! # Sprite 模块
//!
//! 通用 2D 演出实体：变换状态、运动学积分、凸多边形碰撞。
//!
//! 渲染不在本 crate 的职责范围内：`SpriteActor` 只维护宿主绘制时
//! 需要读取的状态。世界边界一律显式传入，不存在全局静态配置。

use crate::geometry::{overlap_convex_polygons, Polygon, Rect, Vec2};
use crate::target::Target;

/// 演出实体
///
/// 对应一个可被效果驱动、可参与碰撞的游戏对象。运动学模型：
/// 加速度 → 速度 → 位移，速度受最大速度钳制，无加速度输入时按
/// 减速度线性衰减。
pub struct SpriteActor {
    position: Vec2,
    size: Vec2,
    origin: Vec2,
    rotation: f32,
    scale: Vec2,
    opacity: f32,
    visible: bool,

    velocity: Vec2,
    /// 本帧累积的加速度向量，积分后清零（按住方向键才持续加速）
    acceleration_vec: Vec2,
    acceleration: f32,
    max_speed: f32,
    deceleration: f32,

    /// 局部坐标的碰撞边界；未设置时按包围盒矩形处理
    boundary: Option<Polygon>,
}

impl SpriteActor {
    /// 在给定位置创建实体
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
            size: Vec2::ZERO,
            origin: Vec2::ZERO,
            rotation: 0.0,
            scale: Vec2::new(1.0, 1.0),
            opacity: 1.0,
            visible: true,
            velocity: Vec2::ZERO,
            acceleration_vec: Vec2::ZERO,
            acceleration: 0.0,
            max_speed: 1000.0,
            deceleration: 0.0,
            boundary: None,
        }
    }

    /// 设置尺寸，原点同步到中心
    pub fn set_size(&mut self, width: f32, height: f32) {
        self.size = Vec2::new(width, height);
        self.origin = Vec2::new(width / 2.0, height / 2.0);
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    /// 设置朝向角（度）
    pub fn set_rotation(&mut self, rotation: f32) {
        self.rotation = rotation;
    }

    pub fn rotate_by(&mut self, degrees: f32) {
        self.rotation += degrees;
    }

    pub fn set_scale(&mut self, x: f32, y: f32) {
        self.scale = Vec2::new(x, y);
    }

    // ── 运动学 ──

    /// 当前速率（像素/秒）
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    /// 设置速率；静止时运动方向取自当前加速度方向
    pub fn set_speed(&mut self, speed: f32) {
        if self.velocity.length() == 0.0 {
            self.velocity = Vec2::from_angle_deg(self.acceleration_vec.angle_deg(), speed);
        } else {
            self.velocity = self.velocity.with_length(speed);
        }
    }

    /// 运动方向角（度）
    pub fn motion_angle(&self) -> f32 {
        self.velocity.angle_deg()
    }

    pub fn set_motion_angle(&mut self, angle: f32) {
        self.velocity = self.velocity.with_angle_deg(angle);
    }

    pub fn is_moving(&self) -> bool {
        self.speed() > 0.0
    }

    pub fn set_acceleration(&mut self, acceleration: f32) {
        self.acceleration = acceleration;
    }

    /// 沿给定方向角（度）施加一帧加速度；可叠加实现斜向运动
    pub fn accelerate_at_angle(&mut self, angle: f32) {
        self.acceleration_vec =
            self.acceleration_vec + Vec2::from_angle_deg(angle, self.acceleration);
    }

    /// 沿当前朝向施加加速度
    pub fn accelerate_forward(&mut self) {
        self.accelerate_at_angle(self.rotation);
    }

    pub fn set_max_speed(&mut self, max_speed: f32) {
        self.max_speed = max_speed;
    }

    pub fn set_deceleration(&mut self, deceleration: f32) {
        self.deceleration = deceleration;
    }

    /// 运动学积分：加速度 → 速度 → 位移
    ///
    /// 无加速度输入时按减速度衰减，速率钳制在 `[0, max_speed]`；
    /// 加速度向量随后清零，需要持续加速就每帧重新施加。
    pub fn apply_physics(&mut self, dt: f32) {
        self.velocity = self.velocity + self.acceleration_vec * dt;

        let mut speed = self.speed();
        if self.acceleration_vec.length() == 0.0 {
            speed -= self.deceleration * dt;
        }
        speed = speed.clamp(0.0, self.max_speed);
        self.set_speed(speed);

        self.position = self.position + self.velocity * dt;
        self.acceleration_vec = Vec2::ZERO;
    }

    // ── 碰撞边界 ──

    /// 以包围盒矩形为碰撞边界
    pub fn set_boundary_rectangle(&mut self) {
        let (w, h) = (self.size.x, self.size.y);
        self.boundary = Some(Polygon::new(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(w, 0.0),
            Vec2::new(w, h),
            Vec2::new(0.0, h),
        ]));
    }

    /// 以内接椭圆的 `num_sides` 边形为碰撞边界
    pub fn set_boundary_polygon(&mut self, num_sides: usize) {
        let (w, h) = (self.size.x, self.size.y);
        let vertices = (0..num_sides)
            .map(|i| {
                let angle = i as f32 * std::f32::consts::TAU / num_sides as f32;
                Vec2::new(
                    w / 2.0 * angle.cos() + w / 2.0,
                    h / 2.0 * angle.sin() + h / 2.0,
                )
            })
            .collect();
        self.boundary = Some(Polygon::new(vertices));
    }

    /// 应用当前变换后的世界坐标碰撞边界
    pub fn boundary_polygon(&self) -> Polygon {
        let mut poly = match &self.boundary {
            Some(template) => template.clone(),
            None => {
                let (w, h) = (self.size.x, self.size.y);
                Polygon::new(vec![
                    Vec2::new(0.0, 0.0),
                    Vec2::new(w, 0.0),
                    Vec2::new(w, h),
                    Vec2::new(0.0, h),
                ])
            }
        };
        poly.set_position(self.position);
        poly.set_origin(self.origin);
        poly.set_rotation(self.rotation);
        poly.set_scale(self.scale);
        poly
    }

    /// 与另一实体是否重叠（先做包围盒快速排除）
    pub fn overlaps(&self, other: &SpriteActor) -> bool {
        let poly1 = self.boundary_polygon();
        let poly2 = other.boundary_polygon();
        if !poly1.bounding_rect().overlaps(&poly2.bounding_rect()) {
            return false;
        }
        overlap_convex_polygons(&poly1.world_vertices(), &poly2.world_vertices()).is_some()
    }

    /// 推出式碰撞解算：与 `other` 重叠时沿最小平移向量移出
    ///
    /// 返回分离方向的法线；不重叠时返回 `None`。
    pub fn prevent_overlap(&mut self, other: &SpriteActor) -> Option<Vec2> {
        let poly1 = self.boundary_polygon();
        let poly2 = other.boundary_polygon();
        if !poly1.bounding_rect().overlaps(&poly2.bounding_rect()) {
            return None;
        }

        let mtv = overlap_convex_polygons(&poly1.world_vertices(), &poly2.world_vertices())?;
        self.position = self.position + mtv.normal * mtv.depth;
        Some(mtv.normal)
    }

    /// 另一实体是否在给定距离内（通过放大自身碰撞边界测试）
    pub fn is_within_distance(&self, distance: f32, other: &SpriteActor) -> bool {
        let mut poly1 = self.boundary_polygon();
        if self.size.x > 0.0 && self.size.y > 0.0 {
            poly1.set_scale(Vec2::new(
                (self.size.x + 2.0 * distance) / self.size.x,
                (self.size.y + 2.0 * distance) / self.size.y,
            ));
        }
        let poly2 = other.boundary_polygon();

        if !poly1.bounding_rect().overlaps(&poly2.bounding_rect()) {
            return false;
        }
        overlap_convex_polygons(&poly1.world_vertices(), &poly2.world_vertices()).is_some()
    }

    // ── 定位 ──

    /// 把中心移动到给定坐标
    pub fn center_at(&mut self, x: f32, y: f32) {
        self.position = Vec2::new(x - self.size.x / 2.0, y - self.size.y / 2.0);
    }

    /// 把中心对齐到另一实体的中心
    pub fn center_at_actor(&mut self, other: &SpriteActor) {
        self.center_at(
            other.position.x + other.size.x / 2.0,
            other.position.y + other.size.y / 2.0,
        );
    }

    /// 钳制在世界边界内（四边检查）
    pub fn bound_to_world(&mut self, world: &Rect) {
        if self.position.x < world.x {
            self.position.x = world.x;
        }
        if self.position.x + self.size.x > world.x + world.width {
            self.position.x = world.x + world.width - self.size.x;
        }
        if self.position.y < world.y {
            self.position.y = world.y;
        }
        if self.position.y + self.size.y > world.y + world.height {
            self.position.y = world.y + world.height - self.size.y;
        }
    }

    /// 穿越世界边界后从对侧进入
    pub fn wrap_around_world(&mut self, world: &Rect) {
        if self.position.x + self.size.x < world.x {
            self.position.x = world.x + world.width;
        }
        if self.position.x > world.x + world.width {
            self.position.x = world.x - self.size.x;
        }
        if self.position.y + self.size.y < world.y {
            self.position.y = world.y + world.height;
        }
        if self.position.y > world.y + world.height {
            self.position.y = world.y - self.size.y;
        }
    }
}

impl Target for SpriteActor {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    fn size(&self) -> Vec2 {
        self.size
    }

    fn opacity(&self) -> f32 {
        self.opacity
    }

    fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity.clamp(0.0, 1.0);
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
}
