//! # Geometry 模块
//!
//! 2D 几何基础类型：向量、矩形、凸多边形，以及分离轴（SAT）相交检测。
//!
//! 运行时不依赖任何引擎的数学库，碰撞检测在这里自行实现。
//! 多边形相交返回最小平移向量（MTV），供 [`crate::actor::SpriteActor`]
//! 做推出式碰撞解算。

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Neg, Sub};

/// 2D 向量
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    /// 零向量
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// 创建新向量
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// 向量长度
    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// 点积
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y
    }

    /// 单位化；零向量返回零向量
    pub fn normalized(self) -> Self {
        let len = self.length();
        if len == 0.0 { Self::ZERO } else { self * (1.0 / len) }
    }

    /// 逆时针垂直向量
    pub fn perpendicular(self) -> Self {
        Self::new(-self.y, self.x)
    }

    /// 向量的方向角（度，逆时针，0 = +x 方向）
    pub fn angle_deg(self) -> f32 {
        self.y.atan2(self.x).to_degrees()
    }

    /// 以给定方向角（度）和长度构造向量
    pub fn from_angle_deg(angle: f32, length: f32) -> Self {
        let rad = angle.to_radians();
        Self::new(rad.cos() * length, rad.sin() * length)
    }

    /// 保持长度、改变方向角（度）
    pub fn with_angle_deg(self, angle: f32) -> Self {
        Self::from_angle_deg(angle, self.length())
    }

    /// 保持方向、改变长度；零向量保持为零
    pub fn with_length(self, length: f32) -> Self {
        self.normalized() * length
    }

    /// 线性插值
    pub fn lerp(self, other: Self, t: f32) -> Self {
        self + (other - self) * t
    }
}

impl Add for Vec2 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Vec2 {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

/// 轴对齐矩形，`(x, y)` 为左下角
///
/// 在运行时中承担两种角色：世界边界（显式传入，不使用全局静态量），
/// 以及多边形相交前的包围盒快速排除测试。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// 创建矩形
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// 以原点为左下角创建矩形（常用于世界边界）
    pub const fn of_size(width: f32, height: f32) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    /// 两矩形是否重叠
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.width
            && self.x + self.width > other.x
            && self.y < other.y + other.height
            && self.y + self.height > other.y
    }
}

/// 凸多边形
///
/// `vertices` 为局部坐标；世界坐标由 position/origin/rotation/scale
/// 变换得到：`world = position + origin + R(rotation) * S(scale) * (v - origin)`。
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    vertices: Vec<Vec2>,
    position: Vec2,
    origin: Vec2,
    rotation: f32,
    scale: Vec2,
}

impl Polygon {
    /// 以局部顶点创建多边形
    pub fn new(vertices: Vec<Vec2>) -> Self {
        Self {
            vertices,
            position: Vec2::ZERO,
            origin: Vec2::ZERO,
            rotation: 0.0,
            scale: Vec2::new(1.0, 1.0),
        }
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    pub fn set_origin(&mut self, origin: Vec2) {
        self.origin = origin;
    }

    /// 设置旋转角（度）
    pub fn set_rotation(&mut self, rotation: f32) {
        self.rotation = rotation;
    }

    pub fn set_scale(&mut self, scale: Vec2) {
        self.scale = scale;
    }

    /// 应用变换后的世界坐标顶点
    pub fn world_vertices(&self) -> Vec<Vec2> {
        let rad = self.rotation.to_radians();
        let (sin, cos) = rad.sin_cos();
        self.vertices
            .iter()
            .map(|v| {
                let local = Vec2::new((v.x - self.origin.x) * self.scale.x, (v.y - self.origin.y) * self.scale.y);
                let rotated = Vec2::new(local.x * cos - local.y * sin, local.x * sin + local.y * cos);
                self.position + self.origin + rotated
            })
            .collect()
    }

    /// 世界坐标包围盒
    pub fn bounding_rect(&self) -> Rect {
        let verts = self.world_vertices();
        let mut min = Vec2::new(f32::INFINITY, f32::INFINITY);
        let mut max = Vec2::new(f32::NEG_INFINITY, f32::NEG_INFINITY);
        for v in &verts {
            min.x = min.x.min(v.x);
            min.y = min.y.min(v.y);
            max.x = max.x.max(v.x);
            max.y = max.y.max(v.y);
        }
        Rect::new(min.x, min.y, max.x - min.x, max.y - min.y)
    }
}

/// 最小平移向量：沿 `normal` 方向移动 `depth` 距离即可分离两多边形
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinTranslation {
    /// 分离方向（单位向量，从第二个多边形指向第一个）
    pub normal: Vec2,
    /// 分离距离
    pub depth: f32,
}

/// 凸多边形相交检测（分离轴定理）
///
/// 返回 `None` 表示不相交；相交时返回把 `a` 推离 `b` 的最小平移向量。
pub fn overlap_convex_polygons(a: &[Vec2], b: &[Vec2]) -> Option<MinTranslation> {
    if a.len() < 3 || b.len() < 3 {
        return None;
    }

    let mut min_depth = f32::INFINITY;
    let mut min_axis = Vec2::ZERO;

    for verts in [a, b] {
        for i in 0..verts.len() {
            let edge = verts[(i + 1) % verts.len()] - verts[i];
            let axis = edge.perpendicular().normalized();
            if axis == Vec2::ZERO {
                continue;
            }

            let (a_min, a_max) = project(a, axis);
            let (b_min, b_max) = project(b, axis);

            let overlap = a_max.min(b_max) - a_min.max(b_min);
            if overlap <= 0.0 {
                return None;
            }
            if overlap < min_depth {
                min_depth = overlap;
                min_axis = axis;
            }
        }
    }

    // 法线统一指向 a 一侧，保证沿法线推动 a 是分离方向
    let a_center = centroid(a);
    let b_center = centroid(b);
    if (a_center - b_center).dot(min_axis) < 0.0 {
        min_axis = -min_axis;
    }

    Some(MinTranslation {
        normal: min_axis,
        depth: min_depth,
    })
}

fn project(verts: &[Vec2], axis: Vec2) -> (f32, f32) {
    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;
    for v in verts {
        let p = v.dot(axis);
        min = min.min(p);
        max = max.max(p);
    }
    (min, max)
}

fn centroid(verts: &[Vec2]) -> Vec2 {
    let mut sum = Vec2::ZERO;
    for v in verts {
        sum = sum + *v;
    }
    sum * (1.0 / verts.len() as f32)
}
