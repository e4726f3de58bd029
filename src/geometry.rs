// 该文件是 Dingceng （顶层） 项目的一部分。
// src/geometry.rs - 轴对齐矩形与重叠面积计算
//
// 本文件根据 Apache 许可证第 2.0 版（以下简称“许可证”）授权使用；
// 除非遵守该许可证条款，否则您不得使用本文件。
// 您可通过以下网址获取许可证副本：
// http://www.apache.org/licenses/LICENSE-2.0
// 除非适用法律要求或书面同意，根据本许可协议分发的软件均按“原样”提供，
// 不附带任何形式的明示或暗示的保证或条件。
// 有关许可权限与限制的具体条款，请参阅本许可协议。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, Wareless Group

use std::fmt::Debug;
use std::ops::{Mul, Sub};

use num_traits::{NumCast, ToPrimitive, Zero};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 矩形坐标所需的数值类型（整数与浮点数均可）
pub trait Coord:
  Copy
  + PartialOrd
  + Zero
  + Sub<Output = Self>
  + Mul<Output = Self>
  + ToPrimitive
  + NumCast
  + Debug
  + Send
  + Sync
{
}

impl<T> Coord for T where
  T: Copy
    + PartialOrd
    + Zero
    + Sub<Output = T>
    + Mul<Output = T>
    + ToPrimitive
    + NumCast
    + Debug
    + Send
    + Sync
{
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
  #[error("矩形宽高不能为负: {0}")]
  NegativeExtent(String),
  #[error("矩形包含无法比较的数值 (NaN): {0}")]
  Incomparable(String),
  #[error("矩形包含无穷大的数值: {0}")]
  NonFinite(String),
  #[error("矩形右下角或面积超出坐标类型范围: {0}")]
  Overflow(String),
}

/// 轴对齐矩形（原点 + 宽高）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect<T> {
  pub x: T,
  pub y: T,
  pub width: T,
  pub height: T,
}

/// 轴对齐矩形（左上角 x0,y0 与右下角 x1,y1）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Corners<T> {
  pub x0: T,
  pub y0: T,
  pub x1: T,
  pub y1: T,
}

impl<T: Coord> Rect<T> {
  pub fn new(x: T, y: T, width: T, height: T) -> Self {
    Self {
      x,
      y,
      width,
      height,
    }
  }

  pub fn from_corners(corners: Corners<T>) -> Self {
    corners.to_rect()
  }

  pub fn corners(&self) -> Corners<T> {
    Corners {
      x0: self.x,
      y0: self.y,
      x1: self.x + self.width,
      y1: self.y + self.height,
    }
  }

  pub fn area(&self) -> T {
    self.width * self.height
  }

  /// 宽或高为零的矩形
  pub fn is_degenerate(&self) -> bool {
    self.width == T::zero() || self.height == T::zero()
  }

  /// 检查宽高非负、所有分量有限，且右下角与面积可以用 `T` 表示。
  /// 通过检查后 `corners`、`area` 与 `overlap_area` 不会溢出。
  pub fn validate(&self) -> Result<(), ValidationError> {
    let components = [self.x, self.y, self.width, self.height];
    if !components.iter().all(|v| v.partial_cmp(v).is_some()) {
      return Err(ValidationError::Incomparable(format!("{:?}", self)));
    }
    if !components
      .iter()
      .all(|v| v.to_f64().is_some_and(f64::is_finite))
    {
      return Err(ValidationError::NonFinite(format!("{:?}", self)));
    }
    if self.width < T::zero() || self.height < T::zero() {
      return Err(ValidationError::NegativeExtent(format!("{:?}", self)));
    }

    let [x, y, width, height] = components.map(|v| v.to_f64().unwrap_or(f64::NAN));
    if ![x + width, y + height, width * height]
      .into_iter()
      .all(fits::<T>)
    {
      return Err(ValidationError::Overflow(format!("{:?}", self)));
    }
    Ok(())
  }

  /// 转换坐标类型，任一分量无法表示时返回 `None`
  pub fn cast<U: Coord>(&self) -> Option<Rect<U>> {
    Some(Rect {
      x: <U as NumCast>::from(self.x)?,
      y: <U as NumCast>::from(self.y)?,
      width: <U as NumCast>::from(self.width)?,
      height: <U as NumCast>::from(self.height)?,
    })
  }

  pub fn overlap_area(&self, other: &Self) -> T {
    overlap_area(self, other)
  }
}

impl<T: Coord> Corners<T> {
  pub fn to_rect(&self) -> Rect<T> {
    Rect {
      x: self.x0,
      y: self.y0,
      width: self.x1 - self.x0,
      height: self.y1 - self.y0,
    }
  }
}

impl<T: Coord> From<Corners<T>> for Rect<T> {
  fn from(corners: Corners<T>) -> Self {
    corners.to_rect()
  }
}

impl<T: Coord> From<Rect<T>> for Corners<T> {
  fn from(rect: Rect<T>) -> Self {
    rect.corners()
  }
}

/// `value` 能否在 `T` 中表示为有限值
fn fits<T: Coord>(value: f64) -> bool {
  value.is_finite()
    && <T as NumCast>::from(value)
      .and_then(|v| v.to_f64())
      .is_some_and(f64::is_finite)
}

fn partial_min<T: PartialOrd>(a: T, b: T) -> T {
  if b < a { b } else { a }
}

fn partial_max<T: PartialOrd>(a: T, b: T) -> T {
  if b > a { b } else { a }
}

/// 计算两个矩形交集的面积，不相交（含仅边相接）时为零
///
/// 不校验输入，宽高为负的矩形需由调用者先行拒绝。
pub fn overlap_area<T: Coord>(a: &Rect<T>, b: &Rect<T>) -> T {
  let a = a.corners();
  let b = b.corners();

  if a.x0 > b.x1 || b.x0 > a.x1 || a.y0 > b.y1 || b.y0 > a.y1 {
    return T::zero();
  }

  let width = partial_min(a.x1, b.x1) - partial_max(a.x0, b.x0);
  let height = partial_min(a.y1, b.y1) - partial_max(a.y0, b.y0);

  // 边相接时宽或高为零
  if width <= T::zero() || height <= T::zero() {
    return T::zero();
  }

  width * height
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn corner_form_round_trips() {
    let rect = Rect::new(3, 4, 10, 20);
    let corners = rect.corners();
    assert_eq!(
      corners,
      Corners {
        x0: 3,
        y0: 4,
        x1: 13,
        y1: 24
      }
    );
    assert_eq!(Rect::from(corners), rect);

    let rect = Rect::new(0.5, 1.25, 2.0, 0.75);
    assert_eq!(Rect::from_corners(Corners::from(rect)), rect);
  }

  #[test]
  fn nested_overlap_is_child_area() {
    let outer = Rect::new(0, 0, 10, 20);
    let inner = Rect::new(1, 1, 2, 2);
    assert_eq!(overlap_area(&outer, &inner), 4);
    assert_eq!(overlap_area(&inner, &outer), 4);
  }

  #[test]
  fn partial_overlap() {
    let a = Rect::new(0, 0, 10, 10);
    let b = Rect::new(5, 5, 10, 10);
    assert_eq!(a.overlap_area(&b), 25);

    let a = Rect::new(0.0, 0.0, 2.0, 2.0);
    let b = Rect::new(1.5, -1.0, 2.0, 2.0);
    assert_eq!(a.overlap_area(&b), 0.5);
  }

  #[test]
  fn disjoint_and_touching_boxes_do_not_overlap() {
    let a = Rect::new(0, 0, 10, 20);
    assert_eq!(overlap_area(&a, &Rect::new(11, 21, 1, 1)), 0);
    assert_eq!(overlap_area(&a, &Rect::new(100, 0, 5, 5)), 0);
    // 仅边相接
    assert_eq!(overlap_area(&a, &Rect::new(10, 0, 5, 5)), 0);
    assert_eq!(overlap_area(&a, &Rect::new(10, 20, 5, 5)), 0);
  }

  #[test]
  fn degenerate_boxes_have_no_overlap() {
    let a = Rect::new(0u32, 0, 10, 10);
    let line = Rect::new(5u32, 0, 0, 10);
    assert!(line.is_degenerate());
    assert_eq!(overlap_area(&a, &line), 0);
    assert_eq!(overlap_area(&line, &a), 0);
  }

  #[test]
  fn validate_rejects_negative_and_nan() {
    assert!(Rect::new(0, 0, 0, 0).validate().is_ok());
    assert!(matches!(
      Rect::new(0, 0, -1, 2).validate(),
      Err(ValidationError::NegativeExtent(_))
    ));
    assert!(matches!(
      Rect::new(0.0, f64::NAN, 1.0, 1.0).validate(),
      Err(ValidationError::Incomparable(_))
    ));
  }

  #[test]
  fn validate_rejects_infinite_components() {
    assert!(matches!(
      Rect::new(0.0, 0.0, f64::INFINITY, 0.0).validate(),
      Err(ValidationError::NonFinite(_))
    ));
    assert!(matches!(
      Rect::new(f64::NEG_INFINITY, 0.0, 1.0, 1.0).validate(),
      Err(ValidationError::NonFinite(_))
    ));
  }

  #[test]
  fn validate_rejects_unrepresentable_area_or_corner() {
    assert!(Rect::new(0i32, 0, 40_000, 40_000).validate().is_ok());
    assert!(matches!(
      Rect::new(0i32, 0, 50_000, 50_000).validate(),
      Err(ValidationError::Overflow(_))
    ));
    assert!(matches!(
      Rect::new(i32::MAX - 1, 0, 2, 1).validate(),
      Err(ValidationError::Overflow(_))
    ));
    assert!(matches!(
      Rect::new(0u32, 0, 70_000, 70_000).validate(),
      Err(ValidationError::Overflow(_))
    ));
    assert!(matches!(
      Rect::new(0.0f32, 0.0, 1e30, 1e30).validate(),
      Err(ValidationError::Overflow(_))
    ));
  }

  #[test]
  fn cast_between_coordinate_types() {
    let rect = Rect::new(1u32, 2, 3, 4);
    assert_eq!(rect.cast::<f64>(), Some(Rect::new(1.0, 2.0, 3.0, 4.0)));
    assert_eq!(Rect::new(-1i32, 0, 1, 1).cast::<u32>(), None);
  }
}
