// 该文件是 Dingceng （顶层） 项目的一部分。
// src/prefilter.rs - 按图像面积比例预过滤候选框
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

use num_traits::ToPrimitive;
use thiserror::Error;
use tracing::debug;

use crate::geometry::{Coord, Rect};

pub const DEFAULT_MIN_AREA_FRACTION: f64 = 0.05;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PrefilterError {
  #[error("面积比例必须位于 [0, 1) 区间内, 实际为 {0}")]
  InvalidFraction(f64),
  #[error("图像面积为零: {0}x{1}")]
  EmptyImage(u32, u32),
}

/// 丢弃面积不超过图像面积一定比例的候选框
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinAreaFilter {
  fraction: f64,
}

impl Default for MinAreaFilter {
  fn default() -> Self {
    Self {
      fraction: DEFAULT_MIN_AREA_FRACTION,
    }
  }
}

impl MinAreaFilter {
  pub fn new(fraction: f64) -> Result<Self, PrefilterError> {
    if (0.0..1.0).contains(&fraction) {
      Ok(Self { fraction })
    } else {
      Err(PrefilterError::InvalidFraction(fraction))
    }
  }

  pub fn fraction(&self) -> f64 {
    self.fraction
  }

  pub fn retain<T: Coord>(
    &self,
    boxes: &[Rect<T>],
    image_width: u32,
    image_height: u32,
  ) -> Result<Vec<Rect<T>>, PrefilterError> {
    let image_area = image_width as f64 * image_height as f64;
    if image_area <= 0.0 {
      return Err(PrefilterError::EmptyImage(image_width, image_height));
    }

    let kept: Vec<Rect<T>> = boxes
      .iter()
      .filter(|rect| {
        let area = rect.area().to_f64().unwrap_or(0.0);
        area / image_area > self.fraction
      })
      .copied()
      .collect();

    debug!(
      "面积预过滤: {} -> {} (比例 {})",
      boxes.len(),
      kept.len(),
      self.fraction
    );

    Ok(kept)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn keeps_boxes_strictly_above_fraction() {
    let filter = MinAreaFilter::default();
    // 图像 100x100，阈值面积 500
    let boxes = [
      Rect::new(0u32, 0, 10, 50),
      Rect::new(0u32, 0, 10, 51),
      Rect::new(0u32, 0, 1, 1),
    ];
    let kept = filter.retain(&boxes, 100, 100).unwrap();
    assert_eq!(kept, vec![Rect::new(0, 0, 10, 51)]);
  }

  #[test]
  fn zero_fraction_keeps_every_non_empty_box() {
    let filter = MinAreaFilter::new(0.0).unwrap();
    let boxes = [Rect::new(0.0, 0.0, 1.0, 1.0), Rect::new(0.0, 0.0, 0.0, 4.0)];
    let kept = filter.retain(&boxes, 10, 10).unwrap();
    assert_eq!(kept, vec![Rect::new(0.0, 0.0, 1.0, 1.0)]);
  }

  #[test]
  fn rejects_bad_parameters() {
    assert!(MinAreaFilter::new(1.0).is_err());
    assert!(MinAreaFilter::new(-0.1).is_err());
    assert!(MinAreaFilter::new(f64::NAN).is_err());
    assert_eq!(
      MinAreaFilter::default().retain(&[Rect::new(0, 0, 1, 1)], 0, 10),
      Err(PrefilterError::EmptyImage(0, 10))
    );
  }
}
