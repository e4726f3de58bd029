// 该文件是 Dingceng （顶层） 项目的一部分。
// src/detector.rs - 基于边缘与轮廓的候选框检测
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

use image::GrayImage;
use imageproc::contours::find_contours;
use imageproc::edges::canny;
use imageproc::filter::gaussian_blur_f32;
use imageproc::point::Point;
use tracing::debug;

use crate::geometry::Rect;

// 5x5 高斯核对应的标准差
const BLUR_SIGMA: f32 = 1.1;
const CANNY_LOW_THRESHOLD: f32 = 50.0;
const CANNY_HIGH_THRESHOLD: f32 = 150.0;

/// 灰度 → 高斯模糊 → Canny 边缘 → 最外层轮廓 → 外接矩形
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeDetector {
  pub blur_sigma: f32,
  pub low_threshold: f32,
  pub high_threshold: f32,
}

impl Default for EdgeDetector {
  fn default() -> Self {
    Self {
      blur_sigma: BLUR_SIGMA,
      low_threshold: CANNY_LOW_THRESHOLD,
      high_threshold: CANNY_HIGH_THRESHOLD,
    }
  }
}

impl EdgeDetector {
  pub fn detect(&self, gray: &GrayImage) -> Vec<Rect<u32>> {
    let blurred = if self.blur_sigma > 0.0 {
      gaussian_blur_f32(gray, self.blur_sigma)
    } else {
      gray.clone()
    };
    let edges = canny(&blurred, self.low_threshold, self.high_threshold);

    let contours = find_contours::<u32>(&edges);
    let total = contours.len();
    let boxes: Vec<Rect<u32>> = contours
      .into_iter()
      .filter(|contour| contour.parent.is_none())
      .filter_map(|contour| bounding_rect(&contour.points))
      .collect();

    debug!("轮廓 {} 个, 最外层轮廓外接框 {} 个", total, boxes.len());
    boxes
  }
}

/// 点集的外接矩形，包含边界像素
pub fn bounding_rect(points: &[Point<u32>]) -> Option<Rect<u32>> {
  let first = points.first()?;
  let (min_x, min_y, max_x, max_y) = points.iter().fold(
    (first.x, first.y, first.x, first.y),
    |(min_x, min_y, max_x, max_y), p| {
      (min_x.min(p.x), min_y.min(p.y), max_x.max(p.x), max_y.max(p.y))
    },
  );
  Some(Rect::new(min_x, min_y, max_x - min_x + 1, max_y - min_y + 1))
}
