// 该文件是 Dingceng （顶层） 项目的一部分。
// src/output/draw.rs - 顶层框可视化
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

use image::{Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;

use crate::geometry::Rect;

const BOX_COLOR: [u8; 3] = [0, 0, 255]; // 蓝色
const BOX_THICKNESS: i32 = 3;

pub struct Draw {
  color: [u8; 3],
  thickness: i32,
}

impl Default for Draw {
  fn default() -> Self {
    Self {
      color: BOX_COLOR,
      thickness: BOX_THICKNESS,
    }
  }
}

impl Draw {
  pub fn with_color(mut self, color: [u8; 3]) -> Self {
    self.color = color;
    self
  }

  /// 在图像上绘制矩形边框，bbox 为像素坐标
  fn draw_bbox(&self, image: &mut RgbImage, bbox: &Rect<f64>) {
    let (w, h) = (image.width() as i32, image.height() as i32);
    if w == 0 || h == 0 {
      return;
    }
    let corners = bbox.corners();

    let x_min = (corners.x0.floor() as i32).clamp(0, w - 1);
    let y_min = (corners.y0.floor() as i32).clamp(0, h - 1);
    let x_max = (corners.x1.ceil() as i32).clamp(0, w - 1);
    let y_max = (corners.y1.ceil() as i32).clamp(0, h - 1);

    for t in 0..self.thickness {
      let width = x_max - x_min - 2 * t + 1;
      let height = y_max - y_min - 2 * t + 1;
      if width <= 0 || height <= 0 {
        break;
      }
      let rect = imageproc::rect::Rect::at(x_min + t, y_min + t).of_size(width as u32, height as u32);
      draw_hollow_rect_mut(image, rect, Rgb(self.color));
    }
  }

  pub fn draw_boxes(&self, image: &mut RgbImage, boxes: &[Rect<f64>]) {
    for bbox in boxes {
      self.draw_bbox(image, bbox);
    }
  }
}
