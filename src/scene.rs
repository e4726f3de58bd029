// 该文件是 Dingceng （顶层） 项目的一部分。
// src/scene.rs - 单张图像的候选框集合
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

use crate::geometry::Rect;

#[derive(Debug, Clone)]
pub struct Scene {
  /// 候选框来源（文件路径等）
  pub source: String,
  /// 图像宽高，未知时无法进行面积预过滤
  pub image_size: Option<(u32, u32)>,
  pub candidates: Vec<Rect<f64>>,
  #[cfg(feature = "read_image_file")]
  pub image: Option<image::RgbImage>,
}

impl Scene {
  pub fn new(source: impl Into<String>, candidates: Vec<Rect<f64>>) -> Self {
    Self {
      source: source.into(),
      image_size: None,
      candidates,
      #[cfg(feature = "read_image_file")]
      image: None,
    }
  }

  pub fn with_image_size(mut self, width: u32, height: u32) -> Self {
    self.image_size = Some((width, height));
    self
  }

  #[cfg(feature = "read_image_file")]
  pub fn with_image(mut self, image: image::RgbImage) -> Self {
    self.image_size = Some(image.dimensions());
    self.image = Some(image);
    self
  }
}
