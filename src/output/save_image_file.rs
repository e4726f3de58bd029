// 该文件是 Dingceng （顶层） 项目的一部分。
// src/output/save_image_file.rs - 保存标注后的图像文件
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

use std::path::PathBuf;

use thiserror::Error;
use tracing::info;
use url::Url;

use crate::{
  FromUrl, FromUrlWithScheme,
  output::{Render, draw::Draw},
  pipeline::Selection,
  scene::Scene,
};

pub struct SaveImageFileOutput {
  path: PathBuf,
  draw: Draw,
}

#[derive(Error, Debug)]
pub enum SaveImageFileError {
  #[error("I/O 错误: {0}")]
  IoError(std::io::Error),
  #[error("图像错误: {0}")]
  ImageError(image::ImageError),
  #[error("URI 方案不匹配: {0}")]
  SchemeMismatch(String),
  #[error("不是本地文件路径: {0}")]
  InvalidPath(String),
  #[error("输入 {0} 没有可绘制的图像")]
  MissingImage(String),
}

impl FromUrlWithScheme for SaveImageFileOutput {
  const SCHEME: &'static str = "image";
}

impl FromUrl for SaveImageFileOutput {
  type Error = SaveImageFileError;

  fn from_url(uri: &Url) -> Result<Self, Self::Error> {
    if uri.scheme() != Self::SCHEME {
      return Err(SaveImageFileError::SchemeMismatch(format!(
        "期望保存方式 '{}', 实际保存方式 '{}'",
        Self::SCHEME,
        uri.scheme()
      )));
    }

    Ok(SaveImageFileOutput {
      path: uri
        .to_file_path()
        .map_err(|_| SaveImageFileError::InvalidPath(uri.to_string()))?,
      draw: Draw::default(),
    })
  }
}

impl SaveImageFileOutput {
  fn save_image(&self, image: image::RgbImage) -> Result<(), SaveImageFileError> {
    if let Some(parent) = self.path.parent()
      && !parent.as_os_str().is_empty()
    {
      std::fs::create_dir_all(parent).map_err(SaveImageFileError::IoError)?;
    }

    image
      .save(&self.path)
      .map_err(SaveImageFileError::ImageError)?;

    info!("保存图像到文件: {}", self.path.display());

    Ok(())
  }
}

impl Render<Scene, Selection> for SaveImageFileOutput {
  type Error = SaveImageFileError;

  fn render_result(&self, scene: &Scene, result: &Selection) -> Result<(), Self::Error> {
    let mut image = scene
      .image
      .clone()
      .ok_or_else(|| SaveImageFileError::MissingImage(scene.source.clone()))?;
    self.draw.draw_boxes(&mut image, &result.retained);
    self.save_image(image)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::geometry::Rect;

  #[test]
  fn json_scene_has_nothing_to_draw() {
    let output = SaveImageFileOutput::from_url(&Url::parse("image:///tmp/out.png").unwrap()).unwrap();
    let scene = Scene::new("boxes.json", vec![Rect::new(0.0, 0.0, 1.0, 1.0)]);
    let selection = Selection {
      source: scene.source.clone(),
      candidates: 1,
      prefiltered: 1,
      threshold: 0.9,
      retained: scene.candidates.clone(),
      nested: 0,
    };
    assert!(matches!(
      output.render_result(&scene, &selection),
      Err(SaveImageFileError::MissingImage(_))
    ));
  }
}
