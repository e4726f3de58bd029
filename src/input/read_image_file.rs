// 该文件是 Dingceng （顶层） 项目的一部分。
// src/input/read_image_file.rs - 图像文件输入
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

use image::ImageReader;
use thiserror::Error;
use tracing::{error, info};
use url::Url;

use crate::{FromUrl, FromUrlWithScheme, detector::EdgeDetector, geometry::Rect, scene::Scene};

#[derive(Error, Debug)]
pub enum ImageFileInputError {
  #[error("URI schema mismatch")]
  SchemaMismatch,
  #[error("Not a local file path: {0}")]
  InvalidPath(String),
  #[error("I/O error: {0}")]
  IoError(#[from] std::io::Error),
  #[error("Image loading error: {0}")]
  ImageLoadError(#[from] image::ImageError),
  #[error("Invalid detector parameter '{0}': {1}")]
  InvalidParameter(String, String),
}

pub struct ImageFileInput {
  scene: Option<Scene>,
}

impl FromUrlWithScheme for ImageFileInput {
  const SCHEME: &'static str = "image";
}

/// 从 URI 查询参数读取检测参数，例如 `?sigma=1.1&low=50&high=150`
fn detector_from_query(url: &Url) -> Result<EdgeDetector, ImageFileInputError> {
  let mut detector = EdgeDetector::default();
  for (key, value) in url.query_pairs() {
    let target = match key.as_ref() {
      "sigma" => &mut detector.blur_sigma,
      "low" => &mut detector.low_threshold,
      "high" => &mut detector.high_threshold,
      _ => continue,
    };
    *target = value
      .parse()
      .map_err(|_| ImageFileInputError::InvalidParameter(key.to_string(), value.to_string()))?;
  }
  Ok(detector)
}

impl FromUrl for ImageFileInput {
  type Error = ImageFileInputError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    if url.scheme() != Self::SCHEME {
      error!(
        "URI scheme mismatch: expected '{}', found '{}'",
        Self::SCHEME,
        url.scheme()
      );
      return Err(ImageFileInputError::SchemaMismatch);
    }

    let detector = detector_from_query(url)?;
    let path = url
      .to_file_path()
      .map_err(|_| ImageFileInputError::InvalidPath(url.to_string()))?;
    let image = ImageReader::open(&path)?.decode()?;
    info!(
      "读取图像: {} ({}x{})",
      path.display(),
      image.width(),
      image.height()
    );

    let candidates: Vec<Rect<f64>> = detector
      .detect(&image.to_luma8())
      .iter()
      .filter_map(|rect| rect.cast::<f64>())
      .collect();
    info!("检测到候选框 {} 个", candidates.len());

    let scene = Scene::new(path.display().to_string(), candidates).with_image(image.to_rgb8());
    Ok(ImageFileInput { scene: Some(scene) })
  }
}

impl Iterator for ImageFileInput {
  type Item = Scene;

  fn next(&mut self) -> Option<Self::Item> {
    self.scene.take()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn query_overrides_detector_parameters() {
    let url = Url::parse("image:///tmp/a.png?sigma=0&high=90").unwrap();
    let detector = detector_from_query(&url).unwrap();
    assert_eq!(detector.blur_sigma, 0.0);
    assert_eq!(detector.low_threshold, 50.0);
    assert_eq!(detector.high_threshold, 90.0);
  }

  #[test]
  fn bad_query_value_is_reported() {
    let url = Url::parse("image:///tmp/a.png?low=abc").unwrap();
    assert!(matches!(
      detector_from_query(&url),
      Err(ImageFileInputError::InvalidParameter(key, _)) if key == "low"
    ));
  }

  #[test]
  fn missing_file_is_io_error() {
    let url = Url::parse("image:///definitely/not/here.png").unwrap();
    assert!(matches!(
      ImageFileInput::from_url(&url),
      Err(ImageFileInputError::IoError(_))
    ));
  }
}
