// 该文件是 Dingceng （顶层） 项目的一部分。
// src/input/json_file.rs - JSON 候选框文件输入
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

use serde::Deserialize;
use thiserror::Error;
use tracing::{error, info};
use url::Url;

use crate::{FromUrl, FromUrlWithScheme, geometry::Rect, scene::Scene};

#[derive(Error, Debug)]
pub enum JsonFileInputError {
  #[error("URI scheme mismatch")]
  SchemeMismatch,
  #[error("Not a local file path: {0}")]
  InvalidPath(String),
  #[error("I/O error: {0}")]
  IoError(#[from] std::io::Error),
  #[error("JSON parse error: {0}")]
  ParseError(#[from] serde_json::Error),
}

/// `[x, y, w, h]` 或 `{"x", "y", "width", "height"}`
#[derive(Deserialize)]
#[serde(untagged)]
enum BoxEntry {
  Tuple(f64, f64, f64, f64),
  Object(Rect<f64>),
}

impl From<BoxEntry> for Rect<f64> {
  fn from(entry: BoxEntry) -> Self {
    match entry {
      BoxEntry::Tuple(x, y, width, height) => Rect::new(x, y, width, height),
      BoxEntry::Object(rect) => rect,
    }
  }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Document {
  List(Vec<BoxEntry>),
  Scene {
    boxes: Vec<BoxEntry>,
    #[serde(default)]
    image_size: Option<(u32, u32)>,
  },
}

pub struct JsonFileInput {
  scene: Option<Scene>,
}

impl FromUrlWithScheme for JsonFileInput {
  const SCHEME: &'static str = "json";
}

impl FromUrl for JsonFileInput {
  type Error = JsonFileInputError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    if url.scheme() != Self::SCHEME {
      error!(
        "URI scheme mismatch: expected '{}', found '{}'",
        Self::SCHEME,
        url.scheme()
      );
      return Err(JsonFileInputError::SchemeMismatch);
    }

    let path = url
      .to_file_path()
      .map_err(|_| JsonFileInputError::InvalidPath(url.to_string()))?;
    info!("读取候选框文件: {}", path.display());
    let text = std::fs::read_to_string(&path)?;
    let scene = Self::parse(&path.display().to_string(), &text)?;

    Ok(JsonFileInput { scene: Some(scene) })
  }
}

impl JsonFileInput {
  pub fn parse(source: &str, text: &str) -> Result<Scene, JsonFileInputError> {
    let (boxes, image_size) = match serde_json::from_str::<Document>(text)? {
      Document::List(boxes) => (boxes, None),
      Document::Scene { boxes, image_size } => (boxes, image_size),
    };

    let mut scene = Scene::new(source, boxes.into_iter().map(Rect::from).collect());
    if let Some((width, height)) = image_size {
      scene = scene.with_image_size(width, height);
    }
    Ok(scene)
  }
}

impl Iterator for JsonFileInput {
  type Item = Scene;

  fn next(&mut self) -> Option<Self::Item> {
    self.scene.take()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_bare_list_of_tuples() {
    let scene = JsonFileInput::parse("mem", "[[0, 0, 10, 20], [1, 1, 2, 2]]").unwrap();
    assert_eq!(scene.source, "mem");
    assert_eq!(scene.image_size, None);
    assert_eq!(
      scene.candidates,
      vec![Rect::new(0.0, 0.0, 10.0, 20.0), Rect::new(1.0, 1.0, 2.0, 2.0)]
    );
  }

  #[test]
  fn parses_scene_object_with_mixed_boxes() {
    let text = r#"{
      "image_size": [640, 480],
      "boxes": [[0, 0, 5, 5], {"x": 1.5, "y": 2, "width": 3, "height": 4}]
    }"#;
    let scene = JsonFileInput::parse("mem", text).unwrap();
    assert_eq!(scene.image_size, Some((640, 480)));
    assert_eq!(scene.candidates[1], Rect::new(1.5, 2.0, 3.0, 4.0));
  }

  #[test]
  fn rejects_malformed_boxes() {
    assert!(JsonFileInput::parse("mem", "[[0, 0, 5]]").is_err());
    assert!(JsonFileInput::parse("mem", "{\"rects\": []}").is_err());
  }

  #[test]
  fn wrong_scheme_is_rejected() {
    let url = Url::parse("image:///tmp/boxes.json").unwrap();
    assert!(matches!(
      JsonFileInput::from_url(&url),
      Err(JsonFileInputError::SchemeMismatch)
    ));
  }
}
