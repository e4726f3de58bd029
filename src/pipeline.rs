// 该文件是 Dingceng （顶层） 项目的一部分。
// src/pipeline.rs - 预过滤与包含关系过滤的组合
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

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
  filter::{ContainmentFilter, FilterError},
  geometry::Rect,
  prefilter::{MinAreaFilter, PrefilterError},
  scene::Scene,
};

pub trait Stage {
  type Input;
  type Output;
  type Error;

  fn process(&self, input: &Self::Input) -> Result<Self::Output, Self::Error>;
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
  #[error("预过滤错误: {0}")]
  PrefilterError(#[from] PrefilterError),
  #[error("包含关系过滤错误: {0}")]
  FilterError(#[from] FilterError),
}

/// 一张图像的过滤结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Selection {
  pub source: String,
  /// 输入候选框数量
  pub candidates: usize,
  /// 通过面积预过滤的数量
  pub prefiltered: usize,
  pub threshold: f64,
  /// 按面积升序排列的顶层框
  pub retained: Vec<Rect<f64>>,
  /// 被包含而丢弃的数量
  pub nested: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Pipeline {
  prefilter: Option<MinAreaFilter>,
  filter: ContainmentFilter,
}

impl Pipeline {
  pub fn new(filter: ContainmentFilter) -> Self {
    Self {
      prefilter: None,
      filter,
    }
  }

  pub fn with_prefilter(mut self, prefilter: Option<MinAreaFilter>) -> Self {
    self.prefilter = prefilter;
    self
  }
}

impl Stage for Pipeline {
  type Input = Scene;
  type Output = Selection;
  type Error = PipelineError;

  fn process(&self, scene: &Scene) -> Result<Selection, PipelineError> {
    let candidates = match (self.prefilter, scene.image_size) {
      (Some(prefilter), Some((width, height))) => {
        prefilter.retain(&scene.candidates, width, height)?
      }
      (Some(_), None) => {
        warn!("{} 缺少图像尺寸, 跳过面积预过滤", scene.source);
        scene.candidates.clone()
      }
      (None, _) => scene.candidates.clone(),
    };

    let partition = self.filter.partition(&candidates)?;
    for nested in &partition.nested {
      debug!("丢弃 {:?}, 父框 {:?}", nested.rect, nested.parent);
    }

    Ok(Selection {
      source: scene.source.clone(),
      candidates: scene.candidates.len(),
      prefiltered: candidates.len(),
      threshold: self.filter.threshold().value(),
      retained: partition.top_level,
      nested: partition.nested.len(),
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn scene() -> Scene {
    Scene::new(
      "mem",
      vec![
        Rect::new(0.0, 0.0, 10.0, 20.0),
        Rect::new(1.0, 1.0, 2.0, 2.0),
        Rect::new(11.0, 21.0, 1.0, 1.0),
      ],
    )
  }

  #[test]
  fn containment_only() {
    let selection = Pipeline::default().process(&scene()).unwrap();
    assert_eq!(selection.candidates, 3);
    assert_eq!(selection.prefiltered, 3);
    assert_eq!(selection.nested, 1);
    assert_eq!(selection.threshold, 0.9);
    assert_eq!(
      selection.retained,
      vec![Rect::new(11.0, 21.0, 1.0, 1.0), Rect::new(0.0, 0.0, 10.0, 20.0)]
    );
  }

  #[test]
  fn prefilter_runs_when_image_size_is_known() {
    let pipeline = Pipeline::default().with_prefilter(Some(MinAreaFilter::default()));
    // 阈值面积 0.05 * 40 * 40 = 80
    let selection = pipeline.process(&scene().with_image_size(40, 40)).unwrap();
    assert_eq!(selection.prefiltered, 1);
    assert_eq!(selection.nested, 0);
    assert_eq!(selection.retained, vec![Rect::new(0.0, 0.0, 10.0, 20.0)]);
  }

  #[test]
  fn prefilter_is_skipped_without_image_size() {
    let pipeline = Pipeline::default().with_prefilter(Some(MinAreaFilter::default()));
    let selection = pipeline.process(&scene()).unwrap();
    assert_eq!(selection.prefiltered, 3);
    assert_eq!(selection.retained.len(), 2);
  }

  #[test]
  fn invalid_candidate_surfaces_as_error() {
    let mut scene = scene();
    scene.candidates.push(Rect::new(0.0, 0.0, -1.0, 1.0));
    assert!(matches!(
      Pipeline::default().process(&scene),
      Err(PipelineError::FilterError(FilterError::InvalidCandidate { index: 3, .. }))
    ));
  }
}
