// 该文件是 Dingceng （顶层） 项目的一部分。
// src/filter.rs - 包含关系过滤
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
use rayon::prelude::*;
use thiserror::Error;
use tracing::debug;

use crate::geometry::{Coord, Rect, ValidationError, overlap_area};

pub const DEFAULT_OVERLAP_THRESHOLD: f64 = 0.9;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
  #[error("候选框 #{index} 无效: {source}")]
  InvalidCandidate {
    index: usize,
    #[source]
    source: ValidationError,
  },
  #[error("重叠阈值必须位于 (0, 1] 区间内, 实际为 {0}")]
  InvalidThreshold(f64),
}

/// 重叠比例阈值 τ ∈ (0, 1]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct OverlapThreshold(f64);

impl OverlapThreshold {
  pub fn new(value: f64) -> Result<Self, FilterError> {
    if value > 0.0 && value <= 1.0 {
      Ok(Self(value))
    } else {
      Err(FilterError::InvalidThreshold(value))
    }
  }

  pub fn value(&self) -> f64 {
    self.0
  }
}

impl Default for OverlapThreshold {
  fn default() -> Self {
    Self(DEFAULT_OVERLAP_THRESHOLD)
  }
}

/// 判断 `child` 是否为 `parent` 的子框
pub fn is_child<T: Coord>(
  child: &Rect<T>,
  parent: &Rect<T>,
  threshold: OverlapThreshold,
) -> Result<bool, ValidationError> {
  child.validate()?;
  parent.validate()?;
  Ok(contained_in(child, parent, threshold.value()))
}

fn contained_in<T: Coord>(child: &Rect<T>, parent: &Rect<T>, threshold: f64) -> bool {
  let child_area = child.area();
  let parent_area = parent.area();

  // 子框面积必须严格小于父框，面积相同的两个框互不为子框
  if child_area >= parent_area {
    return false;
  }

  // 零面积的框不作为子框，也不作为除数
  if child_area <= T::zero() {
    return false;
  }

  let overlap = overlap_area(child, parent);
  if overlap <= T::zero() {
    return false;
  }

  assert!(
    overlap <= parent_area,
    "重叠面积 {:?} 超过父框面积 {:?}",
    overlap,
    parent_area
  );

  let ratio = as_f64(overlap) / as_f64(child_area);
  ratio > threshold
}

fn as_f64<T: ToPrimitive>(value: T) -> f64 {
  value.to_f64().unwrap_or(f64::NAN)
}

/// 被其他候选框包含的框
#[derive(Debug, Clone, PartialEq)]
pub struct Nested<T> {
  pub rect: Rect<T>,
  /// 包含它的候选框中面积最大的一个
  pub parent: Rect<T>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Partition<T> {
  /// 按面积升序排列
  pub top_level: Vec<Rect<T>>,
  pub nested: Vec<Nested<T>>,
}

/// 包含关系过滤器，只保留没有父框的候选框
#[derive(Debug, Clone, Copy, Default)]
pub struct ContainmentFilter {
  threshold: OverlapThreshold,
  parallel: bool,
}

impl ContainmentFilter {
  pub fn new(threshold: OverlapThreshold) -> Self {
    Self {
      threshold,
      parallel: false,
    }
  }

  pub fn with_threshold(mut self, threshold: OverlapThreshold) -> Self {
    self.threshold = threshold;
    self
  }

  /// 使用 rayon 线程池并行查找父框
  pub fn with_parallel(mut self, parallel: bool) -> Self {
    self.parallel = parallel;
    self
  }

  pub fn threshold(&self) -> OverlapThreshold {
    self.threshold
  }

  pub fn retain_top_level<T: Coord>(&self, candidates: &[Rect<T>]) -> Result<Vec<Rect<T>>, FilterError> {
    Ok(self.partition(candidates)?.top_level)
  }

  pub fn partition<T: Coord>(&self, candidates: &[Rect<T>]) -> Result<Partition<T>, FilterError> {
    for (index, candidate) in candidates.iter().enumerate() {
      candidate
        .validate()
        .map_err(|source| FilterError::InvalidCandidate { index, source })?;
    }

    // 小框更可能是子框，先按面积升序排列
    let mut sorted = candidates.to_vec();
    sorted.sort_by(|a, b| as_f64(a.area()).total_cmp(&as_f64(b.area())));

    let parents: Vec<Option<usize>> = if self.parallel {
      (0..sorted.len())
        .into_par_iter()
        .map(|index| self.find_parent(&sorted, index))
        .collect()
    } else {
      (0..sorted.len())
        .map(|index| self.find_parent(&sorted, index))
        .collect()
    };

    let mut partition = Partition {
      top_level: Vec::with_capacity(sorted.len()),
      nested: Vec::new(),
    };
    for (rect, parent) in sorted.iter().zip(parents) {
      match parent {
        Some(parent) => partition.nested.push(Nested {
          rect: *rect,
          parent: sorted[parent],
        }),
        None => partition.top_level.push(*rect),
      }
    }

    debug!(
      "候选框 {} 个, 顶层框 {} 个, 子框 {} 个 (阈值 {})",
      sorted.len(),
      partition.top_level.len(),
      partition.nested.len(),
      self.threshold.value()
    );

    Ok(partition)
  }

  /// `sorted` 已按面积升序排列。父框面积必须严格更大，
  /// 因此只需从最大的框开始检查排在 `index` 之后的框。
  fn find_parent<T: Coord>(&self, sorted: &[Rect<T>], index: usize) -> Option<usize> {
    let child = &sorted[index];
    let threshold = self.threshold.value();
    (index + 1..sorted.len())
      .rev()
      .find(|&candidate| contained_in(child, &sorted[candidate], threshold))
  }
}
