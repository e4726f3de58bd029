// 该文件是 Dingceng （顶层） 项目的一部分。
// src/task.rs - 任务调度
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

use tracing::info;

use crate::{output::Render, pipeline::Stage};

pub trait Task<I, S, O>: Sized {
  type Error;
  fn run_task(self, input: I, stage: S, output: O) -> Result<(), Self::Error>;
}

/// 只处理输入的第一张图像
pub struct OneShotTask;

impl<
  F,
  D,
  SE: std::error::Error + Sync + Send + 'static,
  RE: std::error::Error + Sync + Send + 'static,
  I: Iterator<Item = F>,
  S: Stage<Input = F, Output = D, Error = SE>,
  O: Render<F, D, Error = RE>,
> Task<I, S, O> for OneShotTask
{
  type Error = anyhow::Error;

  fn run_task(self, mut input: I, stage: S, output: O) -> Result<(), Self::Error> {
    info!("开始任务...");
    let scene = input.next().ok_or_else(|| anyhow::anyhow!("没有输入"))?;
    info!("输入获取成功，开始过滤...");
    let now = std::time::Instant::now();
    let result = stage.process(&scene)?;
    let elapsed = now.elapsed();
    info!("过滤完成，耗时: {:.2?}", elapsed);
    output.render_result(&scene, &result)?;
    info!("输出完成，耗时: {:.2?}", now.elapsed());

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::cell::RefCell;

  struct Doubler;

  #[derive(Debug, thiserror::Error)]
  #[error("never")]
  struct Never;

  impl Stage for Doubler {
    type Input = u32;
    type Output = u32;
    type Error = Never;

    fn process(&self, input: &u32) -> Result<u32, Never> {
      Ok(input * 2)
    }
  }

  #[derive(Default)]
  struct Collect(RefCell<Vec<(u32, u32)>>);

  impl Render<u32, u32> for &Collect {
    type Error = Never;

    fn render_result(&self, input: &u32, result: &u32) -> Result<(), Never> {
      self.0.borrow_mut().push((*input, *result));
      Ok(())
    }
  }

  #[test]
  fn one_shot_uses_first_input_only() {
    let sink = Collect::default();
    OneShotTask
      .run_task(vec![3u32, 5].into_iter(), Doubler, &sink)
      .unwrap();
    assert_eq!(sink.0.into_inner(), vec![(3, 6)]);
  }

  #[test]
  fn empty_input_is_an_error() {
    let sink = Collect::default();
    assert!(
      OneShotTask
        .run_task(Vec::<u32>::new().into_iter(), Doubler, &sink)
        .is_err()
    );
  }
}
