// 该文件是 Dingceng （顶层） 项目的一部分。
// src/main.rs - 项目主程序
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

mod args;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use dingceng::{
  FromUrl,
  filter::{ContainmentFilter, OverlapThreshold},
  input::InputWrapper,
  output::OutputWrapper,
  pipeline::Pipeline,
  prefilter::MinAreaFilter,
  task::{OneShotTask, Task},
};

fn main() -> Result<()> {
  tracing_subscriber::fmt::init();

  let args = args::Args::parse();

  info!("输入来源: {}", args.input);
  info!("输出路径: {}", args.output);
  info!("重叠比例阈值: {}", args.threshold);
  info!("最小面积比例: {}", args.min_area_fraction);

  let filter = ContainmentFilter::new(OverlapThreshold::new(args.threshold)?)
    .with_parallel(args.parallel);
  let prefilter = if args.min_area_fraction > 0.0 {
    Some(MinAreaFilter::new(args.min_area_fraction)?)
  } else {
    None
  };
  let pipeline = Pipeline::new(filter).with_prefilter(prefilter);

  let input = InputWrapper::from_url(&args.input)?;
  let output = OutputWrapper::from_url(&args.output)?;

  OneShotTask.run_task(input, pipeline, output)
}
