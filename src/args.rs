// 该文件是 Dingceng （顶层） 项目的一部分。
// src/args.rs - 项目参数配置
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

use clap::Parser;
use url::Url;

/// Dingceng 项目参数配置
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
  /// 输入来源
  /// 支持格式:
  /// - 候选框: json:///path/boxes.json
  /// - 图片: image:///path/picture.png?sigma=1.1&low=50&high=150
  #[arg(long, value_name = "SOURCE")]
  pub input: Url,

  /// 输出路径
  /// 支持格式:
  /// - 标准输出: stdout:
  /// - 结果文件: json:///path/result.json
  /// - 标注图片: image:///path/annotated.png
  #[arg(long, default_value = "stdout:", value_name = "OUTPUT")]
  pub output: Url,

  /// 重叠比例阈值 (0.0, 1.0]
  #[arg(long, default_value = "0.9", value_name = "THRESHOLD")]
  pub threshold: f64,

  /// 最小面积比例 [0.0, 1.0)，0 表示不做预过滤
  #[arg(long, default_value = "0.05", value_name = "FRACTION")]
  pub min_area_fraction: f64,

  /// 并行查找父框
  #[arg(long)]
  pub parallel: bool,
}
