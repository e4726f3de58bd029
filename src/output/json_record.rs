// 该文件是 Dingceng （顶层） 项目的一部分。
// src/output/json_record.rs - JSON 结果记录
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

use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;
use url::Url;

use crate::{FromUrl, output::Render, pipeline::Selection, scene::Scene};

#[derive(Error, Debug)]
pub enum JsonRecordOutputError {
  #[error("URI 方案不匹配: {0}")]
  SchemeMismatch(String),
  #[error("不是本地文件路径: {0}")]
  InvalidPath(String),
  #[error("I/O 错误: {0}")]
  IoError(#[from] std::io::Error),
  #[error("JSON 序列化错误: {0}")]
  JsonError(#[from] serde_json::Error),
}

pub const JSON_RECORD_SCHEME: &str = "json";
pub const STDOUT_RECORD_SCHEME: &str = "stdout";

/// 写入 JSON 文件（`json:///path`）或标准输出（`stdout:`）
pub struct JsonRecordOutput {
  path: Option<PathBuf>,
  compact: bool,
}

impl FromUrl for JsonRecordOutput {
  type Error = JsonRecordOutputError;

  fn from_url(uri: &Url) -> Result<Self, Self::Error> {
    let path = match uri.scheme() {
      JSON_RECORD_SCHEME => Some(
        uri
          .to_file_path()
          .map_err(|_| JsonRecordOutputError::InvalidPath(uri.to_string()))?,
      ),
      STDOUT_RECORD_SCHEME => None,
      scheme => return Err(JsonRecordOutputError::SchemeMismatch(scheme.to_string())),
    };
    let compact = uri.query_pairs().any(|(k, _)| k == "compact");

    Ok(JsonRecordOutput { path, compact })
  }
}

impl JsonRecordOutput {
  pub fn to_json(&self, selection: &Selection) -> Result<String, serde_json::Error> {
    if self.compact {
      serde_json::to_string(selection)
    } else {
      serde_json::to_string_pretty(selection)
    }
  }

  fn write_file(path: &Path, text: &str) -> Result<(), JsonRecordOutputError> {
    if let Some(parent) = path.parent()
      && !parent.as_os_str().is_empty()
    {
      std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, text)?;
    info!("保存结果到文件: {}", path.display());
    Ok(())
  }
}

impl Render<Scene, Selection> for JsonRecordOutput {
  type Error = JsonRecordOutputError;

  fn render_result(&self, _scene: &Scene, result: &Selection) -> Result<(), Self::Error> {
    let text = self.to_json(result)?;
    match &self.path {
      Some(path) => Self::write_file(path, &text),
      None => {
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{}", text)?;
        Ok(())
      }
    }
  }
}
