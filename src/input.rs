// 该文件是 Dingceng （顶层） 项目的一部分。
// src/input.rs - 候选框输入
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

use thiserror::Error;

use crate::{FromUrl, FromUrlWithScheme, scene::Scene};

mod json_file;
pub use self::json_file::{JsonFileInput, JsonFileInputError};

#[cfg(feature = "read_image_file")]
mod read_image_file;
#[cfg(feature = "read_image_file")]
pub use self::read_image_file::{ImageFileInput, ImageFileInputError};

#[derive(Error, Debug)]
pub enum InputError {
  #[error("JSON file input error: {0}")]
  JsonFileInputError(#[from] JsonFileInputError),
  #[cfg(feature = "read_image_file")]
  #[error("Image file input error: {0}")]
  ImageFileInputError(#[from] ImageFileInputError),
  #[error("URI scheme mismatch: {0}")]
  SchemeMismatch(String),
}

pub enum InputWrapper {
  JsonFile(JsonFileInput),
  #[cfg(feature = "read_image_file")]
  ReadImageFile(ImageFileInput),
}

impl FromUrl for InputWrapper {
  type Error = InputError;

  fn from_url(url: &url::Url) -> Result<Self, Self::Error> {
    match url.scheme() {
      JsonFileInput::SCHEME => Ok(InputWrapper::JsonFile(JsonFileInput::from_url(url)?)),
      #[cfg(feature = "read_image_file")]
      ImageFileInput::SCHEME => Ok(InputWrapper::ReadImageFile(ImageFileInput::from_url(url)?)),
      scheme => Err(InputError::SchemeMismatch(scheme.to_string())),
    }
  }
}

impl Iterator for InputWrapper {
  type Item = Scene;

  fn next(&mut self) -> Option<Self::Item> {
    match self {
      InputWrapper::JsonFile(input) => input.next(),
      #[cfg(feature = "read_image_file")]
      InputWrapper::ReadImageFile(input) => input.next(),
    }
  }
}
