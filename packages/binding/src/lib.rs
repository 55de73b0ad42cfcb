#![deny(clippy::all)]

use napi::{Error, Status};
use napi_derive::napi;
use typescript_transform::{HostError, Options, Plugin, TypeScriptTransform as Transform};

fn options_error(error: impl std::fmt::Display) -> Error {
  Error::new(Status::InvalidArg, error.to_string())
}

fn host_error(error: HostError) -> Error {
  let mut message = format!("[{}] {}", error.plugin, error.message);
  if let Some(stack) = &error.stack {
    message.push('\n');
    message.push_str(stack);
  }
  Error::new(Status::GenericFailure, message)
}

#[napi(object)]
pub struct TransformResult {
  pub code: String,
  pub map: Option<String>,
}

/// The plugin object handed to the bundler. Each instance owns its own
/// configuration cache.
#[napi]
pub struct TypeScriptTransform {
  inner: Transform,
}

#[napi]
impl TypeScriptTransform {
  #[napi(constructor)]
  pub fn new(options: Option<serde_json::Value>) -> napi::Result<Self> {
    let options = Options::from_value(options.unwrap_or(serde_json::Value::Null)).map_err(options_error)?;
    let inner = Transform::new(options).map_err(options_error)?;
    Ok(TypeScriptTransform { inner })
  }

  #[napi(getter)]
  pub fn name(&self) -> String {
    self.inner.name().to_string()
  }

  #[napi(getter)]
  pub fn apply(&self) -> Option<String> {
    self.inner.apply().map(|apply| apply.as_str().to_string())
  }

  #[napi(getter)]
  pub fn enforce(&self) -> Option<String> {
    self.inner.enforce().map(|enforce| enforce.as_str().to_string())
  }

  #[napi]
  pub fn build_start(&self) {
    self.inner.build_start();
  }

  /// Returns `null` when the module is filtered out.
  #[napi]
  pub fn transform(&self, code: String, id: String) -> napi::Result<Option<TransformResult>> {
    match self.inner.transform(&code, &id) {
      Ok(Some(output)) => Ok(Some(TransformResult {
        code: output.code,
        map: output.map,
      })),
      Ok(None) => Ok(None),
      Err(error) => {
        tracing::debug!(id = %error.id, "reporting transform error to host");
        Err(host_error(error))
      }
    }
  }
}
