//! Browser I/O: the delayed startup fetch and reading picked files.

use js_sys::{Promise, Uint8Array};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, Response};

use crate::error::LoadError;

fn describe(e: &JsValue) -> String {
    e.as_string().unwrap_or_else(|| format!("{e:?}"))
}

fn transport(e: &JsValue) -> LoadError {
    LoadError::Fetch {
        status: None,
        message: describe(e),
    }
}

/// Resolve after `ms` milliseconds.
pub(crate) async fn sleep(ms: u32) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let timeout = i32::try_from(ms).unwrap_or(i32::MAX);
    let promise = Promise::new(&mut |resolve, _reject| {
        if window
            .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, timeout)
            .is_err()
        {
            let _ = resolve.call0(&JsValue::UNDEFINED);
        }
    });
    let _ = JsFuture::from(promise).await;
}

/// GET `url` and return the body. Anything but HTTP 200 is a fetch failure.
pub(crate) async fn fetch_bytes(url: &str) -> Result<Vec<u8>, LoadError> {
    let window = web_sys::window().ok_or_else(|| LoadError::Fetch {
        status: None,
        message: "no window".to_string(),
    })?;
    let response: Response = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(|e| transport(&e))?
        .dyn_into()
        .map_err(|e| transport(&e))?;

    let status = response.status();
    if status != 200 {
        tracing::warn!(url, status, "startup fetch rejected");
        return Err(LoadError::Fetch {
            status: Some(status),
            message: response.status_text(),
        });
    }

    let buffer = JsFuture::from(response.array_buffer().map_err(|e| transport(&e))?)
        .await
        .map_err(|e| transport(&e))?;
    Ok(Uint8Array::new(&buffer).to_vec())
}

/// Read a picked file fully into memory.
pub(crate) async fn read_blob(blob: &Blob) -> Result<Vec<u8>, LoadError> {
    let buffer = JsFuture::from(blob.array_buffer())
        .await
        .map_err(|e| LoadError::Parse(format!("file could not be read: {}", describe(&e))))?;
    Ok(Uint8Array::new(&buffer).to_vec())
}
