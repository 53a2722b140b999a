//! Скачивание файлов, подготовленных сервером при экспорте
use super::error::GridError;
use crate::shared::api_utils::api_url;
use wasm_bindgen::JsCast;
use web_sys::HtmlAnchorElement;

/// Start a browser download for every exported path.
pub fn download_paths(paths: &[String]) -> Result<(), GridError> {
    if paths.is_empty() {
        return Err(GridError::Remote("Нет файлов для скачивания".to_string()));
    }
    for path in paths {
        download_url(&api_url(path), &file_name(path)).map_err(GridError::Download)?;
    }
    Ok(())
}

/// Last path segment, percent-decoded.
pub fn file_name(path: &str) -> String {
    let path = path.split(['?', '#']).next().unwrap_or(path);
    let last = path.rsplit('/').find(|s| !s.is_empty()).unwrap_or("export");
    urlencoding::decode(last)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| last.to_string())
}

fn download_url(url: &str, filename: &str) -> Result<(), String> {
    let window = web_sys::window().ok_or("No window object")?;
    let document = window.document().ok_or("No document object")?;
    let body = document.body().ok_or("No body element")?;

    let anchor = document
        .create_element("a")
        .map_err(|e| format!("Failed to create anchor: {:?}", e))?
        .dyn_into::<HtmlAnchorElement>()
        .map_err(|e| format!("Failed to cast to anchor: {:?}", e))?;

    anchor.set_href(url);
    anchor.set_download(filename);
    anchor
        .style()
        .set_property("display", "none")
        .map_err(|e| format!("Failed to set style: {:?}", e))?;

    body.append_child(&anchor)
        .map_err(|e| format!("Failed to append anchor: {:?}", e))?;
    anchor.click();
    body.remove_child(&anchor)
        .map_err(|e| format!("Failed to remove anchor: {:?}", e))?;
    Ok(())
}
